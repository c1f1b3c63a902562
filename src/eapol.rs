//! EAPOL-Key frames of the 4-way handshake, as carried in 802.11 QoS data frames.
//!
//! Everything after the MAC header is big endian except the QoS control field.
use crate::beacon::TaggedElement;
use crate::error::Result;
use crate::hccapx::{offset, HandshakeRecord};
use crate::utils::ieee80211::{Frame, FrameControl};
use deku::prelude::*;

pub const ETHERTYPE_EAPOL: u16 = 0x888e;
const DURATION: u16 = 314;
/// Body length of message 1: key descriptor plus descriptor type.
const REQUEST_BODY_LENGTH: u16 = 95;
const KEY_LENGTH: u16 = 32;

#[derive(Debug, PartialEq, DekuRead, DekuWrite)]
pub struct LlcSnap {
    pub dsap: u8,
    pub ssap: u8,
    pub control: u8,
    pub oui: [u8; 3],
    #[deku(endian = "big")]
    pub ethertype: u16,
}

impl LlcSnap {
    pub fn eapol() -> LlcSnap {
        LlcSnap {
            dsap: 0xaa,
            ssap: 0xaa,
            control: 0x03,
            oui: [0; 3],
            ethertype: ETHERTYPE_EAPOL,
        }
    }
}

#[derive(Debug, PartialEq, DekuRead, DekuWrite)]
pub struct EapolHeader {
    pub version: u8,
    pub packet_type: u8,
    #[deku(endian = "big")]
    pub body_length: u16,
    pub descriptor_type: u8,
}

/// Key Information field of an EAPOL-Key descriptor.
#[derive(Debug, Clone, Copy, PartialEq, DekuRead, DekuWrite)]
pub struct KeyInfo(#[deku(endian = "big")] pub u16);

impl KeyInfo {
    pub const PAIRWISE: u16 = 1 << 3;
    pub const INSTALL: u16 = 1 << 6;
    pub const ACK: u16 = 1 << 7;
    pub const MIC: u16 = 1 << 8;
    pub const SECURE: u16 = 1 << 9;
    pub const ERROR: u16 = 1 << 10;
    pub const REQUEST: u16 = 1 << 11;

    /// HMAC-MD5/RC4, pairwise, ACK set.
    pub const MESSAGE_1: KeyInfo = KeyInfo(0x0089);

    /// 1 = HMAC-MD5/RC4, 2 = HMAC-SHA1/AES, 3 = AES-CMAC
    pub fn descriptor_version(self) -> u8 {
        (self.0 & 0x07) as u8
    }

    pub fn has(self, flag: u16) -> bool {
        self.0 & flag != 0
    }
}

#[derive(Debug, PartialEq, DekuRead, DekuWrite)]
pub struct KeyDescriptor {
    pub key_info: KeyInfo,
    #[deku(endian = "big")]
    pub key_length: u16,
    pub replay_counter: [u8; 8],
    pub nonce: [u8; 32],
    pub iv: [u8; 16],
    pub rsc: [u8; 8],
    pub id: [u8; 8],
    pub mic: [u8; 16],
    #[deku(endian = "big")]
    pub key_data_length: u16,
}

#[derive(Debug, PartialEq, DekuWrite)]
pub struct EapolKeyFrame {
    pub header: Frame,
    #[deku(endian = "little")]
    pub qos_control: u16,
    pub llc: LlcSnap,
    pub eapol: EapolHeader,
    pub key: KeyDescriptor,
    pub key_data: Option<TaggedElement>,
}

/// Message 1, AP to station, carrying the ANonce.
///
/// Only the replay counter and packet/descriptor types come from the captured
/// payload; the protocol version is the record's key version.
pub fn synthesize_request(record: &HandshakeRecord) -> Result<EapolKeyFrame> {
    Ok(EapolKeyFrame {
        header: Frame::new(
            FrameControl::qos_data_from_ds(),
            DURATION,
            record.mac_sta,
            record.mac_ap,
            record.mac_ap,
            0,
        ),
        qos_control: 0,
        llc: LlcSnap::eapol(),
        eapol: EapolHeader {
            version: record.keyver,
            packet_type: record.eapol_u8(offset::PACKET_TYPE),
            body_length: REQUEST_BODY_LENGTH,
            descriptor_type: record.eapol_u8(offset::DESCRIPTOR_TYPE),
        },
        key: KeyDescriptor {
            key_info: KeyInfo::MESSAGE_1,
            key_length: KEY_LENGTH,
            replay_counter: record.replay_counter(),
            nonce: record.nonce_ap,
            iv: [0; 16],
            rsc: [0; 8],
            id: [0; 8],
            mic: [0; 16],
            key_data_length: 0,
        },
        key_data: None,
    })
}

/// Message 2, station to AP, rebuilt from the captured payload with the SNonce and MIC.
pub fn synthesize_reply(record: &HandshakeRecord) -> Result<EapolKeyFrame> {
    let key_info = KeyInfo(record.eapol_be_u16(offset::KEY_INFO));
    log::debug!(
        "message 2 key info {:#06x}: version {} mic {} secure {}",
        key_info.0,
        key_info.descriptor_version(),
        key_info.has(KeyInfo::MIC),
        key_info.has(KeyInfo::SECURE)
    );
    let key_length = record.eapol_be_u16(offset::KEY_LENGTH);
    if key_length != KEY_LENGTH {
        log::warn!(
            "message 2 of {} has key length {}, expected {}",
            record.mac_sta,
            key_length,
            KEY_LENGTH
        );
    }

    Ok(EapolKeyFrame {
        header: Frame::new(
            FrameControl::qos_data_to_ds(),
            DURATION,
            record.mac_ap,
            record.mac_sta,
            record.mac_ap,
            0,
        ),
        qos_control: 0,
        llc: LlcSnap::eapol(),
        eapol: EapolHeader {
            version: record.eapol_u8(offset::VERSION),
            packet_type: record.eapol_u8(offset::PACKET_TYPE),
            body_length: record.eapol_be_u16(offset::BODY_LENGTH),
            descriptor_type: record.eapol_u8(offset::DESCRIPTOR_TYPE),
        },
        key: KeyDescriptor {
            key_info,
            key_length,
            replay_counter: record.replay_counter(),
            nonce: record.nonce_sta,
            iv: [0; 16],
            rsc: [0; 8],
            id: [0; 8],
            mic: record.keymic,
            key_data_length: record.eapol_be_u16(offset::KEY_DATA_LENGTH),
        },
        key_data: Some(TaggedElement::new(
            record.key_data_number(),
            record.vendor_data().to_vec(),
        )?),
    })
}
