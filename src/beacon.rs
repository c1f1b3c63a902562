//! Beacon frame advertising the handshake's network.
use crate::error::{Error, Result};
use crate::hccapx::HandshakeRecord;
use crate::utils::ieee80211::{Frame, FrameControl, Mac};
use deku::prelude::*;
use std::convert::TryFrom;

pub const TAG_SSID: u8 = 0;
pub const TAG_RATES: u8 = 1;
pub const TAG_CHANNEL: u8 = 3;
pub const TAG_TIM: u8 = 5;
pub const TAG_ERP: u8 = 42;
pub const TAG_ERP_ALT: u8 = 47;
pub const TAG_EXT_RATES: u8 = 50;
pub const TAG_VENDOR: u8 = 221;

/// 1, 2, 5.5, 11 (basic), 18, 24, 36, 54 Mbit/s
const RATES: [u8; 8] = [0x82, 0x84, 0x8b, 0x96, 0x24, 0x30, 0x48, 0x6c];
const CHANNEL: [u8; 1] = [0x01];
const TIM: [u8; 4] = [0x00, 0x01, 0x00, 0x00];
const ERP: [u8; 1] = [0x00];
/// 6, 9, 12, 48 Mbit/s
const EXT_RATES: [u8; 4] = [0x0c, 0x12, 0x18, 0x60];
const VENDOR: [u8; 9] = [0x00, 0x10, 0x18, 0x02, 0x00, 0xf0, 0x00, 0x00, 0x00];
const WPA_INFO_TAIL: [u8; 2] = [0x0c, 0x00];
const WMM_OUI_LEN: usize = 3;
/// Type, subtype, version, QoS info, reserved, then four AC parameter records.
const WMM_TAIL: [u8; 21] = [
    0x02, 0x01, 0x01, 0x80, 0x00, 0x03, 0xa4, 0x00, 0x00, 0x27, 0xa4, 0x00, 0x00, 0x42, 0x43,
    0x5e, 0x00, 0x62, 0x32, 0x2f, 0x00,
];

const SEQUENCE_CONTROL: u16 = 0x5020;
const BEACON_INTERVAL: u16 = 0x0064;
/// ESS, privacy, short slot time
const CAPABILITIES: u16 = 0x0411;

/// An information element: number, length, data.
#[derive(Debug, Clone, PartialEq, DekuRead, DekuWrite)]
pub struct TaggedElement {
    pub number: u8,
    length: u8,
    #[deku(count = "length")]
    pub data: Vec<u8>,
}

impl TaggedElement {
    pub fn new(number: u8, data: Vec<u8>) -> Result<TaggedElement> {
        let length = u8::try_from(data.len()).map_err(|_| Error::ElementTooLong {
            number,
            len: data.len(),
        })?;
        Ok(TaggedElement {
            number,
            length,
            data,
        })
    }

    pub fn length(&self) -> u8 {
        self.length
    }
}

#[derive(Debug, PartialEq, DekuWrite)]
pub struct Beacon {
    pub header: Frame,
    /// Milliseconds since the epoch.
    #[deku(endian = "little")]
    pub timestamp: u64,
    #[deku(endian = "little")]
    pub interval: u16,
    #[deku(endian = "little")]
    pub capability: u16,
    pub elements: Vec<TaggedElement>,
}

/// Builds the beacon's element chain, in on-air order.
pub fn tagged_elements(record: &HandshakeRecord) -> Result<Vec<TaggedElement>> {
    let vendor_data = record.vendor_data();
    if record.vendor_data_clamped() {
        log::warn!(
            "key data of {} claims more bytes than the EAPOL buffer holds, using {}",
            record.mac_ap,
            vendor_data.len()
        );
    }

    let wpa_info = [vendor_data, &WPA_INFO_TAIL[..]].concat();
    let oui = &vendor_data[..vendor_data.len().min(WMM_OUI_LEN)];
    let wmm = [oui, &WMM_TAIL[..]].concat();

    Ok(vec![
        TaggedElement::new(TAG_SSID, record.essid().to_vec())?,
        TaggedElement::new(TAG_RATES, RATES.to_vec())?,
        TaggedElement::new(TAG_CHANNEL, CHANNEL.to_vec())?,
        TaggedElement::new(TAG_TIM, TIM.to_vec())?,
        // both numbers have been used for ERP information
        TaggedElement::new(TAG_ERP, ERP.to_vec())?,
        TaggedElement::new(TAG_ERP_ALT, ERP.to_vec())?,
        TaggedElement::new(TAG_EXT_RATES, EXT_RATES.to_vec())?,
        TaggedElement::new(TAG_VENDOR, VENDOR.to_vec())?,
        TaggedElement::new(TAG_VENDOR, wpa_info)?,
        TaggedElement::new(TAG_VENDOR, wmm)?,
    ])
}

pub fn synthesize(record: &HandshakeRecord, ts_sec: u32) -> Result<Beacon> {
    Ok(Beacon {
        header: Frame::new(
            FrameControl::beacon(),
            0,
            Mac::BROADCAST,
            record.mac_ap,
            record.mac_ap,
            SEQUENCE_CONTROL,
        ),
        timestamp: u64::from(ts_sec) * 1000,
        interval: BEACON_INTERVAL,
        capability: CAPABILITIES,
        elements: tagged_elements(record)?,
    })
}
