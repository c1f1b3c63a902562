//! Reader for hashcat `.hccapx` handshake records.
//!
//! A record is a packed 393 byte structure, all integers little endian:
//!
//! | offset | size | field        |
//! |--------|------|--------------|
//! | 0      | 4    | signature    |
//! | 4      | 4    | version      |
//! | 8      | 1    | message_pair |
//! | 9      | 1    | essid_len    |
//! | 10     | 32   | essid        |
//! | 42     | 1    | keyver       |
//! | 43     | 16   | keymic       |
//! | 59     | 6    | mac_ap       |
//! | 65     | 32   | nonce_ap     |
//! | 97     | 6    | mac_sta      |
//! | 103    | 32   | nonce_sta    |
//! | 135    | 2    | eapol_len    |
//! | 137    | 256  | eapol        |
use crate::error::{Error, Result};
use crate::utils::ieee80211::Mac;
use deku::prelude::*;
use std::io::{Read, Seek, SeekFrom};

/// "HCPX" read as a little endian u32.
pub const HCCAPX_SIGNATURE: u32 = 0x5850_4348;
pub const RECORD_SIZE: usize = 393;

/// Offsets into the captured EAPOL message 2.
pub mod offset {
    pub const VERSION: usize = 0;
    pub const PACKET_TYPE: usize = 1;
    pub const BODY_LENGTH: usize = 2;
    pub const DESCRIPTOR_TYPE: usize = 4;
    pub const KEY_INFO: usize = 5;
    pub const KEY_LENGTH: usize = 7;
    pub const REPLAY_COUNTER: usize = 9;
    pub const KEY_DATA_LENGTH: usize = 97;
    pub const KEY_DATA_NUMBER: usize = 99;
    pub const KEY_DATA_LEN: usize = 100;
    pub const KEY_DATA: usize = 101;
}

#[derive(Debug, Clone, PartialEq, DekuRead, DekuWrite)]
pub struct HandshakeRecord {
    #[deku(endian = "little")]
    pub signature: u32,
    #[deku(endian = "little")]
    pub version: u32,
    /// Which messages of the handshake were paired. Not used for synthesis.
    pub message_pair: u8,
    pub essid_len: u8,
    pub essid: [u8; 32],
    pub keyver: u8,
    pub keymic: [u8; 16],
    pub mac_ap: Mac,
    pub nonce_ap: [u8; 32],
    pub mac_sta: Mac,
    pub nonce_sta: [u8; 32],
    #[deku(endian = "little")]
    pub eapol_len: u16,
    pub eapol: [u8; 256],
}

impl HandshakeRecord {
    pub fn is_valid_signature(&self) -> bool {
        self.signature == HCCAPX_SIGNATURE
    }

    /// ESSID bytes up to the first NUL. `essid_len` is not consulted.
    pub fn essid(&self) -> &[u8] {
        let end = self.essid.iter().position(|&b| b == 0).unwrap_or(self.essid.len());
        &self.essid[..end]
    }

    pub fn eapol_u8(&self, offset: usize) -> u8 {
        self.eapol[offset]
    }

    pub fn eapol_be_u16(&self, offset: usize) -> u16 {
        u16::from_be_bytes([self.eapol[offset], self.eapol[offset + 1]])
    }

    pub fn replay_counter(&self) -> [u8; 8] {
        let mut counter = [0u8; 8];
        counter.copy_from_slice(&self.eapol[offset::REPLAY_COUNTER..offset::REPLAY_COUNTER + 8]);
        counter
    }

    pub fn key_data_number(&self) -> u8 {
        self.eapol[offset::KEY_DATA_NUMBER]
    }

    /// Body of the first key-data element of message 2, clamped to the EAPOL buffer.
    pub fn vendor_data(&self) -> &[u8] {
        let len = self.eapol[offset::KEY_DATA_LEN] as usize;
        let end = (offset::KEY_DATA + len).min(self.eapol.len());
        &self.eapol[offset::KEY_DATA..end]
    }

    pub fn vendor_data_clamped(&self) -> bool {
        self.vendor_data().len() != self.eapol[offset::KEY_DATA_LEN] as usize
    }
}

/// Iterates over the records of an `.hccapx` stream.
///
/// The size is validated up front; a record whose signature does not match
/// yields [`Error::BadSignature`] and the iterator moves on to the next slot.
pub struct HccapxReader<R> {
    reader: R,
    count: usize,
    index: usize,
}

impl<R> HccapxReader<R>
where
    R: Read + Seek,
{
    pub fn new(mut reader: R) -> Result<Self> {
        let size = reader.seek(SeekFrom::End(0))?;
        if size % RECORD_SIZE as u64 != 0 {
            return Err(Error::InvalidInputSize { size });
        }
        let count = (size / RECORD_SIZE as u64) as usize;
        if count == 0 {
            return Err(Error::EmptyInput);
        }
        reader.seek(SeekFrom::Start(0))?;
        log::debug!("{} handshake record(s) in input", count);
        Ok(HccapxReader {
            reader,
            count,
            index: 0,
        })
    }

    /// Number of record slots in the input, valid or not.
    pub fn record_count(&self) -> usize {
        self.count
    }

    fn read_record(&mut self) -> Result<HandshakeRecord> {
        let mut buf = Vec::with_capacity(RECORD_SIZE);
        (&mut self.reader).take(RECORD_SIZE as u64).read_to_end(&mut buf)?;
        if buf.len() < RECORD_SIZE {
            log::warn!("record {} is short ({} bytes), padding with zeros", self.index, buf.len());
            buf.resize(RECORD_SIZE, 0);
        }
        let (_, record) = HandshakeRecord::from_bytes((buf.as_ref(), 0))?;
        if !record.is_valid_signature() {
            return Err(Error::BadSignature {
                index: self.index,
                signature: record.signature,
            });
        }
        Ok(record)
    }
}

impl<R> Iterator for HccapxReader<R>
where
    R: Read + Seek,
{
    type Item = Result<HandshakeRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }
        let record = self.read_record();
        self.index += 1;
        Some(record)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Cursor;

    /// EAPOL message 2 of a WPA2 handshake, RSN element as key data.
    pub(crate) const SAMPLE_EAPOL: &str = concat!(
        "0103007502010a00000000000000000001",
        "c3b2a1f0e9d8c7b6a59483726150493837261504938271605948372615049384",
        "00000000000000000000000000000000",
        "0000000000000000",
        "0000000000000000",
        "00000000000000000000000000000000",
        "0016",
        "3014",
        "0100000fac040100000fac040100000fac020000",
    );

    pub(crate) fn sample_record() -> HandshakeRecord {
        let mut essid = [0u8; 32];
        essid[..7].copy_from_slice(b"linksys");
        let payload = hex::decode(SAMPLE_EAPOL).unwrap();
        let mut eapol = [0u8; 256];
        eapol[..payload.len()].copy_from_slice(&payload);
        HandshakeRecord {
            signature: HCCAPX_SIGNATURE,
            version: 4,
            message_pair: 0,
            essid_len: 7,
            essid,
            keyver: 2,
            keymic: [0x5a; 16],
            mac_ap: Mac([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]),
            nonce_ap: [0xa1; 32],
            mac_sta: Mac([0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb]),
            nonce_sta: [0xb2; 32],
            eapol_len: payload.len() as u16,
            eapol,
        }
    }

    #[test]
    fn test_sample_payload_offsets() {
        let record = sample_record();
        assert_eq!(record.eapol_len, 121);
        assert_eq!(record.eapol_be_u16(offset::BODY_LENGTH), 0x75);
        assert_eq!(record.eapol_be_u16(offset::KEY_INFO), 0x010a);
        assert_eq!(record.eapol_be_u16(offset::KEY_DATA_LENGTH), 22);
        assert_eq!(record.key_data_number(), 0x30);
        assert_eq!(record.vendor_data().len(), 20);
        assert_eq!(record.replay_counter(), [0, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_record_layout() {
        let data = sample_record().to_bytes().unwrap();
        assert_eq!(data.len(), RECORD_SIZE);
        assert_eq!(&data[0..4], b"HCPX");
        assert_eq!(&data[4..8], &[4, 0, 0, 0]);
        assert_eq!(data[9], 7);
        assert_eq!(&data[10..17], b"linksys");
        assert_eq!(data[42], 2);
        assert_eq!(&data[59..65], &[0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
        assert_eq!(&data[97..103], &[0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb]);
        assert_eq!(&data[135..137], &[121, 0]);
        assert_eq!(&data[137..139], &[0x01, 0x03]);
    }

    #[test]
    fn test_essid_ignores_stored_length() {
        let mut record = sample_record();
        record.essid_len = 20;
        assert_eq!(record.essid(), b"linksys");

        record.essid = [b'x'; 32];
        assert_eq!(record.essid().len(), 32);
    }

    #[test]
    fn test_vendor_data_is_clamped() {
        let mut record = sample_record();
        record.eapol[offset::KEY_DATA_LEN] = 0xff;
        assert_eq!(record.vendor_data().len(), 256 - offset::KEY_DATA);
        assert!(record.vendor_data_clamped());

        record.eapol[offset::KEY_DATA_LEN] = 0;
        assert!(record.vendor_data().is_empty());
        assert!(!record.vendor_data_clamped());
    }

    #[test]
    fn test_reader_rejects_partial_record() {
        let mut data = sample_record().to_bytes().unwrap();
        data.push(0);
        match HccapxReader::new(Cursor::new(data)) {
            Err(Error::InvalidInputSize { size }) => assert_eq!(size, RECORD_SIZE as u64 + 1),
            other => panic!("unexpected {:?}", other.map(|r| r.record_count())),
        }
    }

    #[test]
    fn test_reader_rejects_empty_input() {
        match HccapxReader::new(Cursor::new(Vec::new())) {
            Err(Error::EmptyInput) => {}
            other => panic!("unexpected {:?}", other.map(|r| r.record_count())),
        }
    }

    #[test]
    fn test_reader_skips_bad_signature() {
        let good = sample_record();
        let mut bad = sample_record();
        bad.signature = 0x4242_4242;
        let data = [bad.to_bytes().unwrap(), good.to_bytes().unwrap()].concat();

        let reader = HccapxReader::new(Cursor::new(data)).unwrap();
        assert_eq!(reader.record_count(), 2);
        let records: Vec<_> = reader.collect();
        match &records[0] {
            Err(Error::BadSignature { index, signature }) => {
                assert_eq!(*index, 0);
                assert_eq!(*signature, 0x4242_4242);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(records[1].as_ref().unwrap(), &good);
    }
}
