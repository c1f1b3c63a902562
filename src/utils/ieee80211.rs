use deku::prelude::*;
use std::fmt;

#[derive(Clone, Copy, DekuRead, DekuWrite, Eq, PartialEq, Hash)]
pub struct Mac(pub [u8; 6]);

impl Mac {
    pub const BROADCAST: Mac = Mac([0xff; 6]);
}

impl fmt::Debug for Mac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.0;
        write!(f, "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}", m[0], m[1], m[2], m[3], m[4], m[5])
    }
}

impl fmt::Display for Mac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, DekuRead, DekuWrite, PartialEq)]
#[deku(type = "u8", bits = "2")]
pub enum FrameType {
    #[deku(id = "0")]
    Management,
    #[deku(id = "1")]
    Control,
    #[deku(id = "2")]
    Data,
}

#[derive(Debug, Default, DekuRead, DekuWrite, PartialEq)]
pub struct Flags {
    #[deku(bits = 1)]
    pub order: u8,
    #[deku(bits = 1)]
    pub protected_frame: u8,
    #[deku(bits = 1)]
    pub more_data: u8,
    #[deku(bits = 1)]
    pub power_management: u8,
    #[deku(bits = 1)]
    pub retry: u8,
    #[deku(bits = 1)]
    pub more_fragments: u8,
    #[deku(bits = 1)]
    pub from_ds: u8,
    #[deku(bits = 1)]
    pub to_ds: u8,
}

/// Management subtype of a beacon.
pub const SUBTYPE_BEACON: u8 = 8;
/// Data subtype of a QoS data frame.
pub const SUBTYPE_QOS_DATA: u8 = 8;

#[derive(Debug, DekuRead, DekuWrite, PartialEq)]
pub struct FrameControl {
    #[deku(bits = 4)]
    pub sub_type: u8,
    pub frame_type: FrameType,
    #[deku(bits = 2)]
    pub protocol_version: u8,

    pub flags: Flags,
}

impl FrameControl {
    pub fn beacon() -> FrameControl {
        FrameControl {
            sub_type: SUBTYPE_BEACON,
            frame_type: FrameType::Management,
            protocol_version: 0,
            flags: Flags::default(),
        }
    }
    /// QoS data frame travelling from the distribution system (AP to station).
    pub fn qos_data_from_ds() -> FrameControl {
        FrameControl {
            sub_type: SUBTYPE_QOS_DATA,
            frame_type: FrameType::Data,
            protocol_version: 0,
            flags: Flags {
                from_ds: 1,
                ..Flags::default()
            },
        }
    }
    /// QoS data frame travelling to the distribution system (station to AP).
    pub fn qos_data_to_ds() -> FrameControl {
        FrameControl {
            sub_type: SUBTYPE_QOS_DATA,
            frame_type: FrameType::Data,
            protocol_version: 0,
            flags: Flags {
                to_ds: 1,
                ..Flags::default()
            },
        }
    }
}

/// 802.11 MAC header. Duration and sequence control are little endian on air.
#[derive(Debug, PartialEq, DekuRead, DekuWrite)]
pub struct Frame {
    pub frame_control: FrameControl,
    #[deku(endian = "little")]
    pub duration_id: u16,
    pub addr1: Mac,
    #[deku(cond = "frame_control.frame_type != FrameType::Control")]
    pub addr2: Option<Mac>,
    #[deku(cond = "frame_control.frame_type != FrameType::Control")]
    pub addr3: Option<Mac>,
    #[deku(endian = "little", cond = "frame_control.frame_type != FrameType::Control")]
    pub sequence_control: Option<u16>,
}

impl Frame {
    pub fn new(
        frame_control: FrameControl,
        duration_id: u16,
        dst: Mac,
        src: Mac,
        bssid: Mac,
        sequence_control: u16,
    ) -> Frame {
        Frame {
            frame_control,
            duration_id,
            addr1: dst,
            addr2: Some(src),
            addr3: Some(bssid),
            sequence_control: Some(sequence_control),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_frame() {
        let data = vec![0x88u8, 0x41];
        let (_, control_frame) = FrameControl::from_bytes((data.as_ref(), 0)).unwrap();
        assert_eq!(control_frame, FrameControl {
            protocol_version: 0,
            frame_type: FrameType::Data,
            sub_type: 8,

            flags: Flags {
                to_ds: 1,
                protected_frame: 1,
                ..Flags::default()
            }
        })
    }

    #[test]
    fn test_generate_frame_control() {
        assert_eq!(FrameControl::beacon().to_bytes().unwrap(), &[0x80, 0x00]);
        assert_eq!(FrameControl::qos_data_from_ds().to_bytes().unwrap(), &[0x88, 0x02]);
        assert_eq!(FrameControl::qos_data_to_ds().to_bytes().unwrap(), &[0x88, 0x01]);
    }

    #[test]
    fn test_frame() {
        let data = vec![0xc4u8, 0x00, 0xca, 0x00, 0x98, 0x41, 0x5c, 0xdc, 0x22, 0xec];
        let (_, frame) = Frame::from_bytes((data.as_ref(), 0)).unwrap();
        assert_eq!(frame.frame_control.frame_type, FrameType::Control);
        assert_eq!(frame.duration_id, 0xca);
        assert_eq!(frame.addr2, None);

        let data = vec![
            0x88, 0x41, 0x3a, 0x00, 0x2c, 0xf8, 0x9b, 0xdd, 0x06, 0xa0, 0x00, 0x20, 0xa6, 0xfc, 0xb0, 0x36,
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x20, 0x00, 0x00, 0x00, 0x03, 0x00, 0x00, 0x20, 0x00, 0x00,
            0x00, 0x00
        ];
        let ((rest, _), frame) = Frame::from_bytes((data.as_ref(), 0)).unwrap();
        assert_eq!(frame.addr1, Mac([0x2c, 0xf8, 0x9b, 0xdd, 0x06, 0xa0]));
        assert_eq!(frame.addr3, Some(Mac::BROADCAST));
        assert_eq!(frame.sequence_control, Some(0x0020));
        assert_eq!(rest.len(), 10);
    }

    #[test]
    fn test_generate_frame() {
        let ap = Mac([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
        let frame = Frame::new(FrameControl::beacon(), 314, Mac::BROADCAST, ap, ap, 0x5020);
        let data = frame.to_bytes().unwrap();
        assert_eq!(data, &[
            0x80, 0x00, 0x3a, 0x01, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x00, 0x11,
            0x22, 0x33, 0x44, 0x55, 0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x20, 0x50,
        ][..]);
    }

    #[test]
    fn test_mac_display() {
        let mac = Mac([0x2c, 0xf8, 0x9b, 0xdd, 0x06, 0xa0]);
        assert_eq!(mac.to_string(), "2c:f8:9b:dd:06:a0");
    }
}
