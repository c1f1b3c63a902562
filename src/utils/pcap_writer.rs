use crate::error::{Error, Result};
use pcap_parser::{LegacyPcapBlock, Linktype, PcapHeader, ToVec};
use std::io::Write;

pub const PCAP_MAGIC: u32 = 0xa1b2_c3d4;
pub const SNAPLEN: u32 = 0xffff;
pub const LINKTYPE_IEEE802_11: i32 = 105;

/// Legacy pcap writer for raw 802.11 frames.
///
/// The global header goes out in [`PcapWriter::new`], so create the writer only
/// once the input has been validated.
pub struct PcapWriter<W> {
    writer: W,
    frames: usize,
}

impl<W> PcapWriter<W>
where
    W: Write,
{
    pub fn new(mut writer: W) -> Result<Self> {
        let mut header = PcapHeader {
            magic_number: PCAP_MAGIC,
            version_major: 2,
            version_minor: 4,
            thiszone: 0,
            sigfigs: 0,
            snaplen: SNAPLEN,
            network: Linktype(LINKTYPE_IEEE802_11),
        };
        let data = header.to_vec().map_err(|e| Error::Pcap(format!("{:?}", e)))?;
        writer.write_all(&data)?;
        log::trace!("header {:?}", header);
        Ok(PcapWriter { writer, frames: 0 })
    }

    /// Writes one frame; captured and original length are both `data.len()`.
    pub fn write_frame(&mut self, ts_sec: u32, data: &[u8]) -> Result<()> {
        let len = data.len() as u32;
        let mut block = LegacyPcapBlock {
            ts_sec,
            ts_usec: 0,
            caplen: len,
            origlen: len,
            data,
        };
        let data = block.to_vec().map_err(|e| Error::Pcap(format!("{:?}", e)))?;
        self.writer.write_all(&data)?;
        self.frames += 1;
        Ok(())
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
