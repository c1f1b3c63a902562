use crate::beacon;
use crate::eapol;
use crate::error::{Error, Result};
use crate::hccapx::{HandshakeRecord, HccapxReader};
use crate::utils::pcap_writer::PcapWriter;
use deku::prelude::*;
use std::io::{Read, Seek, Write};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConvertStats {
    pub records: usize,
    pub converted: usize,
    pub skipped: usize,
    pub frames: usize,
}

fn unix_now() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0)
}

/// Beacon, message 1 and message 2 of one handshake, serialized in file order.
pub fn synthesize(record: &HandshakeRecord, ts_sec: u32) -> Result<[Vec<u8>; 3]> {
    Ok([
        beacon::synthesize(record, ts_sec)?.to_bytes()?,
        eapol::synthesize_request(record)?.to_bytes()?,
        eapol::synthesize_reply(record)?.to_bytes()?,
    ])
}

/// Converts every handshake record of `input` into three frames of a pcap written to `output`.
pub fn convert<R, W>(input: R, output: W) -> Result<ConvertStats>
where
    R: Read + Seek,
    W: Write,
{
    convert_with_clock(input, output, unix_now)
}

/// Like [`convert`], taking each record's capture time from `now`.
pub fn convert_with_clock<R, W, F>(input: R, output: W, mut now: F) -> Result<ConvertStats>
where
    R: Read + Seek,
    W: Write,
    F: FnMut() -> u32,
{
    let reader = HccapxReader::new(input)?;
    let mut stats = ConvertStats {
        records: reader.record_count(),
        ..ConvertStats::default()
    };
    let mut writer = PcapWriter::new(output)?;

    for record in reader {
        let record = match record {
            Ok(r) => r,
            Err(Error::BadSignature { index, signature }) => {
                log::warn!("Skipping record {}: invalid signature {:#010x}", index, signature);
                stats.skipped += 1;
                continue;
            }
            Err(e) => return Err(e),
        };
        log::debug!(
            "essid {:?} ap {} sta {} keyver {} message_pair {}",
            String::from_utf8_lossy(record.essid()),
            record.mac_ap,
            record.mac_sta,
            record.keyver,
            record.message_pair
        );
        log::debug!("anonce {} snonce {}", hex::encode(record.nonce_ap), hex::encode(record.nonce_sta));

        let ts_sec = now();
        for frame in synthesize(&record, ts_sec)?.iter() {
            log::trace!("frame {} bytes", frame.len());
            writer.write_frame(ts_sec, frame)?;
        }
        stats.converted += 1;
    }

    stats.frames = writer.frames();
    writer.into_inner()?;
    Ok(stats)
}
