use crate::hccapx::RECORD_SIZE;
use deku::DekuError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The input length is not a whole number of handshake records.
    #[error("input size {size} is not a multiple of the {} byte record size", RECORD_SIZE)]
    InvalidInputSize { size: u64 },
    #[error("input contains no handshake records")]
    EmptyInput,
    /// Soft failure: the caller skips the record and carries on with the next one.
    #[error("record {index} has an invalid signature {signature:#010x}")]
    BadSignature { index: usize, signature: u32 },
    #[error("tagged element {number} carries {len} bytes, more than fits in its length byte")]
    ElementTooLong { number: u8, len: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("binary layout error: {0}")]
    Deku(#[from] DekuError),
    #[error("failed to serialize pcap block: {0}")]
    Pcap(String),
}
