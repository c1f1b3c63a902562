pub use convert::{convert, convert_with_clock, ConvertStats};
pub use error::{Error, Result};

pub mod beacon;
pub mod config;
pub mod convert;
pub mod eapol;
pub mod error;
pub mod hccapx;
pub mod utils;
