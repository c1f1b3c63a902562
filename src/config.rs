use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(about = "Convert a hashcat .hccapx file to an 802.11 pcap")]
pub struct ConvertOpt {
    /// Input .hccapx file
    #[structopt(parse(from_os_str))]
    pub input: PathBuf,
    /// Output .cap file
    #[structopt(parse(from_os_str))]
    pub output: PathBuf,
}
