use anyhow::{Context, Result};
use env_logger::Env;
use hccapx2cap::config::ConvertOpt;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use structopt::StructOpt;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("hccapx2cap=info")).init();
    let opt = ConvertOpt::from_args();

    let input = File::open(&opt.input)
        .with_context(|| format!("Could not open .hccapx file {}", opt.input.display()))?;
    let output = File::create(&opt.output)
        .with_context(|| format!("Could not open .cap file {}", opt.output.display()))?;

    let stats = hccapx2cap::convert(BufReader::new(input), BufWriter::new(output))
        .with_context(|| format!("Failed to convert {}", opt.input.display()))?;

    log::info!(
        "records: {}, converted: {}, skipped: {}, frames: {}",
        stats.records,
        stats.converted,
        stats.skipped,
        stats.frames
    );
    Ok(())
}
