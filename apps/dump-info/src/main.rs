use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;
use strata_dump::format::{self, HeaderInfo};

#[derive(Parser)]
#[command(name = "dump-info", about = "Inspect the header of a binary scene dump")]
struct Args {
    /// Dump file to inspect
    file: PathBuf,
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let file = File::open(&args.file)
        .with_context(|| format!("unable to open {}", args.file.display()))?;
    let header = HeaderInfo::parse(&mut BufReader::new(file))
        .with_context(|| format!("malformed dump header in {}", args.file.display()))?;

    if !header.signature.starts_with(format::SIGNATURE_PREFIX) {
        warn!(
            "{} does not carry the expected signature prefix",
            args.file.display()
        );
    }

    println!("signature:      {}", header.signature);
    println!(
        "format version: {}.{}",
        header.version_major, header.version_minor
    );
    println!("build revision: {:#x}", header.build_revision);
    println!("compile flags:  {:#x}", header.compile_flags);
    println!("shortened:      {}", header.shortened);
    println!("compressed:     {}", header.compressed);
    println!("output path:    {}", header.path);
    println!("command:        {}", header.command);

    Ok(())
}
