//! Basic usage example for the codec crate
//!
//! Pass a path to dump an existing ZTR file; without one, a small record is
//! written and read back in memory.

use std::fs::File;
use std::io::BufReader;

use ztr_codec::{
    Channel, Channels, ChromatogramRecord, DecodeConfig, error::Result, read_chromatogram,
    write_chromatogram,
};

fn main() -> Result<()> {
    env_logger::init();

    let record = match std::env::args().nth(1) {
        Some(path) => {
            println!("Reading {path}...");
            let mut reader = BufReader::new(File::open(path)?);
            read_chromatogram(&mut reader, &DecodeConfig::default())?
        }
        None => {
            let record = ChromatogramRecord::builder()
                .with_basecalls("ACGTTGCA")
                .with_peak_positions(vec![4, 16, 28, 40, 52, 64, 76, 88])
                .with_clip_range((1, 7))
                .with_confidence(Channels::filled(8))
                .with_samples(Channels::filled(96))
                .with_comments([("NAME", "example"), ("MACH", "demo")].into_iter().collect())
                .build()?;

            let mut file = Vec::new();
            write_chromatogram(&mut file, &record)?;
            println!("Wrote {} bytes", file.len());
            read_chromatogram(&mut file.as_slice(), &DecodeConfig::default())?
        }
    };

    println!("Bases:   {}", record.basecalls().unwrap_or("-"));
    println!("Samples: {:?} per channel", record.num_samples());
    if let Some(clip) = record.clip_range() {
        println!("Clip:    {}..{}", clip.begin(), clip.end());
    }
    if let Some(confidence) = record.confidence() {
        for channel in [Channel::A, Channel::C, Channel::G, Channel::T] {
            println!("{channel} confidence: {:?}", confidence.get(channel));
        }
    }
    for (key, value) in record.comments().into_iter().flat_map(|c| c.iter()) {
        println!("{key} = {value}");
    }

    Ok(())
}
