//! WavBatch - Directory WAV to PCM16 Converter

use anyhow::Context;
use clap::Parser;
use std::process;
use wavbatch::{init_logging, Args, BatchConverter, Config, ConversionMode};

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    if args.verbose {
        println!("{} v{} - {}", wavbatch::NAME, wavbatch::VERSION, wavbatch::DESCRIPTION);
        println!();
    }

    let config = Config::from_args_and_config(args).context("Invalid configuration")?;
    let converter = BatchConverter::new(config.clone())?;

    println!("=== WavBatch Converter ===");
    println!("Input: {}", config.input_dir.display());
    println!("Output: {}", config.output_dir().display());
    match converter.mode() {
        ConversionMode::Transcode => println!("Mode: PCM16 @ {} Hz", config.sample_rate()),
        ConversionMode::ExtractChannel(c) => {
            println!("Mode: Channel {} -> mono PCM16 @ {} Hz", c, config.sample_rate())
        }
    }
    println!("==========================\n");

    let report = converter
        .run()
        .with_context(|| format!("Batch conversion of {} failed", config.input_dir.display()))?;

    println!("=== Conversion Complete ===");
    println!("Converted: {}", report.converted.len());
    println!("Time: {:.2}s", report.processing_time_secs);
    if config.verbose() {
        for file in &report.converted {
            println!(
                "  {} -> {} ({} frames, {} ch, source {} Hz)",
                file.source.display(), file.destination.display(),
                file.frames, file.channels, file.source_sample_rate
            );
        }
    }

    if !report.is_success() {
        println!("Failed: {}", report.failures.len());
        for failure in &report.failures {
            println!("  [{}] {}: {}", failure.index, failure.source.display(), failure.error);
        }
        anyhow::bail!("{} of {} file(s) failed", report.failures.len(), report.total());
    }

    Ok(())
}
