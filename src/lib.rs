//! WavBatch - Directory WAV to PCM16 Converter
//!
//! Converts every WAV file in a directory into numbered 16-bit PCM files and
//! offers raw interleaved channel extraction.

pub mod audio;
pub mod batch;
pub mod config;
pub mod error;

pub use audio::{extract_channel, ChannelSamples, SampleWidth};
pub use batch::{discover_wav_files, BatchConverter, BatchReport, ConversionMode};
pub use config::{Args, Config};
pub use error::{Result, WavBatchError};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// `RUST_LOG` takes precedence over the level chosen by `verbose`.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .try_init()
        .ok();
}
