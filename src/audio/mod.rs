//! Audio Processing Module
//!
//! WAV decoding and PCM16 encoding through hound, plus raw interleaved
//! channel extraction.

pub mod channel;
pub mod wav;

pub use channel::{extract_channel, ChannelSamples, SampleWidth};
pub use wav::{write_channel_file, AudioHeader, RawPcm, WavAudio};
