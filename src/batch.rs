//! Batch conversion driver
//!
//! Converts every `*.wav` file directly inside a directory into
//! `<dir>/<output>/<n>.wav`, where `n` counts discovered files from zero in
//! file-name order. Files are processed one at a time and loaded fully.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::audio::{extract_channel, write_channel_file, RawPcm, WavAudio};
use crate::config::Config;
use crate::error::{WavBatchError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionMode {
    /// Re-encode all channels as PCM16 at the target rate.
    Transcode,
    /// Write one zero-based channel as mono PCM16 at the target rate.
    ExtractChannel(u16),
}

impl ConversionMode {
    pub fn from_config(config: &Config) -> Self {
        match config.channel() {
            Some(channel) => ConversionMode::ExtractChannel(channel),
            None => ConversionMode::Transcode,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConvertedFile {
    pub index: usize,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub frames: u32,
    pub channels: u16,
    pub source_sample_rate: u32,
}

#[derive(Debug, Clone)]
pub struct FailedFile {
    pub index: usize,
    pub source: PathBuf,
    pub error: WavBatchError,
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub output_dir: PathBuf,
    pub converted: Vec<ConvertedFile>,
    pub failures: Vec<FailedFile>,
    pub processing_time_secs: f64,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.converted.len() + self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// List `*.wav` files directly inside `dir`, sorted by file name.
///
/// The match is case-sensitive and skips dot-files, like a shell `*.wav` glob.
pub fn discover_wav_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir)
        .map_err(|e| WavBatchError::filesystem(dir, format!("Cannot read directory: {}", e)))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| WavBatchError::filesystem(dir, e))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            log::debug!("Skipping non UTF-8 file name: {:?}", entry.file_name());
            continue;
        };
        if name.starts_with('.') || !name.ends_with(".wav") {
            continue;
        }
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

pub struct BatchConverter {
    config: Config,
    mode: ConversionMode,
}

impl BatchConverter {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let mode = ConversionMode::from_config(&config);
        Ok(Self { config, mode })
    }

    pub fn mode(&self) -> ConversionMode {
        self.mode
    }

    pub fn run(&self) -> Result<BatchReport> {
        let start = Instant::now();
        let input_dir = &self.config.input_dir;
        if !input_dir.is_dir() {
            return Err(WavBatchError::filesystem(input_dir, "Input directory does not exist"));
        }

        let files = discover_wav_files(input_dir)?;
        let output_dir = self.config.output_dir();
        std::fs::create_dir_all(&output_dir)
            .map_err(|e| WavBatchError::filesystem(&output_dir, format!("Cannot create output directory: {}", e)))?;

        log::info!("Found {} WAV file(s) in {}", files.len(), input_dir.display());

        let mut report = BatchReport {
            output_dir: output_dir.clone(),
            ..Default::default()
        };

        // The sequence number is assigned per discovered file, even if its conversion fails.
        for (index, source) in files.into_iter().enumerate() {
            let destination = output_dir.join(format!("{}.wav", index));
            match self.convert_file(index, &source, &destination) {
                Ok(converted) => {
                    log::info!("[{}] {} -> {}", index, source.display(), destination.display());
                    report.converted.push(converted);
                }
                Err(error) if self.config.keep_going() => {
                    let verb = if error.is_contract_violation() { "rejected" } else { "failed" };
                    log::warn!("[{}] {} {}: {}", index, source.display(), verb, error);
                    report.failures.push(FailedFile { index, source, error });
                }
                Err(error) => return Err(error),
            }
        }

        report.processing_time_secs = start.elapsed().as_secs_f64();
        Ok(report)
    }

    pub fn convert_file(&self, index: usize, source: &Path, destination: &Path) -> Result<ConvertedFile> {
        let sample_rate = self.config.sample_rate();

        let (frames, channels, source_sample_rate) = match self.mode {
            ConversionMode::Transcode => {
                let audio = WavAudio::from_file(source)?;
                audio.save_pcm16(destination, sample_rate)?;
                (audio.frames(), audio.channels(), audio.sample_rate())
            }
            ConversionMode::ExtractChannel(channel) => {
                let raw = RawPcm::from_file(source)?;
                let header = &raw.header;
                let samples = extract_channel(&raw.bytes, header.sample_width_bytes(), header.channels, channel)?;
                write_channel_file(destination, &samples, sample_rate)?;
                (samples.len() as u32, 1, header.sample_rate)
            }
        };

        Ok(ConvertedFile {
            index,
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            frames,
            channels,
            source_sample_rate,
        })
    }
}
