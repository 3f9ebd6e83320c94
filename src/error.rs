//! Error Types

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type
#[derive(Debug, Clone, Error)]
pub enum WavBatchError {
    /// Sample width other than 1, 2 or 4 bytes. 24-bit data is not supported.
    #[error("Unsupported format: sample width {sample_width} bytes not supported")]
    UnsupportedFormat { sample_width: u16 },

    /// `index` is zero-based; the message reports it one-based like the channel numbering users see.
    #[error("Invalid channel: cannot extract channel {} out of {count}", one_based(.index))]
    InvalidChannel { index: u16, count: u16 },

    #[error("Decode error: {}: {message}", .path.display())]
    Decode { path: PathBuf, message: String },

    #[error("Encode error: {}: {message}", .path.display())]
    Encode { path: PathBuf, message: String },

    #[error("Filesystem error: {}: {message}", .path.display())]
    Filesystem { path: PathBuf, message: String },

    #[error("Config error: {message}")]
    Config { message: String },
}

impl WavBatchError {
    pub fn decode<P: AsRef<Path>, S: ToString>(path: P, msg: S) -> Self {
        Self::Decode { path: path.as_ref().to_path_buf(), message: msg.to_string() }
    }

    pub fn encode<P: AsRef<Path>, S: ToString>(path: P, msg: S) -> Self {
        Self::Encode { path: path.as_ref().to_path_buf(), message: msg.to_string() }
    }

    pub fn filesystem<P: AsRef<Path>, S: ToString>(path: P, msg: S) -> Self {
        Self::Filesystem { path: path.as_ref().to_path_buf(), message: msg.to_string() }
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config { message: msg.into() }
    }

    /// Caller contract violations from the extractor, as opposed to I/O or codec failures.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::UnsupportedFormat { .. } | Self::InvalidChannel { .. })
    }
}

fn one_based(index: &u16) -> u32 {
    u32::from(*index) + 1
}

pub type Result<T> = std::result::Result<T, WavBatchError>;

impl From<std::io::Error> for WavBatchError {
    fn from(err: std::io::Error) -> Self {
        Self::Filesystem { path: PathBuf::new(), message: err.to_string() }
    }
}
