//! Configuration management for batch conversion

use crate::error::{WavBatchError, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
pub const DEFAULT_OUTPUT_DIR: &str = "output";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Always taken from the command line, never from the file.
    #[serde(skip_serializing)]
    pub input_dir: PathBuf,
    pub output: OutputConfig,
    pub processing: ProcessingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Subdirectory of the input directory receiving `0.wav`, `1.wav`, ...
    pub dir_name: String,
    pub sample_rate: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Extract this zero-based channel to a mono file instead of transcoding all channels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<u16>,
    pub keep_going: bool,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output: OutputConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir_name: DEFAULT_OUTPUT_DIR.to_string(),
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

impl Config {
    pub fn output_dir(&self) -> PathBuf {
        self.input_dir.join(&self.output.dir_name)
    }

    pub fn sample_rate(&self) -> u32 {
        self.output.sample_rate
    }

    pub fn channel(&self) -> Option<u16> {
        self.processing.channel
    }

    pub fn keep_going(&self) -> bool {
        self.processing.keep_going
    }

    pub fn verbose(&self) -> bool {
        self.processing.verbose
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "wavbatch", about = "Convert every WAV file in a directory to numbered PCM16 files", version)]
pub struct Args {
    #[arg(help = "Directory containing the .wav files to convert")]
    pub directory: PathBuf,

    #[arg(short = 'o', long = "output-dir", help = "Output subdirectory name [default: output]")]
    pub output_dir: Option<String>,

    #[arg(short = 'r', long = "sample-rate", help = "Sample rate tag written to output files (Hz) [default: 44100]")]
    pub sample_rate: Option<u32>,

    #[arg(long = "channel", help = "Extract one zero-based channel to mono instead of transcoding")]
    pub channel: Option<u16>,

    #[arg(short = 'k', long = "keep-going", help = "Record per-file failures and continue with the next file")]
    pub keep_going: bool,

    #[arg(short = 'v', long = "verbose", help = "Enable verbose output mode")]
    pub verbose: bool,

    #[arg(short = 'c', long = "config", help = "Config file path (TOML format)")]
    pub config_file: Option<PathBuf>,
}

impl Config {
    /// Create config from command line arguments and config file
    pub fn from_args_and_config(args: Args) -> Result<Self> {
        let mut config = if let Some(config_path) = &args.config_file {
            Self::from_file(config_path)?
        } else {
            Self::default()
        };

        // Command line arguments override config file settings
        config.input_dir = args.directory;
        if let Some(dir_name) = args.output_dir {
            config.output.dir_name = dir_name;
        }
        if let Some(sample_rate) = args.sample_rate {
            config.output.sample_rate = sample_rate;
        }
        if args.channel.is_some() {
            config.processing.channel = args.channel;
        }
        config.processing.keep_going |= args.keep_going;
        config.processing.verbose |= args.verbose;

        config.validate()?;

        Ok(config)
    }

    /// Load config from TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| WavBatchError::config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| WavBatchError::config(format!("Failed to parse config file: {}", e)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_dir.as_os_str().is_empty() {
            return Err(WavBatchError::config("Input directory must not be empty"));
        }

        if self.output.sample_rate == 0 {
            return Err(WavBatchError::config("Sample rate must be greater than 0"));
        }
        if self.output.sample_rate > 192000 {
            return Err(WavBatchError::config("Sample rate cannot exceed 192000 Hz"));
        }

        let name = self.output.dir_name.as_str();
        if name.is_empty() || name == "." || name == ".." {
            return Err(WavBatchError::config(format!("Invalid output directory name: {:?}", name)));
        }
        if name.contains(['/', '\\']) {
            return Err(WavBatchError::config("Output directory name must not contain path separators"));
        }

        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| WavBatchError::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| WavBatchError::config(format!("Failed to write config file: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["wavbatch"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.sample_rate(), 44100);
        assert_eq!(config.output.dir_name, "output");
        assert_eq!(config.channel(), None);
        assert!(!config.keep_going());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        config.output.sample_rate = 0;
        assert!(config.validate().is_err());
        config.output.sample_rate = 192001;
        assert!(config.validate().is_err());
        config.output.sample_rate = 44100;

        for bad in ["", ".", "..", "a/b", "a\\b"] {
            config.output.dir_name = bad.to_string();
            assert!(config.validate().is_err(), "{:?} should be rejected", bad);
        }
        config.output.dir_name = "converted".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_args_override() {
        let config = Config::from_args_and_config(args(&["songs", "-r", "48000", "--channel", "1", "-k"])).unwrap();
        assert_eq!(config.input_dir, PathBuf::from("songs"));
        assert_eq!(config.output_dir(), PathBuf::from("songs").join("output"));
        assert_eq!(config.sample_rate(), 48000);
        assert_eq!(config.channel(), Some(1));
        assert!(config.keep_going());
        assert!(!config.verbose());
    }

    #[test]
    fn test_args_rejects_invalid_rate() {
        assert!(Config::from_args_and_config(args(&["songs", "-r", "0"])).is_err());
    }

    #[test]
    fn test_config_file_operations() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.output.dir_name = "pcm".to_string();
        config.processing.channel = Some(0);
        config.save_to_file(&config_path).unwrap();

        let loaded = Config::from_file(&config_path).unwrap();
        assert_eq!(loaded.output.dir_name, "pcm");
        assert_eq!(loaded.channel(), Some(0));

        let path_arg = config_path.to_string_lossy().to_string();
        let merged = Config::from_args_and_config(args(&["in", "-c", &path_arg])).unwrap();
        assert_eq!(merged.output.dir_name, "pcm");
        assert_eq!(merged.channel(), Some(0));
        assert_eq!(merged.input_dir, PathBuf::from("in"));
    }

    #[test]
    fn test_partial_config_file() {
        let temp_dir = TempDir::new().unwrap();

        let output_only = temp_dir.path().join("output.toml");
        std::fs::write(&output_only, "[output]\ndir_name = \"pcm\"\nsample_rate = 48000\n").unwrap();
        let config = Config::from_file(&output_only).unwrap();
        assert_eq!(config.output.dir_name, "pcm");
        assert_eq!(config.sample_rate(), 48000);
        assert_eq!(config.input_dir, PathBuf::from("."));
        assert_eq!(config.channel(), None);
        assert!(!config.keep_going());

        let channel_only = temp_dir.path().join("channel.toml");
        std::fs::write(&channel_only, "[processing]\nchannel = 0\n").unwrap();
        let config = Config::from_file(&channel_only).unwrap();
        assert_eq!(config.channel(), Some(0));
        assert!(!config.verbose());
        assert_eq!(config.output.dir_name, "output");
        assert_eq!(config.sample_rate(), 44100);

        let empty = temp_dir.path().join("empty.toml");
        std::fs::write(&empty, "").unwrap();
        assert!(Config::from_file(&empty).unwrap().validate().is_ok());
    }

    #[test]
    fn test_saved_config_omits_input_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.input_dir = PathBuf::from("/music/raw");
        config.save_to_file(&config_path).unwrap();

        let content = std::fs::read_to_string(&config_path).unwrap();
        assert!(!content.contains("input_dir"));
        assert_eq!(Config::from_file(&config_path).unwrap().input_dir, PathBuf::from("."));
    }

    #[test]
    fn test_missing_config_file() {
        let err = Config::from_file("/nonexistent/wavbatch.toml").unwrap_err();
        assert!(matches!(err, WavBatchError::Config { .. }));
    }
}
