//! WAV audio file processing

use std::path::Path;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use ndarray::Array2;
use crate::audio::channel::ChannelSamples;
use crate::error::{WavBatchError, Result};

/// Bit depth of every file this crate writes.
pub const OUTPUT_BITS_PER_SAMPLE: u16 = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioHeader {
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    pub sample_format: SampleFormat,
    pub frames: u32,
}

impl AudioHeader {
    pub fn from_spec(spec: WavSpec, frames: u32) -> Self {
        Self {
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            bits_per_sample: spec.bits_per_sample,
            sample_format: spec.sample_format,
            frames,
        }
    }

    pub fn sample_width_bytes(&self) -> u16 {
        self.bits_per_sample.div_ceil(8)
    }

    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames as f64 / self.sample_rate as f64
    }

    pub fn pcm16_spec(channels: u16, sample_rate: u32) -> WavSpec {
        WavSpec {
            channels,
            sample_rate,
            bits_per_sample: OUTPUT_BITS_PER_SAMPLE,
            sample_format: SampleFormat::Int,
        }
    }
}

/// A fully decoded WAV file: one row per frame, one column per channel,
/// samples normalised to [-1.0, 1.0).
#[derive(Debug, Clone)]
pub struct WavAudio {
    pub header: AudioHeader,
    pub data: Array2<f32>,
}

impl WavAudio {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut reader = WavReader::open(path)
            .map_err(|e| WavBatchError::decode(path, format!("Cannot create WAV reader: {}", e)))?;

        let spec = reader.spec();
        if spec.channels == 0 {
            return Err(WavBatchError::decode(path, "WAV header declares zero channels"));
        }

        let samples: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader.samples::<f32>()
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| WavBatchError::decode(path, format!("Failed to read sample: {}", e)))?,
            SampleFormat::Int => {
                let full_scale = (1u64 << (spec.bits_per_sample - 1)) as f32;
                reader.samples::<i32>()
                    .map(|s| s.map(|s| s as f32 / full_scale))
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|e| WavBatchError::decode(path, format!("Failed to read sample: {}", e)))?
            }
        };

        let channels = spec.channels as usize;
        let frames = samples.len() / channels;
        let mut samples = samples;
        samples.truncate(frames * channels);

        let data = Array2::from_shape_vec((frames, channels), samples)
            .map_err(|e| WavBatchError::decode(path, format!("Malformed frame layout: {}", e)))?;

        log::debug!(
            "Decoded {}: {} Hz, {} ch, {}-bit {:?}, {} frames",
            path.display(), spec.sample_rate, spec.channels,
            spec.bits_per_sample, spec.sample_format, frames
        );

        Ok(WavAudio {
            header: AudioHeader::from_spec(spec, frames as u32),
            data,
        })
    }

    /// Write as 16-bit PCM tagged with `sample_rate`. Samples are not resampled.
    pub fn save_pcm16<P: AsRef<Path>>(&self, path: P, sample_rate: u32) -> Result<()> {
        let path = path.as_ref();
        let spec = AudioHeader::pcm16_spec(self.channels(), sample_rate);

        let mut writer = WavWriter::create(path, spec)
            .map_err(|e| WavBatchError::encode(path, format!("Cannot create WAV writer: {}", e)))?;

        // Row-major iteration yields interleaved frame order.
        for &sample in self.data.iter() {
            writer.write_sample(to_pcm16(sample))
                .map_err(|e| WavBatchError::encode(path, format!("Failed to write sample: {}", e)))?;
        }

        writer.finalize()
            .map_err(|e| WavBatchError::encode(path, format!("Failed to finalize WAV writing: {}", e)))
    }

    pub fn sample_rate(&self) -> u32 {
        self.header.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.header.channels
    }

    pub fn frames(&self) -> u32 {
        self.header.frames
    }
}

fn to_pcm16(sample: f32) -> i16 {
    (sample * 32768.0).round().clamp(-32768.0, 32767.0) as i16
}

/// Raw interleaved PCM frames as stored on disk: little-endian, source width,
/// 8-bit data unsigned.
#[derive(Debug, Clone)]
pub struct RawPcm {
    pub header: AudioHeader,
    pub bytes: Vec<u8>,
}

impl RawPcm {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut reader = WavReader::open(path)
            .map_err(|e| WavBatchError::decode(path, format!("Cannot create WAV reader: {}", e)))?;

        let spec = reader.spec();
        if spec.sample_format != SampleFormat::Int {
            return Err(WavBatchError::decode(path, "Raw frame access supports integer PCM only"));
        }

        let header = AudioHeader::from_spec(spec, reader.duration());
        let width = header.sample_width_bytes() as usize;
        let mut bytes = Vec::with_capacity(reader.len() as usize * width);

        for sample in reader.samples::<i32>() {
            let sample = sample
                .map_err(|e| WavBatchError::decode(path, format!("Failed to read sample: {}", e)))?;
            if width == 1 {
                // hound centres 8-bit data around zero; on disk it is offset by 128.
                bytes.push((sample + 128) as u8);
            } else {
                bytes.extend_from_slice(&sample.to_le_bytes()[..width]);
            }
        }

        Ok(RawPcm { header, bytes })
    }
}

/// Write one extracted channel as mono 16-bit PCM.
///
/// Narrowing happens here: 16-bit samples are written bit-for-bit, 8-bit
/// samples move into the high byte, 32-bit samples keep their high half.
/// The unsigned values are stored as i16 bit patterns.
pub fn write_channel_file<P: AsRef<Path>>(path: P, samples: &ChannelSamples, sample_rate: u32) -> Result<()> {
    let path = path.as_ref();
    let spec = AudioHeader::pcm16_spec(1, sample_rate);

    let mut writer = WavWriter::create(path, spec)
        .map_err(|e| WavBatchError::encode(path, format!("Cannot create WAV writer: {}", e)))?;

    let narrowed: Vec<u16> = match samples {
        ChannelSamples::U8(data) => data.iter().map(|&s| (s as u16) << 8).collect(),
        ChannelSamples::U16(data) => data.clone(),
        ChannelSamples::U32(data) => data.iter().map(|&s| (s >> 16) as u16).collect(),
    };

    for sample in narrowed {
        writer.write_sample(sample as i16)
            .map_err(|e| WavBatchError::encode(path, format!("Failed to write sample: {}", e)))?;
    }

    writer.finalize()
        .map_err(|e| WavBatchError::encode(path, format!("Failed to finalize WAV writing: {}", e)))
}
