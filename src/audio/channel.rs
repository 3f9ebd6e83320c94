//! Interleaved channel extraction
//!
//! Demultiplexes one channel out of a raw interleaved PCM frame buffer.
//! Samples are read as little-endian *unsigned* integers of the source width:
//! 8-bit maps to `u8`, 16-bit to `u16`, 32-bit to `u32`. Signed PCM is not
//! sign-extended, so a negative 16-bit sample comes back as its two's
//! complement bit pattern. 24-bit data is not supported.

use ndarray::{s, ArrayView1};
use crate::error::{WavBatchError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleWidth {
    U8,
    U16,
    U32,
}

impl SampleWidth {
    pub fn from_bytes(sample_width: u16) -> Result<Self> {
        match sample_width {
            1 => Ok(SampleWidth::U8),
            2 => Ok(SampleWidth::U16),
            4 => Ok(SampleWidth::U32),
            _ => Err(WavBatchError::UnsupportedFormat { sample_width }),
        }
    }

    pub fn bytes(&self) -> u16 {
        match self {
            SampleWidth::U8 => 1,
            SampleWidth::U16 => 2,
            SampleWidth::U32 => 4,
        }
    }

    pub fn bits(&self) -> u16 {
        self.bytes() * 8
    }
}

/// One channel's samples, one per frame, at the source width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelSamples {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl ChannelSamples {
    pub fn len(&self) -> usize {
        match self {
            ChannelSamples::U8(data) => data.len(),
            ChannelSamples::U16(data) => data.len(),
            ChannelSamples::U32(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sample_width(&self) -> SampleWidth {
        match self {
            ChannelSamples::U8(_) => SampleWidth::U8,
            ChannelSamples::U16(_) => SampleWidth::U16,
            ChannelSamples::U32(_) => SampleWidth::U32,
        }
    }
}

/// Extract channel `channel_index` from an interleaved raw PCM buffer.
///
/// Both the width and the channel index are checked before the buffer is read.
/// The buffer length should be a whole number of frames; a trailing partial
/// frame (or partial sample) is dropped.
pub fn extract_channel(
    buffer: &[u8],
    sample_width_bytes: u16,
    channel_count: u16,
    channel_index: u16,
) -> Result<ChannelSamples> {
    let width = SampleWidth::from_bytes(sample_width_bytes)?;
    if channel_index >= channel_count {
        return Err(WavBatchError::InvalidChannel {
            index: channel_index,
            count: channel_count,
        });
    }

    log::debug!(
        "Extracting channel {} out of {} channels, {}-bit depth",
        channel_index + 1, channel_count, width.bits()
    );

    let n = channel_count as usize;
    let c = channel_index as usize;

    let extracted = match width {
        SampleWidth::U8 => ChannelSamples::U8(take_channel(buffer, n, c)),
        SampleWidth::U16 => {
            let samples: Vec<u16> = buffer.chunks_exact(2)
                .map(|b| u16::from_le_bytes([b[0], b[1]]))
                .collect();
            ChannelSamples::U16(take_channel(&samples, n, c))
        }
        SampleWidth::U32 => {
            let samples: Vec<u32> = buffer.chunks_exact(4)
                .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect();
            ChannelSamples::U32(take_channel(&samples, n, c))
        }
    };

    Ok(extracted)
}

/// Every `channel_count`-th sample starting at `channel_index`, whole frames only.
fn take_channel<T: Copy>(samples: &[T], channel_count: usize, channel_index: usize) -> Vec<T> {
    let frames = samples.len() / channel_count;
    if frames == 0 {
        return Vec::new();
    }
    let view = ArrayView1::from(&samples[..frames * channel_count]);
    view.slice(s![channel_index..;channel_count]).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u16_bytes(samples: &[u16]) -> Vec<u8> {
        samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    fn interleave<T: Copy>(channels: &[Vec<T>]) -> Vec<T> {
        let frames = channels[0].len();
        (0..frames)
            .flat_map(|f| channels.iter().map(move |ch| ch[f]))
            .collect()
    }

    #[test]
    fn test_stereo_16bit_channels() {
        let buffer = u16_bytes(&[1, 2, 3, 4, 5, 6]);

        let left = extract_channel(&buffer, 2, 2, 0).unwrap();
        assert_eq!(left, ChannelSamples::U16(vec![1, 3, 5]));

        let right = extract_channel(&buffer, 2, 2, 1).unwrap();
        assert_eq!(right, ChannelSamples::U16(vec![2, 4, 6]));

        let err = extract_channel(&buffer, 2, 2, 2).unwrap_err();
        assert!(matches!(err, WavBatchError::InvalidChannel { index: 2, count: 2 }));
    }

    #[test]
    fn test_unsupported_widths() {
        let buffer = vec![0u8; 12];
        for width in [0u16, 3, 5, 8] {
            let err = extract_channel(&buffer, width, 1, 0).unwrap_err();
            assert!(matches!(err, WavBatchError::UnsupportedFormat { sample_width } if sample_width == width));
        }
    }

    #[test]
    fn test_width_checked_before_channel() {
        let err = extract_channel(&[], 3, 1, 5).unwrap_err();
        assert!(matches!(err, WavBatchError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_zero_channels_rejected() {
        let err = extract_channel(&[1, 2], 1, 0, 0).unwrap_err();
        assert!(matches!(err, WavBatchError::InvalidChannel { index: 0, count: 0 }));
    }

    #[test]
    fn test_output_length_is_frame_count() {
        let frames = 7usize;
        for width in [1u16, 2, 4] {
            for n in 1u16..=6 {
                let buffer = vec![0xA5u8; frames * n as usize * width as usize];
                for c in 0..n {
                    let out = extract_channel(&buffer, width, n, c).unwrap();
                    assert_eq!(out.len(), frames, "width={} n={} c={}", width, n, c);
                    assert_eq!(out.sample_width().bytes(), width);
                }
            }
        }
    }

    #[test]
    fn test_recovers_interleaved_channels() {
        let channels: Vec<Vec<u32>> = (0..3u32)
            .map(|ch| (0..10u32).map(|f| ch * 1_000_000 + f * 7 + 0x8000_0000).collect())
            .collect();
        let buffer: Vec<u8> = interleave(&channels).iter().flat_map(|s| s.to_le_bytes()).collect();

        for (c, expected) in channels.iter().enumerate() {
            let out = extract_channel(&buffer, 4, 3, c as u16).unwrap();
            assert_eq!(out, ChannelSamples::U32(expected.clone()));
        }
    }

    #[test]
    fn test_8bit_is_raw_bytes() {
        let channels = vec![vec![0u8, 128, 255], vec![10u8, 20, 30]];
        let buffer = interleave(&channels);
        assert_eq!(extract_channel(&buffer, 1, 2, 1).unwrap(), ChannelSamples::U8(vec![10, 20, 30]));
    }

    #[test]
    fn test_no_sign_extension() {
        let buffer: Vec<u8> = [-1i16, 5, -32768, 7]
            .iter()
            .flat_map(|s| s.to_le_bytes())
            .collect();
        let out = extract_channel(&buffer, 2, 2, 0).unwrap();
        assert_eq!(out, ChannelSamples::U16(vec![0xFFFF, 0x8000]));
    }

    #[test]
    fn test_partial_frame_dropped() {
        let buffer = u16_bytes(&[1, 2, 3, 4, 5]);
        assert_eq!(extract_channel(&buffer, 2, 2, 0).unwrap(), ChannelSamples::U16(vec![1, 3]));
        assert_eq!(extract_channel(&buffer, 2, 2, 1).unwrap(), ChannelSamples::U16(vec![2, 4]));
    }

    #[test]
    fn test_empty_buffer() {
        let out = extract_channel(&[], 2, 4, 3).unwrap();
        assert!(out.is_empty());
    }
}
