//! Audio file decoding for Overture
//!
//! Decodes WAV sources into [`SampleBuffer`]s in the composition format:
//! 44.1kHz stereo 32-bit float. The compositor itself never converts
//! formats; whatever feeds it (this module, for the CLI) must hand over
//! already-conformed buffers.
//!
//! Sample rate conversion uses linear interpolation (TODO: upgrade to sinc).

use std::path::Path;

use hound::{SampleFormat, WavReader};
use tracing::debug;

use crate::audio::buffer::{ChannelLayout, SampleBuffer, TARGET_SAMPLE_RATE};
use crate::error::{OvertureError, Result};

/// Decode a WAV file into the composition format
///
/// Reads the file, converts samples to 32-bit float, resamples to 44.1kHz
/// if needed, and up-mixes mono to stereo.
///
/// # Errors
/// * `InvalidAudio` - the file is missing or not a decodable WAV
/// * `UnsupportedFormat` - more than 2 channels, or an unknown bit depth
/// * `EmptyBuffer` - the file decodes to zero samples
pub fn import_audio(path: &Path) -> Result<SampleBuffer> {
    let reader = WavReader::open(path).map_err(|e| OvertureError::InvalidAudio {
        reason: format!("Failed to open WAV file {}: {}", path.display(), e),
        source: Some(Box::new(e)),
    })?;

    let spec = reader.spec();
    let source_rate = spec.sample_rate;
    let channels = spec.channels as usize;

    if channels == 0 || channels > 2 {
        return Err(OvertureError::UnsupportedFormat {
            format: format!("{}-channel audio (only mono/stereo supported)", channels),
        });
    }

    let samples = read_samples_as_f32(reader, spec.bits_per_sample, spec.sample_format)?;
    if samples.is_empty() {
        return Err(OvertureError::EmptyBuffer {
            context: format!("decoded file {}", path.display()),
        });
    }

    let mut channel_data = deinterleave(&samples, channels);

    if source_rate != TARGET_SAMPLE_RATE {
        let ratio = TARGET_SAMPLE_RATE as f64 / source_rate as f64;
        channel_data = channel_data
            .iter()
            .map(|ch| resample_linear(ch, ratio))
            .collect();
    }

    // Mono sources are duplicated into both output channels
    if channel_data.len() == 1 {
        let mono = channel_data.pop().unwrap_or_default();
        channel_data = vec![mono.clone(), mono];
    }

    let interleaved = interleave(&channel_data);
    debug!(
        path = %path.display(),
        source_rate,
        channels,
        frames = channel_data[0].len(),
        "decoded audio source"
    );

    SampleBuffer::from_interleaved(interleaved, ChannelLayout::Stereo, TARGET_SAMPLE_RATE)
}

/// Read samples from WAV reader and convert to f32
fn read_samples_as_f32<R: std::io::Read>(
    mut reader: WavReader<R>,
    bits_per_sample: u16,
    sample_format: SampleFormat,
) -> Result<Vec<f32>> {
    match sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<Vec<f32>, _>>()
            .map_err(|e| OvertureError::InvalidAudio {
                reason: format!("Failed to read float samples: {}", e),
                source: Some(Box::new(e)),
            }),
        SampleFormat::Int => match bits_per_sample {
            16 => reader
                .samples::<i16>()
                .map(|s| s.map(|v| v as f32 / 32768.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| OvertureError::InvalidAudio {
                    reason: format!("Failed to read 16-bit samples: {}", e),
                    source: Some(Box::new(e)),
                }),
            24 => {
                // 24-bit stored as i32 in hound
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / 8388608.0))
                    .collect::<std::result::Result<Vec<f32>, _>>()
                    .map_err(|e| OvertureError::InvalidAudio {
                        reason: format!("Failed to read 24-bit samples: {}", e),
                        source: Some(Box::new(e)),
                    })
            }
            32 => reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / 2147483648.0))
                .collect::<std::result::Result<Vec<f32>, _>>()
                .map_err(|e| OvertureError::InvalidAudio {
                    reason: format!("Failed to read 32-bit int samples: {}", e),
                    source: Some(Box::new(e)),
                }),
            _ => Err(OvertureError::UnsupportedFormat {
                format: format!("{}-bit integer audio", bits_per_sample),
            }),
        },
    }
}

/// De-interleave samples from [L,R,L,R,...] to [[L,L,...], [R,R,...]]
fn deinterleave(samples: &[f32], channels: usize) -> Vec<Vec<f32>> {
    let frames = samples.len() / channels;
    let mut result = vec![Vec::with_capacity(frames); channels];

    for (i, sample) in samples.iter().enumerate() {
        result[i % channels].push(*sample);
    }

    result
}

/// Interleave channels from [[L,L,...], [R,R,...]] to [L,R,L,R,...]
fn interleave(channels: &[Vec<f32>]) -> Vec<f32> {
    if channels.is_empty() {
        return Vec::new();
    }

    let frames = channels[0].len();
    let mut result = Vec::with_capacity(frames * channels.len());

    for frame in 0..frames {
        for channel in channels {
            result.push(channel[frame]);
        }
    }

    result
}

/// Linear interpolation resampling
///
/// TODO: Replace with sinc interpolation; linear interpolation aliases when
/// downsampling, which is acceptable for music beds but audible on speech.
fn resample_linear(samples: &[f32], ratio: f64) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }

    let source_len = samples.len();
    let target_len = ((source_len as f64) * ratio).ceil() as usize;
    let mut output = Vec::with_capacity(target_len);

    for i in 0..target_len {
        let src_pos = i as f64 / ratio;
        let src_idx = src_pos.floor() as usize;
        let frac = (src_pos - src_idx as f64) as f32;

        let sample = if src_idx + 1 < source_len {
            samples[src_idx] * (1.0 - frac) + samples[src_idx + 1] * frac
        } else if src_idx < source_len {
            samples[src_idx]
        } else {
            0.0
        };

        output.push(sample);
    }

    output
}
