//! Fixed-format MP3 encoding
//!
//! The output format never varies: MP3 container, libmp3lame codec, stereo,
//! 44.1kHz, constant 192kbps. The buffer is written as an intermediate
//! 16-bit WAV and handed to ffmpeg with pinned arguments; the encoded bytes
//! are read back and returned to the caller, which owns any persistence or
//! playback.

use std::fs;
use std::process::Command;

use hound::{SampleFormat, WavSpec, WavWriter};
use serde::Serialize;
use tracing::{debug, info};

use crate::audio::{SampleBuffer, TARGET_SAMPLE_RATE};
use crate::error::{OvertureError, Result};

/// Descriptor of the one supported output format
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputFormat {
    pub container: &'static str,
    pub codec: &'static str,
    pub content_type: &'static str,
    pub sample_rate: u32,
    pub channels: u16,
    pub bitrate_kbps: u32,
}

impl OutputFormat {
    /// The fixed wire format: stereo 44.1kHz CBR 192kbps MP3
    pub fn mp3_cbr() -> Self {
        Self {
            container: "mp3",
            codec: "libmp3lame",
            content_type: "audio/mpeg",
            sample_rate: TARGET_SAMPLE_RATE,
            channels: 2,
            bitrate_kbps: 192,
        }
    }
}

/// An encoded byte stream plus its format descriptor
#[derive(Debug, Clone)]
pub struct EncodedAudio {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
}

/// Encode a composed buffer to the fixed output format
///
/// The buffer must already be stereo at 44.1kHz; anything else reaching
/// this stage is a compositor bug, not a runtime condition, and panics.
/// Failures here are environmental: a missing ffmpeg binary, a failed
/// spawn, or a non-zero encoder exit.
pub fn encode(buffer: &SampleBuffer) -> Result<EncodedAudio> {
    let format = OutputFormat::mp3_cbr();
    assert_eq!(
        buffer.sample_rate(),
        format.sample_rate,
        "encoder fed a buffer at the wrong sample rate"
    );
    assert_eq!(
        buffer.num_channels(),
        format.channels as usize,
        "encoder fed a buffer with the wrong channel count"
    );
    if buffer.is_empty() {
        return Err(OvertureError::EmptyBuffer {
            context: "encode".to_string(),
        });
    }

    let scratch = tempfile::tempdir()?;
    let wav_path = scratch.path().join("master.wav");
    let mp3_path = scratch.path().join("master.mp3");

    write_wav(buffer, &wav_path)?;
    debug!(frames = buffer.frames(), "intermediate wav written");

    let status = Command::new("ffmpeg")
        .args([
            "-y",
            "-hide_banner",
            "-loglevel",
            "error",
            "-i",
            wav_path
                .to_str()
                .ok_or_else(|| OvertureError::EncodeFailed {
                    reason: "invalid temporary wav path".to_string(),
                })?,
            "-ar",
            "44100",
            "-ac",
            "2",
            "-c:a",
            "libmp3lame",
            "-b:a",
            "192k",
            "-f",
            "mp3",
            mp3_path
                .to_str()
                .ok_or_else(|| OvertureError::EncodeFailed {
                    reason: "invalid temporary mp3 path".to_string(),
                })?,
        ])
        .status()
        .map_err(|e| OvertureError::EncodeFailed {
            reason: format!("failed to spawn ffmpeg: {}", e),
        })?;

    if !status.success() {
        return Err(OvertureError::EncodeFailed {
            reason: format!("ffmpeg exited with status {}", status),
        });
    }

    let bytes = fs::read(&mp3_path)?;
    info!(
        bytes = bytes.len(),
        duration_ms = buffer.duration_ms(),
        "mp3 encode completed"
    );

    Ok(EncodedAudio { bytes, format })
}

/// Write the buffer as 16-bit PCM WAV for the encoder to consume
fn write_wav(buffer: &SampleBuffer, path: &std::path::Path) -> Result<()> {
    let spec = WavSpec {
        channels: buffer.num_channels() as u16,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec).map_err(|e| OvertureError::EncodeFailed {
        reason: format!("failed to create intermediate wav: {}", e),
    })?;

    for &sample in buffer.samples() {
        let quantized = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
        writer
            .write_sample(quantized)
            .map_err(|e| OvertureError::EncodeFailed {
                reason: format!("failed to write intermediate wav: {}", e),
            })?;
    }

    writer
        .finalize()
        .map_err(|e| OvertureError::EncodeFailed {
            reason: format!("failed to finalize intermediate wav: {}", e),
        })?;
    Ok(())
}
