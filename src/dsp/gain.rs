//! Gain and fade transforms
//!
//! Pure level adjustments over whole buffers. Both operations saturate at
//! the representable amplitude range rather than wrapping, and both reject
//! empty buffers: a gain or fade over nothing has no defined output.

use crate::audio::buffer::db_to_linear;
use crate::audio::SampleBuffer;
use crate::error::{OvertureError, Result};
use crate::timeline::FadeSpec;

/// Apply a flat gain in dB, producing a new buffer
///
/// Every sample is multiplied by `10^(db/20)` and clamped to [-1.0, 1.0].
pub fn apply_gain(buf: &SampleBuffer, db: f64) -> Result<SampleBuffer> {
    if buf.is_empty() {
        return Err(OvertureError::EmptyBuffer {
            context: "gain over zero-length buffer".to_string(),
        });
    }

    // Unity gain is a straight copy
    if db == 0.0 {
        return Ok(buf.clone());
    }

    let factor = db_to_linear(db) as f32;
    let samples = buf
        .samples()
        .iter()
        .map(|&s| (s * factor).clamp(-1.0, 1.0))
        .collect();
    Ok(buf.with_samples(samples))
}

/// Apply a linear fade across the whole buffer, producing a new buffer
///
/// The gain factor is interpolated per frame between the spec's endpoint
/// levels; all channels of a frame share one factor. The first frame sits
/// exactly at `from_gain_db` and the last frame exactly at `to_gain_db`,
/// so region boundaries meet their neighbours without a click.
pub fn apply_fade(buf: &SampleBuffer, spec: &FadeSpec) -> Result<SampleBuffer> {
    if buf.is_empty() {
        return Err(OvertureError::EmptyBuffer {
            context: "fade over zero-length buffer".to_string(),
        });
    }

    let from = db_to_linear(spec.from_gain_db);
    let to = db_to_linear(spec.to_gain_db);
    let frames = buf.frames();
    let channels = buf.num_channels();
    let last = (frames - 1).max(1) as f64;

    let mut samples = Vec::with_capacity(buf.samples().len());
    for frame in 0..frames {
        let t = frame as f64 / last;
        let factor = (from + (to - from) * t) as f32;
        for ch in 0..channels {
            let s = buf.samples()[frame * channels + ch];
            samples.push((s * factor).clamp(-1.0, 1.0));
        }
    }
    Ok(buf.with_samples(samples))
}
