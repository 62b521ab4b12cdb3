//! Overlay mixing
//!
//! Sample-wise addition of a foreground clip onto a background clip.
//! Summed values saturate at the representable range; an overlay that would
//! run past the end of its base is a bounds error, because the planner is
//! responsible for sizing the base to fully contain the overlay.

use crate::audio::SampleBuffer;
use crate::error::{OvertureError, Result};

/// Overlay `top` onto `base` starting at `start_offset_ms`
///
/// Sample values are summed per channel and clamped to [-1.0, 1.0]. The
/// merged buffer is always exactly as long as `base`; overlaying never
/// extends the timeline.
pub fn overlay(
    base: &SampleBuffer,
    top: &SampleBuffer,
    start_offset_ms: u64,
) -> Result<SampleBuffer> {
    base.check_same_format(top)?;

    if base.is_empty() {
        return Err(OvertureError::EmptyBuffer {
            context: "overlay base".to_string(),
        });
    }
    if top.is_empty() {
        return Err(OvertureError::EmptyBuffer {
            context: "overlay top".to_string(),
        });
    }

    let offset_frames = base.frames_for_ms(start_offset_ms);
    if offset_frames + top.frames() > base.frames() {
        return Err(OvertureError::OverlayOutOfBounds {
            start_offset_ms,
            top_ms: top.duration_ms(),
            base_ms: base.duration_ms(),
        });
    }

    let channels = base.num_channels();
    let mut samples = base.samples().to_vec();
    let begin = offset_frames * channels;
    for (i, &t) in top.samples().iter().enumerate() {
        let mixed = samples[begin + i] + t;
        samples[begin + i] = mixed.clamp(-1.0, 1.0);
    }

    Ok(base.with_samples(samples))
}
