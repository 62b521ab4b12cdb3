//! Timeline composition
//!
//! Executes a [`TimelinePlan`] against decoded source buffers: slice the
//! bed, apply the region's level treatment, overlay the foreground the
//! region names, and append. Every sizing decision was already made by the
//! planner; this stage only carries them out, and it halts on the first
//! failure rather than producing a partial intro.

use tracing::{debug, info};

use crate::audio::{SampleBuffer, TARGET_SAMPLE_RATE};
use crate::dsp::{apply_fade, apply_gain, overlay};
use crate::encode::{encode, OutputFormat};
use crate::error::{OvertureError, Result};
use crate::timeline::{plan, BufferMeta, Recipe, Region, RegionKind, TimelinePlan};

/// A finished composition: the master buffer, its encoded bytes, and the
/// plan and format that produced them
#[derive(Debug, Clone)]
pub struct CompositionResult {
    pub plan: TimelinePlan,
    pub buffer: SampleBuffer,
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
}

/// Execute a plan against its source buffers
///
/// All sources must share one sample rate and channel layout; the caller
/// (or its resampling collaborator) conforms them beforehand. The first
/// region that fails aborts the whole composition, wrapped with the region
/// kind so the caller can tell where it broke.
pub fn compose(
    bed: &SampleBuffer,
    effect: Option<&SampleBuffer>,
    speech: &SampleBuffer,
    plan: &TimelinePlan,
) -> Result<SampleBuffer> {
    bed.check_same_format(speech)?;
    if let Some(fx) = effect {
        bed.check_same_format(fx)?;
    }

    let mut samples = Vec::new();
    for region in &plan.regions {
        let rendered = render_region(bed, effect, speech, region).map_err(|e| {
            OvertureError::RegionFailed {
                region: region.kind,
                source: Box::new(e),
            }
        })?;
        samples.extend_from_slice(rendered.samples());
        debug!(
            region = %region.kind,
            duration_ms = region.source_duration_ms,
            "region rendered"
        );
    }

    let master = bed.with_samples(samples);
    info!(
        duration_ms = master.duration_ms(),
        regions = plan.regions.len(),
        "composition complete"
    );
    Ok(master)
}

/// Plan, compose, and encode in one call
///
/// The single entry point for callers that just want a finished intro:
/// inputs must already be in the output format (44.1kHz stereo), since the
/// encoded stream is fixed to it.
pub fn compose_intro(
    bed: &SampleBuffer,
    effect: Option<&SampleBuffer>,
    speech: &SampleBuffer,
    recipe: &Recipe,
) -> Result<CompositionResult> {
    for buf in [Some(bed), effect, Some(speech)].into_iter().flatten() {
        if buf.sample_rate() != TARGET_SAMPLE_RATE || buf.num_channels() != 2 {
            return Err(OvertureError::FormatMismatch {
                expected: format!("{}Hz stereo", TARGET_SAMPLE_RATE),
                actual: buf.format_label(),
            });
        }
    }

    let plan = plan(
        BufferMeta::of(bed),
        effect.map(BufferMeta::of),
        BufferMeta::of(speech),
        recipe,
    )?;
    let buffer = compose(bed, effect, speech, &plan)?;
    let encoded = encode(&buffer)?;

    Ok(CompositionResult {
        plan,
        buffer,
        bytes: encoded.bytes,
        format: encoded.format,
    })
}

/// Render a single region to its output-timeline buffer
fn render_region(
    bed: &SampleBuffer,
    effect: Option<&SampleBuffer>,
    speech: &SampleBuffer,
    region: &Region,
) -> Result<SampleBuffer> {
    let bed_slice = bed.slice_ms(region.source_offset_ms, region.source_duration_ms)?;
    let treated = match &region.fade {
        Some(spec) => apply_fade(&bed_slice, spec)?,
        None => apply_gain(&bed_slice, region.gain_db)?,
    };

    let foreground = match region.kind {
        RegionKind::Effect => Some(effect.ok_or_else(|| OvertureError::EmptyBuffer {
            context: "effect region planned but no effect buffer supplied".to_string(),
        })?),
        RegionKind::SpeechBed => Some(speech),
        _ => None,
    };

    match foreground {
        Some(fg) => {
            // The foreground is sliced to the region's span with the same
            // ms-to-frame conversion as the bed, so the overlay lengths
            // agree exactly even when the source is a fraction of a
            // millisecond longer than the region.
            let fg_slice = fg.slice_ms(0, region.source_duration_ms)?;
            let fg_gained = apply_gain(&fg_slice, region.overlay_gain_db)?;
            overlay(&treated, &fg_gained, 0)
        }
        None => Ok(treated),
    }
}
