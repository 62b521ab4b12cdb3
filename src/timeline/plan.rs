//! Segment planning
//!
//! Computes, from three source durations and a recipe, where every piece of
//! the final timeline goes. All offset arithmetic for the whole composition
//! lives here; the compositor executes the plan without doing any length
//! math of its own. Planning needs only durations, so it is testable
//! without decoding a single audio file.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::audio::SampleBuffer;
use crate::error::{OvertureError, Result};
use crate::timeline::Recipe;

// ============================================================================
// Plan data model
// ============================================================================

/// The length of a source buffer, which is all the planner needs to know
/// about it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferMeta {
    pub duration_ms: u64,
}

impl BufferMeta {
    pub fn new(duration_ms: u64) -> Self {
        Self { duration_ms }
    }

    /// Capture the duration of a decoded buffer
    pub fn of(buffer: &SampleBuffer) -> Self {
        Self {
            duration_ms: buffer.duration_ms(),
        }
    }
}

/// Role a region plays in the output timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionKind {
    /// Bed-only opening at original gain
    Intro,
    /// Transition effect overlaid while the bed ducks down
    Effect,
    /// Speech overlaid on the attenuated bed
    SpeechBed,
    /// Attenuated bed after speech ends
    PostRoll,
    /// Bed ramping to silence
    FadeOut,
}

impl std::fmt::Display for RegionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RegionKind::Intro => "intro",
            RegionKind::Effect => "effect",
            RegionKind::SpeechBed => "speech-bed",
            RegionKind::PostRoll => "post-roll",
            RegionKind::FadeOut => "fade-out",
        };
        write!(f, "{}", name)
    }
}

/// Direction of a gain ramp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FadeDirection {
    In,
    Out,
}

/// Linear gain ramp across a region
///
/// The first frame of the region sits exactly at `from_gain_db` and the
/// last frame exactly at `to_gain_db`; interpolation happens on the linear
/// amplitude factor, so a `to_gain_db` of negative infinity lands on true
/// silence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FadeSpec {
    pub direction: FadeDirection,
    pub duration_ms: u32,
    #[serde(with = "db_value")]
    pub from_gain_db: f64,
    #[serde(with = "db_value")]
    pub to_gain_db: f64,
}

impl FadeSpec {
    /// Build a ramp between two levels, deriving the direction
    pub fn ramp(duration_ms: u32, from_gain_db: f64, to_gain_db: f64) -> Self {
        let direction = if to_gain_db >= from_gain_db {
            FadeDirection::In
        } else {
            FadeDirection::Out
        };
        Self {
            direction,
            duration_ms,
            from_gain_db,
            to_gain_db,
        }
    }
}

/// JSON cannot carry -Infinity, so silent fade targets serialize as the
/// string "-inf".
mod db_value {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(db: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if db.is_finite() {
            serializer.serialize_f64(*db)
        } else {
            serializer.serialize_str("-inf")
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(f64),
            Text(String),
        }
        match Repr::deserialize(deserializer)? {
            Repr::Num(db) => Ok(db),
            Repr::Text(s) if s == "-inf" => Ok(f64::NEG_INFINITY),
            Repr::Text(s) => Err(D::Error::custom(format!("invalid gain value: {}", s))),
        }
    }
}

/// A contiguous span of the output timeline with its own treatment
///
/// `source_offset_ms`/`source_duration_ms` address the bed buffer. `gain_db`
/// is the flat bed level for the region; when `fade` is set it describes the
/// region's ramp instead and `gain_db` records the entry level.
/// `overlay_gain_db` is applied to the foreground clip (effect or speech)
/// before it is overlaid; regions without a foreground ignore it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub kind: RegionKind,
    pub source_offset_ms: u64,
    pub source_duration_ms: u64,
    pub gain_db: f64,
    pub fade: Option<FadeSpec>,
    pub overlay_gain_db: f64,
}

/// Ordered, contiguous, non-overlapping regions covering the whole output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePlan {
    pub regions: Vec<Region>,
    /// Total output duration, equal to the sum of all region durations
    pub total_duration_ms: u64,
    /// Bed span the plan consumes, verified against the bed's actual length
    pub bed_required_ms: u64,
}

impl TimelinePlan {
    /// Look up a region by kind
    pub fn region(&self, kind: RegionKind) -> Option<&Region> {
        self.regions.iter().find(|r| r.kind == kind)
    }
}

// ============================================================================
// Planner
// ============================================================================

/// Plan the output timeline from three source lengths and a recipe
///
/// Regions are laid out in order: intro, effect (when present), speech bed,
/// post-roll, fade-out. Recipe spans of zero produce no region. The bed
/// must cover every planned region; a bed that runs out is reported with
/// the first region it cannot cover, never clamped.
pub fn plan(
    bed: BufferMeta,
    effect: Option<BufferMeta>,
    speech: BufferMeta,
    recipe: &Recipe,
) -> Result<TimelinePlan> {
    if bed.duration_ms == 0 {
        return Err(OvertureError::EmptyBuffer {
            context: "bed source".to_string(),
        });
    }
    if speech.duration_ms == 0 {
        return Err(OvertureError::EmptyBuffer {
            context: "speech source".to_string(),
        });
    }
    if let Some(fx) = effect {
        if fx.duration_ms == 0 {
            return Err(OvertureError::EmptyBuffer {
                context: "effect source".to_string(),
            });
        }
    }

    let attenuation = recipe.bed_attenuation_db;
    let mut regions = Vec::with_capacity(5);
    let mut bed_cursor_ms: u64 = 0;

    if recipe.lead_in_ms > 0 {
        regions.push(Region {
            kind: RegionKind::Intro,
            source_offset_ms: bed_cursor_ms,
            source_duration_ms: recipe.lead_in_ms,
            gain_db: 0.0,
            fade: None,
            overlay_gain_db: 0.0,
        });
        bed_cursor_ms += recipe.lead_in_ms;
    }

    if let Some(fx) = effect {
        // The bed ducks down across the effect so it is already quiet when
        // speech starts, rather than cutting hard at the speech boundary.
        regions.push(Region {
            kind: RegionKind::Effect,
            source_offset_ms: bed_cursor_ms,
            source_duration_ms: fx.duration_ms,
            gain_db: 0.0,
            fade: Some(FadeSpec::ramp(
                fx.duration_ms.min(u32::MAX as u64) as u32,
                0.0,
                attenuation,
            )),
            overlay_gain_db: recipe.effect_gain_db,
        });
        bed_cursor_ms += fx.duration_ms;
    }

    regions.push(Region {
        kind: RegionKind::SpeechBed,
        source_offset_ms: bed_cursor_ms,
        source_duration_ms: speech.duration_ms,
        gain_db: attenuation,
        fade: None,
        overlay_gain_db: 0.0,
    });
    bed_cursor_ms += speech.duration_ms;

    if recipe.post_roll_ms > 0 {
        regions.push(Region {
            kind: RegionKind::PostRoll,
            source_offset_ms: bed_cursor_ms,
            source_duration_ms: recipe.post_roll_ms,
            gain_db: attenuation,
            fade: None,
            overlay_gain_db: 0.0,
        });
        bed_cursor_ms += recipe.post_roll_ms;
    }

    if recipe.fade_out_ms > 0 {
        regions.push(Region {
            kind: RegionKind::FadeOut,
            source_offset_ms: bed_cursor_ms,
            source_duration_ms: recipe.fade_out_ms,
            gain_db: attenuation,
            fade: Some(FadeSpec::ramp(
                recipe.fade_out_ms.min(u32::MAX as u64) as u32,
                attenuation,
                f64::NEG_INFINITY,
            )),
            overlay_gain_db: 0.0,
        });
        bed_cursor_ms += recipe.fade_out_ms;
    }

    // Every region draws on the bed, so the bed must cover the whole plan.
    // Verified here, up front: letting the compositor discover it region by
    // region would mean slicing past the end of the bed mid-composition.
    let bed_required_ms = bed_cursor_ms;
    let mut covered_ms: u64 = 0;
    for region in &regions {
        covered_ms += region.source_duration_ms;
        if covered_ms > bed.duration_ms {
            return Err(OvertureError::InsufficientSourceLength {
                region: region.kind,
                required_ms: covered_ms,
                available_ms: bed.duration_ms,
            });
        }
    }

    let total_duration_ms: u64 = regions.iter().map(|r| r.source_duration_ms).sum();
    debug!(
        regions = regions.len(),
        total_duration_ms, bed_required_ms, "timeline planned"
    );

    Ok(TimelinePlan {
        regions,
        total_duration_ms,
        bed_required_ms,
    })
}
