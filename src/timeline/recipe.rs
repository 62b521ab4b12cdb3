//! Composition recipe
//!
//! The duration and gain constants that govern how a timeline is planned.
//! Callers supply these per composition; nothing in the planner is
//! hardcoded, so a product can ship several recipes without touching the
//! planning algorithm.

use serde::{Deserialize, Serialize};

/// Duration/gain constants governing how a plan is built
///
/// All durations are output-timeline milliseconds. A span of zero simply
/// omits the corresponding region from the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recipe {
    /// Bed-only opening span at original gain
    pub lead_in_ms: u64,
    /// Level the bed is held at underneath foreground content, in dB
    pub bed_attenuation_db: f64,
    /// Bed-only span after speech ends, held at the attenuated level
    pub post_roll_ms: u64,
    /// Closing span ramping the attenuated bed down to silence
    pub fade_out_ms: u64,
    /// Gain delta applied to the transition effect before overlaying, in dB
    pub effect_gain_db: f64,
}

impl Default for Recipe {
    fn default() -> Self {
        // The values the original product shipped with: five seconds of
        // full-level bed, speech over a -20dB bed, five-second fade to
        // silence, no separate post-roll.
        Self {
            lead_in_ms: 5000,
            bed_attenuation_db: -20.0,
            post_roll_ms: 0,
            fade_out_ms: 5000,
            effect_gain_db: 0.0,
        }
    }
}
