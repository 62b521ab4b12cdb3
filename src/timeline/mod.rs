//! Timeline planning
//!
//! Turns three source durations and a recipe into an explicit plan of
//! regions. Centralizing the offset arithmetic here is what keeps the rest
//! of the pipeline free of length decisions.

mod plan;
mod recipe;

pub use plan::{plan, BufferMeta, FadeDirection, FadeSpec, Region, RegionKind, TimelinePlan};
pub use recipe::Recipe;
