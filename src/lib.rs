//! Overture - Audio Timeline Compositor
//!
//! Overture assembles a short spoken-word intro from three independently
//! produced audio sources: a background-music bed, an optional transition
//! effect, and a synthesized speech segment. The sources are sliced,
//! attenuated, faded, and overlaid into one continuous program, then
//! encoded to a fixed wire format (stereo 44.1kHz CBR 192kbps MP3).
//!
//! # Architecture
//!
//! Data flows strictly one direction:
//! - raw [`audio::SampleBuffer`]s and a [`timeline::Recipe`]
//! - → a [`timeline::TimelinePlan`] (every offset decision in one place)
//! - → processed and overlaid regions ([`dsp`])
//! - → one concatenated master buffer ([`compose`])
//! - → encoded bytes ([`encode`])
//!
//! Planning needs only source durations, never sample data, so timeline
//! logic is testable without decoding audio.

pub mod audio;
pub mod cli;
pub mod compose;
pub mod dsp;
pub mod encode;
pub mod error;
pub mod timeline;

pub use audio::{ChannelLayout, SampleBuffer, TARGET_SAMPLE_RATE};
pub use compose::{compose, compose_intro, CompositionResult};
pub use encode::{encode, EncodedAudio, OutputFormat};
pub use error::{OvertureError, Result};
pub use timeline::{plan, BufferMeta, Recipe, TimelinePlan};
