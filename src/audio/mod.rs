//! Sample buffers and audio file decoding

pub mod buffer;
pub mod io;

pub use buffer::{db_to_linear, linear_to_db, ChannelLayout, SampleBuffer, TARGET_SAMPLE_RATE};
pub use io::import_audio;
