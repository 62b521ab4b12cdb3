//! Error handling for Overture
//!
//! Every core operation returns a typed result; nothing in the core
//! attempts best-effort recovery.

use thiserror::Error;

use crate::timeline::RegionKind;

/// Result type alias for Overture operations
pub type Result<T> = std::result::Result<T, OvertureError>;

/// Main error type for Overture operations
#[derive(Error, Debug)]
pub enum OvertureError {
    // Planning Errors
    #[error(
        "Source too short for {region} region: {required_ms}ms required, {available_ms}ms available"
    )]
    InsufficientSourceLength {
        region: RegionKind,
        required_ms: u64,
        available_ms: u64,
    },

    #[error("Empty buffer: {context}")]
    EmptyBuffer { context: String },

    // Mixing Errors
    #[error(
        "Overlay out of bounds: top ({top_ms}ms at offset {start_offset_ms}ms) exceeds base ({base_ms}ms)"
    )]
    OverlayOutOfBounds {
        start_offset_ms: u64,
        top_ms: u64,
        base_ms: u64,
    },

    #[error(
        "Slice out of bounds: {duration_ms}ms at offset {start_ms}ms exceeds buffer ({available_ms}ms)"
    )]
    SliceOutOfBounds {
        start_ms: u64,
        duration_ms: u64,
        available_ms: u64,
    },

    // Composition Errors
    #[error("Composition failed in {region} region")]
    RegionFailed {
        region: RegionKind,
        #[source]
        source: Box<OvertureError>,
    },

    #[error("Format mismatch: expected {expected}, got {actual}")]
    FormatMismatch { expected: String, actual: String },

    // Decode/Encode Errors
    #[error("Invalid audio file: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Encoding failed: {reason}")]
    EncodeFailed { reason: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl OvertureError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            OvertureError::InsufficientSourceLength { .. } => "INSUFFICIENT_SOURCE_LENGTH",
            OvertureError::EmptyBuffer { .. } => "EMPTY_BUFFER",
            OvertureError::OverlayOutOfBounds { .. } => "OVERLAY_OUT_OF_BOUNDS",
            OvertureError::SliceOutOfBounds { .. } => "SLICE_OUT_OF_BOUNDS",
            OvertureError::RegionFailed { .. } => "REGION_FAILED",
            OvertureError::FormatMismatch { .. } => "FORMAT_MISMATCH",
            OvertureError::InvalidAudio { .. } => "INVALID_AUDIO",
            OvertureError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            OvertureError::EncodeFailed { .. } => "ENCODE_FAILED",
            OvertureError::Io(_) => "IO_ERROR",
            OvertureError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check whether this error indicates a caller-supplied input problem
    /// (as opposed to an internal invariant violation or an I/O failure).
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            OvertureError::InsufficientSourceLength { .. }
                | OvertureError::EmptyBuffer { .. }
                | OvertureError::FormatMismatch { .. }
                | OvertureError::InvalidAudio { .. }
                | OvertureError::UnsupportedFormat { .. }
        )
    }
}
