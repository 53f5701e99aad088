//! Error taxonomy for the analysis pipeline.
//!
//! Only validation failures are fatal. A degenerate segmentation recovers via
//! the whole-image fallback, and zero-variance localities are guarded with
//! epsilon comparisons inside the scanner, so neither surfaces here.
use thiserror::Error;

/// Fatal input validation failures surfaced to the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalyzeError {
    /// Image dimensions are below the minimum the pipeline can analyze.
    #[error("image too small: {width}x{height}, minimum is {min}x{min}")]
    ImageTooSmall {
        width: usize,
        height: usize,
        min: usize,
    },

    /// The pixel buffer length does not match the declared dimensions/layout.
    #[error("pixel buffer length {actual} does not match expected {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Zero-sized image.
    #[error("empty image")]
    EmptyImage,
}
