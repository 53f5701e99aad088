#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod analyzer;
pub mod config;
pub mod error;
pub mod image;
pub mod report;

// Pipeline stages – public for tools and tests, but considered internals.
pub mod classify;
pub mod cluster;
pub mod preprocess;
pub mod scan;
pub mod segment;
pub mod stats;

// --- High-level re-exports -------------------------------------------------

// Main entry points: analyzer + results.
pub use crate::analyzer::{AnalyzerParams, ScanAnalyzer};
pub use crate::error::AnalyzeError;
pub use crate::report::{AnalysisOutcome, AnalysisReport, RiskLevel};

/// Small prelude for quick experiments.
pub mod prelude {
    pub use crate::image::{ChannelLayout, RawImage};
    pub use crate::{AnalysisReport, AnalyzerParams, RiskLevel, ScanAnalyzer};
}
