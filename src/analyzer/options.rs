//! Parameter types configuring the analysis stages.
//!
//! One immutable [`AnalyzerParams`] value is injected per analyzer; nothing
//! in the pipeline reads mutable or global configuration. Defaults target
//! 256×256-class scan images; for tuning, start with the scan thresholds and
//! the region area bounds.

use crate::classify::ClassifyOptions;
use crate::cluster::ClusterOptions;
use crate::preprocess::PreprocessOptions;
use crate::report::AggregateOptions;
use crate::scan::ScanOptions;
use crate::segment::SegmentationOptions;
use serde::Deserialize;

/// Analyzer-wide parameters controlling the multi-stage pipeline.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnalyzerParams {
    /// Input validation and denoising.
    pub preprocess: PreprocessOptions,
    /// Tissue/background separation.
    pub segmentation: SegmentationOptions,
    /// Sliding-window anomaly thresholds.
    pub scan: ScanOptions,
    /// Window merging and region size filtering.
    pub cluster: ClusterOptions,
    /// Region typing, risk tiers, and characteristics.
    pub classify: ClassifyOptions,
    /// Overall assessment knobs.
    pub aggregate: AggregateOptions,
}
