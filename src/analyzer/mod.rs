//! Analyzer pipeline orchestrating end-to-end anomaly detection.
//!
//! [`ScanAnalyzer`] exposes a simple API: feed a decoded pixel buffer and get
//! a structured report. Internally it coordinates preprocessing, tissue
//! segmentation, the sliding-window scan, window clustering, per-region
//! classification, and the final assessment aggregation.
//!
//! Each call is pure and synchronous over the caller-owned buffer: the
//! analyzer holds only its immutable parameters, so one instance can be
//! shared freely across threads. Callers hosting it in an async runtime
//! should offload `analyze` to a worker pool.
//!
//! Typical usage:
//! ```no_run
//! use scan_analyzer::{AnalyzerParams, ScanAnalyzer};
//! use scan_analyzer::image::RawImage;
//!
//! # fn example(raw: RawImage) {
//! let analyzer = ScanAnalyzer::new(AnalyzerParams::default());
//! match analyzer.analyze(&raw) {
//!     Ok(report) => println!("risk: {:?}", report.overall_assessment.risk_level),
//!     Err(err) => eprintln!("rejected: {err}"),
//! }
//! # }
//! ```

mod options;

pub use options::AnalyzerParams;

use crate::classify::classify;
use crate::cluster::cluster;
use crate::error::AnalyzeError;
use crate::image::RawImage;
use crate::preprocess::preprocess;
use crate::report::{aggregate, AnalysisReport, ImageAnalysisStats, TimingBreakdown};
use crate::scan::scan;
use crate::segment::segment;
use log::{debug, info};
use std::time::Instant;

/// Label reported in `image_analysis_stats.processing_method`.
const PROCESSING_METHOD: &str = "statistical_sliding_window";

/// Anomaly-detection pipeline over single 2-D scan images.
pub struct ScanAnalyzer {
    params: AnalyzerParams,
}

impl ScanAnalyzer {
    /// Create an analyzer with the supplied parameters.
    pub fn new(params: AnalyzerParams) -> Self {
        Self { params }
    }

    /// The parameters this analyzer runs with.
    pub fn params(&self) -> &AnalyzerParams {
        &self.params
    }

    /// Run the full pipeline over one decoded image.
    ///
    /// Validation failures are the only errors; an empty region list is a
    /// successful "no findings" result.
    pub fn analyze(&self, raw: &RawImage) -> Result<AnalysisReport, AnalyzeError> {
        let total_start = Instant::now();
        let mut timing = TimingBreakdown::default();
        let p = &self.params;

        let stage = Instant::now();
        let img = preprocess(raw, &p.preprocess)?;
        timing.push("preprocess", elapsed_ms(stage));
        debug!("analyze: preprocessed {}x{} image", img.w, img.h);

        let stage = Instant::now();
        let seg = segment(&img, &p.segmentation);
        timing.push("segment", elapsed_ms(stage));
        debug!(
            "analyze: tissue area={} fallback={} mean={:.4} std={:.4}",
            seg.mask.area(),
            seg.fallback,
            seg.stats.mean,
            seg.stats.std
        );

        let stage = Instant::now();
        let candidates = scan(&img, &seg, &p.scan);
        timing.push("scan", elapsed_ms(stage));

        let stage = Instant::now();
        let regions = cluster(&candidates, p.scan.stride, img.w, img.h, &p.cluster);
        timing.push("cluster", elapsed_ms(stage));

        let stage = Instant::now();
        let detected: Vec<_> = regions
            .iter()
            .enumerate()
            .map(|(i, r)| classify(r, i, &img, &seg, &p.classify))
            .collect();
        timing.push("classify", elapsed_ms(stage));

        let stats = ImageAnalysisStats {
            brain_area_pixels: seg.mask.area(),
            image_dimensions: [img.h, img.w],
            processing_method: PROCESSING_METHOD,
            tissue_fallback: seg.fallback,
        };
        timing.total_ms = elapsed_ms(total_start);
        let report = aggregate(detected, stats, timing, &p.aggregate);
        info!(
            "analyze: {} regions, overall risk {:?}, {:.2}ms",
            report.overall_assessment.num_regions_detected,
            report.overall_assessment.risk_level,
            report.timing.total_ms
        );
        Ok(report)
    }
}

#[inline]
fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
