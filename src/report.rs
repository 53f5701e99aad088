//! Report schema and the overall assessment aggregation.
//!
//! The report is a fixed, versioned schema rather than a free-form map: every
//! field the wire layer may serialize is a typed struct here. The aggregator
//! never fails on an empty region list; a clear scan is a successful result
//! with high baseline confidence.
use crate::cluster::BoundingBox;
use crate::error::AnalyzeError;
use crate::stats::round3;
use serde::{Deserialize, Serialize};

/// Coarse severity tier, per region and overall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

/// Categorical region type assigned by the classifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TumorType {
    Glioma,
    Metastatic,
    Meningioma,
    PituitaryAdenoma,
    AcousticNeuroma,
}

/// Enhancement pattern derived from texture vs intensity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnhancementPattern {
    Heterogeneous,
    Rim,
    Homogeneous,
    None,
}

/// Region intensity summary relative to the tissue baseline.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct IntensityStats {
    pub mean: f32,
    pub std: f32,
    /// `|region_mean - tissue_mean| / tissue_std`
    pub contrast_ratio: f32,
}

/// Shape/texture flags derived per region.
#[derive(Clone, Debug, Serialize)]
pub struct RegionCharacteristics {
    pub irregular_shape: bool,
    pub enhancement_pattern: EnhancementPattern,
    pub edema_present: bool,
    pub calcification: bool,
    pub intensity_stats: IntensityStats,
}

/// One classified finding in the report.
#[derive(Clone, Debug, Serialize)]
pub struct DetectedRegion {
    pub id: String,
    #[serde(rename = "type")]
    pub tumor_type: TumorType,
    pub bbox: BoundingBox,
    pub confidence: f32,
    pub risk_level: RiskLevel,
    pub volume_mm3: u64,
    pub size_pixels: usize,
    pub characteristics: RegionCharacteristics,
}

/// Combined severity summary over all regions.
#[derive(Clone, Debug, Serialize)]
pub struct OverallAssessment {
    pub risk_level: RiskLevel,
    pub confidence: f32,
    pub num_regions_detected: usize,
    pub total_volume_mm3: u64,
}

/// Per-analysis statistics about the input and segmentation.
#[derive(Clone, Debug, Serialize)]
pub struct ImageAnalysisStats {
    pub brain_area_pixels: usize,
    /// `[height, width]`
    pub image_dimensions: [usize; 2],
    pub processing_method: &'static str,
    /// True when segmentation fell back to the whole image; results carry
    /// reduced reliability.
    pub tissue_fallback: bool,
}

/// Timing entry for a single pipeline stage.
#[derive(Clone, Debug, Serialize)]
pub struct StageTiming {
    pub label: &'static str,
    pub elapsed_ms: f64,
}

/// Aggregated timing trace for the analysis run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn push(&mut self, label: &'static str, elapsed_ms: f64) {
        self.stages.push(StageTiming { label, elapsed_ms });
    }
}

/// Successful analysis result.
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisReport {
    pub overall_assessment: OverallAssessment,
    pub detected_regions: Vec<DetectedRegion>,
    pub image_analysis_stats: ImageAnalysisStats,
    pub timing: TimingBreakdown,
}

/// Wire envelope: the report inline under `status: "success"`, or an error
/// message under `status: "error"`.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AnalysisOutcome {
    Success(AnalysisReport),
    Error { message: String },
}

impl From<Result<AnalysisReport, AnalyzeError>> for AnalysisOutcome {
    fn from(result: Result<AnalysisReport, AnalyzeError>) -> Self {
        match result {
            Ok(report) => AnalysisOutcome::Success(report),
            Err(err) => AnalysisOutcome::Error {
                message: err.to_string(),
            },
        }
    }
}

/// Knobs for the overall assessment.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AggregateOptions {
    /// Reported confidence when no regions were found (clear scan).
    pub clear_scan_confidence: f32,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            clear_scan_confidence: 0.94,
        }
    }
}

/// Combine classified regions into the final report.
pub fn aggregate(
    detected_regions: Vec<DetectedRegion>,
    stats: ImageAnalysisStats,
    timing: TimingBreakdown,
    opts: &AggregateOptions,
) -> AnalysisReport {
    let any_high = detected_regions
        .iter()
        .any(|r| r.risk_level == RiskLevel::High);
    let any_moderate = detected_regions
        .iter()
        .any(|r| r.risk_level == RiskLevel::Moderate);
    let risk_level = if any_high {
        RiskLevel::High
    } else if any_moderate || detected_regions.len() > 2 {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    };

    let confidence = if detected_regions.is_empty() {
        opts.clear_scan_confidence
    } else {
        let sum: f32 = detected_regions.iter().map(|r| r.confidence).sum();
        round3(sum / detected_regions.len() as f32)
    };

    let total_volume_mm3 = detected_regions.iter().map(|r| r.volume_mm3).sum();

    AnalysisReport {
        overall_assessment: OverallAssessment {
            risk_level,
            confidence,
            num_regions_detected: detected_regions.len(),
            total_volume_mm3,
        },
        detected_regions,
        image_analysis_stats: stats,
        timing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> ImageAnalysisStats {
        ImageAnalysisStats {
            brain_area_pixels: 20000,
            image_dimensions: [256, 256],
            processing_method: "statistical_sliding_window",
            tissue_fallback: false,
        }
    }

    fn region(id: usize, risk_level: RiskLevel, confidence: f32, volume_mm3: u64) -> DetectedRegion {
        DetectedRegion {
            id: format!("region_{id}"),
            tumor_type: TumorType::Metastatic,
            bbox: BoundingBox {
                x: 10,
                y: 10,
                width: 24,
                height: 24,
            },
            confidence,
            risk_level,
            volume_mm3,
            size_pixels: 576,
            characteristics: RegionCharacteristics {
                irregular_shape: false,
                enhancement_pattern: EnhancementPattern::Rim,
                edema_present: false,
                calcification: false,
                intensity_stats: IntensityStats {
                    mean: 0.8,
                    std: 0.05,
                    contrast_ratio: 3.0,
                },
            },
        }
    }

    #[test]
    fn empty_region_list_is_low_risk_success() {
        let report = aggregate(
            Vec::new(),
            stats(),
            TimingBreakdown::default(),
            &AggregateOptions::default(),
        );
        let oa = &report.overall_assessment;
        assert_eq!(oa.risk_level, RiskLevel::Low);
        assert_eq!(oa.confidence, 0.94);
        assert_eq!(oa.num_regions_detected, 0);
        assert_eq!(oa.total_volume_mm3, 0);
    }

    #[test]
    fn any_high_region_dominates() {
        let regions = vec![
            region(1, RiskLevel::Low, 0.6, 100),
            region(2, RiskLevel::High, 0.9, 400),
        ];
        let report = aggregate(
            regions,
            stats(),
            TimingBreakdown::default(),
            &AggregateOptions::default(),
        );
        assert_eq!(report.overall_assessment.risk_level, RiskLevel::High);
        assert_eq!(report.overall_assessment.total_volume_mm3, 500);
    }

    #[test]
    fn single_moderate_region_is_moderate_overall() {
        let regions = vec![region(1, RiskLevel::Moderate, 0.7, 200)];
        let report = aggregate(
            regions,
            stats(),
            TimingBreakdown::default(),
            &AggregateOptions::default(),
        );
        assert_eq!(report.overall_assessment.risk_level, RiskLevel::Moderate);
    }

    #[test]
    fn many_low_regions_escalate_to_moderate() {
        let regions = vec![
            region(1, RiskLevel::Low, 0.6, 100),
            region(2, RiskLevel::Low, 0.6, 100),
            region(3, RiskLevel::Low, 0.6, 100),
        ];
        let report = aggregate(
            regions,
            stats(),
            TimingBreakdown::default(),
            &AggregateOptions::default(),
        );
        assert_eq!(report.overall_assessment.risk_level, RiskLevel::Moderate);
    }

    #[test]
    fn two_low_regions_stay_low() {
        let regions = vec![
            region(1, RiskLevel::Low, 0.6, 100),
            region(2, RiskLevel::Low, 0.8, 100),
        ];
        let report = aggregate(
            regions,
            stats(),
            TimingBreakdown::default(),
            &AggregateOptions::default(),
        );
        assert_eq!(report.overall_assessment.risk_level, RiskLevel::Low);
        assert_eq!(report.overall_assessment.confidence, 0.7);
    }

    #[test]
    fn outcome_envelope_serializes_status_tags() {
        let ok: AnalysisOutcome = Ok(aggregate(
            Vec::new(),
            stats(),
            TimingBreakdown::default(),
            &AggregateOptions::default(),
        ))
        .into();
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["overall_assessment"]["risk_level"], "low");

        let err: AnalysisOutcome = Err(AnalyzeError::EmptyImage).into();
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "empty image");
    }

    #[test]
    fn risk_levels_order_by_severity() {
        assert!(RiskLevel::Low < RiskLevel::Moderate);
        assert!(RiskLevel::Moderate < RiskLevel::High);
    }
}
