mod common;

use common::synthetic_image::{disc_phantom_u8, uniform_u8, Spot};
use scan_analyzer::image::RawImage;
use scan_analyzer::report::AnalysisOutcome;
use scan_analyzer::{AnalyzeError, AnalyzerParams, RiskLevel, ScanAnalyzer};

fn analyzer() -> ScanAnalyzer {
    ScanAnalyzer::new(AnalyzerParams::default())
}

#[test]
fn undersized_image_is_rejected() {
    let buffer = uniform_u8(16, 16, 128);
    let raw = RawImage::gray(16, 16, &buffer);
    let err = analyzer().analyze(&raw).unwrap_err();
    assert!(matches!(err, AnalyzeError::ImageTooSmall { min: 32, .. }));

    let outcome: AnalysisOutcome = Err(err).into();
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["status"], "error");
    assert!(json["message"].as_str().unwrap().contains("too small"));
}

#[test]
fn uniform_image_is_a_clear_scan() {
    let buffer = uniform_u8(256, 256, 128);
    let raw = RawImage::gray(256, 256, &buffer);
    let report = analyzer().analyze(&raw).unwrap();

    assert!(report.detected_regions.is_empty());
    let oa = &report.overall_assessment;
    assert_eq!(oa.risk_level, RiskLevel::Low);
    assert_eq!(oa.confidence, 0.94);
    assert_eq!(oa.num_regions_detected, 0);
    assert_eq!(oa.total_volume_mm3, 0);
    // zero-variance segmentation falls back to the whole image
    let stats = &report.image_analysis_stats;
    assert!(stats.tissue_fallback);
    assert_eq!(stats.brain_area_pixels, 256 * 256);
    assert_eq!(stats.image_dimensions, [256, 256]);
}

#[test]
fn bright_spot_in_tissue_disc_yields_one_region() {
    let buffer = disc_phantom_u8(
        256,
        256,
        &[
            Spot {
                cx: 128.0,
                cy: 128.0,
                radius: 85.0,
                value: 140,
            },
            Spot {
                cx: 128.0,
                cy: 128.0,
                radius: 15.0,
                value: 230,
            },
        ],
    );
    let raw = RawImage::gray(256, 256, &buffer);
    let report = analyzer().analyze(&raw).unwrap();

    assert_eq!(
        report.detected_regions.len(),
        1,
        "expected exactly one region, got {:?}",
        report.detected_regions
    );
    let region = &report.detected_regions[0];

    // bbox must enclose the spot center, with one window of slack
    let window_size = 16;
    let b = &region.bbox;
    assert!(b.x <= 128 && 128 <= b.x + b.width + window_size);
    assert!(b.y <= 128 && 128 <= b.y + b.height + window_size);
    assert!(b.x + b.width <= 256 && b.y + b.height <= 256);

    assert_ne!(region.risk_level, RiskLevel::Low);
    assert_ne!(report.overall_assessment.risk_level, RiskLevel::Low);
    assert!(!report.image_analysis_stats.tissue_fallback);
}

#[test]
fn separated_spots_yield_separate_regions() {
    let buffer = disc_phantom_u8(
        256,
        256,
        &[
            Spot {
                cx: 128.0,
                cy: 128.0,
                radius: 100.0,
                value: 140,
            },
            Spot {
                cx: 88.0,
                cy: 128.0,
                radius: 15.0,
                value: 230,
            },
            Spot {
                cx: 168.0,
                cy: 128.0,
                radius: 15.0,
                value: 230,
            },
        ],
    );
    let raw = RawImage::gray(256, 256, &buffer);
    let report = analyzer().analyze(&raw).unwrap();

    assert_eq!(
        report.detected_regions.len(),
        2,
        "expected two distinct regions, got {:?}",
        report.detected_regions
    );
    let (a, b) = (&report.detected_regions[0], &report.detected_regions[1]);
    assert!(a.bbox.x + a.bbox.width <= b.bbox.x || b.bbox.x + b.bbox.width <= a.bbox.x);
    assert_eq!(a.id, "region_1");
    assert_eq!(b.id, "region_2");
}

#[test]
fn region_invariants_hold() {
    let params = AnalyzerParams::default();
    let buffer = disc_phantom_u8(
        256,
        256,
        &[
            Spot {
                cx: 128.0,
                cy: 128.0,
                radius: 100.0,
                value: 140,
            },
            Spot {
                cx: 88.0,
                cy: 128.0,
                radius: 15.0,
                value: 230,
            },
            Spot {
                cx: 168.0,
                cy: 128.0,
                radius: 15.0,
                value: 230,
            },
        ],
    );
    let raw = RawImage::gray(256, 256, &buffer);
    let report = ScanAnalyzer::new(AnalyzerParams::default())
        .analyze(&raw)
        .unwrap();

    for region in &report.detected_regions {
        assert!(region.size_pixels >= params.cluster.min_region_area);
        assert!(region.size_pixels <= params.cluster.max_region_area);
        assert!((0.0..=1.0).contains(&region.confidence));
        let b = &region.bbox;
        assert!(b.x + b.width <= 256 && b.y + b.height <= 256);
        let s = &region.characteristics.intensity_stats;
        assert!(s.mean.is_finite() && s.std.is_finite() && s.contrast_ratio.is_finite());
    }
    assert!((0.0..=1.0).contains(&report.overall_assessment.confidence));
}

#[test]
fn analysis_is_deterministic() {
    let buffer = disc_phantom_u8(
        256,
        256,
        &[
            Spot {
                cx: 128.0,
                cy: 128.0,
                radius: 85.0,
                value: 140,
            },
            Spot {
                cx: 120.0,
                cy: 140.0,
                radius: 15.0,
                value: 230,
            },
        ],
    );
    let raw = RawImage::gray(256, 256, &buffer);
    let analyzer = analyzer();
    let a = analyzer.analyze(&raw).unwrap();
    let b = analyzer.analyze(&raw).unwrap();

    // timing differs between runs; every analytic output must not
    let regions_a = serde_json::to_string(&a.detected_regions).unwrap();
    let regions_b = serde_json::to_string(&b.detected_regions).unwrap();
    assert_eq!(regions_a, regions_b);
    let overall_a = serde_json::to_string(&a.overall_assessment).unwrap();
    let overall_b = serde_json::to_string(&b.overall_assessment).unwrap();
    assert_eq!(overall_a, overall_b);
    let stats_a = serde_json::to_string(&a.image_analysis_stats).unwrap();
    let stats_b = serde_json::to_string(&b.image_analysis_stats).unwrap();
    assert_eq!(stats_a, stats_b);
}
