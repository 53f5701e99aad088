//! Rule-based classification of candidate regions.
//!
//! Maps aggregate region statistics onto a categorical type and risk tier,
//! and derives shape/texture characteristics. Every cutoff is a named field
//! of [`ClassifyOptions`] so boundary behavior can be probed in tests.
use crate::cluster::Region;
use crate::image::ImageF32;
use crate::report::{
    DetectedRegion, EnhancementPattern, IntensityStats, RegionCharacteristics, RiskLevel,
    TumorType,
};
use crate::segment::Segmentation;
use crate::stats::{mean_std, round3, EPSILON};
use serde::Deserialize;

/// Thresholds for region typing and characteristic derivation.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ClassifyOptions {
    /// Bright branch: region mean above `tissue_mean + bright_offset_sigma·σt`.
    pub bright_offset_sigma: f32,
    /// Bright regions above this pixel area classify as glioma/high.
    pub large_area_cutoff: usize,
    /// Dark branch: region mean below `tissue_mean - dark_offset_sigma·σt`.
    pub dark_offset_sigma: f32,
    /// Dark regions at or above this area escalate to moderate risk.
    pub meningioma_area_cutoff: usize,
    /// Texture branch: region texture above `texture_ratio·σt`.
    pub texture_ratio: f32,
    /// Textural regions at or above this area escalate to moderate risk.
    pub adenoma_area_cutoff: usize,
    /// Bbox aspect ratio beyond which the shape counts as irregular.
    pub aspect_ratio_limit: f32,
    /// Texture above `heterogeneous_ratio·σt` reads as heterogeneous
    /// enhancement.
    pub heterogeneous_ratio: f32,
    /// Width of the surrounding ring (pixels) sampled for edema.
    pub edema_ring_px: usize,
    /// Edema when the ring mean exceeds `tissue_mean + edema_margin_sigma·σt`.
    pub edema_margin_sigma: f32,
    /// Texture below `calcification_ratio·σt` suggests calcification.
    pub calcification_ratio: f32,
    /// Pixel-area to volume conversion factor (mm³ per pixel).
    pub volume_density_factor: f32,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            bright_offset_sigma: 1.0,
            large_area_cutoff: 800,
            dark_offset_sigma: 0.3,
            meningioma_area_cutoff: 500,
            texture_ratio: 1.5,
            adenoma_area_cutoff: 400,
            aspect_ratio_limit: 1.6,
            heterogeneous_ratio: 1.2,
            edema_ring_px: 16,
            edema_margin_sigma: 0.3,
            calcification_ratio: 0.4,
            volume_density_factor: 0.4,
        }
    }
}

/// Classify one region; `index` is zero-based and only feeds the report id.
pub fn classify(
    region: &Region,
    index: usize,
    img: &ImageF32,
    seg: &Segmentation,
    opts: &ClassifyOptions,
) -> DetectedRegion {
    let tissue = seg.stats;
    let area = region.pixel_area;

    let (tumor_type, risk_level) = if region.mean > tissue.mean + opts.bright_offset_sigma * tissue.std
    {
        if area > opts.large_area_cutoff {
            (TumorType::Glioma, RiskLevel::High)
        } else {
            (TumorType::Metastatic, RiskLevel::Moderate)
        }
    } else if region.mean < tissue.mean - opts.dark_offset_sigma * tissue.std {
        if area < opts.meningioma_area_cutoff {
            (TumorType::Meningioma, RiskLevel::Low)
        } else {
            (TumorType::Meningioma, RiskLevel::Moderate)
        }
    } else if region.std > opts.texture_ratio * tissue.std {
        if area < opts.adenoma_area_cutoff {
            (TumorType::PituitaryAdenoma, RiskLevel::Low)
        } else {
            (TumorType::PituitaryAdenoma, RiskLevel::Moderate)
        }
    } else {
        (TumorType::AcousticNeuroma, RiskLevel::Low)
    };

    let b = region.bbox;
    let aspect_ratio = if b.width == 0 || b.height == 0 {
        1.0
    } else {
        let (w, h) = (b.width as f32, b.height as f32);
        (w / h).max(h / w)
    };

    let enhancement_pattern = if region.std > opts.heterogeneous_ratio * tissue.std {
        EnhancementPattern::Heterogeneous
    } else if region.mean > tissue.mean + tissue.std {
        EnhancementPattern::Rim
    } else if region.mean > tissue.mean {
        EnhancementPattern::Homogeneous
    } else {
        EnhancementPattern::None
    };

    let edema_present = ring_mean(img, seg, &b, opts.edema_ring_px)
        .map(|ring| ring > tissue.mean + opts.edema_margin_sigma * tissue.std)
        .unwrap_or(false);

    let contrast_ratio = if tissue.std < EPSILON {
        0.0
    } else {
        (region.mean - tissue.mean).abs() / tissue.std
    };

    DetectedRegion {
        id: format!("region_{}", index + 1),
        tumor_type,
        bbox: b,
        confidence: round3(region.confidence),
        risk_level,
        volume_mm3: (area as f32 * opts.volume_density_factor) as u64,
        size_pixels: area,
        characteristics: RegionCharacteristics {
            irregular_shape: aspect_ratio > opts.aspect_ratio_limit,
            enhancement_pattern,
            edema_present,
            calcification: region.std < opts.calcification_ratio * tissue.std,
            intensity_stats: IntensityStats {
                mean: round3(region.mean),
                std: round3(region.std),
                contrast_ratio: round3(contrast_ratio),
            },
        },
    }
}

/// Mean intensity of the tissue-masked ring around `bbox`, `ring_px` wide.
///
/// Returns `None` when the ring contains no tissue pixels.
fn ring_mean(
    img: &ImageF32,
    seg: &Segmentation,
    bbox: &crate::cluster::BoundingBox,
    ring_px: usize,
) -> Option<f32> {
    let x0 = bbox.x.saturating_sub(ring_px);
    let y0 = bbox.y.saturating_sub(ring_px);
    let x1 = (bbox.x + bbox.width + ring_px).min(img.w);
    let y1 = (bbox.y + bbox.height + ring_px).min(img.h);
    let mut pixels = Vec::new();
    for y in y0..y1 {
        for x in x0..x1 {
            let inside_bbox = x >= bbox.x
                && x < bbox.x + bbox.width
                && y >= bbox.y
                && y < bbox.y + bbox.height;
            if !inside_bbox && seg.mask.contains(x, y) {
                pixels.push(img.get(x, y));
            }
        }
    }
    if pixels.is_empty() {
        return None;
    }
    let (mean, _) = mean_std(&pixels);
    Some(mean)
}
