//! Sliding-window anomaly scan over the tissue region.
//!
//! Windows of `window_size` pixels slide with 50% overlap (default stride 8)
//! over positions where at least half the window lies inside the tissue mask.
//! Window statistics are compared against tissue-level statistics, not global
//! ones, so bright non-tissue artifacts do not inflate the thresholds. The
//! overlap keeps small features near window boundaries from being missed.
//!
//! Rows of window positions are scanned in parallel; the indexed collect keeps
//! the output identical to a sequential row-major scan.
use crate::segment::Segmentation;
use crate::stats::{clamp, mean_std, EPSILON};
use log::debug;
use rayon::prelude::*;
use serde::Deserialize;

/// Knobs for the window scan and its anomaly thresholds.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    /// Square window side length in pixels.
    pub window_size: usize,
    /// Step between window origins; `window_size / 2` gives 50% overlap.
    pub stride: usize,
    /// Fraction of window pixels that must lie inside the tissue mask.
    pub min_coverage: f32,
    /// Bright flag: `window_mean > tissue_mean + bright_sigma * tissue_std`.
    pub bright_sigma: f32,
    /// Dark flag: `window_mean < tissue_mean - dark_sigma * tissue_std`.
    pub dark_sigma: f32,
    /// Dark flag floor: window mean must exceed this fraction of the tissue
    /// mean, excluding near-background windows.
    pub dark_floor_ratio: f32,
    /// Textural flag: `window_std > texture_sigma * tissue_std`.
    pub texture_sigma: f32,
    /// Confidence clamp range.
    pub confidence_floor: f32,
    pub confidence_ceil: f32,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            window_size: 16,
            stride: 8,
            min_coverage: 0.5,
            bright_sigma: 2.0,
            dark_sigma: 1.5,
            dark_floor_ratio: 0.2,
            texture_sigma: 2.0,
            confidence_floor: 0.5,
            confidence_ceil: 0.95,
        }
    }
}

/// Statistical deviation class of a flagged window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnomalyKind {
    Bright,
    Dark,
    Textural,
}

/// Fixed-size square patch with its local statistics.
#[derive(Clone, Copy, Debug)]
pub struct Window {
    pub x: usize,
    pub y: usize,
    pub size: usize,
    pub mean: f32,
    pub std: f32,
}

/// A window flagged as statistically deviant.
#[derive(Clone, Copy, Debug)]
pub struct CandidateWindow {
    pub window: Window,
    pub kind: AnomalyKind,
    pub confidence: f32,
}

/// Scan the tissue region and flag statistically deviant windows.
///
/// An empty result is the normal "no anomaly" outcome, including the
/// zero-variance case where no deviation is measurable.
pub fn scan(
    img: &crate::image::ImageF32,
    seg: &Segmentation,
    opts: &ScanOptions,
) -> Vec<CandidateWindow> {
    let ws = opts.window_size;
    let stride = opts.stride.max(1);
    if img.w < ws || img.h < ws {
        return Vec::new();
    }
    let tissue = seg.stats;
    if tissue.std < EPSILON {
        // zero variance: no deviation is measurable, so no anomaly possible
        debug!("scan: tissue std below epsilon, skipping scan");
        return Vec::new();
    }

    let bright_threshold = tissue.mean + opts.bright_sigma * tissue.std;
    let dark_threshold = tissue.mean - opts.dark_sigma * tissue.std;
    let dark_floor = opts.dark_floor_ratio * tissue.mean;
    let texture_threshold = opts.texture_sigma * tissue.std;
    let min_masked = (opts.min_coverage * (ws * ws) as f32).ceil() as usize;

    let ys: Vec<usize> = (0..=img.h - ws).step_by(stride).collect();
    let rows: Vec<Vec<CandidateWindow>> = ys
        .par_iter()
        .map(|&y| {
            let mut row = Vec::new();
            let mut pixels = Vec::with_capacity(ws * ws);
            for x in (0..=img.w - ws).step_by(stride) {
                pixels.clear();
                for wy in y..y + ws {
                    for wx in x..x + ws {
                        if seg.mask.contains(wx, wy) {
                            pixels.push(img.get(wx, wy));
                        }
                    }
                }
                if pixels.len() < min_masked {
                    continue;
                }
                let (mean, std) = mean_std(&pixels);

                let is_bright = mean > bright_threshold;
                let is_dark = mean < dark_threshold && mean > dark_floor;
                let is_textural = std > texture_threshold;
                if !(is_bright || is_dark || is_textural) {
                    continue;
                }

                let intensity_diff = (mean - tissue.mean).abs() / tissue.std;
                let texture_diff = (std - tissue.std).abs() / tissue.std;
                let confidence = clamp(
                    (intensity_diff + texture_diff) / 4.0,
                    opts.confidence_floor,
                    opts.confidence_ceil,
                );

                let kind = if is_bright {
                    AnomalyKind::Bright
                } else if is_dark {
                    AnomalyKind::Dark
                } else {
                    AnomalyKind::Textural
                };
                row.push(CandidateWindow {
                    window: Window {
                        x,
                        y,
                        size: ws,
                        mean,
                        std,
                    },
                    kind,
                    confidence,
                });
            }
            row
        })
        .collect();

    let flagged: Vec<CandidateWindow> = rows.into_iter().flatten().collect();
    debug!("scan: {} candidate windows flagged", flagged.len());
    flagged
}
