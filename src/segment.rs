//! Tissue segmentation: separates the foreground subject from background.
//!
//! A global-statistics threshold (`mean + k·std`) produces a boolean mask.
//! When the mask is too small to be meaningful the segmenter falls back to
//! treating the whole image as tissue and flags the result, rather than
//! failing the request.
use crate::image::ImageF32;
use crate::stats::mean_std;
use log::{debug, warn};
use serde::Deserialize;

/// Knobs for the threshold segmentation.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SegmentationOptions {
    /// Threshold is `global_mean + threshold_k * global_std`.
    pub threshold_k: f32,
    /// Below this mask area (pixels) the segmenter falls back to the
    /// whole image.
    pub min_tissue_area: usize,
}

impl Default for SegmentationOptions {
    fn default() -> Self {
        Self {
            threshold_k: 0.35,
            min_tissue_area: 1000,
        }
    }
}

/// Boolean foreground mask with cached area.
#[derive(Clone, Debug)]
pub struct TissueMask {
    w: usize,
    h: usize,
    data: Vec<bool>,
    area: usize,
}

impl TissueMask {
    /// Build a mask by thresholding `img` with `pred` per pixel.
    fn from_fn(img: &ImageF32, pred: impl Fn(f32) -> bool) -> Self {
        let data: Vec<bool> = img.data.iter().map(|&v| pred(v)).collect();
        let area = data.iter().filter(|&&b| b).count();
        Self {
            w: img.w,
            h: img.h,
            data,
            area,
        }
    }

    /// Mask covering the entire image (degenerate-segmentation fallback).
    fn full(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![true; w * h],
            area: w * h,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.h
    }

    /// Number of mask pixels set.
    #[inline]
    pub fn area(&self) -> usize {
        self.area
    }

    /// Whether the pixel at (x, y) belongs to tissue.
    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.data[y * self.w + x]
    }
}

/// Mean/std of the masked tissue pixels.
#[derive(Clone, Copy, Debug)]
pub struct TissueStats {
    pub mean: f32,
    pub std: f32,
}

/// Segmentation output: mask, tissue statistics, and the fallback flag.
#[derive(Clone, Debug)]
pub struct Segmentation {
    pub mask: TissueMask,
    pub stats: TissueStats,
    /// True when the mask was degenerate and the whole image is used
    /// instead; downstream results carry reduced reliability.
    pub fallback: bool,
}

/// Threshold the image into tissue vs background.
pub fn segment(img: &ImageF32, opts: &SegmentationOptions) -> Segmentation {
    let (global_mean, global_std) = mean_std(&img.data);
    let threshold = global_mean + opts.threshold_k * global_std;
    let mask = TissueMask::from_fn(img, |v| v > threshold);
    debug!(
        "segment: global mean={global_mean:.4} std={global_std:.4} threshold={threshold:.4} area={}",
        mask.area()
    );

    let (mask, fallback) = if mask.area() < opts.min_tissue_area {
        warn!(
            "segment: mask area {} below minimum {}, falling back to whole image",
            mask.area(),
            opts.min_tissue_area
        );
        (TissueMask::full(img.w, img.h), true)
    } else {
        (mask, false)
    };

    let tissue_pixels: Vec<f32> = img
        .data
        .iter()
        .zip(mask.data.iter())
        .filter_map(|(&v, &m)| m.then_some(v))
        .collect();
    let (mean, std) = mean_std(&tissue_pixels);
    Segmentation {
        mask,
        stats: TissueStats { mean, std },
        fallback,
    }
}
