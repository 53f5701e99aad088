//! Image preprocessing: luminance conversion, normalization, denoising.
//!
//! Collapses any supported channel layout to a single-channel f32 buffer in
//! [0,1] and applies a 5-tap separable binomial blur ([1,4,6,4,1]/16 with
//! replicate borders) to suppress sensor noise. Values remain in [0,1] because
//! the filter is a convex combination. Deterministic, no randomness.
use crate::error::AnalyzeError;
use crate::image::{ImageF32, RawImage};
use serde::Deserialize;

/// Knobs for input validation and denoising.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PreprocessOptions {
    /// Minimum width and height accepted for analysis.
    pub min_dimension: usize,
    /// Number of binomial blur passes applied after normalization.
    pub blur_passes: usize,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            min_dimension: 32,
            blur_passes: 1,
        }
    }
}

/// Validate, convert to normalized luminance, and denoise.
pub fn preprocess(raw: &RawImage, opts: &PreprocessOptions) -> Result<ImageF32, AnalyzeError> {
    if raw.w == 0 || raw.h == 0 {
        return Err(AnalyzeError::EmptyImage);
    }
    if raw.w < opts.min_dimension || raw.h < opts.min_dimension {
        return Err(AnalyzeError::ImageTooSmall {
            width: raw.w,
            height: raw.h,
            min: opts.min_dimension,
        });
    }
    let expected = raw.expected_len();
    if raw.data.len() != expected {
        return Err(AnalyzeError::BufferSizeMismatch {
            expected,
            actual: raw.data.len(),
        });
    }

    let mut img = ImageF32::new(raw.w, raw.h);
    for y in 0..raw.h {
        for x in 0..raw.w {
            img.set(x, y, raw.luminance(x, y));
        }
    }

    for _ in 0..opts.blur_passes {
        let mut out = ImageF32::new(img.w, img.h);
        binomial5_sep(&img, &mut out);
        img = out;
    }
    Ok(img)
}

/// 5-tap separable binomial blur (approx Gaussian, sigma ≈ 1).
fn binomial5_sep(inp: &ImageF32, out: &mut ImageF32) {
    // 1D kernel [1,4,6,4,1]/16 applied separably, replicate borders.
    let w = inp.w;
    let h = inp.h;
    let mut tmp = ImageF32::new(w, h);
    // horizontal
    for y in 0..h {
        for x in 0..w {
            let xm1 = x.saturating_sub(1);
            let xm2 = x.saturating_sub(2);
            let xp1 = (x + 1).min(w - 1);
            let xp2 = (x + 2).min(w - 1);
            let v = (inp.get(xm2, y)
                + 4.0 * inp.get(xm1, y)
                + 6.0 * inp.get(x, y)
                + 4.0 * inp.get(xp1, y)
                + inp.get(xp2, y))
                * (1.0 / 16.0);
            tmp.set(x, y, v);
        }
    }
    // vertical
    for y in 0..h {
        let ym1 = y.saturating_sub(1);
        let ym2 = y.saturating_sub(2);
        let yp1 = (y + 1).min(h - 1);
        let yp2 = (y + 2).min(h - 1);
        for x in 0..w {
            let v = (tmp.get(x, ym2)
                + 4.0 * tmp.get(x, ym1)
                + 6.0 * tmp.get(x, y)
                + 4.0 * tmp.get(x, yp1)
                + tmp.get(x, yp2))
                * (1.0 / 16.0);
            out.set(x, y, v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ChannelLayout;

    #[test]
    fn rejects_images_below_minimum_dimension() {
        let data = vec![0u8; 16 * 16];
        let raw = RawImage::gray(16, 16, &data);
        let err = preprocess(&raw, &PreprocessOptions::default()).unwrap_err();
        assert_eq!(
            err,
            AnalyzeError::ImageTooSmall {
                width: 16,
                height: 16,
                min: 32
            }
        );
    }

    #[test]
    fn rejects_mismatched_buffer_length() {
        let data = vec![0u8; 32 * 32];
        let raw = RawImage::new(32, 32, ChannelLayout::Rgb8, &data);
        let err = preprocess(&raw, &PreprocessOptions::default()).unwrap_err();
        assert!(matches!(err, AnalyzeError::BufferSizeMismatch { .. }));
    }

    #[test]
    fn uniform_input_stays_uniform_after_blur() {
        let data = vec![128u8; 64 * 64];
        let raw = RawImage::gray(64, 64, &data);
        let img = preprocess(&raw, &PreprocessOptions::default()).unwrap();
        let expected = 128.0 / 255.0;
        for &v in &img.data {
            assert!((v - expected).abs() < 1e-5);
        }
    }

    #[test]
    fn blur_smooths_an_impulse() {
        let mut data = vec![0u8; 64 * 64];
        data[32 * 64 + 32] = 255;
        let raw = RawImage::gray(64, 64, &data);
        let img = preprocess(&raw, &PreprocessOptions::default()).unwrap();
        let center = img.get(32, 32);
        let neighbor = img.get(33, 32);
        assert!(center < 1.0, "impulse should spread, got {center}");
        assert!(neighbor > 0.0);
        assert!(center > neighbor);
    }

    #[test]
    fn values_stay_normalized() {
        let data: Vec<u8> = (0..64u32 * 64).map(|i| (i % 256) as u8).collect();
        let raw = RawImage::gray(64, 64, &data);
        let img = preprocess(&raw, &PreprocessOptions::default()).unwrap();
        for &v in &img.data {
            assert!((0.0..=1.0).contains(&v));
        }
    }
}
