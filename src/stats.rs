//! Mean/std helpers shared by the pipeline stages.
//!
//! All statistics are population statistics (divide by n, not n-1) over f32
//! pixels. Variances are clamped at zero before the square root so rounding
//! can never produce NaN.

/// Variance/σ below this is treated as zero for all comparisons.
pub const EPSILON: f32 = 1e-6;

/// Mean and population standard deviation of a slice; (0, 0) when empty.
pub fn mean_std(values: &[f32]) -> (f32, f32) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f32;
    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for &v in values {
        sum += v as f64;
        sum_sq += (v as f64) * (v as f64);
    }
    let mean = sum / n as f64;
    let var = (sum_sq / n as f64 - mean * mean).max(0.0);
    (mean as f32, var.sqrt() as f32)
}

/// Clamp `v` into `[lo, hi]`.
#[inline]
pub fn clamp(v: f32, lo: f32, hi: f32) -> f32 {
    v.max(lo).min(hi)
}

/// Round to three decimal places for stable report output.
#[inline]
pub fn round3(v: f32) -> f32 {
    (v * 1000.0).round() / 1000.0
}
