/// Painted disc or spot: center, radius, 8-bit intensity.
pub struct Spot {
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
    pub value: u8,
}

/// Generates a uniform grayscale image.
pub fn uniform_u8(width: usize, height: usize, value: u8) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    vec![value; width * height]
}

/// Generates a dark background with filled discs painted in order.
///
/// Later spots overwrite earlier ones, so a bright lesion can be painted on
/// top of a tissue disc.
pub fn disc_phantom_u8(width: usize, height: usize, spots: &[Spot]) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");

    let mut img = vec![0u8; width * height];
    for spot in spots {
        assert!(spot.radius > 0.0, "spot radius must be positive");
        let r2 = spot.radius * spot.radius;
        for y in 0..height {
            for x in 0..width {
                let dx = x as f32 - spot.cx;
                let dy = y as f32 - spot.cy;
                if dx * dx + dy * dy < r2 {
                    img[y * width + x] = spot.value;
                }
            }
        }
    }
    img
}
