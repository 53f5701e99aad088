//! Borrowed views over decoded 8-bit pixel buffers.
//!
//! The analyzer consumes whatever a decoder hands it: plain grayscale or an
//! interleaved color layout. `RawImage` records the layout so the
//! preprocessor can collapse everything to luminance without the caller
//! converting first.

/// Channel layout of a decoded 8-bit pixel buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelLayout {
    Gray8,
    GrayAlpha8,
    Rgb8,
    Rgba8,
}

impl ChannelLayout {
    /// Bytes occupied by one pixel in this layout.
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            ChannelLayout::Gray8 => 1,
            ChannelLayout::GrayAlpha8 => 2,
            ChannelLayout::Rgb8 => 3,
            ChannelLayout::Rgba8 => 4,
        }
    }
}

/// Borrowed view over a decoded pixel buffer, rows tightly packed.
#[derive(Clone, Debug)]
pub struct RawImage<'a> {
    pub w: usize,
    pub h: usize,
    pub layout: ChannelLayout,
    pub data: &'a [u8],
}

impl<'a> RawImage<'a> {
    /// View over a buffer with an explicit channel layout.
    pub fn new(w: usize, h: usize, layout: ChannelLayout, data: &'a [u8]) -> Self {
        Self { w, h, layout, data }
    }

    /// Convenience view over a plain 8-bit grayscale buffer.
    pub fn gray(w: usize, h: usize, data: &'a [u8]) -> Self {
        Self::new(w, h, ChannelLayout::Gray8, data)
    }

    /// Number of bytes the layout requires for `w × h` pixels.
    #[inline]
    pub fn expected_len(&self) -> usize {
        self.w * self.h * self.layout.bytes_per_pixel()
    }

    /// Luminance of the pixel at (x, y), normalized to [0,1].
    ///
    /// Rec.601 weights for color layouts; alpha is ignored.
    #[inline]
    pub fn luminance(&self, x: usize, y: usize) -> f32 {
        let bpp = self.layout.bytes_per_pixel();
        let i = (y * self.w + x) * bpp;
        let lum = match self.layout {
            ChannelLayout::Gray8 | ChannelLayout::GrayAlpha8 => self.data[i] as f32,
            ChannelLayout::Rgb8 | ChannelLayout::Rgba8 => {
                0.299 * self.data[i] as f32
                    + 0.587 * self.data[i + 1] as f32
                    + 0.114 * self.data[i + 2] as f32
            }
        };
        lum / 255.0
    }
}
