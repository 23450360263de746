//! Source pixel description and read-only row access to a bitmap.
//!
//! A [`Pixmap`] borrows pixel bytes owned elsewhere (a decoded image, a
//! texture upload buffer) together with the metadata the sampler needs to
//! decode them: dimensions, stride, color type, alpha type, gamma tag and an
//! optional palette. Rows are addressed as `base + y * row_bytes`.

use crate::color::AlphaType;
use crate::error::{PipelineError, PipelineResult};
use crate::gamma::GammaType;

// ============================================================================
// Color types
// ============================================================================

/// Memory layout of one source pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorType {
    Unknown,
    /// 8-bit coverage, tinted by a solid color when sampled.
    Alpha8,
    /// 16-bit native-endian `rrrrrggg gggbbbbb`.
    Rgb565,
    /// 16-bit native-endian, R in the top nibble, A in the bottom.
    Argb4444,
    /// Bytes in R, G, B, A order.
    Rgba8888,
    /// Bytes in B, G, R, A order.
    Bgra8888,
    /// 8-bit palette index.
    Index8,
    /// 8-bit luminance.
    Gray8,
    /// Four native-endian half floats in R, G, B, A order.
    RgbaF16,
}

impl ColorType {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            ColorType::Unknown => 0,
            ColorType::Alpha8 | ColorType::Index8 | ColorType::Gray8 => 1,
            ColorType::Rgb565 | ColorType::Argb4444 => 2,
            ColorType::Rgba8888 | ColorType::Bgra8888 => 4,
            ColorType::RgbaF16 => 8,
        }
    }
}

// ============================================================================
// ImageInfo
// ============================================================================

/// Dimensions and encoding of a source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageInfo {
    pub width: i32,
    pub height: i32,
    pub color_type: ColorType,
    pub alpha_type: AlphaType,
    pub gamma: GammaType,
}

impl ImageInfo {
    pub fn new(
        width: i32,
        height: i32,
        color_type: ColorType,
        alpha_type: AlphaType,
        gamma: GammaType,
    ) -> Self {
        Self {
            width,
            height,
            color_type,
            alpha_type,
            gamma,
        }
    }

    /// Premultiplied, linear RGBA8888.
    pub fn rgba8888(width: i32, height: i32) -> Self {
        Self::new(
            width,
            height,
            ColorType::Rgba8888,
            AlphaType::Premul,
            GammaType::Linear,
        )
    }

    /// Minimum bytes per row.
    pub fn min_row_bytes(&self) -> usize {
        self.width.max(0) as usize * self.color_type.bytes_per_pixel()
    }
}

// ============================================================================
// Pixmap
// ============================================================================

/// Borrowed source pixels plus their description.
#[derive(Debug, Clone, Copy)]
pub struct Pixmap<'a> {
    info: ImageInfo,
    pixels: &'a [u8],
    row_bytes: usize,
    palette: Option<&'a [[u8; 4]]>,
}

impl<'a> Pixmap<'a> {
    /// Describe `pixels` as an image laid out with `row_bytes` per row.
    ///
    /// The last row only needs to hold `width` pixels.
    pub fn new(info: ImageInfo, pixels: &'a [u8], row_bytes: usize) -> PipelineResult<Self> {
        if info.width <= 0 || info.height <= 0 {
            return Err(PipelineError::invalid_pixmap(format!(
                "dimensions {}x{} are not positive",
                info.width, info.height
            )));
        }
        let min_row = info.min_row_bytes();
        if row_bytes < min_row {
            return Err(PipelineError::invalid_pixmap(format!(
                "row_bytes {} is less than {} bytes of pixels per row",
                row_bytes, min_row
            )));
        }
        let needed = row_bytes * (info.height as usize - 1) + min_row;
        if pixels.len() < needed {
            return Err(PipelineError::invalid_pixmap(format!(
                "buffer holds {} bytes, {} needed",
                pixels.len(),
                needed
            )));
        }
        Ok(Self {
            info,
            pixels,
            row_bytes,
            palette: None,
        })
    }

    /// Describe a tightly packed image.
    pub fn new_packed(info: ImageInfo, pixels: &'a [u8]) -> PipelineResult<Self> {
        Self::new(info, pixels, info.min_row_bytes())
    }

    /// Attach a palette of premultiplied RGBA entries for `Index8` sources.
    pub fn with_palette(mut self, palette: &'a [[u8; 4]]) -> PipelineResult<Self> {
        if palette.len() > 256 {
            return Err(PipelineError::invalid_pixmap(format!(
                "palette has {} entries, at most 256 allowed",
                palette.len()
            )));
        }
        self.palette = Some(palette);
        Ok(self)
    }

    pub fn info(&self) -> &ImageInfo {
        &self.info
    }

    pub fn width(&self) -> i32 {
        self.info.width
    }

    pub fn height(&self) -> i32 {
        self.info.height
    }

    pub fn color_type(&self) -> ColorType {
        self.info.color_type
    }

    pub fn alpha_type(&self) -> AlphaType {
        self.info.alpha_type
    }

    pub fn gamma(&self) -> GammaType {
        self.info.gamma
    }

    pub fn palette(&self) -> Option<&'a [[u8; 4]]> {
        self.palette
    }

    /// Bytes of row `y`, trimmed to `width` pixels.
    pub fn row_slice(&self, y: i32) -> &'a [u8] {
        assert!(
            y >= 0 && y < self.info.height,
            "row {} out of bounds (height={})",
            y,
            self.info.height
        );
        let start = y as usize * self.row_bytes;
        &self.pixels[start..start + self.info.min_row_bytes()]
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_per_pixel() {
        assert_eq!(ColorType::Alpha8.bytes_per_pixel(), 1);
        assert_eq!(ColorType::Rgb565.bytes_per_pixel(), 2);
        assert_eq!(ColorType::Bgra8888.bytes_per_pixel(), 4);
        assert_eq!(ColorType::RgbaF16.bytes_per_pixel(), 8);
    }

    #[test]
    fn test_row_slice_with_padding() {
        // 2x2 RGBA with 12 bytes per row, last row unpadded.
        let mut data = vec![0u8; 12 + 8];
        data[12] = 7;
        let pm = Pixmap::new(ImageInfo::rgba8888(2, 2), &data, 12).unwrap();
        assert_eq!(pm.row_slice(0).len(), 8);
        assert_eq!(pm.row_slice(1)[0], 7);
    }

    #[test]
    fn test_rejects_short_buffer() {
        let data = vec![0u8; 15];
        let err = Pixmap::new_packed(ImageInfo::rgba8888(2, 2), &data).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidPixmap(_)));
    }

    #[test]
    fn test_rejects_narrow_stride() {
        let data = vec![0u8; 64];
        assert!(Pixmap::new(ImageInfo::rgba8888(4, 2), &data, 12).is_err());
    }

    #[test]
    fn test_rejects_empty_dimensions() {
        let data = vec![0u8; 4];
        assert!(Pixmap::new_packed(ImageInfo::rgba8888(0, 1), &data).is_err());
    }

    #[test]
    fn test_palette() {
        let data = [0u8, 1, 1, 0];
        let palette = [[255, 0, 0, 255], [0, 0, 255, 255]];
        let info = ImageInfo::new(2, 2, ColorType::Index8, AlphaType::Premul, GammaType::Linear);
        let pm = Pixmap::new_packed(info, &data)
            .unwrap()
            .with_palette(&palette)
            .unwrap();
        assert_eq!(pm.palette().map(|p| p.len()), Some(2));
    }

    #[test]
    #[should_panic]
    fn test_row_out_of_bounds() {
        let data = vec![0u8; 16];
        let pm = Pixmap::new_packed(ImageInfo::rgba8888(2, 2), &data).unwrap();
        pm.row_slice(2);
    }
}
