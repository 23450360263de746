//! Pixel fetch and decode for every supported source layout.
//!
//! A [`PixelConverter`] turns the bytes of one source pixel into a linear
//! [`Color4f`]. A [`PixelAccessor`] pairs a converter with the rows of a
//! [`Pixmap`] and fetches pixels by integer column and row. The sampler does
//! not know the layout at compile time, so [`AnyAccessor`] holds one
//! accessor per layout and [`with_accessor!`] dispatches once per batch or
//! span rather than once per pixel.
//!
//! Color channels of 8-bit layouts decode through a shared
//! [`ChannelTable`] chosen from the source gamma; alpha always decodes
//! linearly.

use crate::color::Color4f;
use crate::error::{PipelineError, PipelineResult, Unsupported};
use crate::gamma::{channel_table, linear_table, ChannelTable, GammaType, SrgbCurve};
use crate::pixmap::{ColorType, Pixmap};

// ============================================================================
// Converters
// ============================================================================

/// Decodes one source pixel.
pub trait PixelConverter {
    const BYTES_PER_PIXEL: usize;

    /// Decode `px`, which holds exactly one pixel.
    fn to_color(&self, px: &[u8]) -> Color4f;
}

#[inline]
fn alpha8(a: u8) -> f32 {
    linear_table()[a as usize]
}

#[inline]
fn read_u16(px: &[u8]) -> u16 {
    u16::from_ne_bytes([px[0], px[1]])
}

/// Bytes in R, G, B, A order.
#[derive(Debug, Clone, Copy)]
pub struct Rgba8888 {
    table: &'static ChannelTable,
}

impl Rgba8888 {
    pub fn new(table: &'static ChannelTable) -> Self {
        Self { table }
    }
}

impl PixelConverter for Rgba8888 {
    const BYTES_PER_PIXEL: usize = 4;

    #[inline]
    fn to_color(&self, px: &[u8]) -> Color4f {
        let t = self.table;
        Color4f::new(
            t[px[0] as usize],
            t[px[1] as usize],
            t[px[2] as usize],
            alpha8(px[3]),
        )
    }
}

/// Bytes in B, G, R, A order.
#[derive(Debug, Clone, Copy)]
pub struct Bgra8888 {
    table: &'static ChannelTable,
}

impl Bgra8888 {
    pub fn new(table: &'static ChannelTable) -> Self {
        Self { table }
    }
}

impl PixelConverter for Bgra8888 {
    const BYTES_PER_PIXEL: usize = 4;

    #[inline]
    fn to_color(&self, px: &[u8]) -> Color4f {
        let t = self.table;
        Color4f::new(
            t[px[2] as usize],
            t[px[1] as usize],
            t[px[0] as usize],
            alpha8(px[3]),
        )
    }
}

/// 16-bit 5-6-5, always opaque.
#[derive(Debug, Clone, Copy)]
pub struct Rgb565 {
    table: &'static ChannelTable,
}

impl Rgb565 {
    pub fn new(table: &'static ChannelTable) -> Self {
        Self { table }
    }
}

impl PixelConverter for Rgb565 {
    const BYTES_PER_PIXEL: usize = 2;

    #[inline]
    fn to_color(&self, px: &[u8]) -> Color4f {
        let v = read_u16(px);
        let r = (v >> 11) & 0x1f;
        let g = (v >> 5) & 0x3f;
        let b = v & 0x1f;
        // Widen to 8 bits by replicating the high bits.
        let r8 = (r << 3) | (r >> 2);
        let g8 = (g << 2) | (g >> 4);
        let b8 = (b << 3) | (b >> 2);
        let t = self.table;
        Color4f::new(t[r8 as usize], t[g8 as usize], t[b8 as usize], 1.0)
    }
}

/// 16-bit 4-4-4-4 with R in the top nibble and A in the bottom.
#[derive(Debug, Clone, Copy)]
pub struct Argb4444 {
    table: &'static ChannelTable,
}

impl Argb4444 {
    pub fn new(table: &'static ChannelTable) -> Self {
        Self { table }
    }
}

impl PixelConverter for Argb4444 {
    const BYTES_PER_PIXEL: usize = 2;

    #[inline]
    fn to_color(&self, px: &[u8]) -> Color4f {
        let v = read_u16(px);
        let nibble = |shift: u16| (((v >> shift) & 0xf) * 17) as usize;
        let t = self.table;
        Color4f::new(
            t[nibble(12)],
            t[nibble(8)],
            t[nibble(4)],
            linear_table()[nibble(0)],
        )
    }
}

/// 8-bit palette index into a table decoded at construction.
#[derive(Debug, Clone)]
pub struct Index8 {
    colors: Box<[Color4f; 256]>,
}

impl Index8 {
    /// Decode `palette`; indices past its end read as transparent.
    pub fn new(palette: &[[u8; 4]], table: &'static ChannelTable) -> Self {
        let mut colors = Box::new([Color4f::TRANSPARENT; 256]);
        for (dst, p) in colors.iter_mut().zip(palette) {
            *dst = Color4f::new(
                table[p[0] as usize],
                table[p[1] as usize],
                table[p[2] as usize],
                alpha8(p[3]),
            );
        }
        Self { colors }
    }
}

impl PixelConverter for Index8 {
    const BYTES_PER_PIXEL: usize = 1;

    #[inline]
    fn to_color(&self, px: &[u8]) -> Color4f {
        self.colors[px[0] as usize]
    }
}

/// 8-bit luminance, always opaque.
#[derive(Debug, Clone, Copy)]
pub struct Gray8 {
    table: &'static ChannelTable,
}

impl Gray8 {
    pub fn new(table: &'static ChannelTable) -> Self {
        Self { table }
    }
}

impl PixelConverter for Gray8 {
    const BYTES_PER_PIXEL: usize = 1;

    #[inline]
    fn to_color(&self, px: &[u8]) -> Color4f {
        let g = self.table[px[0] as usize];
        Color4f::new(g, g, g, 1.0)
    }
}

/// 8-bit coverage applied to a solid tint.
#[derive(Debug, Clone, Copy)]
pub struct Alpha8 {
    tint: Color4f,
}

impl Alpha8 {
    /// The tint's own alpha is ignored.
    pub fn new(tint: Color4f) -> Self {
        Self {
            tint: Color4f::new(tint.r, tint.g, tint.b, 1.0),
        }
    }
}

impl PixelConverter for Alpha8 {
    const BYTES_PER_PIXEL: usize = 1;

    #[inline]
    fn to_color(&self, px: &[u8]) -> Color4f {
        self.tint * alpha8(px[0])
    }
}

/// Four half floats in R, G, B, A order, already linear.
#[derive(Debug, Clone, Copy, Default)]
pub struct RgbaF16;

impl PixelConverter for RgbaF16 {
    const BYTES_PER_PIXEL: usize = 8;

    #[inline]
    fn to_color(&self, px: &[u8]) -> Color4f {
        let h = |i: usize| half::f16::from_bits(read_u16(&px[i * 2..])).to_f32();
        Color4f::new(h(0), h(1), h(2), h(3))
    }
}

// ============================================================================
// Accessor
// ============================================================================

/// Fetches decoded pixels from a source image.
///
/// Column and row indices are clamped into the image.
#[derive(Debug, Clone)]
pub struct PixelAccessor<'p, C> {
    src: Pixmap<'p>,
    max_x: i32,
    max_y: i32,
    converter: C,
}

impl<'p, C: PixelConverter> PixelAccessor<'p, C> {
    pub fn new(src: &Pixmap<'p>, converter: C) -> Self {
        debug_assert_eq!(src.color_type().bytes_per_pixel(), C::BYTES_PER_PIXEL);
        Self {
            src: *src,
            max_x: src.width() - 1,
            max_y: src.height() - 1,
            converter,
        }
    }

    /// The pixels of row `y`, without row padding.
    #[inline]
    pub fn row(&self, y: i32) -> &'p [u8] {
        self.src.row_slice(y.clamp(0, self.max_y))
    }

    /// Decode column `x` of a row returned by [`row`](Self::row).
    #[inline]
    pub fn get_in_row(&self, row: &[u8], x: i32) -> Color4f {
        let offset = x.clamp(0, self.max_x) as usize * C::BYTES_PER_PIXEL;
        self.converter
            .to_color(&row[offset..offset + C::BYTES_PER_PIXEL])
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Color4f {
        self.get_in_row(self.row(y), x)
    }

    #[inline]
    pub fn get4(&self, xs: [i32; 4], ys: [i32; 4]) -> [Color4f; 4] {
        [
            self.get(xs[0], ys[0]),
            self.get(xs[1], ys[1]),
            self.get(xs[2], ys[2]),
            self.get(xs[3], ys[3]),
        ]
    }
}

/// An accessor for whichever layout the source uses.
#[derive(Debug, Clone)]
pub enum AnyAccessor<'p> {
    Alpha8(PixelAccessor<'p, Alpha8>),
    Rgb565(PixelAccessor<'p, Rgb565>),
    Argb4444(PixelAccessor<'p, Argb4444>),
    Rgba8888(PixelAccessor<'p, Rgba8888>),
    Bgra8888(PixelAccessor<'p, Bgra8888>),
    Index8(PixelAccessor<'p, Index8>),
    Gray8(PixelAccessor<'p, Gray8>),
    RgbaF16(PixelAccessor<'p, RgbaF16>),
}

impl<'p> AnyAccessor<'p> {
    /// Choose the accessor for `src`.
    ///
    /// `curve` decodes sRGB sources; `tint` colors alpha-only sources.
    pub fn new(src: &Pixmap<'p>, curve: SrgbCurve, tint: Color4f) -> PipelineResult<Self> {
        let gamma = src.gamma();
        let table = channel_table(gamma, curve);
        let accessor = match src.color_type() {
            ColorType::Alpha8 => AnyAccessor::Alpha8(PixelAccessor::new(src, Alpha8::new(tint))),
            ColorType::Rgb565 => AnyAccessor::Rgb565(PixelAccessor::new(src, Rgb565::new(table))),
            ColorType::Argb4444 => {
                AnyAccessor::Argb4444(PixelAccessor::new(src, Argb4444::new(table)))
            }
            ColorType::Rgba8888 => {
                AnyAccessor::Rgba8888(PixelAccessor::new(src, Rgba8888::new(table)))
            }
            ColorType::Bgra8888 => {
                AnyAccessor::Bgra8888(PixelAccessor::new(src, Bgra8888::new(table)))
            }
            ColorType::Index8 => {
                let palette = src.palette().ok_or_else(|| {
                    PipelineError::invalid_pixmap("Index8 source without a palette")
                })?;
                AnyAccessor::Index8(PixelAccessor::new(src, Index8::new(palette, table)))
            }
            ColorType::Gray8 => AnyAccessor::Gray8(PixelAccessor::new(src, Gray8::new(table))),
            ColorType::RgbaF16 if gamma == GammaType::Linear => {
                AnyAccessor::RgbaF16(PixelAccessor::new(src, RgbaF16))
            }
            color_type @ (ColorType::RgbaF16 | ColorType::Unknown) => {
                return Err(Unsupported::PixelFormat { color_type, gamma }.into());
            }
        };
        Ok(accessor)
    }

    pub fn color_type(&self) -> ColorType {
        match self {
            AnyAccessor::Alpha8(_) => ColorType::Alpha8,
            AnyAccessor::Rgb565(_) => ColorType::Rgb565,
            AnyAccessor::Argb4444(_) => ColorType::Argb4444,
            AnyAccessor::Rgba8888(_) => ColorType::Rgba8888,
            AnyAccessor::Bgra8888(_) => ColorType::Bgra8888,
            AnyAccessor::Index8(_) => ColorType::Index8,
            AnyAccessor::Gray8(_) => ColorType::Gray8,
            AnyAccessor::RgbaF16(_) => ColorType::RgbaF16,
        }
    }
}

/// Run `$body` with `$a` bound to the concrete accessor inside `$any`.
macro_rules! with_accessor {
    ($any:expr, $a:ident => $body:expr) => {
        match $any {
            $crate::pixel_accessor::AnyAccessor::Alpha8($a) => $body,
            $crate::pixel_accessor::AnyAccessor::Rgb565($a) => $body,
            $crate::pixel_accessor::AnyAccessor::Argb4444($a) => $body,
            $crate::pixel_accessor::AnyAccessor::Rgba8888($a) => $body,
            $crate::pixel_accessor::AnyAccessor::Bgra8888($a) => $body,
            $crate::pixel_accessor::AnyAccessor::Index8($a) => $body,
            $crate::pixel_accessor::AnyAccessor::Gray8($a) => $body,
            $crate::pixel_accessor::AnyAccessor::RgbaF16($a) => $body,
        }
    };
}

pub(crate) use with_accessor;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::AlphaType;
    use crate::pixmap::ImageInfo;

    fn info(w: i32, h: i32, ct: ColorType, gamma: GammaType) -> ImageInfo {
        ImageInfo::new(w, h, ct, AlphaType::Premul, gamma)
    }

    fn decode(ct: ColorType, gamma: GammaType, px: &[u8]) -> Color4f {
        let pm = Pixmap::new_packed(info(1, 1, ct, gamma), px).unwrap();
        let any = AnyAccessor::new(&pm, SrgbCurve::Precise, Color4f::WHITE).unwrap();
        with_accessor!(&any, a => a.get(0, 0))
    }

    #[test]
    fn test_rgba_and_bgra() {
        let px = [255, 0, 51, 255];
        let lin = GammaType::Linear;
        assert_eq!(
            decode(ColorType::Rgba8888, lin, &px),
            Color4f::new(1.0, 0.0, 0.2, 1.0)
        );
        assert_eq!(
            decode(ColorType::Bgra8888, lin, &px),
            Color4f::new(0.2, 0.0, 1.0, 1.0)
        );
    }

    #[test]
    fn test_srgb_decodes_color_not_alpha() {
        let c = decode(ColorType::Rgba8888, GammaType::Srgb, &[128, 128, 128, 128]);
        assert!((c.r - 0.2158605).abs() < 1e-4, "r={}", c.r);
        assert_eq!(c.a, 128.0 / 255.0);
    }

    #[test]
    fn test_565() {
        let red = 0xf800u16.to_ne_bytes();
        assert_eq!(
            decode(ColorType::Rgb565, GammaType::Linear, &red),
            Color4f::RED
        );
        let green = 0x07e0u16.to_ne_bytes();
        assert_eq!(
            decode(ColorType::Rgb565, GammaType::Linear, &green),
            Color4f::GREEN
        );
    }

    #[test]
    fn test_4444() {
        let px = 0xf00fu16.to_ne_bytes();
        assert_eq!(
            decode(ColorType::Argb4444, GammaType::Linear, &px),
            Color4f::RED
        );
        let half_alpha = 0x0008u16.to_ne_bytes();
        let c = decode(ColorType::Argb4444, GammaType::Linear, &half_alpha);
        assert_eq!(c.a, 136.0 / 255.0);
    }

    #[test]
    fn test_gray_and_alpha() {
        assert_eq!(
            decode(ColorType::Gray8, GammaType::Linear, &[255]),
            Color4f::WHITE
        );
        let pm = Pixmap::new_packed(info(1, 1, ColorType::Alpha8, GammaType::Linear), &[51])
            .unwrap();
        let tint = Color4f::new(1.0, 0.5, 0.0, 0.25);
        let any = AnyAccessor::new(&pm, SrgbCurve::Precise, tint).unwrap();
        let c = with_accessor!(&any, a => a.get(0, 0));
        assert!(c.approx_eq(&Color4f::new(0.2, 0.1, 0.0, 0.2), 1e-6));
    }

    #[test]
    fn test_index8() {
        let data = [1u8, 0, 2, 1];
        let palette = [[0, 0, 255, 255], [255, 0, 0, 255]];
        let pm = Pixmap::new_packed(info(2, 2, ColorType::Index8, GammaType::Linear), &data)
            .unwrap()
            .with_palette(&palette)
            .unwrap();
        let any = AnyAccessor::new(&pm, SrgbCurve::Precise, Color4f::BLACK).unwrap();
        let px = with_accessor!(&any, a => a.get4([0, 1, 0, 1], [0, 0, 1, 1]));
        assert_eq!(px, [Color4f::RED, Color4f::BLUE, Color4f::TRANSPARENT, Color4f::RED]);
    }

    #[test]
    fn test_index8_requires_palette() {
        let pm = Pixmap::new_packed(info(1, 1, ColorType::Index8, GammaType::Linear), &[0])
            .unwrap();
        let err = AnyAccessor::new(&pm, SrgbCurve::Precise, Color4f::BLACK).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidPixmap(_)));
    }

    #[test]
    fn test_f16() {
        let mut px = Vec::new();
        for v in [1.0f32, 0.5, 0.25, 1.0] {
            px.extend_from_slice(&half::f16::from_f32(v).to_bits().to_ne_bytes());
        }
        assert_eq!(
            decode(ColorType::RgbaF16, GammaType::Linear, &px),
            Color4f::new(1.0, 0.5, 0.25, 1.0)
        );
    }

    #[test]
    fn test_unsupported_layouts() {
        let px = [0u8; 8];
        let pm = Pixmap::new_packed(info(1, 1, ColorType::RgbaF16, GammaType::Srgb), &px).unwrap();
        let err = AnyAccessor::new(&pm, SrgbCurve::Precise, Color4f::BLACK).unwrap_err();
        assert_eq!(
            err.unsupported(),
            Some(Unsupported::PixelFormat {
                color_type: ColorType::RgbaF16,
                gamma: GammaType::Srgb
            })
        );
    }

    #[test]
    fn test_indices_clamped() {
        let data = [10u8, 20, 30, 40];
        let pm = Pixmap::new_packed(info(2, 2, ColorType::Gray8, GammaType::Linear), &data)
            .unwrap();
        let any = AnyAccessor::new(&pm, SrgbCurve::Precise, Color4f::BLACK).unwrap();
        let (a, b) = with_accessor!(&any, acc => (acc.get(-5, 0), acc.get(9, 9)));
        assert_eq!(a.r, 10.0 / 255.0);
        assert_eq!(b.r, 40.0 / 255.0);
    }

    #[test]
    fn test_padded_rows() {
        // 3x2 gray, 5 bytes per row.
        let data = [1u8, 2, 3, 99, 99, 4, 5, 6];
        let pm = Pixmap::new(info(3, 2, ColorType::Gray8, GammaType::Linear), &data, 5).unwrap();
        let any = AnyAccessor::new(&pm, SrgbCurve::Precise, Color4f::BLACK).unwrap();
        with_accessor!(&any, acc => {
            assert_eq!(acc.row(1), &[4, 5, 6]);
            assert_eq!(acc.row(7), acc.row(1));
            assert_eq!(acc.row(-1), &[1, 2, 3]);
            assert_eq!(acc.get(5, 0).r, 3.0 / 255.0);
        });
    }
}
