//! Sampling stage: fetches source pixels for tiled sample points.
//!
//! Without filtering each point reads the pixel it falls in. Spans take a
//! faster path chosen by how far the span moves per destination pixel:
//!
//! | rate | condition                   | strategy                            |
//! |------|-----------------------------|-------------------------------------|
//! | none | one sample or zero length   | one fetch, repeated                 |
//! | unit | `abs(length) == count - 1`  | walk one row, one pixel per sample  |
//! | slow | `abs(length) < count - 1`   | walk one row, refetch on new column |
//! | fast | otherwise                   | per-point batches                   |
//!
//! With bilinear filtering the sampler receives tiled 2x2 kernels and blends
//! the four pixels they name with the weights they carry.

use crate::basics::{ifloor, ifloor4, F4, LANES};
use crate::color::Color4f;
use crate::error::PipelineResult;
use crate::gamma::SrgbCurve;
use crate::pixel_accessor::{with_accessor, AnyAccessor, PixelAccessor, PixelConverter};
use crate::pixmap::{ColorType, Pixmap};
use crate::span::{span_fallback, Span};
use crate::stage::{BlendProcessor, Kernel, KernelProcessor, PointProcessor};

/// Blend the four pixels of a 2x2 kernel.
///
/// `px` holds the top-left, top-right, bottom-left and bottom-right pixels;
/// `fx` weights the right column and `fy` the bottom row.
#[inline]
pub fn bilerp4(fx: f32, fy: f32, px: [Color4f; 4]) -> Color4f {
    let fxy = fx * fy;
    px[3] * fxy + px[2] * (fy - fxy) + px[1] * (fx - fxy) + px[0] * (1.0 - fx - fy + fxy)
}

/// Decoded access to the source image.
#[derive(Debug, Clone)]
pub struct Sampler<'p> {
    accessor: AnyAccessor<'p>,
}

impl<'p> Sampler<'p> {
    pub fn new(src: &Pixmap<'p>, curve: SrgbCurve, tint: Color4f) -> PipelineResult<Self> {
        Ok(Self {
            accessor: AnyAccessor::new(src, curve, tint)?,
        })
    }

    pub fn color_type(&self) -> ColorType {
        self.accessor.color_type()
    }
}

/// Feed `n` colors produced by `fetch` to `next`, four at a time.
#[inline]
fn emit<B, F>(n: i32, next: &mut B, mut fetch: F)
where
    B: BlendProcessor + ?Sized,
    F: FnMut(i32) -> Color4f,
{
    let mut i = 0;
    while n - i >= LANES as i32 {
        let p0 = fetch(i);
        let p1 = fetch(i + 1);
        let p2 = fetch(i + 2);
        let p3 = fetch(i + 3);
        next.blend_4_pixels(p0, p1, p2, p3);
        i += LANES as i32;
    }
    while i < n {
        next.blend_pixel(fetch(i));
        i += 1;
    }
}

/// Nearest-neighbour span shortcuts. Returns false for spans that move
/// faster than one pixel per sample.
fn nearest_span<C, B>(a: &PixelAccessor<'_, C>, span: Span, next: &mut B) -> bool
where
    C: PixelConverter,
    B: BlendProcessor + ?Sized,
{
    let count = span.count();
    let row = a.row(ifloor(span.start_y()));
    let length = span.length();

    if count == 1 || length == 0.0 {
        let px = a.get_in_row(row, ifloor(span.start_x()));
        emit(count, next, |_| px);
        return true;
    }

    let steps = (count - 1) as f32;
    let start_x = span.start_x();
    let dx = span.dx();
    if length.abs() == steps {
        emit(count, next, |i| {
            a.get_in_row(row, ifloor(start_x + i as f32 * dx))
        });
        true
    } else if length.abs() < steps {
        let mut column = i32::MIN;
        let mut px = Color4f::TRANSPARENT;
        emit(count, next, |i| {
            let ix = ifloor(start_x + i as f32 * dx);
            if ix != column {
                column = ix;
                px = a.get_in_row(row, ix);
            }
            px
        });
        true
    } else {
        false
    }
}

/// A [`Sampler`] bound to the placer that receives its colors.
pub struct SampleStage<'s, 'p, B: ?Sized> {
    sampler: &'s Sampler<'p>,
    next: &'s mut B,
}

impl<'s, 'p, B: BlendProcessor + ?Sized> SampleStage<'s, 'p, B> {
    pub fn new(sampler: &'s Sampler<'p>, next: &'s mut B) -> Self {
        Self { sampler, next }
    }
}

impl<B: BlendProcessor + ?Sized> PointProcessor for SampleStage<'_, '_, B> {
    fn point_list_few(&mut self, n: usize, xs: F4, ys: F4) {
        let next = &mut *self.next;
        with_accessor!(&self.sampler.accessor, a => {
            for i in 0..n {
                next.blend_pixel(a.get(ifloor(xs[i]), ifloor(ys[i])));
            }
        })
    }

    fn point_list4(&mut self, xs: F4, ys: F4) {
        let next = &mut *self.next;
        with_accessor!(&self.sampler.accessor, a => {
            let [p0, p1, p2, p3] = a.get4(ifloor4(xs), ifloor4(ys));
            next.blend_4_pixels(p0, p1, p2, p3);
        })
    }

    fn point_span(&mut self, span: Span) {
        if span.is_empty() {
            return;
        }
        let next = &mut *self.next;
        let handled = with_accessor!(&self.sampler.accessor, a => nearest_span(a, span, next));
        if !handled {
            span_fallback(span, self);
        }
    }
}

impl<B: BlendProcessor + ?Sized> KernelProcessor for SampleStage<'_, '_, B> {
    fn bilerp_kernel(&mut self, kernel: Kernel) {
        let Kernel {
            columns: [c0, c1],
            rows: [r0, r1],
            fx,
            fy,
        } = kernel;
        let next = &mut *self.next;
        with_accessor!(&self.sampler.accessor, a => {
            let px = a.get4([c0, c1, c0, c1], [r0, r0, r1, r1]);
            next.blend_pixel(bilerp4(fx, fy, px));
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
