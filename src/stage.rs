//! Capability interfaces implemented by the pipeline stages.
//!
//! Stages implement different subsets: every stage before the placer accepts
//! points and spans ([`PointProcessor`]); the tiler also accepts 2x2
//! bilinear kernels in source space ([`BilerpProcessor`]) and hands the
//! sampler tiled ones ([`KernelProcessor`]); only the placer accepts finished
//! colors ([`BlendProcessor`]).

use crate::basics::F4;
use crate::color::Color4f;
use crate::span::Span;

/// Accepts sample points, either as batches or as a [`Span`].
pub trait PointProcessor {
    /// Process the first `n` lanes of `xs`/`ys`, where `0 < n < 4`.
    fn point_list_few(&mut self, n: usize, xs: F4, ys: F4);

    /// Process four points.
    fn point_list4(&mut self, xs: F4, ys: F4);

    /// Process every sample of a non-empty span, in order.
    fn point_span(&mut self, span: Span);
}

/// Accepts the four sample points of one bilinear kernel.
pub trait BilerpProcessor: PointProcessor {
    /// Lanes hold the top-left, top-right, bottom-left and bottom-right
    /// points of the kernel, untiled. Produces exactly one color downstream.
    fn bilerp_list(&mut self, xs: F4, ys: F4);
}

/// A bilinear kernel after tiling.
///
/// The weights belong to the kernel's position in source space, not to the
/// folded pixel indices: in a mirrored tile `columns[1]` may lie left of
/// `columns[0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel {
    /// Left and right pixel columns, inside the image.
    pub columns: [i32; 2],
    /// Top and bottom pixel rows, inside the image.
    pub rows: [i32; 2],
    /// Weight of the right column.
    pub fx: f32,
    /// Weight of the bottom row.
    pub fy: f32,
}

/// Accepts tiled bilinear kernels.
pub trait KernelProcessor: PointProcessor {
    /// Produces exactly one color downstream.
    fn bilerp_kernel(&mut self, kernel: Kernel);
}

/// Accepts finished colors in destination order.
pub trait BlendProcessor {
    fn blend_pixel(&mut self, pixel: Color4f);

    fn blend_4_pixels(&mut self, p0: Color4f, p1: Color4f, p2: Color4f, p3: Color4f);
}
