//! Tile stage: folds source coordinates back into the image.
//!
//! Each axis has its own [`TileMode`]. Points are tiled lane by lane. A
//! bilinear kernel is tiled at the pixel level: its weights come from the
//! untiled top-left corner and only the integer columns and rows it covers
//! are folded, so a reflected tile reads its neighbours in reflected order.
//! Spans get shortcuts where the mode allows one:
//!
//! - clamp splits a span into a stuck left part, an in-range middle and a
//!   stuck right part;
//! - repeat cuts a span at every tile edge it crosses, as long as it moves
//!   less than one tile per sample;
//! - mirror has no span shortcut and always tiles point by point.
//!
//! Pieces leave in destination order, so the placer sees every sample once.

use crate::basics::{fract, ifloor, Point, F4};
use crate::span::{span_fallback, Span};
use crate::stage::{BilerpProcessor, Kernel, KernelProcessor, PointProcessor};

// ============================================================================
// Tile functions
// ============================================================================

/// How coordinates outside `[0, dim)` are folded back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TileMode {
    /// Stick to the edge pixel.
    #[default]
    Clamp,
    /// Wrap around.
    Repeat,
    /// Wrap around, flipping every other tile.
    Mirror,
}

/// Clamp `x` to `[0, dim - 1]`.
#[inline]
pub fn clamp(x: f32, dim: f32) -> f32 {
    x.max(0.0).min(dim - 1.0)
}

/// Wrap `x` into `[0, dim)`.
#[inline]
pub fn repeat(x: f32, dim: f32) -> f32 {
    let mut r = x - (x / dim).floor() * dim;
    if r < 0.0 {
        r += dim;
    }
    if r >= dim {
        r -= dim;
    }
    r
}

/// Reflect `x` into `[0, dim)`.
#[inline]
pub fn mirror(x: f32, dim: f32) -> f32 {
    let r = ((x - dim).rem_euclid(2.0 * dim) - dim).abs();
    if r >= dim {
        below(dim)
    } else {
        r
    }
}

/// The largest float below a positive `v`.
#[inline]
fn below(v: f32) -> f32 {
    f32::from_bits(v.to_bits() - 1)
}

/// One axis of a [`Tiler`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileStrategy {
    mode: TileMode,
    size: i32,
    dim: f32,
}

impl TileStrategy {
    pub fn new(mode: TileMode, dim: i32) -> Self {
        debug_assert!(dim > 0, "tile dimension {} is not positive", dim);
        Self {
            mode,
            size: dim,
            dim: dim as f32,
        }
    }

    pub fn mode(&self) -> TileMode {
        self.mode
    }

    pub fn dim(&self) -> f32 {
        self.dim
    }

    #[inline]
    pub fn tile(&self, v: f32) -> f32 {
        match self.mode {
            TileMode::Clamp => clamp(v, self.dim),
            TileMode::Repeat => repeat(v, self.dim),
            TileMode::Mirror => mirror(v, self.dim),
        }
    }

    #[inline]
    pub fn tile4(&self, v: F4) -> F4 {
        [
            self.tile(v[0]),
            self.tile(v[1]),
            self.tile(v[2]),
            self.tile(v[3]),
        ]
    }

    /// Fold a pixel index into `[0, size)`.
    #[inline]
    pub fn tile_index(&self, i: i32) -> i32 {
        match self.mode {
            TileMode::Clamp => i.clamp(0, self.size - 1),
            TileMode::Repeat => i.rem_euclid(self.size),
            TileMode::Mirror => {
                let size = self.size as i64;
                let m = (i as i64).rem_euclid(2 * size);
                (if m < size { m } else { 2 * size - 1 - m }) as i32
            }
        }
    }

    /// The two pixel indices a kernel starting at `origin` covers, folded,
    /// and the weight of the second one.
    #[inline]
    pub fn fold_kernel(&self, origin: f32) -> ([i32; 2], f32) {
        let i = ifloor(origin);
        (
            [self.tile_index(i), self.tile_index(i.saturating_add(1))],
            fract(origin),
        )
    }
}

/// Independent X and Y tiling for one source image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tiler {
    x: TileStrategy,
    y: TileStrategy,
}

impl Tiler {
    pub fn new(tile_x: TileMode, tile_y: TileMode, width: i32, height: i32) -> Self {
        Self {
            x: TileStrategy::new(tile_x, width),
            y: TileStrategy::new(tile_y, height),
        }
    }

    pub fn x(&self) -> &TileStrategy {
        &self.x
    }

    pub fn y(&self) -> &TileStrategy {
        &self.y
    }
}

// ============================================================================
// Stage
// ============================================================================

/// A [`Tiler`] bound to the sampling stage that receives in-range points.
pub struct TileStage<'s, N: ?Sized> {
    tiler: &'s Tiler,
    next: &'s mut N,
}

impl<'s, N: KernelProcessor + ?Sized> TileStage<'s, N> {
    pub fn new(tiler: &'s Tiler, next: &'s mut N) -> Self {
        Self { tiler, next }
    }

    /// Forward a piece of a span on the tiled row `y`.
    #[inline]
    fn forward(&mut self, span: Span, y: f32) {
        if !span.is_empty() {
            let start = Point::new(span.start_x(), y);
            self.next.point_span(Span::new(start, span.length(), span.count()));
        }
    }

    /// Forward `span` with every sample stuck on column `x`.
    #[inline]
    fn forward_stuck(&mut self, mut span: Span, x: f32, y: f32) {
        if !span.is_empty() {
            span.clamp_to_single_pixel(Point::new(x, y));
            self.next.point_span(span);
        }
    }

    fn clamp_span(&mut self, span: Span, y: f32) {
        let dim = self.tiler.x.dim;
        if span.completely_within(0.0, dim) {
            self.forward(span, y);
            return;
        }
        let dx = span.dx();
        if dx == 0.0 {
            self.forward_stuck(span, clamp(span.start_x(), dim), y);
            return;
        }

        let mut rest = span;
        if dx > 0.0 {
            let left = rest.break_at(0.0, dx);
            self.forward_stuck(left, 0.0, y);
            let center = rest.break_at(dim, dx);
            self.forward(center, y);
            self.forward_stuck(rest, dim - 1.0, y);
        } else {
            let right = rest.break_at(dim, dx);
            self.forward_stuck(right, dim - 1.0, y);
            let center = rest.break_at(0.0, dx);
            self.forward(center, y);
            self.forward_stuck(rest, 0.0, y);
        }
    }

    /// Cut `span` at tile edges. Returns the unhandled remainder when the
    /// span moves too fast to cut.
    fn repeat_span(&mut self, span: Span, y: f32) -> Result<(), Span> {
        let dim = self.tiler.x.dim;
        let dx = span.dx();
        if dx.abs() >= dim {
            return Err(span);
        }

        let start = Point::new(repeat(span.start_x(), dim), span.start_y());
        let mut rest = Span::new(start, span.length(), span.count());
        if dx == 0.0 {
            self.forward(rest, y);
            return Ok(());
        }

        let (edge, wrap) = if dx > 0.0 { (dim, -dim) } else { (0.0, dim) };
        while !rest.is_empty() {
            let head = rest.break_at(edge, dx);
            if head.is_empty() {
                return Err(rest);
            }
            self.forward(head, y);
            rest.offset(wrap);
        }
        Ok(())
    }
}

impl<N: KernelProcessor + ?Sized> PointProcessor for TileStage<'_, N> {
    fn point_list_few(&mut self, n: usize, xs: F4, ys: F4) {
        self.next
            .point_list_few(n, self.tiler.x.tile4(xs), self.tiler.y.tile4(ys));
    }

    fn point_list4(&mut self, xs: F4, ys: F4) {
        self.next
            .point_list4(self.tiler.x.tile4(xs), self.tiler.y.tile4(ys));
    }

    fn point_span(&mut self, span: Span) {
        if span.is_empty() {
            return;
        }
        // Pieces carry the tiled row; the untiled span is what falls back.
        let y = self.tiler.y.tile(span.start_y());
        let unhandled = match self.tiler.x.mode {
            TileMode::Clamp => {
                self.clamp_span(span, y);
                Ok(())
            }
            TileMode::Repeat => self.repeat_span(span, y),
            TileMode::Mirror => Err(span),
        };
        if let Err(rest) = unhandled {
            span_fallback(rest, self);
        }
    }
}

impl<N: KernelProcessor + ?Sized> BilerpProcessor for TileStage<'_, N> {
    fn bilerp_list(&mut self, xs: F4, ys: F4) {
        let (columns, fx) = self.tiler.x.fold_kernel(xs[0]);
        let (rows, fy) = self.tiler.y.fold_kernel(ys[0]);
        self.next.bilerp_kernel(Kernel {
            columns,
            rows,
            fx,
            fy,
        });
    }
}

// ============================================================================
// Tests
// ============================================================================
