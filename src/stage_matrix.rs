//! Matrix stage: maps destination sample points into source space.
//!
//! The strategy is chosen once from the inverse matrix's [`MatrixKind`].
//! Identity matrices get no stage at all. Translate and scale-translate map
//! whole spans in constant time; a general affine matrix maps points only,
//! so its spans are expanded into point batches first.

use crate::basics::{Point, F4};
use crate::error::{PipelineResult, Unsupported};
use crate::span::{span_fallback, Span};
use crate::stage::PointProcessor;
use crate::trans_affine::{MatrixKind, TransAffine};

// ============================================================================
// Strategy
// ============================================================================

/// The cheapest exact mapping for a non-identity affine matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatrixStrategy {
    Translate {
        tx: f32,
        ty: f32,
    },
    ScaleTranslate {
        sx: f32,
        sy: f32,
        tx: f32,
        ty: f32,
    },
    Affine {
        sx: f32,
        shx: f32,
        tx: f32,
        shy: f32,
        sy: f32,
        ty: f32,
    },
}

impl MatrixStrategy {
    /// Pick the strategy for `m`. `Ok(None)` means identity: the stage is
    /// skipped.
    pub fn from_matrix(m: &TransAffine) -> PipelineResult<Option<Self>> {
        let strategy = match m.kind() {
            MatrixKind::Identity => None,
            MatrixKind::Translate => Some(MatrixStrategy::Translate { tx: m.tx, ty: m.ty }),
            MatrixKind::ScaleTranslate => Some(MatrixStrategy::ScaleTranslate {
                sx: m.sx,
                sy: m.sy,
                tx: m.tx,
                ty: m.ty,
            }),
            MatrixKind::Affine => Some(MatrixStrategy::Affine {
                sx: m.sx,
                shx: m.shx,
                tx: m.tx,
                shy: m.shy,
                sy: m.sy,
                ty: m.ty,
            }),
            MatrixKind::Perspective => return Err(Unsupported::Perspective.into()),
        };
        Ok(strategy)
    }

    /// Map a batch of four points.
    #[inline]
    pub fn map_points(&self, xs: F4, ys: F4) -> (F4, F4) {
        let mut ox = xs;
        let mut oy = ys;
        match *self {
            MatrixStrategy::Translate { tx, ty } => {
                for i in 0..4 {
                    ox[i] = xs[i] + tx;
                    oy[i] = ys[i] + ty;
                }
            }
            MatrixStrategy::ScaleTranslate { sx, sy, tx, ty } => {
                for i in 0..4 {
                    ox[i] = xs[i] * sx + tx;
                    oy[i] = ys[i] * sy + ty;
                }
            }
            MatrixStrategy::Affine {
                sx,
                shx,
                tx,
                shy,
                sy,
                ty,
            } => {
                for i in 0..4 {
                    ox[i] = xs[i] * sx + ys[i] * shx + tx;
                    oy[i] = xs[i] * shy + ys[i] * sy + ty;
                }
            }
        }
        (ox, oy)
    }

    /// Map a whole span, or `None` when the strategy cannot keep it
    /// horizontal.
    pub fn map_span(&self, span: Span) -> Option<Span> {
        let start = span.start();
        match *self {
            MatrixStrategy::Translate { tx, ty } => Some(Span::new(
                Point::new(start.x + tx, start.y + ty),
                span.length(),
                span.count(),
            )),
            MatrixStrategy::ScaleTranslate { sx, sy, tx, ty } => Some(Span::new(
                Point::new(start.x * sx + tx, start.y * sy + ty),
                span.length() * sx,
                span.count(),
            )),
            MatrixStrategy::Affine { .. } => None,
        }
    }
}

// ============================================================================
// Stage
// ============================================================================

/// A [`MatrixStrategy`] bound to the stage that receives mapped points.
pub struct MatrixStage<'s, N: ?Sized> {
    strategy: &'s MatrixStrategy,
    next: &'s mut N,
}

impl<'s, N: PointProcessor + ?Sized> MatrixStage<'s, N> {
    pub fn new(strategy: &'s MatrixStrategy, next: &'s mut N) -> Self {
        Self { strategy, next }
    }
}

impl<N: PointProcessor + ?Sized> PointProcessor for MatrixStage<'_, N> {
    fn point_list_few(&mut self, n: usize, xs: F4, ys: F4) {
        let (xs, ys) = self.strategy.map_points(xs, ys);
        self.next.point_list_few(n, xs, ys);
    }

    fn point_list4(&mut self, xs: F4, ys: F4) {
        let (xs, ys) = self.strategy.map_points(xs, ys);
        self.next.point_list4(xs, ys);
    }

    fn point_span(&mut self, span: Span) {
        match self.strategy.map_span(span) {
            Some(mapped) => self.next.point_span(mapped),
            None => span_fallback(span, self),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
