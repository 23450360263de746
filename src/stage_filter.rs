//! Bilinear expansion stage.
//!
//! Turns each sample point into the 2x2 kernel around it. Present only for
//! [`FilterQuality::Low`](crate::linear_bitmap_pipeline::FilterQuality);
//! with no filtering the pipeline wires the matrix stage straight to the
//! tiler.

use crate::basics::F4;
use crate::span::{span_fallback, Span};
use crate::stage::{BilerpProcessor, PointProcessor};

/// Expands points into bilinear kernels for the next stage.
pub struct BilerpExpand<'s, N: ?Sized> {
    next: &'s mut N,
}

impl<'s, N: BilerpProcessor + ?Sized> BilerpExpand<'s, N> {
    pub fn new(next: &'s mut N) -> Self {
        Self { next }
    }

    #[inline]
    fn expand(&mut self, x: f32, y: f32) {
        self.next.bilerp_list(
            [x - 0.5, x + 0.5, x - 0.5, x + 0.5],
            [y - 0.5, y - 0.5, y + 0.5, y + 0.5],
        );
    }
}

impl<N: BilerpProcessor + ?Sized> PointProcessor for BilerpExpand<'_, N> {
    fn point_list_few(&mut self, n: usize, xs: F4, ys: F4) {
        for i in 0..n {
            self.expand(xs[i], ys[i]);
        }
    }

    fn point_list4(&mut self, xs: F4, ys: F4) {
        for i in 0..4 {
            self.expand(xs[i], ys[i]);
        }
    }

    // Neighbouring kernels overlap, so there is no span shortcut.
    fn point_span(&mut self, span: Span) {
        span_fallback(span, self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basics::Point;

    #[derive(Default)]
    struct Kernels(Vec<(F4, F4)>);

    impl PointProcessor for Kernels {
        fn point_list_few(&mut self, _n: usize, _xs: F4, _ys: F4) {
            panic!("expected kernels only");
        }

        fn point_list4(&mut self, _xs: F4, _ys: F4) {
            panic!("expected kernels only");
        }

        fn point_span(&mut self, _span: Span) {
            panic!("expected kernels only");
        }
    }

    impl BilerpProcessor for Kernels {
        fn bilerp_list(&mut self, xs: F4, ys: F4) {
            self.0.push((xs, ys));
        }
    }

    #[test]
    fn test_kernel_layout() {
        let mut k = Kernels::default();
        BilerpExpand::new(&mut k).point_list_few(1, [1.5, 0.0, 0.0, 0.0], [2.5, 0.0, 0.0, 0.0]);
        assert_eq!(k.0, vec![([1.0, 2.0, 1.0, 2.0], [2.0, 2.0, 3.0, 3.0])]);
    }

    #[test]
    fn test_one_kernel_per_point() {
        let mut k = Kernels::default();
        let mut stage = BilerpExpand::new(&mut k);
        stage.point_list4([0.5, 1.5, 2.5, 3.5], [0.5; 4]);
        stage.point_span(Span::new(Point::new(0.5, 0.5), 4.0, 5));
        assert_eq!(k.0.len(), 9);
        assert_eq!(k.0[8].0[0], 4.0);
    }
}
