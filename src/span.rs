//! Horizontal runs of sample points.
//!
//! A [`Span`] stands for `count` destination pixels whose source-space
//! sample points lie on one horizontal line, evenly spaced from `start` over
//! `length`. Sample `i` sits at `start.x + i * dx` with
//! `dx = length / (count - 1)`; every stage that expands or splits a span
//! uses that formula so shortcuts and fallbacks agree sample for sample.
//!
//! A negative `length` walks right to left. Tile stages cleave spans at tile
//! edges with [`Span::break_at`] and hand the pieces on in destination order.

use crate::basics::{splat, Point, F4, LANES};
use crate::stage::PointProcessor;

/// A horizontal run of sample points in source space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    start: Point,
    length: f32,
    count: i32,
}

impl Span {
    pub fn new(start: Point, length: f32, count: i32) -> Self {
        debug_assert!(count >= 0, "negative span count {}", count);
        debug_assert!(length.is_finite(), "span length {} is not finite", length);
        Self {
            start,
            length,
            count,
        }
    }

    /// A span with no samples.
    pub const fn empty() -> Self {
        Self {
            start: Point::new(0.0, 0.0),
            length: 0.0,
            count: 0,
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn start_x(&self) -> f32 {
        self.start.x
    }

    pub fn start_y(&self) -> f32 {
        self.start.y
    }

    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn count(&self) -> i32 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Distance between neighbouring samples; zero for spans of fewer than
    /// two samples.
    #[inline]
    pub fn dx(&self) -> f32 {
        if self.count > 1 {
            self.length / (self.count - 1) as f32
        } else {
            0.0
        }
    }

    /// The x coordinate of the last sample.
    pub fn end_x(&self) -> f32 {
        self.start.x + self.length
    }

    #[inline]
    fn sample_x(&self, i: i32, dx: f32) -> f32 {
        self.start.x + i as f32 * dx
    }

    /// True when every sample lies in `[x_min, x_max)`.
    pub fn completely_within(&self, x_min: f32, x_max: f32) -> bool {
        let (lo, hi) = if self.length >= 0.0 {
            (self.start.x, self.end_x())
        } else {
            (self.end_x(), self.start.x)
        };
        lo >= x_min && hi < x_max
    }

    /// Move the span horizontally.
    pub fn offset(&mut self, offset_x: f32) {
        self.start.x += offset_x;
    }

    /// Collapse every sample onto `p`, keeping the count.
    pub fn clamp_to_single_pixel(&mut self, p: Point) {
        self.start = p;
        self.length = 0.0;
    }

    /// Remove every sample.
    pub fn clear(&mut self) {
        *self = Span::empty();
    }

    /// Cleave off the leading samples that come before `break_x` in the
    /// direction of travel and return them; `self` keeps the rest.
    ///
    /// For `dx > 0` the leading samples are those with `x < break_x`; for
    /// `dx < 0` those with `x >= break_x`. Either part may be empty.
    pub fn break_at(&mut self, break_x: f32, dx: f32) -> Span {
        debug_assert!(break_x.is_finite() && dx.is_finite() && dx != 0.0);
        if self.is_empty() {
            return Span::empty();
        }

        let before = |x: f32| if dx > 0.0 { x < break_x } else { x >= break_x };
        let estimate = if dx > 0.0 {
            ((break_x - self.start.x) / dx).ceil()
        } else {
            ((self.start.x - break_x) / -dx).floor() + 1.0
        };
        let mut k = estimate.max(0.0).min(self.count as f32) as i32;
        // The estimate can be off by one from rounding; settle it against the
        // actual sample positions.
        while k > 0 && !before(self.sample_x(k - 1, dx)) {
            k -= 1;
        }
        while k < self.count && before(self.sample_x(k, dx)) {
            k += 1;
        }

        if k == 0 {
            return Span::empty();
        }
        if k == self.count {
            let whole = *self;
            self.clear();
            return whole;
        }

        let head = Span::new(self.start, (k - 1) as f32 * dx, k);
        let rest = self.count - k;
        self.start.x = self.sample_x(k, dx);
        self.length = (rest - 1) as f32 * dx;
        self.count = rest;
        head
    }
}

/// Feed every sample of `span` to `next` as point batches: groups of four,
/// then the remainder.
pub fn span_fallback<P: PointProcessor + ?Sized>(span: Span, next: &mut P) {
    let count = span.count();
    let dx = span.dx();
    let ys = splat(span.start_y());
    let mut i = 0;
    while count - i >= LANES as i32 {
        let xs: F4 = [
            span.sample_x(i, dx),
            span.sample_x(i + 1, dx),
            span.sample_x(i + 2, dx),
            span.sample_x(i + 3, dx),
        ];
        next.point_list4(xs, ys);
        i += LANES as i32;
    }
    let n = (count - i) as usize;
    if n > 0 {
        let mut xs = splat(0.0);
        for (lane, x) in xs.iter_mut().enumerate().take(n) {
            *x = span.sample_x(i + lane as i32, dx);
        }
        next.point_list_few(n, xs, ys);
    }
}

// ============================================================================
// Tests
// ============================================================================
