//! Transformation matrix handed to the sampling pipeline.
//!
//! Single-precision 2D matrix with optional perspective terms. The pipeline
//! only samples through affine matrices; [`TransAffine::kind`] classifies a
//! matrix with exact comparisons so the cheapest matrix stage can be chosen.

use crate::basics::Point;

/// The cheapest exact description of a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixKind {
    Identity,
    Translate,
    ScaleTranslate,
    Affine,
    Perspective,
}

/// 2D transformation matrix.
///
/// Stores `[sx, shy, shx, sy, tx, ty]` plus the perspective row
/// `[w0, w1, w2]`, representing:
///
/// ```text
///   | sx  shx tx |
///   | shy  sy ty |
///   | w0   w1 w2 |
/// ```
///
/// Transform: `x' = x*sx + y*shx + tx`, `y' = x*shy + y*sy + ty`, both divided
/// by `w = x*w0 + y*w1 + w2` when perspective is present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransAffine {
    pub sx: f32,
    pub shy: f32,
    pub shx: f32,
    pub sy: f32,
    pub tx: f32,
    pub ty: f32,
    pub w0: f32,
    pub w1: f32,
    pub w2: f32,
}

impl TransAffine {
    // ====================================================================
    // Construction
    // ====================================================================

    /// Identity matrix.
    pub const fn new() -> Self {
        Self::new_custom(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Affine matrix from six components.
    pub const fn new_custom(sx: f32, shy: f32, shx: f32, sy: f32, tx: f32, ty: f32) -> Self {
        Self {
            sx,
            shy,
            shx,
            sy,
            tx,
            ty,
            w0: 0.0,
            w1: 0.0,
            w2: 1.0,
        }
    }

    /// Construct from `[sx, shy, shx, sy, tx, ty]`.
    pub fn from_array(m: &[f32; 6]) -> Self {
        Self::new_custom(m[0], m[1], m[2], m[3], m[4], m[5])
    }

    /// The six affine coefficients as `[sx, shy, shx, sy, tx, ty]`.
    pub fn to_array(&self) -> [f32; 6] {
        [self.sx, self.shy, self.shx, self.sy, self.tx, self.ty]
    }

    pub fn new_translation(x: f32, y: f32) -> Self {
        Self::new_custom(1.0, 0.0, 0.0, 1.0, x, y)
    }

    pub fn new_scaling(x: f32, y: f32) -> Self {
        Self::new_custom(x, 0.0, 0.0, y, 0.0, 0.0)
    }

    /// Rotation by `a` radians.
    pub fn new_rotation(a: f32) -> Self {
        let (sa, ca) = a.sin_cos();
        Self::new_custom(ca, sa, -sa, ca, 0.0, 0.0)
    }

    /// Skew by the tangents of `x` and `y` radians.
    pub fn new_skewing(x: f32, y: f32) -> Self {
        Self::new_custom(1.0, y.tan(), x.tan(), 1.0, 0.0, 0.0)
    }

    /// Replace the perspective row.
    pub fn with_perspective(mut self, w0: f32, w1: f32, w2: f32) -> Self {
        self.w0 = w0;
        self.w1 = w1;
        self.w2 = w2;
        self
    }

    // ====================================================================
    // Classification
    // ====================================================================

    pub fn has_perspective(&self) -> bool {
        self.w0 != 0.0 || self.w1 != 0.0 || self.w2 != 1.0
    }

    /// Classify the matrix. Comparisons are exact: a scale of `1.0 + 1e-7`
    /// is a scale.
    pub fn kind(&self) -> MatrixKind {
        if self.has_perspective() {
            MatrixKind::Perspective
        } else if self.shx != 0.0 || self.shy != 0.0 {
            MatrixKind::Affine
        } else if self.sx != 1.0 || self.sy != 1.0 {
            MatrixKind::ScaleTranslate
        } else if self.tx != 0.0 || self.ty != 0.0 {
            MatrixKind::Translate
        } else {
            MatrixKind::Identity
        }
    }

    pub fn is_identity(&self) -> bool {
        self.kind() == MatrixKind::Identity
    }

    // ====================================================================
    // Operations
    // ====================================================================

    /// Post-multiply: `self = self * m`, i.e. apply `self` first, then `m`.
    pub fn multiply(&mut self, m: &TransAffine) -> &mut Self {
        let a = *self;
        self.sx = m.sx * a.sx + m.shx * a.shy + m.tx * a.w0;
        self.shx = m.sx * a.shx + m.shx * a.sy + m.tx * a.w1;
        self.tx = m.sx * a.tx + m.shx * a.ty + m.tx * a.w2;
        self.shy = m.shy * a.sx + m.sy * a.shy + m.ty * a.w0;
        self.sy = m.shy * a.shx + m.sy * a.sy + m.ty * a.w1;
        self.ty = m.shy * a.tx + m.sy * a.ty + m.ty * a.w2;
        self.w0 = m.w0 * a.sx + m.w1 * a.shy + m.w2 * a.w0;
        self.w1 = m.w0 * a.shx + m.w1 * a.sy + m.w2 * a.w1;
        self.w2 = m.w0 * a.tx + m.w1 * a.ty + m.w2 * a.w2;
        self
    }

    /// Determinant of the 2x2 portion.
    #[inline]
    pub fn determinant(&self) -> f32 {
        self.sx * self.sy - self.shy * self.shx
    }

    /// Inverse of an affine matrix. `None` when the matrix is singular or
    /// projective.
    pub fn invert(&self) -> Option<TransAffine> {
        if self.has_perspective() {
            return None;
        }
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let d = 1.0 / det;
        let sx = self.sy * d;
        let sy = self.sx * d;
        let shy = -self.shy * d;
        let shx = -self.shx * d;
        let tx = -self.tx * sx - self.ty * shx;
        let ty = -self.tx * shy - self.ty * sy;
        Some(Self::new_custom(sx, shy, shx, sy, tx, ty))
    }

    // ====================================================================
    // Transformations
    // ====================================================================

    /// Forward transform: `(x, y) -> (x', y')`.
    #[inline]
    pub fn transform(&self, x: &mut f32, y: &mut f32) {
        let tmp = *x;
        let nx = tmp * self.sx + *y * self.shx + self.tx;
        let ny = tmp * self.shy + *y * self.sy + self.ty;
        if self.has_perspective() {
            let w = tmp * self.w0 + *y * self.w1 + self.w2;
            *x = nx / w;
            *y = ny / w;
        } else {
            *x = nx;
            *y = ny;
        }
    }

    /// Transform a point.
    #[inline]
    pub fn map_point(&self, p: Point) -> Point {
        let (mut x, mut y) = (p.x, p.y);
        self.transform(&mut x, &mut y);
        Point::new(x, y)
    }
}

impl Default for TransAffine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Mul for TransAffine {
    type Output = TransAffine;
    fn mul(self, rhs: TransAffine) -> TransAffine {
        let mut result = self;
        result.multiply(&rhs);
        result
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_identity() {
        let m = TransAffine::new();
        assert_eq!(m.kind(), MatrixKind::Identity);
        assert!(m.is_identity());
        assert_eq!(m.determinant(), 1.0);
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            TransAffine::new_translation(3.0, 0.0).kind(),
            MatrixKind::Translate
        );
        assert_eq!(
            TransAffine::new_scaling(2.0, 1.0).kind(),
            MatrixKind::ScaleTranslate
        );
        assert_eq!(
            TransAffine::new_custom(1.0, 0.5, 0.0, 1.0, 0.0, 0.0).kind(),
            MatrixKind::Affine
        );
        assert_eq!(
            TransAffine::new().with_perspective(0.001, 0.0, 1.0).kind(),
            MatrixKind::Perspective
        );
    }

    #[test]
    fn test_kind_uses_exact_comparison() {
        let nearly = TransAffine::new_scaling(1.0 + f32::EPSILON, 1.0);
        assert_eq!(nearly.kind(), MatrixKind::ScaleTranslate);
        let tiny_skew = TransAffine::new_custom(1.0, 1e-30, 0.0, 1.0, 0.0, 0.0);
        assert_eq!(tiny_skew.kind(), MatrixKind::Affine);
    }

    #[test]
    fn test_translation() {
        let m = TransAffine::new_translation(10.0, 20.0);
        let p = m.map_point(Point::new(5.0, 3.0));
        assert_eq!(p, Point::new(15.0, 23.0));
    }

    #[test]
    fn test_scaling() {
        let m = TransAffine::new_scaling(2.0, 3.0);
        let mut x = 5.0;
        let mut y = 4.0;
        m.transform(&mut x, &mut y);
        assert_eq!((x, y), (10.0, 12.0));
    }

    #[test]
    fn test_rotation_90() {
        let m = TransAffine::new_rotation(PI / 2.0);
        let p = m.map_point(Point::new(1.0, 0.0));
        assert!(p.x.abs() < EPS);
        assert!((p.y - 1.0).abs() < EPS);
    }

    #[test]
    fn test_multiply_translate_then_scale() {
        let mut m = TransAffine::new_translation(10.0, 0.0);
        m.multiply(&TransAffine::new_scaling(2.0, 2.0));
        let p = m.map_point(Point::new(1.0, 1.0));
        assert_eq!(p, Point::new(22.0, 2.0));
    }

    #[test]
    fn test_operator_mul() {
        let m = TransAffine::new_scaling(2.0, 2.0) * TransAffine::new_translation(1.0, 1.0);
        let p = m.map_point(Point::new(1.0, 1.0));
        assert_eq!(p, Point::new(3.0, 3.0));
    }

    #[test]
    fn test_invert() {
        let mut m = TransAffine::new_rotation(0.3);
        m.multiply(&TransAffine::new_translation(5.0, -2.0));
        let inv = m.invert().unwrap();
        let p = inv.map_point(m.map_point(Point::new(3.0, 7.0)));
        assert!((p.x - 3.0).abs() < EPS);
        assert!((p.y - 7.0).abs() < EPS);
    }

    #[test]
    fn test_invert_singular() {
        assert!(TransAffine::new_scaling(0.0, 1.0).invert().is_none());
        assert!(TransAffine::new()
            .with_perspective(0.1, 0.0, 1.0)
            .invert()
            .is_none());
    }

    #[test]
    fn test_perspective_transform() {
        let m = TransAffine::new().with_perspective(0.0, 0.0, 2.0);
        let p = m.map_point(Point::new(4.0, 6.0));
        assert_eq!(p, Point::new(2.0, 3.0));
    }

    #[test]
    fn test_skewing() {
        let m = TransAffine::new_skewing(PI / 4.0, 0.0);
        let p = m.map_point(Point::new(0.0, 1.0));
        assert!((p.x - 1.0).abs() < EPS);
        assert_eq!(m.kind(), MatrixKind::Affine);
    }

    #[test]
    fn test_array_roundtrip() {
        let m = TransAffine::from_array(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m.to_array(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert!(!m.has_perspective());
    }
}
