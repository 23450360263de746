//! Foundation types shared by the sampling pipeline and the rectanizers.
//!
//! Points, batched scalar lanes and the rounding helpers every stage uses.
//! All sampling math is single precision.

// ============================================================================
// Lanes
// ============================================================================

/// Number of points carried by one batch through the pipeline.
pub const LANES: usize = 4;

/// Four scalars processed together.
pub type F4 = [f32; LANES];

/// Broadcast one scalar to every lane.
#[inline]
pub fn splat(v: f32) -> F4 {
    [v; LANES]
}

/// Lane-wise floor to integer pixel indices.
#[inline]
pub fn ifloor4(v: F4) -> [i32; LANES] {
    [ifloor(v[0]), ifloor(v[1]), ifloor(v[2]), ifloor(v[3])]
}

// ============================================================================
// Rounding
// ============================================================================

/// Floor toward negative infinity as a signed integer.
#[inline]
pub fn ifloor(v: f32) -> i32 {
    v.floor() as i32
}

/// Fractional part in `[0, 1)`, measured from the floor.
#[inline]
pub fn fract(v: f32) -> f32 {
    v - v.floor()
}

// ============================================================================
// Points
// ============================================================================

/// A point in source or destination space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Integer placement of a rectangle inside an atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IPoint16 {
    pub x: i16,
    pub y: i16,
}

impl IPoint16 {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ifloor() {
        assert_eq!(ifloor(0.0), 0);
        assert_eq!(ifloor(0.99), 0);
        assert_eq!(ifloor(-0.01), -1);
        assert_eq!(ifloor(-1.0), -1);
        assert_eq!(ifloor(2.5), 2);
    }

    #[test]
    fn test_fract() {
        assert_eq!(fract(1.25), 0.25);
        assert_eq!(fract(-0.25), 0.75);
        assert_eq!(fract(3.0), 0.0);
    }

    #[test]
    fn test_lanes() {
        assert_eq!(splat(1.5), [1.5; 4]);
        assert_eq!(ifloor4([0.5, -0.5, 1.0, 2.75]), [0, -1, 1, 2]);
    }
}
