//! Float color type used between the sampler and the placer.
//!
//! [`Color4f`] holds linear-light RGBA in `[0, 1]`. Whether it is
//! premultiplied depends on where it is in the pipeline: sampled source
//! colors carry the source's alpha type, placed colors are premultiplied.

use core::ops::{Add, Mul, Sub};

use crate::gamma::{linear_to_srgb_u8, linear_to_u8};

// ============================================================================
// Alpha type
// ============================================================================

/// How the color channels of a source relate to its alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlphaType {
    /// Every pixel has alpha 1.
    Opaque,
    /// Color channels are already scaled by alpha.
    #[default]
    Premul,
    /// Color channels are independent of alpha.
    Unpremul,
}

// ============================================================================
// Color4f
// ============================================================================

/// RGBA color with f32 components.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color4f {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color4f {
    pub const TRANSPARENT: Color4f = Color4f::new(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Color4f = Color4f::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color4f = Color4f::new(1.0, 1.0, 1.0, 1.0);
    pub const RED: Color4f = Color4f::new(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Color4f = Color4f::new(0.0, 1.0, 0.0, 1.0);
    pub const BLUE: Color4f = Color4f::new(0.0, 0.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v, v)
    }

    pub fn from_array(c: [f32; 4]) -> Self {
        Self::new(c[0], c[1], c[2], c[3])
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Scale the color channels by alpha; alpha is left untouched.
    #[inline]
    pub fn premultiply(self) -> Self {
        Self::new(self.r * self.a, self.g * self.a, self.b * self.a, self.a)
    }

    /// Encode as 8-bit sRGB bytes in RGBA order; alpha stays linear.
    pub fn to_srgb8(self) -> [u8; 4] {
        [
            linear_to_srgb_u8(self.r),
            linear_to_srgb_u8(self.g),
            linear_to_srgb_u8(self.b),
            linear_to_u8(self.a),
        ]
    }

    /// Encode as 8-bit linear bytes in RGBA order.
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            linear_to_u8(self.r),
            linear_to_u8(self.g),
            linear_to_u8(self.b),
            linear_to_u8(self.a),
        ]
    }

    /// Component-wise comparison within `eps`.
    pub fn approx_eq(&self, other: &Color4f, eps: f32) -> bool {
        (self.r - other.r).abs() <= eps
            && (self.g - other.g).abs() <= eps
            && (self.b - other.b).abs() <= eps
            && (self.a - other.a).abs() <= eps
    }
}

impl Add for Color4f {
    type Output = Color4f;

    #[inline]
    fn add(self, o: Color4f) -> Color4f {
        Color4f::new(self.r + o.r, self.g + o.g, self.b + o.b, self.a + o.a)
    }
}

impl Sub for Color4f {
    type Output = Color4f;

    #[inline]
    fn sub(self, o: Color4f) -> Color4f {
        Color4f::new(self.r - o.r, self.g - o.g, self.b - o.b, self.a - o.a)
    }
}

impl Mul<f32> for Color4f {
    type Output = Color4f;

    #[inline]
    fn mul(self, k: f32) -> Color4f {
        Color4f::new(self.r * k, self.g * k, self.b * k, self.a * k)
    }
}

// ============================================================================
// Tests
// ============================================================================
