//! Transfer functions and channel decode tables.
//!
//! sRGB-tagged sources are linearized before any arithmetic happens
//! (bilinear weighting, premultiplication) and re-encoded only when the
//! caller stores 8-bit output. Two sRGB curves are available: the precise
//! piecewise IEC 61966-2-1 curve and a squared approximation that is cheaper
//! to invert.
//!
//! 8-bit channels are decoded through process-wide 256-entry tables that are
//! built once on first use and never change afterwards.

use std::sync::OnceLock;

// ============================================================================
// Gamma tags and curves
// ============================================================================

/// Transfer function a source is encoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GammaType {
    #[default]
    Linear,
    Srgb,
}

/// How sRGB-encoded values are converted to and from linear light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SrgbCurve {
    /// `v * v` to decode, `sqrt(v)` to encode.
    Squared,
    /// The piecewise sRGB curve.
    #[default]
    Precise,
}

impl SrgbCurve {
    /// Decode an sRGB value in `[0, 1]` to linear.
    #[inline]
    pub fn to_linear(self, v: f32) -> f32 {
        match self {
            SrgbCurve::Squared => srgb_to_linear_squared(v),
            SrgbCurve::Precise => srgb_to_linear(v),
        }
    }

    /// Encode a linear value in `[0, 1]` as sRGB.
    #[inline]
    pub fn from_linear(self, v: f32) -> f32 {
        match self {
            SrgbCurve::Squared => linear_to_srgb_squared(v),
            SrgbCurve::Precise => linear_to_srgb(v),
        }
    }

    /// The 256-entry table decoding sRGB bytes with this curve.
    pub fn table(self) -> &'static ChannelTable {
        match self {
            SrgbCurve::Squared => squared_srgb_table(),
            SrgbCurve::Precise => precise_srgb_table(),
        }
    }
}

// ============================================================================
// sRGB conversion functions
// ============================================================================

/// Convert an sRGB value (0..1) to linear.
#[inline]
pub fn srgb_to_linear(x: f32) -> f32 {
    if x <= 0.04045 {
        x / 12.92
    } else {
        ((x + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert a linear value (0..1) to sRGB.
#[inline]
pub fn linear_to_srgb(x: f32) -> f32 {
    if x <= 0.003_130_8 {
        x * 12.92
    } else {
        1.055 * x.powf(1.0 / 2.4) - 0.055
    }
}

/// Squared approximation of [`srgb_to_linear`].
#[inline]
pub fn srgb_to_linear_squared(x: f32) -> f32 {
    x * x
}

/// Inverse of [`srgb_to_linear_squared`].
#[inline]
pub fn linear_to_srgb_squared(x: f32) -> f32 {
    x.max(0.0).sqrt()
}

/// Encode a linear value as an 8-bit sRGB byte, clamping to `[0, 1]`.
#[inline]
pub fn linear_to_srgb_u8(x: f32) -> u8 {
    (linear_to_srgb(x.clamp(0.0, 1.0)) * 255.0 + 0.5) as u8
}

/// Encode a linear value as an 8-bit byte without a transfer function.
#[inline]
pub fn linear_to_u8(x: f32) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

// ============================================================================
// Channel tables
// ============================================================================

/// Byte-to-float lookup for one 8-bit channel.
pub type ChannelTable = [f32; 256];

static LINEAR_TABLE: OnceLock<ChannelTable> = OnceLock::new();
static PRECISE_SRGB_TABLE: OnceLock<ChannelTable> = OnceLock::new();
static SQUARED_SRGB_TABLE: OnceLock<ChannelTable> = OnceLock::new();

fn build_table(f: impl Fn(f32) -> f32) -> ChannelTable {
    let mut table = [0.0f32; 256];
    for (i, entry) in table.iter_mut().enumerate() {
        *entry = f(i as f32 / 255.0);
    }
    table
}

/// `i / 255` for every byte value.
pub fn linear_table() -> &'static ChannelTable {
    LINEAR_TABLE.get_or_init(|| build_table(|v| v))
}

/// Precise sRGB decode for every byte value.
pub fn precise_srgb_table() -> &'static ChannelTable {
    PRECISE_SRGB_TABLE.get_or_init(|| build_table(srgb_to_linear))
}

/// Squared sRGB decode for every byte value.
pub fn squared_srgb_table() -> &'static ChannelTable {
    SQUARED_SRGB_TABLE.get_or_init(|| build_table(srgb_to_linear_squared))
}

/// The table decoding color channels of a source with the given gamma.
pub fn channel_table(gamma: GammaType, curve: SrgbCurve) -> &'static ChannelTable {
    match gamma {
        GammaType::Linear => linear_table(),
        GammaType::Srgb => curve.table(),
    }
}

// ============================================================================
// Tests
// ============================================================================
