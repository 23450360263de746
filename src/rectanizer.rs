//! Rectangle packing for texture atlases.
//!
//! A [`Rectanizer`] hands out non-overlapping spots for rectangles inside a
//! fixed-size atlas, one request at a time. Nothing is ever freed
//! individually: when the atlas is full the caller evicts everything with
//! [`Rectanizer::reset`] or moves on to a new atlas page.
//!
//! Three strategies are available:
//!
//! - [`RectanizerPow2`]: shelves of power-of-two height;
//! - [`RectanizerSkyline`]: a segment list tracing the top of the packed area;
//! - [`RectanizerOptimized`]: a per-column height profile, the densest of the
//!   three and the one [`factory`] returns.

use crate::basics::IPoint16;

pub use crate::rectanizer_optimized::RectanizerOptimized;
pub use crate::rectanizer_pow2::RectanizerPow2;
pub use crate::rectanizer_skyline::RectanizerSkyline;

/// Online packer of axis-aligned rectangles.
pub trait Rectanizer {
    fn width(&self) -> i32;

    fn height(&self) -> i32;

    /// Find a spot for a `width` x `height` rectangle and claim it.
    ///
    /// Returns the top-left corner, or `None` when the rectangle does not
    /// fit. A failed request leaves the packer untouched.
    fn add_rect(&mut self, width: i32, height: i32) -> Option<IPoint16>;

    /// Claimed area over atlas area. Space lost to fragmentation counts as
    /// free.
    fn percent_full(&self) -> f32;

    /// Forget every placed rectangle.
    fn reset(&mut self);
}

/// Packing strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RectanizerKind {
    Pow2,
    Skyline,
    #[default]
    Optimized,
}

/// The default packer for a `width` x `height` atlas.
pub fn factory(width: i32, height: i32) -> Box<dyn Rectanizer> {
    with_kind(RectanizerKind::Optimized, width, height)
}

/// A packer of the given kind for a `width` x `height` atlas.
pub fn with_kind(kind: RectanizerKind, width: i32, height: i32) -> Box<dyn Rectanizer> {
    match kind {
        RectanizerKind::Pow2 => Box::new(RectanizerPow2::new(width, height)),
        RectanizerKind::Skyline => Box::new(RectanizerSkyline::new(width, height)),
        RectanizerKind::Optimized => Box::new(RectanizerOptimized::new(width, height)),
    }
}

/// Panics unless `width` and `height` can address every placement.
pub(crate) fn check_atlas_size(width: i32, height: i32) {
    assert!(
        width > 0 && height > 0 && width <= i16::MAX as i32 && height <= i16::MAX as i32,
        "atlas size {}x{} outside 1..={}",
        width,
        height,
        i16::MAX
    );
}

/// Claimed area over atlas area.
#[inline]
pub(crate) fn fill_ratio(area_so_far: i32, width: i32, height: i32) -> f32 {
    area_so_far as f32 / (width as f32 * height as f32)
}
