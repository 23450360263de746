//! Placing stage: writes finished colors into the destination span.

use crate::color::{AlphaType, Color4f};
use crate::stage::BlendProcessor;

/// What the placer does to a sampled color before storing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacerPolicy {
    /// The source is unpremultiplied: scale color by alpha.
    Premultiply,
    /// The source is premultiplied or opaque: store as is.
    Passthrough,
}

impl PlacerPolicy {
    pub fn for_alpha_type(alpha_type: AlphaType) -> Self {
        match alpha_type {
            AlphaType::Unpremul => PlacerPolicy::Premultiply,
            AlphaType::Premul | AlphaType::Opaque => PlacerPolicy::Passthrough,
        }
    }
}

/// Converts sampled colors to premultiplied output, then applies the paint
/// alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPlacer {
    policy: PlacerPolicy,
    post_alpha: f32,
}

impl PixelPlacer {
    pub fn new(policy: PlacerPolicy, post_alpha: f32) -> Self {
        Self { policy, post_alpha }
    }

    pub fn policy(&self) -> PlacerPolicy {
        self.policy
    }

    pub fn post_alpha(&self) -> f32 {
        self.post_alpha
    }

    #[inline]
    pub fn place(&self, c: Color4f) -> Color4f {
        let c = match self.policy {
            PlacerPolicy::Premultiply => c.premultiply(),
            PlacerPolicy::Passthrough => c,
        };
        c * self.post_alpha
    }

    /// Start writing at the beginning of `dst`.
    pub fn bind<'d>(&'d self, dst: &'d mut [Color4f]) -> PlacerSink<'d> {
        PlacerSink {
            placer: self,
            dst,
            cursor: 0,
        }
    }
}

/// A [`PixelPlacer`] writing into one destination span.
pub struct PlacerSink<'d> {
    placer: &'d PixelPlacer,
    dst: &'d mut [Color4f],
    cursor: usize,
}

impl PlacerSink<'_> {
    /// Number of pixels written so far.
    pub fn written(&self) -> usize {
        self.cursor
    }
}

impl BlendProcessor for PlacerSink<'_> {
    #[inline]
    fn blend_pixel(&mut self, pixel: Color4f) {
        self.dst[self.cursor] = self.placer.place(pixel);
        self.cursor += 1;
    }

    #[inline]
    fn blend_4_pixels(&mut self, p0: Color4f, p1: Color4f, p2: Color4f, p3: Color4f) {
        let out = &mut self.dst[self.cursor..self.cursor + 4];
        out[0] = self.placer.place(p0);
        out[1] = self.placer.place(p1);
        out[2] = self.placer.place(p2);
        out[3] = self.placer.place(p3);
        self.cursor += 4;
    }
}
