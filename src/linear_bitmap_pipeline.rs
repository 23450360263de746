//! Linear bitmap pipeline. Shades destination spans from a source image.
//!
//! A pipeline is assembled once from an inverse matrix, tiling, filtering
//! and a source [`Pixmap`], then shades any number of destination spans.
//! Points flow through up to five stages:
//!
//! ```text
//!   matrix -> [bilerp expand] -> tile -> sample -> place
//! ```
//!
//! The matrix stage is left out for identity matrices and the expansion
//! stage when filtering is off. Stages are plain values chosen at
//! construction; shading binds them to each other on the stack, so no
//! allocation happens per span. The only allocation is the decoded palette
//! of an `Index8` source.

use crate::basics::Point;
use crate::color::Color4f;
use crate::error::PipelineResult;
use crate::gamma::SrgbCurve;
use crate::pixmap::Pixmap;
use crate::span::Span;
use crate::stage::PointProcessor;
use crate::stage_filter::BilerpExpand;
use crate::stage_matrix::{MatrixStage, MatrixStrategy};
use crate::stage_place::{PixelPlacer, PlacerPolicy};
use crate::stage_sample::{SampleStage, Sampler};
use crate::stage_tile::{TileStage, Tiler};
use crate::trans_affine::TransAffine;

pub use crate::stage_tile::TileMode;

// ============================================================================
// Options
// ============================================================================

/// Source filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FilterQuality {
    /// Nearest neighbour.
    #[default]
    None,
    /// Bilinear.
    Low,
}

/// Construction-time settings of a [`LinearBitmapPipeline`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineOptions {
    pub filter_quality: FilterQuality,
    pub tile_x: TileMode,
    pub tile_y: TileMode,
    /// Decode curve for sRGB sources.
    pub srgb_curve: SrgbCurve,
    /// Color of `Alpha8` sources; its alpha is ignored.
    pub tint: Color4f,
    /// Paint alpha applied to every placed color.
    pub post_alpha: f32,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            filter_quality: FilterQuality::None,
            tile_x: TileMode::Clamp,
            tile_y: TileMode::Clamp,
            srgb_curve: SrgbCurve::Precise,
            tint: Color4f::BLACK,
            post_alpha: 1.0,
        }
    }
}

impl PipelineOptions {
    pub fn with_filter_quality(mut self, filter_quality: FilterQuality) -> Self {
        self.filter_quality = filter_quality;
        self
    }

    pub fn with_tile_modes(mut self, tile_x: TileMode, tile_y: TileMode) -> Self {
        self.tile_x = tile_x;
        self.tile_y = tile_y;
        self
    }

    pub fn with_srgb_curve(mut self, srgb_curve: SrgbCurve) -> Self {
        self.srgb_curve = srgb_curve;
        self
    }

    pub fn with_tint(mut self, tint: Color4f) -> Self {
        self.tint = tint;
        self
    }

    pub fn with_post_alpha(mut self, post_alpha: f32) -> Self {
        self.post_alpha = post_alpha;
        self
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Samples a source image through an inverse matrix into float colors.
#[derive(Debug, Clone)]
pub struct LinearBitmapPipeline<'a> {
    matrix: Option<MatrixStrategy>,
    filter_quality: FilterQuality,
    tiler: Tiler,
    sampler: Sampler<'a>,
    placer: PixelPlacer,
}

impl<'a> LinearBitmapPipeline<'a> {
    /// Build a pipeline with default options for everything but filtering
    /// and tiling.
    pub fn new(
        inverse: &TransAffine,
        filter_quality: FilterQuality,
        tile_x: TileMode,
        tile_y: TileMode,
        src: &Pixmap<'a>,
    ) -> PipelineResult<Self> {
        let options = PipelineOptions::default()
            .with_filter_quality(filter_quality)
            .with_tile_modes(tile_x, tile_y);
        Self::with_options(inverse, &options, src)
    }

    /// Build a pipeline.
    ///
    /// `inverse` maps destination coordinates to source coordinates.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Unsupported`](crate::PipelineError::Unsupported) for
    /// perspective matrices and source layouts without a decoder, and
    /// [`PipelineError::InvalidPixmap`](crate::PipelineError::InvalidPixmap)
    /// for an `Index8` source without a palette.
    #[tracing::instrument(
        level = "debug",
        skip(src),
        fields(width = src.width(), height = src.height(), color_type = ?src.color_type())
    )]
    pub fn with_options(
        inverse: &TransAffine,
        options: &PipelineOptions,
        src: &Pixmap<'a>,
    ) -> PipelineResult<Self> {
        let built = Self::build(inverse, options, src);
        match &built {
            Ok(pipeline) => tracing::debug!(
                matrix = ?pipeline.matrix,
                tile_x = ?options.tile_x,
                tile_y = ?options.tile_y,
                filter_quality = ?pipeline.filter_quality,
                placer = ?pipeline.placer.policy(),
                "built linear bitmap pipeline"
            ),
            Err(err) => tracing::warn!(error = %err, "rejected pipeline configuration"),
        }
        built
    }

    // Stages are chosen from the end of the chain back to its start.
    fn build(
        inverse: &TransAffine,
        options: &PipelineOptions,
        src: &Pixmap<'a>,
    ) -> PipelineResult<Self> {
        let placer = PixelPlacer::new(
            PlacerPolicy::for_alpha_type(src.alpha_type()),
            options.post_alpha,
        );
        let sampler = Sampler::new(src, options.srgb_curve, options.tint)?;
        let tiler = Tiler::new(options.tile_x, options.tile_y, src.width(), src.height());
        let matrix = MatrixStrategy::from_matrix(inverse)?;
        Ok(Self {
            matrix,
            filter_quality: options.filter_quality,
            tiler,
            sampler,
            placer,
        })
    }

    pub fn filter_quality(&self) -> FilterQuality {
        self.filter_quality
    }

    /// The matrix stage, or `None` when the inverse is the identity.
    pub fn matrix(&self) -> Option<&MatrixStrategy> {
        self.matrix.as_ref()
    }

    pub fn tiler(&self) -> &Tiler {
        &self.tiler
    }

    pub fn placer(&self) -> &PixelPlacer {
        &self.placer
    }

    /// Shade `dst.len()` pixels of destination row `y`, starting at column
    /// `x`. Every element of `dst` is written.
    pub fn shade_span_4f(&self, x: i32, y: i32, dst: &mut [Color4f]) {
        if dst.is_empty() {
            return;
        }
        let count = dst.len() as i32;
        let span = Span::new(
            Point::new(x as f32 + 0.5, y as f32 + 0.5),
            (count - 1) as f32,
            count,
        );

        let mut sink = self.placer.bind(dst);
        {
            let mut sample = SampleStage::new(&self.sampler, &mut sink);
            let mut tile = TileStage::new(&self.tiler, &mut sample);
            match self.filter_quality {
                FilterQuality::None => self.enter(span, &mut tile),
                FilterQuality::Low => self.enter(span, &mut BilerpExpand::new(&mut tile)),
            }
        }
        debug_assert_eq!(sink.written(), count as usize);
    }

    /// Hand `span` to the matrix stage, or straight to `next` without one.
    #[inline]
    fn enter<N: PointProcessor>(&self, span: Span, next: &mut N) {
        match &self.matrix {
            Some(strategy) => MatrixStage::new(strategy, next).point_span(span),
            None => next.point_span(span),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
