//! # rastkit
//!
//! Two self-contained pieces of a 2D rasterizer:
//!
//! - a **linear bitmap pipeline** that samples a source image through an
//!   affine inverse matrix, with clamp, repeat or mirror tiling per axis and
//!   optional bilinear filtering, producing linear premultiplied float
//!   colors one destination span at a time;
//! - **rectanizers**, online rectangle packers for texture atlases.
//!
//! ## Sampling
//!
//! ```
//! use rastkit::{
//!     Color4f, FilterQuality, ImageInfo, LinearBitmapPipeline, Pixmap, TileMode, TransAffine,
//! };
//!
//! let pixels = [255u8, 0, 0, 255, 0, 255, 0, 255];
//! let src = Pixmap::new_packed(ImageInfo::rgba8888(2, 1), &pixels)?;
//! let pipeline = LinearBitmapPipeline::new(
//!     &TransAffine::new(),
//!     FilterQuality::None,
//!     TileMode::Repeat,
//!     TileMode::Clamp,
//!     &src,
//! )?;
//! let mut row = [Color4f::TRANSPARENT; 4];
//! pipeline.shade_span_4f(0, 0, &mut row);
//! assert_eq!(row, [Color4f::RED, Color4f::GREEN, Color4f::RED, Color4f::GREEN]);
//! # Ok::<(), rastkit::PipelineError>(())
//! ```
//!
//! ## Packing
//!
//! ```
//! use rastkit::rectanizer::{self, Rectanizer};
//!
//! let mut atlas = rectanizer::factory(256, 256);
//! let loc = atlas.add_rect(32, 16).expect("fits");
//! assert_eq!((loc.x, loc.y), (0, 0));
//! ```

// Foundation types
pub mod basics;
pub mod color;
pub mod error;
pub mod gamma;
pub mod pixmap;
pub mod trans_affine;

// Sampling pipeline
pub mod linear_bitmap_pipeline;
pub mod pixel_accessor;
pub mod span;
pub mod stage;
pub mod stage_filter;
pub mod stage_matrix;
pub mod stage_place;
pub mod stage_sample;
pub mod stage_tile;

// Atlas packing
pub mod rectanizer;
pub mod rectanizer_optimized;
pub mod rectanizer_pow2;
pub mod rectanizer_skyline;

pub use basics::{IPoint16, Point};
pub use color::{AlphaType, Color4f};
pub use error::{PipelineError, PipelineResult, Unsupported};
pub use gamma::{GammaType, SrgbCurve};
pub use linear_bitmap_pipeline::{FilterQuality, LinearBitmapPipeline, PipelineOptions, TileMode};
pub use pixmap::{ColorType, ImageInfo, Pixmap};
pub use rectanizer::{Rectanizer, RectanizerKind};
pub use trans_affine::{MatrixKind, TransAffine};
