//! Error taxonomy for pipeline construction.
//!
//! Sampling itself never fails: once a pipeline is built every span is
//! shaded. Construction rejects configurations the stages cannot express.

use crate::gamma::GammaType;
use crate::pixmap::ColorType;

/// Convenience result type used by fallible constructors.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors returned while building a sampling pipeline or describing a source.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// The configuration needs a feature the pipeline does not implement.
    #[error("not implemented: {0}")]
    Unsupported(#[from] Unsupported),

    /// The source pixel buffer does not match its description.
    #[error("invalid pixmap: {0}")]
    InvalidPixmap(String),
}

impl PipelineError {
    /// Build a [`PipelineError::InvalidPixmap`] value.
    pub fn invalid_pixmap(msg: impl Into<String>) -> Self {
        Self::InvalidPixmap(msg.into())
    }

    /// The unimplemented feature, if this is an unsupported-configuration error.
    pub fn unsupported(&self) -> Option<Unsupported> {
        match self {
            Self::Unsupported(u) => Some(*u),
            Self::InvalidPixmap(_) => None,
        }
    }
}

/// Features the sampling pipeline does not implement.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unsupported {
    /// Projective inverse transforms; sampling assumes straight source spans.
    #[error("perspective transforms")]
    Perspective,

    /// A source layout without a pixel converter.
    #[error("{color_type:?} source pixels with {gamma:?} gamma")]
    PixelFormat {
        color_type: ColorType,
        gamma: GammaType,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_display_names_feature() {
        let err = PipelineError::from(Unsupported::Perspective);
        assert_eq!(err.to_string(), "not implemented: perspective transforms");
        assert_eq!(err.unsupported(), Some(Unsupported::Perspective));
    }

    #[test]
    fn test_pixel_format_display() {
        let err = PipelineError::from(Unsupported::PixelFormat {
            color_type: ColorType::RgbaF16,
            gamma: GammaType::Srgb,
        });
        assert_eq!(
            err.to_string(),
            "not implemented: RgbaF16 source pixels with Srgb gamma"
        );
    }

    #[test]
    fn test_invalid_pixmap() {
        let err = PipelineError::invalid_pixmap("too short");
        assert_eq!(err.to_string(), "invalid pixmap: too short");
        assert_eq!(err.unsupported(), None);
    }
}
