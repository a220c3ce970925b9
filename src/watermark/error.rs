//! Watermark error types.
//!
//! Validation faults are unit-like sentinels so callers can match on them
//! directly. Failures inside `apply` are wrapped in [`WatermarkError::Stage`]
//! naming the step that failed; [`WatermarkError::root`] unwraps that context.

use std::fmt;

/// The `apply` step an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validate,
    DecodeBase,
    RenderText,
    LoadImage,
    Encode,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Validate => write!(f, "invalid watermark configuration"),
            Stage::DecodeBase => write!(f, "failed to decode base image"),
            Stage::RenderText => write!(f, "failed to render text watermark"),
            Stage::LoadImage => write!(f, "failed to load image watermark"),
            Stage::Encode => write!(f, "failed to encode watermarked image"),
        }
    }
}

/// Errors that can occur while building or applying a watermark.
#[derive(Debug, thiserror::Error)]
pub enum WatermarkError {
    #[error("no watermark specified (neither text nor image)")]
    NoWatermark,

    #[error("cannot specify both text and image watermarks")]
    BothWatermarks,

    #[error("invalid watermark position: {0}")]
    InvalidPosition(String),

    #[error("opacity must be between 0.0 and 1.0: {0}")]
    InvalidOpacity(f64),

    #[error("scale must be between 0.1 and 1.0: {0}")]
    InvalidScale(f64),

    #[error("text size must be positive: {0}")]
    InvalidTextSize(i64),

    #[error("margin must be non-negative: {0}")]
    InvalidMargin(i64),

    #[error("base image is empty")]
    EmptyImage,

    #[error(
        "watermark of {width}x{height} pixels exceeds the limit of {} pixels",
        super::image_loader::MAX_WATERMARK_PIXELS
    )]
    WatermarkTooLarge { width: u64, height: u64 },

    #[error("unsupported image format: {0} (only PNG and JPEG are supported)")]
    UnsupportedFormat(String),

    #[error("invalid hex color format: {0} (expected format: #RRGGBB)")]
    InvalidColor(String),

    #[error("invalid {channel} component in hex color: {value:?}")]
    InvalidColorChannel { channel: &'static str, value: String },

    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to encode {format}: {source}")]
    Encode {
        format: &'static str,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to open watermark image: {0}")]
    Io(#[from] std::io::Error),

    #[error("{stage}: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<WatermarkError>,
    },
}

impl WatermarkError {
    /// Wrap this error with the step it came from.
    pub fn at(self, stage: Stage) -> Self {
        WatermarkError::Stage {
            stage,
            source: Box::new(self),
        }
    }

    /// The innermost error, with all stage context removed.
    pub fn root(&self) -> &WatermarkError {
        let mut current = self;
        while let WatermarkError::Stage { source, .. } = current {
            current = &**source;
        }
        current
    }

    /// The outermost stage, if this error carries one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            WatermarkError::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
