//! Watermark configuration types.
//!
//! A [`Config`] holds the raw parameters as they arrive from the CLI or a
//! YAML file. [`Config::validate`] checks them in a fixed order and produces
//! a [`ValidatedConfig`] with typed fields, which is what the rest of the
//! pipeline consumes.

use super::WatermarkError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

// Default values
fn default_position() -> String {
    Anchor::BottomRight.as_str().to_string()
}

fn default_margin() -> i64 {
    10
}

fn default_opacity() -> f64 {
    0.5
}

fn default_text_size() -> i64 {
    24
}

fn default_text_color() -> String {
    "#FFFFFF".to_string()
}

fn default_scale() -> f64 {
    0.2
}

/// Watermark anchor on the base image: the 9-grid of corners, edge
/// midpoints and center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    LeftCenter,
    Center,
    RightCenter,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Default for Anchor {
    fn default() -> Self {
        Anchor::BottomRight
    }
}

impl Anchor {
    pub const ALL: [Anchor; 9] = [
        Anchor::TopLeft,
        Anchor::TopCenter,
        Anchor::TopRight,
        Anchor::LeftCenter,
        Anchor::Center,
        Anchor::RightCenter,
        Anchor::BottomLeft,
        Anchor::BottomCenter,
        Anchor::BottomRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::TopRight => "top-right",
            Self::LeftCenter => "left-center",
            Self::Center => "center",
            Self::RightCenter => "right-center",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
            Self::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Anchor {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Anchor::ALL
            .iter()
            .copied()
            .find(|anchor| anchor.as_str() == s)
            .ok_or_else(|| WatermarkError::InvalidPosition(s.to_string()))
    }
}

/// Raw watermark parameters.
///
/// Exactly one of `text` and `image` must be set. Numeric fields are signed
/// so that out-of-range input survives until validation reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Text to stamp onto the image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Path to a PNG or JPEG file to stamp onto the image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<PathBuf>,

    /// Anchor name (default: "bottom-right")
    #[serde(default = "default_position")]
    pub position: String,

    /// Distance from the anchored edges in pixels (default: 10)
    #[serde(default = "default_margin")]
    pub margin: i64,

    /// 0.0 (transparent) to 1.0 (opaque) (default: 0.5)
    #[serde(default = "default_opacity")]
    pub opacity: f64,

    /// Rendered text height in pixels (default: 24)
    #[serde(default = "default_text_size")]
    pub text_size: i64,

    /// Text color as hex, "#RRGGBB" or "RRGGBB" (default: "#FFFFFF")
    #[serde(default = "default_text_color")]
    pub text_color: String,

    /// Image watermark width as a fraction of the base width, 0.1 to 1.0
    /// (default: 0.2)
    #[serde(default = "default_scale")]
    pub scale: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            text: None,
            image: None,
            position: default_position(),
            margin: default_margin(),
            opacity: default_opacity(),
            text_size: default_text_size(),
            text_color: default_text_color(),
            scale: default_scale(),
        }
    }
}

/// What gets stamped.
#[derive(Debug, Clone, PartialEq)]
pub enum WatermarkSource {
    Text {
        text: String,
        size_px: u32,
        color: String,
    },
    Image {
        path: PathBuf,
        scale: f64,
    },
}

/// A configuration that passed [`Config::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    pub source: WatermarkSource,
    pub anchor: Anchor,
    pub margin: u32,
    pub opacity: f64,
}

impl Config {
    /// Text watermark with default styling.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Image watermark with default styling.
    pub fn image(path: impl Into<PathBuf>) -> Self {
        Self {
            image: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn is_text_watermark(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn is_image_watermark(&self) -> bool {
        self.image
            .as_deref()
            .is_some_and(|p| !p.as_os_str().is_empty())
    }

    /// Check the configuration and return its typed form.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// watermark source presence, source exclusivity, position, opacity,
    /// scale, text size, margin.
    pub fn validate(&self) -> Result<ValidatedConfig, WatermarkError> {
        let has_text = self.is_text_watermark();
        let has_image = self.is_image_watermark();

        if !has_text && !has_image {
            return Err(WatermarkError::NoWatermark);
        }
        if has_text && has_image {
            return Err(WatermarkError::BothWatermarks);
        }

        let anchor: Anchor = self.position.parse()?;

        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(WatermarkError::InvalidOpacity(self.opacity));
        }

        if !(0.1..=1.0).contains(&self.scale) {
            return Err(WatermarkError::InvalidScale(self.scale));
        }

        let size_px = u32::try_from(self.text_size)
            .ok()
            .filter(|size| *size > 0)
            .ok_or(WatermarkError::InvalidTextSize(self.text_size))?;

        let margin =
            u32::try_from(self.margin).map_err(|_| WatermarkError::InvalidMargin(self.margin))?;

        let source = match (&self.text, &self.image) {
            (Some(text), _) if has_text => WatermarkSource::Text {
                text: text.clone(),
                size_px,
                color: self.text_color.clone(),
            },
            (_, Some(path)) => WatermarkSource::Image {
                path: path.clone(),
                scale: self.scale,
            },
            _ => return Err(WatermarkError::NoWatermark),
        };

        Ok(ValidatedConfig {
            source,
            anchor,
            margin,
            opacity: self.opacity,
        })
    }
}
