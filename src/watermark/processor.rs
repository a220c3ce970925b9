//! High-level watermark API.
//!
//! [`apply`] takes encoded base image bytes and a [`Config`], and returns
//! the watermarked image encoded in the same container format. Every call
//! works on freshly allocated images; nothing is cached between calls, so
//! concurrent callers need no coordination.
//!
//! # Example
//!
//! ```no_run
//! use genmark::watermark::{apply, Config};
//!
//! let base = std::fs::read("photo.png").unwrap();
//! let config = Config {
//!     position: "top-left".to_string(),
//!     opacity: 0.8,
//!     ..Config::text("Copyright 2025")
//! };
//! let watermarked = apply(&base, &config).unwrap();
//! ```

use super::codec::{self, DecodedImage};
use super::compositor::{apply_opacity, composite};
use super::image_loader::{load_watermark_image, scale_image};
use super::position::{calculate_position, is_visible, ImageDimensions, WatermarkDimensions};
use super::text_renderer::render_text;
use super::{Config, Stage, WatermarkError, WatermarkSource};
use image::{DynamicImage, RgbaImage};

/// Stamp the watermark described by `config` onto `base`.
///
/// Steps: validate, reject empty input, decode, build the watermark (text
/// or scaled image), apply opacity, place, blend over a copy of the base,
/// re-encode in the base's format. Errors carry the failing [`Stage`];
/// no partial output is returned.
///
/// Blending runs on 8-bit RGBA, so 16-bit and grayscale PNG bases come back
/// as 8-bit RGB, or RGBA if the base had alpha.
pub fn apply(base: &[u8], config: &Config) -> Result<Vec<u8>, WatermarkError> {
    let validated = config.validate().map_err(|e| e.at(Stage::Validate))?;

    if base.is_empty() {
        return Err(WatermarkError::EmptyImage);
    }

    let DecodedImage {
        image: base_image,
        format,
    } = codec::decode(base).map_err(|e| e.at(Stage::DecodeBase))?;

    let base_dims = ImageDimensions {
        width: base_image.width(),
        height: base_image.height(),
    };

    let watermark = build_watermark(&validated.source, base_dims.width)?;
    let watermark = apply_opacity(&watermark, validated.opacity);

    let wm_dims = WatermarkDimensions {
        width: watermark.width(),
        height: watermark.height(),
    };
    let position = calculate_position(validated.anchor, &base_dims, &wm_dims, validated.margin);

    tracing::debug!(
        format = %format,
        base_width = base_dims.width,
        base_height = base_dims.height,
        watermark_width = wm_dims.width,
        watermark_height = wm_dims.height,
        anchor = %validated.anchor,
        x = position.x,
        y = position.y,
        "Placing watermark"
    );

    if !is_visible(&position, &base_dims, &wm_dims) {
        tracing::warn!(
            x = position.x,
            y = position.y,
            "Watermark falls entirely outside the base image"
        );
    }

    let keep_alpha = base_image.color().has_alpha();
    let mut canvas = base_image.into_rgba8();
    composite(&mut canvas, &watermark, position);

    let result = if keep_alpha {
        DynamicImage::ImageRgba8(canvas)
    } else {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).into_rgb8())
    };

    codec::encode(&result, format).map_err(|e| e.at(Stage::Encode))
}

/// Render or load the watermark image for the configured source.
fn build_watermark(source: &WatermarkSource, base_width: u32) -> Result<RgbaImage, WatermarkError> {
    match source {
        WatermarkSource::Text {
            text,
            size_px,
            color,
        } => render_text(text, *size_px, color).map_err(|e| e.at(Stage::RenderText)),
        WatermarkSource::Image { path, scale } => {
            let loaded = load_watermark_image(path).map_err(|e| e.at(Stage::LoadImage))?;
            scale_image(&loaded, *scale, base_width).map_err(|e| e.at(Stage::LoadImage))
        }
    }
}
