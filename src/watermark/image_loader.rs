//! Watermark image loading and nearest-neighbor scaling.
//!
//! Scaling copies the nearest source pixel with no interpolation. Edges of
//! scaled logos look blocky, especially when shrinking by large factors.
//! That is a known quality limit of this scaler.

use super::codec;
use super::WatermarkError;
use image::RgbaImage;
use std::path::Path;

/// Upper bound on the pixel count of a rendered or scaled watermark.
pub const MAX_WATERMARK_PIXELS: u64 = 64 * 1024 * 1024;

/// Load a PNG or JPEG watermark from disk as RGBA.
pub fn load_watermark_image(path: &Path) -> Result<RgbaImage, WatermarkError> {
    let data = std::fs::read(path)?;
    let decoded = codec::decode(&data)?;

    tracing::debug!(
        path = %path.display(),
        format = %decoded.format,
        width = decoded.image.width(),
        height = decoded.image.height(),
        "Loaded watermark image"
    );

    Ok(decoded.image.into_rgba8())
}

/// Scale a watermark to `base_width * scale` pixels wide, keeping its
/// aspect ratio. Both dimensions are at least 1.
///
/// Fails with [`WatermarkError::WatermarkTooLarge`] instead of allocating
/// when the target exceeds [`MAX_WATERMARK_PIXELS`].
pub fn scale_image(
    image: &RgbaImage,
    scale: f64,
    base_width: u32,
) -> Result<RgbaImage, WatermarkError> {
    let (src_width, src_height) = image.dimensions();

    let width = (f64::from(base_width) * scale).round().max(1.0);
    let height = if src_width == 0 {
        1.0
    } else {
        width * f64::from(src_height) / f64::from(src_width)
    };
    let (width, height) = target_dimensions(width, height)?;

    Ok(resize_nearest(image, width, height))
}

/// Round a floating-point target size to whole pixels (at least 1 each) and
/// check it against [`MAX_WATERMARK_PIXELS`].
pub(crate) fn target_dimensions(width: f64, height: f64) -> Result<(u32, u32), WatermarkError> {
    // Float to int casts saturate, so an oversized value stays oversized
    let width = (width.round() as u64).max(1);
    let height = (height.round() as u64).max(1);

    let within_limit = width
        .checked_mul(height)
        .is_some_and(|pixels| pixels <= MAX_WATERMARK_PIXELS);

    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) if within_limit => Ok((w, h)),
        _ => Err(WatermarkError::WatermarkTooLarge { width, height }),
    }
}

/// Nearest-neighbor resample to exactly `width` x `height`.
///
/// Each destination pixel copies source pixel
/// `(x * src_w / width, y * src_h / height)` using floor division.
/// An empty source yields a fully transparent canvas.
pub fn resize_nearest(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let (src_width, src_height) = image.dimensions();
    if src_width == 0 || src_height == 0 {
        return RgbaImage::new(width, height);
    }

    RgbaImage::from_fn(width, height, |x, y| {
        let src_x = (u64::from(x) * u64::from(src_width) / u64::from(width)) as u32;
        let src_y = (u64::from(y) * u64::from(src_height) / u64::from(height)) as u32;
        *image.get_pixel(src_x, src_y)
    })
}
