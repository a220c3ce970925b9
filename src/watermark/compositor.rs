//! Watermark compositor for blending watermarks onto images.
//!
//! Blending uses the Porter-Duff "over" operator on alpha-premultiplied
//! channels widened to 16 bits (0..=65535), then converts back to straight
//! 8-bit RGBA. The part of the watermark that falls outside the target is
//! clipped, so any placement, including negative offsets, is safe.

use super::position::PlacementPosition;
use image::{Rgba, RgbaImage};

const MAX: u64 = 65535;

/// Return a copy of `image` with every alpha value multiplied by `opacity`.
///
/// RGB is left alone; the blend step attenuates color by alpha. `opacity`
/// is expected in `0.0..=1.0` and is clamped to that range.
pub fn apply_opacity(image: &RgbaImage, opacity: f64) -> RgbaImage {
    let factor = opacity.clamp(0.0, 1.0);
    let mut result = image.clone();

    for pixel in result.pixels_mut() {
        pixel[3] = (f64::from(pixel[3]) * factor).round() as u8;
    }

    result
}

/// Blend `watermark` onto `target` with its top-left corner at `position`.
///
/// Rows and columns of the watermark outside the target are skipped.
pub fn composite(target: &mut RgbaImage, watermark: &RgbaImage, position: PlacementPosition) {
    let target_width = i64::from(target.width());
    let target_height = i64::from(target.height());

    let wm_width = i64::from(watermark.width());
    let wm_height = i64::from(watermark.height());

    // Calculate the visible region (clamp to target bounds)
    let x_start = position.x.max(0);
    let y_start = position.y.max(0);
    let x_end = (position.x + wm_width).min(target_width);
    let y_end = (position.y + wm_height).min(target_height);

    for ty in y_start..y_end {
        for tx in x_start..x_end {
            let wx = (tx - position.x) as u32;
            let wy = (ty - position.y) as u32;

            let wm_pixel = watermark.get_pixel(wx, wy);
            let target_pixel = target.get_pixel_mut(tx as u32, ty as u32);

            *target_pixel = blend_pixels(*target_pixel, *wm_pixel);
        }
    }
}

/// Blend two straight-alpha pixels: `foreground` over `background`.
///
/// result = fg * fg_alpha + bg * (1 - fg_alpha), computed on premultiplied
/// 16-bit channels.
pub fn blend_pixels(background: Rgba<u8>, foreground: Rgba<u8>) -> Rgba<u8> {
    let fg_alpha = widen(foreground[3]);
    if fg_alpha == 0 {
        return background;
    }
    let bg_alpha = widen(background[3]);
    let inverse = MAX - fg_alpha;

    let out_alpha = fg_alpha + bg_alpha * inverse / MAX;
    if out_alpha == 0 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_premul = widen(fg) * fg_alpha / MAX;
        let bg_premul = widen(bg) * bg_alpha / MAX;
        let premul = fg_premul + bg_premul * inverse / MAX;
        narrow(premul * MAX / out_alpha)
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        narrow(out_alpha),
    ])
}

fn widen(value: u8) -> u64 {
    u64::from(value) * 257
}

fn narrow(value: u64) -> u8 {
    ((value.min(MAX) + 128) / 257) as u8
}
