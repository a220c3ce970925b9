//! Text watermark rendering.
//!
//! Text is drawn with the fixed 8x8 bitmap face from `font8x8` onto a
//! transparent canvas, then scaled with nearest-neighbor sampling to the
//! requested pixel height. Glyphs are hard-edged at every size; there is no
//! anti-aliasing.
//!
//! # Example
//!
//! ```
//! use genmark::watermark::text_renderer::{parse_hex_color, render_text, Color};
//!
//! assert_eq!(parse_hex_color("#00ff00").unwrap(), Color::new(0, 255, 0));
//!
//! let image = render_text("OK", 16, "#FFFFFF").unwrap();
//! assert_eq!(image.dimensions(), (32, 16));
//! ```

use super::image_loader::{resize_nearest, target_dimensions};
use super::WatermarkError;
use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{Rgba, RgbaImage};

/// Horizontal advance of every glyph in the bitmap face, in pixels.
pub const GLYPH_ADVANCE: u32 = 8;

/// Line height of the bitmap face; also its native pixel size.
pub const LINE_HEIGHT: u32 = 8;

/// Glyph drawn for characters the face does not cover.
const FALLBACK_GLYPH: char = '?';

/// RGBA color parsed from a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Fully opaque color.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }
}

/// Parse a `#RRGGBB` or `RRGGBB` hex color.
///
/// The result is always fully opaque; opacity is applied to the rendered
/// watermark later.
pub fn parse_hex_color(hex: &str) -> Result<Color, WatermarkError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);

    if digits.len() != 6 || !digits.is_ascii() {
        return Err(WatermarkError::InvalidColor(digits.to_string()));
    }

    let r = parse_channel(&digits[0..2], "red")?;
    let g = parse_channel(&digits[2..4], "green")?;
    let b = parse_channel(&digits[4..6], "blue")?;

    Ok(Color::new(r, g, b))
}

fn parse_channel(pair: &str, channel: &'static str) -> Result<u8, WatermarkError> {
    let invalid = || WatermarkError::InvalidColorChannel {
        channel,
        value: pair.to_string(),
    };

    // from_str_radix tolerates a leading '+', so check digits first
    if !pair.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    u8::from_str_radix(pair, 16).map_err(|_| invalid())
}

/// Width and height of `text` in the native face, in pixels.
pub fn measure_text(text: &str) -> (u32, u32) {
    let glyphs = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
    (glyphs.saturating_mul(GLYPH_ADVANCE), LINE_HEIGHT)
}

/// Render `text` at `size_px` pixels tall in the given hex color.
///
/// The output keeps the face's proportions: width and height are both
/// scaled by `size_px / LINE_HEIGHT`, rounded, and never below 1. Both the
/// native and the scaled canvas are checked against
/// [`MAX_WATERMARK_PIXELS`](super::image_loader::MAX_WATERMARK_PIXELS)
/// before anything is allocated.
pub fn render_text(text: &str, size_px: u32, color_hex: &str) -> Result<RgbaImage, WatermarkError> {
    let color = parse_hex_color(color_hex)?;

    let (native_width, native_height) = measure_text(text);
    target_dimensions(f64::from(native_width), f64::from(native_height))?;

    let factor = f64::from(size_px) / f64::from(LINE_HEIGHT);
    let (width, height) = target_dimensions(
        f64::from(native_width) * factor,
        f64::from(native_height) * factor,
    )?;

    let glyphs = draw_glyphs(text, color.to_rgba());
    if size_px == LINE_HEIGHT {
        return Ok(glyphs);
    }

    tracing::trace!(
        native_width,
        native_height,
        width,
        height,
        "Scaling rendered text"
    );

    Ok(resize_nearest(&glyphs, width, height))
}

/// Draw `text` left to right in the native face on a transparent canvas.
fn draw_glyphs(text: &str, color: Rgba<u8>) -> RgbaImage {
    let (width, height) = measure_text(text);
    let mut canvas = RgbaImage::new(width, height);

    for (index, ch) in text.chars().enumerate() {
        let glyph = BASIC_FONTS
            .get(ch)
            .or_else(|| BASIC_FONTS.get(FALLBACK_GLYPH))
            .unwrap_or([0; 8]);
        let origin_x = index as u32 * GLYPH_ADVANCE;

        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_ADVANCE {
                // Bit 0 is the leftmost pixel of the row
                if bits & (1u8 << col) != 0 {
                    canvas.put_pixel(origin_x + col, row as u32, color);
                }
            }
        }
    }

    canvas
}
