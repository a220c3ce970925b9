//! Position calculation for watermark placement.
//!
//! Maps an [`Anchor`] to the top-left corner where the watermark should be
//! drawn. No clamping happens here: a watermark larger than the base image,
//! or a margin larger than the free space, yields negative or off-canvas
//! coordinates and the compositor clips the overlap.
//!
//! # Example
//!
//! ```
//! use genmark::watermark::position::{calculate_position, ImageDimensions, WatermarkDimensions};
//! use genmark::watermark::Anchor;
//!
//! let image = ImageDimensions { width: 800, height: 600 };
//! let watermark = WatermarkDimensions { width: 100, height: 50 };
//!
//! let pos = calculate_position(Anchor::BottomRight, &image, &watermark, 10);
//! assert_eq!((pos.x, pos.y), (690, 540)); // 800 - 100 - 10, 600 - 50 - 10
//! ```

use super::Anchor;

/// Dimensions of the target image.
#[derive(Debug, Clone, Copy)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Dimensions of the watermark to be placed.
#[derive(Debug, Clone, Copy)]
pub struct WatermarkDimensions {
    pub width: u32,
    pub height: u32,
}

/// Top-left corner of a placed watermark, in base image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementPosition {
    pub x: i64,
    pub y: i64,
}

impl PlacementPosition {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Calculate where a watermark goes for the given anchor.
///
/// Centered axes use `(base - watermark) / 2`, truncated toward zero.
/// Coordinates may be negative if the watermark is larger than the image.
pub fn calculate_position(
    anchor: Anchor,
    image: &ImageDimensions,
    watermark: &WatermarkDimensions,
    margin: u32,
) -> PlacementPosition {
    let img_w = i64::from(image.width);
    let img_h = i64::from(image.height);
    let wm_w = i64::from(watermark.width);
    let wm_h = i64::from(watermark.height);
    let m = i64::from(margin);

    let center_x = (img_w - wm_w) / 2;
    let center_y = (img_h - wm_h) / 2;
    let right = img_w - wm_w - m;
    let bottom = img_h - wm_h - m;

    match anchor {
        // Top row
        Anchor::TopLeft => PlacementPosition::new(m, m),
        Anchor::TopCenter => PlacementPosition::new(center_x, m),
        Anchor::TopRight => PlacementPosition::new(right, m),

        // Center row
        Anchor::LeftCenter => PlacementPosition::new(m, center_y),
        Anchor::Center => PlacementPosition::new(center_x, center_y),
        Anchor::RightCenter => PlacementPosition::new(right, center_y),

        // Bottom row
        Anchor::BottomLeft => PlacementPosition::new(m, bottom),
        Anchor::BottomCenter => PlacementPosition::new(center_x, bottom),
        Anchor::BottomRight => PlacementPosition::new(right, bottom),
    }
}

/// Check if a position is at least partially visible within the image.
pub fn is_visible(
    pos: &PlacementPosition,
    image: &ImageDimensions,
    watermark: &WatermarkDimensions,
) -> bool {
    let wm_right = pos.x + i64::from(watermark.width);
    let wm_bottom = pos.y + i64::from(watermark.height);

    pos.x < i64::from(image.width)
        && pos.y < i64::from(image.height)
        && wm_right > 0
        && wm_bottom > 0
}
