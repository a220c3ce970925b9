//! Watermark module for stamping text and image watermarks onto images.
//!
//! The entry point is [`apply`], which takes encoded PNG or JPEG bytes and a
//! [`Config`] and returns the watermarked image in the same format.
//!
//! # Features
//!
//! - **Text watermarks** drawn with a fixed 8x8 bitmap face and scaled to
//!   the requested pixel height
//! - **Image watermarks** loaded from a PNG or JPEG file and scaled to a
//!   fraction of the base image width
//! - **9 anchor positions** (corners, edge midpoints, center) with margin
//! - **Opacity** applied to the watermark's alpha channel before blending
//!
//! All scaling is nearest-neighbor.
//!
//! # Configuration Example
//!
//! ```yaml
//! watermark:
//!   text: "Copyright 2025"
//!   position: bottom-right
//!   margin: 10
//!   opacity: 0.5
//!   text_size: 24
//!   text_color: "#FFFFFF"
//! ```

pub mod codec;
pub mod compositor;
pub mod config;
pub mod error;
pub mod image_loader;
pub mod position;
pub mod processor;
pub mod text_renderer;

// Re-export main types for convenience
pub use codec::{decode, encode, sniff_format, DecodedImage, Format, JPEG_QUALITY};
pub use compositor::{apply_opacity, blend_pixels, composite};
pub use config::{Anchor, Config, ValidatedConfig, WatermarkSource};
pub use error::{Stage, WatermarkError};
pub use image_loader::{load_watermark_image, resize_nearest, scale_image};
pub use position::{
    calculate_position, is_visible, ImageDimensions, PlacementPosition, WatermarkDimensions,
};
pub use processor::apply;
pub use text_renderer::{measure_text, parse_hex_color, render_text, Color};
