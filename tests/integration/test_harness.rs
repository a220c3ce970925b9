// Shared fixtures for integration tests

use genmark::watermark::{self, Format};
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::PathBuf;
use tempfile::TempDir;

pub const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
pub const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

/// Encode a solid opaque RGB image.
pub fn solid_rgb(width: u32, height: u32, color: Rgba<u8>, format: Format) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb([color[0], color[1], color[2]]));
    watermark::encode(&DynamicImage::ImageRgb8(image), format).unwrap()
}

/// Encode a solid RGBA PNG.
pub fn solid_rgba_png(width: u32, height: u32, color: Rgba<u8>) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, color);
    watermark::encode(&DynamicImage::ImageRgba8(image), Format::Png).unwrap()
}

/// Write a solid RGBA PNG into `dir` and return its path.
pub fn write_logo(dir: &TempDir, name: &str, width: u32, height: u32, color: Rgba<u8>) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, solid_rgba_png(width, height, color)).unwrap();
    path
}

pub fn decode_rgba(bytes: &[u8]) -> (Format, RgbaImage) {
    let decoded = watermark::decode(bytes).unwrap();
    (decoded.format, decoded.image.to_rgba8())
}
