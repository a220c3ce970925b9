//! Image decoding and encoding.
//!
//! Only PNG and JPEG containers are accepted. The format is sniffed from the
//! leading bytes on decode and echoed back on encode, so a watermarked image
//! always leaves in the container it arrived in.

use super::WatermarkError;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ColorType, DynamicImage, ImageEncoder, ImageFormat};
use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

/// JPEG quality used when re-encoding (1-100).
pub const JPEG_QUALITY: u8 = 95;

/// Supported container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Png,
    Jpeg,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Png => "png",
            Format::Jpeg => "jpeg",
        }
    }

    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Png => "png",
            Format::Jpeg => "jpg",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Format::Png => "image/png",
            Format::Jpeg => "image/jpeg",
        }
    }

    /// Map a `Content-Type` header value to a format. Parameters such as
    /// `; charset=...` are ignored.
    pub fn from_content_type(content_type: &str) -> Result<Self, WatermarkError> {
        let media_type = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match media_type.as_str() {
            "image/png" => Ok(Format::Png),
            "image/jpeg" | "image/jpg" => Ok(Format::Jpeg),
            _ => Err(WatermarkError::UnsupportedFormat(content_type.to_string())),
        }
    }

    fn from_image_format(format: ImageFormat) -> Result<Self, WatermarkError> {
        match format {
            ImageFormat::Png => Ok(Format::Png),
            ImageFormat::Jpeg => Ok(Format::Jpeg),
            other => Err(WatermarkError::UnsupportedFormat(
                format!("{:?}", other).to_lowercase(),
            )),
        }
    }

    fn to_image_format(self) -> ImageFormat {
        match self {
            Format::Png => ImageFormat::Png,
            Format::Jpeg => ImageFormat::Jpeg,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Format::Png),
            "jpeg" | "jpg" => Ok(Format::Jpeg),
            _ => Err(WatermarkError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// A decoded image together with the container it came from.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub image: DynamicImage,
    pub format: Format,
}

/// Detect the container format from the leading bytes.
pub fn sniff_format(data: &[u8]) -> Result<Format, WatermarkError> {
    let guessed = image::guess_format(data)
        .map_err(|_| WatermarkError::UnsupportedFormat("unknown".to_string()))?;
    Format::from_image_format(guessed)
}

/// Decode PNG or JPEG bytes.
pub fn decode(data: &[u8]) -> Result<DecodedImage, WatermarkError> {
    let format = sniff_format(data)?;
    let image = image::load_from_memory_with_format(data, format.to_image_format())
        .map_err(WatermarkError::Decode)?;

    Ok(DecodedImage { image, format })
}

/// Encode an image into the given container.
///
/// PNG is lossless and keeps 8-bit grayscale/RGB/RGBA layouts as they are;
/// anything else is widened to RGBA. JPEG drops alpha and uses
/// [`JPEG_QUALITY`].
pub fn encode(image: &DynamicImage, format: Format) -> Result<Vec<u8>, WatermarkError> {
    let (width, height) = (image.width(), image.height());
    let mut output = Cursor::new(Vec::new());

    let result = match format {
        Format::Png => {
            let encoder = PngEncoder::new(&mut output);
            match image {
                DynamicImage::ImageLuma8(_)
                | DynamicImage::ImageLumaA8(_)
                | DynamicImage::ImageRgb8(_)
                | DynamicImage::ImageRgba8(_) => {
                    encoder.write_image(image.as_bytes(), width, height, image.color())
                }
                _ => {
                    let rgba = image.to_rgba8();
                    encoder.write_image(rgba.as_raw(), width, height, ColorType::Rgba8)
                }
            }
        }
        Format::Jpeg => {
            // JPEG has no alpha channel
            let rgb = image.to_rgb8();
            let encoder = JpegEncoder::new_with_quality(&mut output, JPEG_QUALITY);
            encoder.write_image(rgb.as_raw(), width, height, ColorType::Rgb8)
        }
    };

    result.map_err(|source| WatermarkError::Encode {
        format: format.as_str(),
        source,
    })?;

    Ok(output.into_inner())
}
