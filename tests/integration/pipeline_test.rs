// End-to-end watermark pipeline tests

use super::test_harness::*;
use genmark::watermark::{self, Config, Format, Stage, WatermarkError};
use image::Rgba;
use rstest::rstest;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_png_in_png_out_preserves_dimensions() {
    let base = solid_rgb(320, 240, RED, Format::Png);
    let output = watermark::apply(&base, &Config::text("Copyright 2025")).unwrap();

    let (format, image) = decode_rgba(&output);
    assert_eq!(format, Format::Png);
    assert_eq!(image.dimensions(), (320, 240));
}

#[test]
fn test_jpeg_in_jpeg_out() {
    let base = solid_rgb(300, 200, RED, Format::Jpeg);
    let output = watermark::apply(&base, &Config::text("JPEG")).unwrap();

    assert_eq!(watermark::sniff_format(&output).unwrap(), Format::Jpeg);
    let (_, image) = decode_rgba(&output);
    assert_eq!(image.dimensions(), (300, 200));
}

#[test]
fn test_jpeg_base_with_png_image_watermark() {
    let dir = TempDir::new().unwrap();
    let logo = write_logo(&dir, "logo.png", 40, 40, BLUE);
    let base = solid_rgb(200, 200, RED, Format::Jpeg);

    let output = watermark::apply(&base, &Config::image(&logo)).unwrap();

    assert_eq!(watermark::sniff_format(&output).unwrap(), Format::Jpeg);
}

#[test]
fn test_rgba_png_keeps_alpha_channel() {
    let base = solid_rgba_png(50, 50, Rgba([0, 0, 0, 0]));
    let config = Config {
        opacity: 1.0,
        position: "top-left".to_string(),
        margin: 0,
        text_size: 8,
        ..Config::text("A")
    };

    let output = watermark::apply(&base, &config).unwrap();
    let decoded = watermark::decode(&output).unwrap();
    assert!(decoded.image.color().has_alpha());

    let image = decoded.image.to_rgba8();
    // Outside the 8x8 glyph cell the canvas stays fully transparent
    assert_eq!(*image.get_pixel(20, 20), Rgba([0, 0, 0, 0]));
    assert!(image
        .enumerate_pixels()
        .filter(|(x, y, _)| *x < 8 && *y < 8)
        .any(|(_, _, p)| p[3] == 255));
}

#[test]
fn test_image_watermark_scaled_and_anchored() {
    let dir = TempDir::new().unwrap();
    let logo = write_logo(&dir, "logo.png", 100, 50, BLUE);
    let base = solid_rgb(400, 400, RED, Format::Png);

    let config = Config {
        scale: 0.25,
        opacity: 1.0,
        margin: 10,
        position: "bottom-right".to_string(),
        ..Config::image(&logo)
    };
    let output = watermark::apply(&base, &config).unwrap();
    let (_, image) = decode_rgba(&output);

    // 400 * 0.25 = 100 wide, 50 high, placed at (290, 340)
    assert_eq!(*image.get_pixel(290, 340), BLUE);
    assert_eq!(*image.get_pixel(389, 389), BLUE);
    assert_eq!(*image.get_pixel(289, 340), RED);
    assert_eq!(*image.get_pixel(290, 339), RED);
    assert_eq!(*image.get_pixel(390, 389), RED);
    assert_eq!(*image.get_pixel(389, 390), RED);
}

#[test]
fn test_half_opacity_image_watermark_blends() {
    let dir = TempDir::new().unwrap();
    let logo = write_logo(&dir, "white.png", 10, 10, Rgba([255, 255, 255, 255]));
    let base = solid_rgb(100, 100, Rgba([0, 0, 0, 255]), Format::Png);

    let config = Config {
        scale: 0.1,
        opacity: 0.5,
        position: "center".to_string(),
        ..Config::image(&logo)
    };
    let output = watermark::apply(&base, &config).unwrap();
    let (_, image) = decode_rgba(&output);

    // 10x10 at (45, 45); alpha round(255 * 0.5) = 128
    assert_eq!(*image.get_pixel(50, 50), Rgba([128, 128, 128, 255]));
    assert_eq!(*image.get_pixel(44, 44), Rgba([0, 0, 0, 255]));
}

#[test]
fn test_margin_larger_than_image_is_clipped_not_rejected() {
    let base = solid_rgb(30, 30, RED, Format::Png);
    let config = Config {
        margin: 500,
        ..Config::text("far")
    };

    let output = watermark::apply(&base, &config).unwrap();
    let (_, image) = decode_rgba(&output);
    assert!(image.pixels().all(|p| *p == RED));
}

#[rstest]
#[case::both_sources_beat_bad_position(Some("t"), Some("logo.png"), "nowhere", 2.0, WatermarkError::BothWatermarks)]
#[case::position_beats_opacity(Some("t"), None, "nowhere", 2.0, WatermarkError::InvalidPosition(String::new()))]
#[case::opacity_checked(Some("t"), None, "center", 1.5, WatermarkError::InvalidOpacity(0.0))]
#[case::no_source_first(None, None, "nowhere", -1.0, WatermarkError::NoWatermark)]
fn test_validation_order_through_apply(
    #[case] text: Option<&str>,
    #[case] image: Option<&str>,
    #[case] position: &str,
    #[case] opacity: f64,
    #[case] expected: WatermarkError,
) {
    let base = solid_rgb(10, 10, RED, Format::Png);
    let config = Config {
        text: text.map(str::to_string),
        image: image.map(PathBuf::from),
        position: position.to_string(),
        opacity,
        ..Config::default()
    };

    let err = watermark::apply(&base, &config).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Validate));
    assert_eq!(
        std::mem::discriminant(err.root()),
        std::mem::discriminant(&expected)
    );
}

#[test]
fn test_empty_base_is_bare_error() {
    let err = watermark::apply(&[], &Config::text("x")).unwrap_err();
    assert!(matches!(err, WatermarkError::EmptyImage));
    assert_eq!(err.stage(), None);
}

#[test]
fn test_gif_base_is_unsupported() {
    // Minimal GIF header is enough for format detection
    let gif = b"GIF89a\x01\x00\x01\x00\x00\x00\x00;";
    let err = watermark::apply(gif, &Config::text("x")).unwrap_err();

    assert_eq!(err.stage(), Some(Stage::DecodeBase));
    match err.root() {
        WatermarkError::UnsupportedFormat(name) => assert_eq!(name, "gif"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_concurrent_applies_are_independent() {
    let base = solid_rgb(128, 128, RED, Format::Png);
    let expected = watermark::apply(&base, &Config::text("same")).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| watermark::apply(&base, &Config::text("same")).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
