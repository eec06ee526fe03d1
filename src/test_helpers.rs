//! Shared test utilities for the bleeder test suite.
//!
//! Generates small synthetic PNG/JPEG files so tests never depend on
//! checked-in binary fixtures.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use std::path::Path;

// =========================================================================
// Pixel buffers
// =========================================================================

/// Opaque gradient, distinct enough per pixel to catch misplaced copies.
pub fn gradient_rgba(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    })
}

// =========================================================================
// Encoded bytes
// =========================================================================

pub fn png_bytes(pixels: &RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(
            pixels.as_raw(),
            pixels.width(),
            pixels.height(),
            ExtendedColorType::Rgba8,
        )
        .unwrap();
    buf
}

pub fn jpeg_bytes(pixels: &RgbaImage) -> Vec<u8> {
    let rgb = DynamicImage::ImageRgba8(pixels.clone()).into_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, 90)
        .write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            ExtendedColorType::Rgb8,
        )
        .unwrap();
    buf
}

// =========================================================================
// Files on disk
// =========================================================================

/// Write a gradient PNG of the given size.
pub fn write_png(path: &Path, width: u32, height: u32) {
    std::fs::write(path, png_bytes(&gradient_rgba(width, height))).unwrap();
}

/// Write a gradient JPEG of the given size.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::write(path, jpeg_bytes(&gradient_rgba(width, height))).unwrap();
}

/// Read an image back from disk as RGBA.
pub fn read_rgba(path: &Path) -> RgbaImage {
    image::open(path).unwrap().into_rgba8()
}
