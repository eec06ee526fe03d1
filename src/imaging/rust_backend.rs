//! Pure Rust codec backed by the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Sniff format | `image::guess_format` (magic bytes) |
//! | Decode (JPEG, PNG) | `image::load_from_memory_with_format` → RGBA8 |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (RGBA8) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (RGB8, alpha dropped) |

use super::backend::{CodecError, DecodedImage, ImageCodec};
use super::params::{ImageFormatTag, Quality};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, RgbaImage};

/// Codec built on the `image` crate's pure Rust decoders and encoders.
pub struct RustCodec;

impl RustCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn to_image_format(tag: ImageFormatTag) -> ImageFormat {
    match tag {
        ImageFormatTag::Png => ImageFormat::Png,
        ImageFormatTag::Jpeg => ImageFormat::Jpeg,
    }
}

fn from_image_format(format: ImageFormat) -> Result<ImageFormatTag, CodecError> {
    match format {
        ImageFormat::Png => Ok(ImageFormatTag::Png),
        ImageFormat::Jpeg => Ok(ImageFormatTag::Jpeg),
        other => Err(CodecError::UnsupportedFormat(format!("{other:?}"))),
    }
}

impl ImageCodec for RustCodec {
    fn detect_format(&self, bytes: &[u8]) -> Result<ImageFormatTag, CodecError> {
        let format = image::guess_format(bytes)
            .map_err(|e| CodecError::Decode(format!("Unrecognized image data: {e}")))?;
        from_image_format(format)
    }

    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, CodecError> {
        let format = self.detect_format(bytes)?;
        let img = image::load_from_memory_with_format(bytes, to_image_format(format))
            .map_err(|e| CodecError::Decode(e.to_string()))?;
        Ok(DecodedImage {
            pixels: img.into_rgba8(),
            format,
        })
    }

    fn encode(
        &self,
        pixels: &RgbaImage,
        format: ImageFormatTag,
        quality: Quality,
    ) -> Result<Vec<u8>, CodecError> {
        let mut buf = Vec::new();
        let (width, height) = pixels.dimensions();
        match format {
            ImageFormatTag::Png => PngEncoder::new(&mut buf)
                .write_image(pixels.as_raw(), width, height, ExtendedColorType::Rgba8)
                .map_err(|e| CodecError::Encode(format!("PNG encode failed: {e}")))?,
            ImageFormatTag::Jpeg => {
                // JPEG has no alpha channel.
                let rgb = DynamicImage::ImageRgba8(pixels.clone()).into_rgb8();
                JpegEncoder::new_with_quality(&mut buf, quality.value())
                    .write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)
                    .map_err(|e| CodecError::Encode(format!("JPEG encode failed: {e}")))?
            }
        }
        Ok(buf)
    }
}
