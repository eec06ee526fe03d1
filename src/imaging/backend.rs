//! Image codec trait and shared types.
//!
//! The [`ImageCodec`] trait defines the three operations the pipeline needs
//! from a codec: sniff the format, decode to RGBA, and encode back to bytes.
//! Pixel work (compositing, corner repair) never goes through the codec.
//!
//! The production implementation is
//! [`RustCodec`](super::rust_backend::RustCodec), backed by the `image` crate.

use super::params::{ImageFormatTag, Quality};
use image::RgbaImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),
}

/// A decoded raster owned by the worker that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub pixels: RgbaImage,
    pub format: ImageFormatTag,
}

impl DecodedImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

/// Codec used by every worker. `Sync` so one instance is shared across the pool.
pub trait ImageCodec: Sync {
    /// Identify the format from the leading bytes, without decoding pixels.
    fn detect_format(&self, bytes: &[u8]) -> Result<ImageFormatTag, CodecError>;

    /// Decode an entire file into RGBA pixels.
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, CodecError>;

    /// Encode pixels into `format`. `quality` only affects lossy formats.
    fn encode(
        &self,
        pixels: &RgbaImage,
        format: ImageFormatTag,
        quality: Quality,
    ) -> Result<Vec<u8>, CodecError>;
}
