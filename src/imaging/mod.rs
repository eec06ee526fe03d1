//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Bleed width** | [`bleed_width_px`] (pure math) |
//! | **Decode / encode** | `image` crate behind [`ImageCodec`] |
//! | **Composite** | integer source-over onto a black canvas |
//! | **Corner repair** | black L-shaped fills at the four inner corners |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for bleed geometry (unit testable)
//! - **Parameters**: Encoding quality and the closed set of formats
//! - **Backend**: [`ImageCodec`] trait + [`RustCodec`]
//! - **Compositor**: Pixel work combining calculations with the decoded image

pub mod backend;
pub mod calculations;
pub mod compositor;
mod params;
pub mod rust_backend;

pub use backend::{CodecError, DecodedImage, ImageCodec};
pub use calculations::{BleedGeometry, GeometryError, Rect, bleed_width_px};
pub use compositor::{BLEED_FILL, composite, repair_corners};
pub use params::{ImageFormatTag, Quality};
pub use rust_backend::RustCodec;
