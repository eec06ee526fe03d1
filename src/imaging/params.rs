//! Parameter types for image encoding.
//!
//! - [`Quality`]: Lossy encoding quality (1-100, default 100). Clamped on construction.
//! - [`ImageFormatTag`]: The closed set of raster formats the pipeline reads and writes.

/// Quality setting for lossy image encoding (1-100).
///
/// Only JPEG output consults it; PNG is lossless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u8);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(100)
    }
}

/// Raster format of a decoded input or an encoded output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormatTag {
    Png,
    Jpeg,
}

impl ImageFormatTag {
    /// Extension written for this format when the input's own can't be kept.
    pub fn canonical_extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// Whether `ext` (without the dot) names this format, ignoring case.
    pub fn matches_extension(self, ext: &str) -> bool {
        match self {
            Self::Png => ext.eq_ignore_ascii_case("png"),
            Self::Jpeg => ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"),
        }
    }

    /// Lossy formats leave fringing where the artwork meets the bleed fill.
    pub fn is_lossy(self) -> bool {
        matches!(self, Self::Jpeg)
    }
}

impl std::fmt::Display for ImageFormatTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Png => write!(f, "png"),
            Self::Jpeg => write!(f, "jpeg"),
        }
    }
}
