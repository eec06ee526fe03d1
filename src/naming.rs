//! Output filename derivation.
//!
//! Outputs keep the input's base name; only the extension may change to match
//! the encoded format:
//! - `card.png` as PNG → `card.png`
//! - `card.png` as JPEG → `card.jpg`
//! - `card.jpeg` as JPEG → `card.jpeg` (an extension that already names the
//!   format is kept verbatim, case included)
//! - `card.JPG` as PNG → `card.png`
//! - `card` (no extension) as PNG → `card.png`

use crate::imaging::ImageFormatTag;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// File name the output for `input` gets when encoded as `format`.
///
/// Returns `None` when `input` has no file name component (e.g. `..`).
pub fn output_file_name(input: &Path, format: ImageFormatTag) -> Option<OsString> {
    let stem = input.file_stem()?;
    let keep_ext = input
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| format.matches_extension(e));

    let mut name = stem.to_os_string();
    name.push(".");
    name.push(keep_ext.unwrap_or(format.canonical_extension()));
    Some(name)
}

/// Full output path for `input` inside `output_dir`.
pub fn output_path(input: &Path, output_dir: &Path, format: ImageFormatTag) -> Option<PathBuf> {
    output_file_name(input, format).map(|name| output_dir.join(name))
}

/// Base file name of `path` for display, falling back to the whole path.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
