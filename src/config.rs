//! Run configuration.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. Stock defaults ([`BleedConfig::default`])
//! 2. An optional `bleeder.toml` (current directory, or `--config <file>`)
//! 3. Command-line flags
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! output_format = "png"     # png, jpg (alias: jpeg) or auto (keep input format)
//! overwrite = false         # Replace outputs that already exist
//! jpeg_corner_fix = false   # Black out corner fringing on JPEG sources
//! jpeg_quality = 100        # JPEG output quality (1-100)
//! workers = 8               # Parallel workers in directory mode
//! queue_capacity = 100      # Pending jobs buffered ahead of the workers
//! ```
//!
//! Unknown keys are rejected to catch typos early.
//!
//! Once resolved, the config is split into an [`OutputPolicy`] and a
//! [`PoolConfig`]. Both are immutable and shared by reference with every worker.

use crate::imaging::{ImageFormatTag, Quality};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "bleeder.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Requested output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    #[serde(alias = "jpeg")]
    #[value(alias = "jpeg")]
    Jpg,
    /// Keep whatever format the input was in.
    Auto,
}

impl OutputFormat {
    /// The concrete format to encode an input detected as `detected`.
    pub fn resolve(self, detected: ImageFormatTag) -> ImageFormatTag {
        match self {
            Self::Png => ImageFormatTag::Png,
            Self::Jpg => ImageFormatTag::Jpeg,
            Self::Auto => detected,
        }
    }
}

/// Configuration loaded from `bleeder.toml`.
///
/// All fields have defaults. Files need only specify the values they want to
/// override. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BleedConfig {
    pub output_format: OutputFormat,
    pub overwrite: bool,
    pub jpeg_corner_fix: bool,
    pub jpeg_quality: u32,
    pub workers: usize,
    pub queue_capacity: usize,
}

impl Default for BleedConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Png,
            overwrite: false,
            jpeg_corner_fix: false,
            jpeg_quality: 100,
            workers: 8,
            queue_capacity: 100,
        }
    }
}

impl BleedConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::Validation(
                "jpeg_quality must be 1-100".into(),
            ));
        }
        if self.workers == 0 {
            return Err(ConfigError::Validation("workers must be at least 1".into()));
        }
        if self.queue_capacity == 0 {
            return Err(ConfigError::Validation(
                "queue_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Output settings shared read-only by every worker.
    pub fn output_policy(&self) -> OutputPolicy {
        OutputPolicy {
            target_format: self.output_format,
            overwrite_existing: self.overwrite,
            corner_fix: self.jpeg_corner_fix,
            jpeg_quality: Quality::new(self.jpeg_quality),
        }
    }

    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            workers: self.workers,
            queue_capacity: self.queue_capacity,
        }
    }
}

/// How each job writes its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputPolicy {
    pub target_format: OutputFormat,
    pub overwrite_existing: bool,
    pub corner_fix: bool,
    pub jpeg_quality: Quality,
}

impl Default for OutputPolicy {
    fn default() -> Self {
        BleedConfig::default().output_policy()
    }
}

/// Sizing of the directory-mode worker pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    pub workers: usize,
    pub queue_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        BleedConfig::default().pool_config()
    }
}

/// Parse and validate config from TOML text.
pub fn parse_config(content: &str) -> Result<BleedConfig, ConfigError> {
    let config: BleedConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load `bleeder.toml` from a directory.
///
/// Returns stock defaults if the file doesn't exist.
/// Returns `Err` if the file exists but is invalid.
pub fn load_config(dir: &Path) -> Result<BleedConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(BleedConfig::default());
    }
    load_config_file(&config_path)
}

/// Load an explicitly named config file. A missing file is an error.
pub fn load_config_file(path: &Path) -> Result<BleedConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock `bleeder.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Bleeder Configuration
# =====================
#
# Place this file as bleeder.toml in the directory you run bleeder from,
# or pass it explicitly with --config. Every key is optional; command-line
# flags override values set here.

# Output format: "png", "jpg" (or "jpeg"), or "auto" to keep each input's
# own format.
output_format = "png"

# Replace output files that already exist. When false, existing outputs are
# reported as skipped and left untouched.
overwrite = false

# Paint small black L-shapes over the four inner corners of JPEG sources to
# hide light compression fringing. Covers a little real artwork.
jpeg_corner_fix = false

# JPEG encoding quality, 1-100. Ignored for PNG output.
jpeg_quality = 100

# Parallel workers used when the input is a directory.
workers = 8

# How many discovered files may wait for a worker before discovery pauses.
queue_capacity = 100
"##
}
