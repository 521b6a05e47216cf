//! Configuration types for document-to-PDF conversion.
//!
//! Conversion behaviour is controlled through [`ConversionConfig`], built via
//! its [`ConversionConfigBuilder`]. Page geometry is not configurable: each
//! converter picks the page setup its format calls for (see
//! [`crate::layout::PageSetup`]).

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default upload cap: 16 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Configuration for a single conversion.
///
/// # Example
/// ```rust
/// use doc2pdf::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .max_image_pixels(1600)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_image_pixels, 1600);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Longest edge, in pixels, of an image embedded into the PDF. Default: 2000.
    ///
    /// Slide pictures are often camera originals of 4000+ px. They are
    /// downscaled before embedding so the PDF stays a sensible size; the
    /// display size on the page is unaffected.
    pub max_image_pixels: u32,

    /// Directory under which per-conversion scratch directories are created.
    /// If None, uses the system temp directory.
    pub scratch_root: Option<PathBuf>,

    /// Maximum accepted upload size in bytes. Default: 16 MiB.
    pub max_upload_bytes: usize,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            max_image_pixels: 2000,
            scratch_root: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn max_image_pixels(mut self, px: u32) -> Self {
        self.config.max_image_pixels = px.max(100);
        self
    }

    pub fn scratch_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.scratch_root = Some(dir.into());
        self
    }

    pub fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.config.max_upload_bytes = bytes;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, ConvertError> {
        let c = &self.config;
        if c.max_upload_bytes == 0 {
            return Err(ConvertError::InvalidConfig(
                "Upload limit must be ≥ 1 byte".into(),
            ));
        }
        if let Some(ref root) = c.scratch_root {
            if !root.is_dir() {
                return Err(ConvertError::InvalidConfig(format!(
                    "Scratch root '{}' is not a directory",
                    root.display()
                )));
            }
        }
        Ok(self.config)
    }
}
