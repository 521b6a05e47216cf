//! Error types for the doc2pdf library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ConvertError`] — **Fatal**: the conversion cannot proceed at all
//!   (unsupported extension, unreadable package, renderer failure). Returned
//!   as `Err(ConvertError)` from the top-level `convert*` functions. No PDF
//!   is produced.
//!
//! * [`ItemError`] — **Non-fatal**: a single element (one sheet, one slide,
//!   one image, one paragraph, one table) could not be converted. It is
//!   logged, recorded in [`crate::output::ConversionOutput::warnings`], and
//!   the element is skipped so the rest of the document still renders.

use thiserror::Error;

/// All fatal errors returned by the doc2pdf library.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Routing errors ────────────────────────────────────────────────────
    /// The filename has no extension or one outside the supported set.
    #[error("Unsupported file type '{filename}'. Allowed extensions: {allowed}")]
    UnsupportedFormat { filename: String, allowed: String },

    // ── Source document errors ────────────────────────────────────────────
    /// The workbook could not be opened by calamine.
    #[error("Failed to open spreadsheet: {detail}")]
    Spreadsheet { detail: String },

    /// The OOXML package (a zip archive) could not be read.
    #[error("Failed to read {kind} package: {detail}")]
    Package { kind: &'static str, detail: String },

    /// A required part is missing from the package.
    #[error("Package part '{part}' is missing")]
    MissingPart { part: String },

    /// An XML part is malformed.
    #[error("Malformed XML in '{part}': {detail}")]
    Xml { part: String, detail: String },

    /// An image could not be read back while embedding it into the PDF.
    /// `name` is the picture's part name in the source document.
    #[error("Image '{name}' could not be embedded: {detail}")]
    Image { name: String, detail: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// lopdf failed to assemble or serialise the document.
    #[error("PDF rendering failed: {0}")]
    Render(String),

    /// Scratch-directory or file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The upload exceeds the configured size cap.
    #[error("Upload of {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConvertError {
    /// `true` when the request was rejected before any converter ran.
    ///
    /// The HTTP layer maps these to `400` instead of `500`.
    pub fn is_validation(&self) -> bool {
        matches!(self, ConvertError::UnsupportedFormat { .. })
    }

    pub(crate) fn xml(part: impl Into<String>, err: impl std::fmt::Display) -> Self {
        ConvertError::Xml {
            part: part.into(),
            detail: err.to_string(),
        }
    }
}

impl From<lopdf::Error> for ConvertError {
    fn from(e: lopdf::Error) -> Self {
        ConvertError::Render(e.to_string())
    }
}

/// A non-fatal error for a single document element.
///
/// Stored in [`crate::output::ConversionOutput::warnings`]. The element is
/// skipped; the conversion continues.
#[derive(Debug, Clone, PartialEq, Error, serde::Serialize, serde::Deserialize)]
pub enum ItemError {
    /// A worksheet could not be read.
    #[error("Sheet '{sheet}': {detail}")]
    Sheet { sheet: String, detail: String },

    /// A slide part could not be parsed.
    #[error("Slide {slide}: {detail}")]
    Slide { slide: usize, detail: String },

    /// An embedded picture could not be extracted or decoded.
    #[error("Slide {slide}: image '{name}' skipped: {detail}")]
    Image {
        slide: usize,
        name: String,
        detail: String,
    },

    /// A word-document paragraph could not be converted.
    #[error("Paragraph {index}: {detail}")]
    Paragraph { index: usize, detail: String },

    /// A word-document table could not be converted.
    #[error("Table {index}: {detail}")]
    Table { index: usize, detail: String },
}
