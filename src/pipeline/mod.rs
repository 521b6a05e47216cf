//! Pipeline stages for document-to-PDF conversion.
//!
//! Each converter turns one source format into the same intermediate form,
//! an ordered `Vec<Block>` plus a [`PageSetup`]; the renderer is the only
//! stage that knows about PDF.
//!
//! ## Data Flow
//!
//! ```text
//!                ┌─▶ spreadsheet ─┐
//! bytes ─▶ kind ─┼─▶ slides ──────┼─▶ blocks + page ─▶ render ─▶ PDF bytes
//!                ├─▶ word ────────┤
//!                └─▶ text ────────┘
//! ```
//!
//! 1. [`spreadsheet`] — calamine grid per sheet → one styled table each
//! 2. [`slides`] — pptx parts → "Slide N" heading, pictures, text, page break
//! 3. [`word`] — docx body → headings, formatted paragraphs, then tables
//! 4. [`text`] — one paragraph per line
//! 5. [`render`] — flow layout onto pages, serialised with lopdf
//!
//! ## Why collect item failures instead of failing?
//!
//! One broken slide or an unreadable sheet should not cost the user the
//! rest of the document. Converters log each skipped element and hand the
//! [`ItemError`]s back with the blocks; only failures that leave nothing to
//! convert (not a zip, missing main part) abort the conversion.

pub mod fonts;
mod ooxml;
pub mod render;
pub mod slides;
pub mod spreadsheet;
pub mod text;
pub mod word;

use crate::error::{ConvertError, ItemError};
use crate::format::DocumentKind;
use crate::layout::{Block, PageSetup};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::warn;

/// What a converter hands to the renderer.
#[derive(Debug, Clone)]
pub struct Converted {
    pub blocks: Vec<Block>,
    pub page: PageSetup,
    /// Elements that were skipped.
    pub warnings: Vec<ItemError>,
}

impl Converted {
    pub(crate) fn new(page: PageSetup) -> Self {
        Self {
            blocks: Vec::new(),
            page,
            warnings: Vec::new(),
        }
    }

    /// Log a skipped element and keep it for the caller.
    pub(crate) fn skip(&mut self, err: ItemError) {
        warn!("{}", err);
        self.warnings.push(err);
    }

    /// Add `fallback` as the only paragraph when nothing else was produced.
    pub(crate) fn or_placeholder(mut self, fallback: &str) -> Self {
        if self.blocks.is_empty() {
            self.blocks.push(Block::paragraph(fallback));
        }
        self
    }
}

/// Per-conversion scratch directory for files extracted from the upload.
///
/// Removed with everything in it when dropped, whether the conversion
/// succeeded, failed or panicked.
#[derive(Debug)]
pub struct Scratch {
    dir: TempDir,
}

impl Scratch {
    /// Create a uniquely named directory under `root`, or under the system
    /// temp directory when `root` is `None`.
    pub fn new(root: Option<&Path>) -> Result<Self, ConvertError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("doc2pdf-");
        let dir = match root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `bytes` to a fresh uniquely named file and return its path.
    pub fn write(&self, prefix: &str, extension: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        use std::io::Write;

        let suffix = format!(".{extension}");
        let mut file = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(&suffix)
            .tempfile_in(self.dir.path())?;
        file.write_all(bytes)?;
        // The file now lives until the scratch directory itself is dropped.
        Ok(file.into_temp_path().keep()?)
    }
}

/// Run the converter for `kind` over the uploaded bytes.
pub fn convert_blocks(kind: DocumentKind, bytes: &[u8], scratch: &Scratch) -> Result<Converted, ConvertError> {
    match kind {
        DocumentKind::Spreadsheet => spreadsheet::convert(bytes),
        DocumentKind::Slides => slides::convert(bytes, scratch),
        DocumentKind::Word => word::convert(bytes),
        DocumentKind::Text => Ok(text::convert(bytes)),
    }
}
