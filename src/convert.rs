//! Conversion entry points: upload in, PDF out.
//!
//! ## Why spawn_blocking?
//!
//! Unzipping, XML parsing, image decoding and layout are all synchronous,
//! CPU-bound work. [`convert`] moves it onto tokio's blocking pool so an
//! HTTP server running many conversions never stalls its async workers.
//! [`convert_sync`] is the same pipeline without a runtime.
//!
//! ## Scratch files
//!
//! Slide pictures are decoded, re-encoded as PNG on disk and later
//! embedded. Each conversion gets its own [`Scratch`] directory, which is
//! deleted when the conversion returns, whether it succeeded or not.

use crate::config::ConversionConfig;
use crate::error::ConvertError;
use crate::format::{output_filename, DocumentKind};
use crate::output::{ConversionOutput, ConversionStats};
use crate::pipeline::render::{self, RenderOptions};
use crate::pipeline::{self, Scratch};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// An uploaded document: its declared name and raw bytes.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a local file; its file name stands in for the upload name.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { filename, bytes })
    }
}

/// Convert an upload to PDF.
///
/// # Errors
/// Returns `Err(ConvertError)` only when no PDF can be produced:
/// - the extension is not supported (`is_validation()` is true)
/// - the upload exceeds `max_upload_bytes`
/// - the document cannot be opened at all
/// - rendering fails
///
/// Elements that fail individually are listed in
/// [`ConversionOutput::warnings`] instead.
pub async fn convert(upload: Upload, config: &ConversionConfig) -> Result<ConversionOutput, ConvertError> {
    let config = config.clone();
    tokio::task::spawn_blocking(move || convert_sync(&upload, &config))
        .await
        .map_err(|e| ConvertError::Internal(format!("Conversion task panicked: {}", e)))?
}

/// Blocking version of [`convert`]. Does not need a tokio runtime.
pub fn convert_sync(upload: &Upload, config: &ConversionConfig) -> Result<ConversionOutput, ConvertError> {
    let total_start = Instant::now();

    if upload.bytes.len() > config.max_upload_bytes {
        return Err(ConvertError::TooLarge {
            size: upload.bytes.len(),
            limit: config.max_upload_bytes,
        });
    }
    let kind = DocumentKind::detect(&upload.filename)?;
    info!(
        "Converting '{}' ({} bytes) as {}",
        upload.filename,
        upload.bytes.len(),
        kind
    );

    let scratch = Scratch::new(config.scratch_root.as_deref())?;
    debug!("Scratch directory: {}", scratch.path().display());

    // ── Step 1: Source document → blocks ─────────────────────────────────
    let convert_start = Instant::now();
    let converted = pipeline::convert_blocks(kind, &upload.bytes, &scratch)?;
    let convert_duration_ms = convert_start.elapsed().as_millis() as u64;
    debug!(
        "{} produced {} blocks, {} skipped items",
        kind,
        converted.blocks.len(),
        converted.warnings.len()
    );

    // ── Step 2: Blocks → PDF ─────────────────────────────────────────────
    let render_start = Instant::now();
    let rendered = render::render(
        &converted.blocks,
        &converted.page,
        &RenderOptions {
            title: &upload.filename,
            max_image_pixels: config.max_image_pixels,
        },
    )?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;
    drop(scratch);

    let stats = ConversionStats {
        kind,
        orientation: converted.page.orientation(),
        block_count: converted.blocks.len(),
        page_count: rendered.page_count,
        input_bytes: upload.bytes.len(),
        output_bytes: rendered.bytes.len(),
        skipped_items: converted.warnings.len(),
        convert_duration_ms,
        render_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Conversion complete: {} pages, {} bytes, {}ms total",
        stats.page_count, stats.output_bytes, stats.total_duration_ms
    );

    Ok(ConversionOutput {
        pdf: rendered.bytes,
        filename: output_filename(&upload.filename),
        warnings: converted.warnings,
        stats,
    })
}

/// Convert a local file.
pub async fn convert_file(input: impl AsRef<Path>, config: &ConversionConfig) -> Result<ConversionOutput, ConvertError> {
    let upload = Upload::from_path(input).await?;
    convert(upload, config).await
}

/// Convert a local file and write the PDF to `output_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn convert_to_file(
    input: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, ConvertError> {
    let output = convert_file(input, config).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let tmp_path = path.with_extension("pdf.tmp");
    tokio::fs::write(&tmp_path, &output.pdf).await?;
    tokio::fs::rename(&tmp_path, path).await?;

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_extension_is_rejected_before_conversion() {
        let root = tempfile::tempdir().unwrap();
        let config = ConversionConfig::builder().scratch_root(root.path()).build().unwrap();
        let err = convert_sync(&Upload::new("archive.zip", b"PK".to_vec()), &config).unwrap_err();
        assert!(err.is_validation());
        // No scratch directory was even created.
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn oversized_upload_is_rejected() {
        let config = ConversionConfig::builder().max_upload_bytes(4).build().unwrap();
        let err = convert_sync(&Upload::new("a.txt", b"hello".to_vec()), &config).unwrap_err();
        assert!(matches!(err, ConvertError::TooLarge { size: 5, limit: 4 }));
    }

    #[test]
    fn text_upload_converts() {
        let out = convert_sync(
            &Upload::new("My Notes.txt", b"hello\nworld".to_vec()),
            &ConversionConfig::default(),
        )
        .unwrap();
        assert_eq!(out.filename, "My_Notes.pdf");
        assert!(out.pdf.starts_with(b"%PDF"));
        assert_eq!(out.stats.kind, DocumentKind::Text);
        assert_eq!(out.stats.page_count, 1);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn async_convert_runs_on_the_blocking_pool() {
        let out = tokio_test::block_on(convert(
            Upload::new("a.txt", b"x".to_vec()),
            &ConversionConfig::default(),
        ))
        .unwrap();
        assert_eq!(out.stats.block_count, 2);
    }

    #[tokio::test]
    async fn convert_to_file_writes_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        tokio::fs::write(&input, "line one\nline two").await.unwrap();
        let target = dir.path().join("out").join("notes.pdf");

        let out = convert_to_file(&input, &target, &ConversionConfig::default())
            .await
            .unwrap();
        let written = tokio::fs::read(&target).await.unwrap();
        assert_eq!(written, out.pdf);
        assert!(!target.with_extension("pdf.tmp").exists());
    }
}
