//! # doc2pdf
//!
//! Convert spreadsheets, slide decks, Word documents and plain text to PDF.
//!
//! ## Why this crate?
//!
//! Office suites render documents faithfully but are heavy to install on a
//! server and slow to start per request. This crate reads the OOXML packages
//! directly, keeps what matters when printed (tables, headings, run
//! formatting, slide pictures) and lays it out onto A4 pages itself.
//!
//! ## Pipeline Overview
//!
//! ```text
//! upload (filename + bytes)
//!  │
//!  ├─ 1. Detect    extension → DocumentKind (unsupported → 400)
//!  ├─ 2. Convert   format-specific reader → Vec<Block> + PageSetup
//!  ├─ 3. Render    flow layout, base-14 fonts, images → lopdf (spawn_blocking)
//!  └─ 4. Output    PDF bytes + sanitised filename + skipped items + stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use doc2pdf::{convert_file, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let output = convert_file("report.xlsx", &config).await?;
//!     std::fs::write(&output.filename, &output.pdf)?;
//!     for warning in &output.warnings {
//!         eprintln!("skipped: {warning}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `server` | on      | The [`server`] module: axum router with the upload page, `POST /convert`, `GET /health` |
//! | `cli`    | on      | Enables the `doc2pdf` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable both when using only the library:
//! ```toml
//! doc2pdf = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod format;
pub mod layout;
pub mod markup;
pub mod output;
pub mod pipeline;
#[cfg(feature = "server")]
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert, convert_file, convert_sync, convert_to_file, Upload};
pub use error::{ConvertError, ItemError};
pub use format::{output_filename, sanitize_filename, DocumentKind};
pub use layout::{Block, PageSetup};
pub use output::{ConversionOutput, ConversionStats};
