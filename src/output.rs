//! Result types returned by the conversion entry points.

use crate::error::ItemError;
use crate::format::DocumentKind;
use crate::layout::Orientation;
use serde::{Deserialize, Serialize};

/// A finished conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// The PDF document.
    #[serde(skip)]
    pub pdf: Vec<u8>,

    /// Suggested download name, always ending in `.pdf`.
    pub filename: String,

    /// Elements that were skipped; the PDF contains everything else.
    pub warnings: Vec<ItemError>,

    pub stats: ConversionStats,
}

/// Numbers about one conversion, for logging and the CLI's `--json` output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionStats {
    pub kind: DocumentKind,
    pub orientation: Orientation,
    /// Layout blocks produced by the converter.
    pub block_count: usize,
    pub page_count: usize,
    pub input_bytes: usize,
    pub output_bytes: usize,
    pub skipped_items: usize,
    pub convert_duration_ms: u64,
    pub render_duration_ms: u64,
    pub total_duration_ms: u64,
}
