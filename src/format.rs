//! Format routing: map an upload's filename to a converter, and derive the
//! name of the PDF sent back.

use crate::error::ConvertError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Every extension the service accepts, lowercase.
pub const ALLOWED_EXTENSIONS: &[&str] = &["xlsx", "xls", "xlsm", "pptx", "ppt", "docx", "doc", "txt"];

/// Which converter handles a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Spreadsheet,
    Slides,
    Word,
    Text,
}

impl DocumentKind {
    /// Classify by extension. Returns `None` for anything unsupported.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "xlsx" | "xls" | "xlsm" => Some(DocumentKind::Spreadsheet),
            "pptx" | "ppt" => Some(DocumentKind::Slides),
            "docx" | "doc" => Some(DocumentKind::Word),
            "txt" => Some(DocumentKind::Text),
            _ => None,
        }
    }

    /// Route a filename to its converter.
    ///
    /// The extension is the text after the last `.`; a name without a dot
    /// has no extension and is rejected.
    pub fn detect(filename: &str) -> Result<Self, ConvertError> {
        extension(filename)
            .and_then(Self::from_extension)
            .ok_or_else(|| ConvertError::UnsupportedFormat {
                filename: filename.to_string(),
                allowed: ALLOWED_EXTENSIONS.join(", "),
            })
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DocumentKind::Spreadsheet => "spreadsheet",
            DocumentKind::Slides => "slides",
            DocumentKind::Word => "word",
            DocumentKind::Text => "text",
        };
        f.write_str(s)
    }
}

/// Text after the last `.`, if any.
pub fn extension(filename: &str) -> Option<&str> {
    filename.rsplit_once('.').map(|(_, ext)| ext)
}

static RE_UNSAFE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.-]").unwrap());

/// Reduce an arbitrary client-supplied filename to a safe ASCII basename.
///
/// NFKD-normalises, drops non-ASCII, turns path separators into spaces,
/// joins whitespace-separated words with `_`, removes anything outside
/// `[A-Za-z0-9_.-]` and strips leading/trailing `.` and `_`. May return an
/// empty string.
pub fn sanitize_filename(name: &str) -> String {
    let ascii: String = name.nfkd().filter(char::is_ascii).collect();
    let spaced = ascii.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = RE_UNSAFE.replace_all(&joined, "");
    cleaned.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Name of the PDF returned for an upload: sanitised stem + `.pdf`.
pub fn output_filename(upload_name: &str) -> String {
    let safe = sanitize_filename(upload_name);
    let stem = match safe.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        Some(_) => "",
        None => safe.as_str(),
    };
    if stem.is_empty() {
        "converted.pdf".to_string()
    } else {
        format!("{stem}.pdf")
    }
}
