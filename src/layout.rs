//! The flowing-document model shared by every converter and the renderer.
//!
//! Converters emit an ordered `Vec<Block>` plus a [`PageSetup`]; the renderer
//! consumes both and knows nothing about the source format. All lengths are
//! PDF points (1/72 in).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One inch in points.
pub const INCH: f32 = 72.0;

/// A4 portrait, in points (210 × 297 mm).
pub const A4: (f32, f32) = (595.2756, 841.8898);

/// Narrowest column a table may get, regardless of column count.
pub const MIN_COLUMN_WIDTH: f32 = 0.35 * INCH;

/// One unit of flowing PDF content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Heading { text: String, level: HeadingLevel },
    /// Inline markup; see [`crate::markup`].
    Paragraph(String),
    Table(TableBlock),
    Image(ImageBlock),
    PageBreak,
    /// Vertical gap in points.
    Spacer(f32),
}

impl Block {
    pub fn heading(text: impl Into<String>, level: HeadingLevel) -> Self {
        Block::Heading {
            text: text.into(),
            level,
        }
    }

    pub fn paragraph(markup: impl Into<String>) -> Self {
        Block::Paragraph(markup.into())
    }

    pub fn is_spacer(&self) -> bool {
        matches!(self, Block::Spacer(_))
    }
}

/// Two heading sizes are enough for every source format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeadingLevel {
    /// Titles, `Heading 1`, sheet names, slide numbers.
    Primary,
    /// Every other heading level.
    Secondary,
}

impl HeadingLevel {
    pub fn font_size(self) -> f32 {
        match self {
            HeadingLevel::Primary => 14.0,
            HeadingLevel::Secondary => 12.0,
        }
    }
}

/// A picture extracted to the conversion's scratch directory, already
/// decoded once and re-encoded as PNG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    pub path: PathBuf,
    /// Where the picture came from in the source document, for messages.
    pub name: String,
    /// Display width in points.
    pub width: f32,
    /// Display height in points.
    pub height: f32,
}

/// A grid of plain-text cells. The first row is the header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableBlock {
    pub rows: Vec<Vec<String>>,
    pub column_widths: Vec<f32>,
    pub style: TableStyle,
}

impl TableBlock {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_widths.len()
    }

    pub fn total_width(&self) -> f32 {
        self.column_widths.iter().sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellAlign {
    Left,
    Center,
}

/// RGB colour, components 0–255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    /// Off-white used for header text.
    pub const WHITESMOKE: Rgb = Rgb(0xF5, 0xF5, 0xF5);
    pub const ACCENT: Rgb = Rgb(0x44, 0x72, 0xC4);
    pub const ZEBRA: Rgb = Rgb(0xE7, 0xEE, 0xF7);
    pub const GRID: Rgb = Rgb(0xA6, 0xB4, 0xD0);

    /// Components scaled to 0.0–1.0 for PDF colour operators.
    pub fn unit(self) -> [f32; 3] {
        [
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        ]
    }
}

/// How the renderer paints a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableStyle {
    pub header_background: Rgb,
    pub header_text: Rgb,
    pub header_font_size: f32,
    pub header_bottom_padding: f32,
    pub body_font_size: f32,
    /// Body rows cycle through these backgrounds.
    pub row_backgrounds: [Rgb; 2],
    pub grid_color: Rgb,
    pub grid_width: f32,
    pub align: CellAlign,
}

impl TableStyle {
    /// Compact, centred styling used for worksheets.
    pub fn spreadsheet() -> Self {
        Self {
            header_background: Rgb::ACCENT,
            header_text: Rgb::WHITESMOKE,
            header_font_size: 7.0,
            header_bottom_padding: 5.0,
            body_font_size: 5.0,
            row_backgrounds: [Rgb::WHITE, Rgb::ZEBRA],
            grid_color: Rgb::GRID,
            grid_width: 0.5,
            align: CellAlign::Center,
        }
    }

    /// Same palette, larger type and left alignment for Word tables.
    pub fn document() -> Self {
        Self {
            header_font_size: 9.0,
            header_bottom_padding: 8.0,
            body_font_size: 8.0,
            align: CellAlign::Left,
            ..Self::spreadsheet()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Page size and margins, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSetup {
    pub width: f32,
    pub height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
}

impl PageSetup {
    /// A4 in the given orientation with the same margin on every side.
    pub fn a4(orientation: Orientation, margin: f32) -> Self {
        let (w, h) = match orientation {
            Orientation::Portrait => A4,
            Orientation::Landscape => (A4.1, A4.0),
        };
        Self {
            width: w,
            height: h,
            margin_left: margin,
            margin_right: margin,
            margin_top: margin,
            margin_bottom: margin,
        }
    }

    pub fn orientation(&self) -> Orientation {
        if self.width > self.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    pub fn content_height(&self) -> f32 {
        self.height - self.margin_top - self.margin_bottom
    }
}

/// Equal column widths filling `available`, never narrower than
/// [`MIN_COLUMN_WIDTH`]. The floor may make the table wider than `available`.
pub fn column_widths(available: f32, columns: usize) -> Vec<f32> {
    if columns == 0 {
        return Vec::new();
    }
    let width = (available / columns as f32).max(MIN_COLUMN_WIDTH);
    vec![width; columns]
}

/// Pad every row with empty cells to the width of the widest row.
pub fn pad_rows(rows: &mut [Vec<String>]) -> usize {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in rows.iter_mut() {
        row.resize(width, String::new());
    }
    width
}
