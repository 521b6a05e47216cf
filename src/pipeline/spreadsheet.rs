//! Workbooks: every sheet becomes one styled table.
//!
//! ## Why one orientation for the whole workbook?
//!
//! A PDF can switch page size per page, but a workbook printed with mixed
//! orientations is awkward to read. The widest row anywhere in the workbook
//! decides: more than [`LANDSCAPE_THRESHOLD`] filled cells and every page is
//! landscape, so the widest sheet gets the most room.

use crate::error::{ConvertError, ItemError};
use crate::layout::{
    column_widths, pad_rows, Block, HeadingLevel, Orientation, PageSetup, TableBlock, TableStyle, INCH,
};
use crate::pipeline::Converted;
use calamine::{open_workbook_auto_from_rs, Data, DataType, Range, Reader};
use std::io::Cursor;
use tracing::debug;

pub const EMPTY_MESSAGE: &str = "No data found in the spreadsheet.";

/// A row with more filled cells than this switches the workbook to landscape.
pub const LANDSCAPE_THRESHOLD: usize = 8;

/// One worksheet as a grid of display strings.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetGrid {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

/// Open the workbook and lay out all of its sheets.
///
/// A workbook calamine cannot open is fatal; a single sheet that fails to
/// load is skipped.
pub fn convert(bytes: &[u8]) -> Result<Converted, ConvertError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| ConvertError::Spreadsheet {
        detail: e.to_string(),
    })?;

    let names = workbook.sheet_names();
    debug!("Workbook has {} sheets", names.len());

    let mut sheets = Vec::with_capacity(names.len());
    let mut failed = Vec::new();
    for name in &names {
        match workbook.worksheet_range(name) {
            Ok(range) => sheets.push(SheetGrid {
                name: name.clone(),
                rows: grid(&range),
            }),
            Err(e) => failed.push(ItemError::Sheet {
                sheet: name.clone(),
                detail: e.to_string(),
            }),
        }
    }

    let mut out = layout_sheets(sheets, names.len() > 1);
    for err in failed {
        out.skip(err);
    }
    Ok(out)
}

/// Turn loaded sheets into blocks. `multiple` adds a heading per sheet.
pub fn layout_sheets(sheets: Vec<SheetGrid>, multiple: bool) -> Converted {
    let widest = sheets
        .iter()
        .flat_map(|s| &s.rows)
        .map(|row| row.iter().filter(|c| !c.is_empty()).count())
        .max()
        .unwrap_or(0);
    let orientation = if widest > LANDSCAPE_THRESHOLD {
        Orientation::Landscape
    } else {
        Orientation::Portrait
    };
    debug!("Widest row has {} filled cells → {:?}", widest, orientation);

    let mut out = Converted::new(PageSetup::a4(orientation, 0.25 * INCH));
    for sheet in sheets {
        if multiple {
            out.blocks.push(Block::heading(sheet.name, HeadingLevel::Primary));
            out.blocks.push(Block::Spacer(0.1 * INCH));
        }
        let rows = trim_grid(sheet.rows);
        if !rows.iter().any(|row| row.iter().any(|c| !c.is_empty())) {
            continue;
        }
        let columns = rows[0].len();
        out.blocks.push(Block::Table(TableBlock {
            rows,
            column_widths: column_widths(out.page.content_width(), columns),
            style: TableStyle::spreadsheet(),
        }));
        out.blocks.push(Block::Spacer(0.15 * INCH));
    }
    out.or_placeholder(EMPTY_MESSAGE)
}

/// Drop trailing all-empty rows, pad the rest to a rectangle, then drop
/// trailing all-empty columns.
pub fn trim_grid(mut rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
    while rows.last().is_some_and(|r| r.iter().all(String::is_empty)) {
        rows.pop();
    }
    let mut width = pad_rows(&mut rows);
    while width > 0 && rows.iter().all(|r| r[width - 1].is_empty()) {
        width -= 1;
        for row in rows.iter_mut() {
            row.truncate(width);
        }
    }
    rows
}

/// The sheet as strings, anchored at A1: calamine ranges start at the first
/// used cell, so leading empty rows and columns are put back.
fn grid(range: &Range<Data>) -> Vec<Vec<String>> {
    let (first_row, first_col) = range.start().unwrap_or((0, 0));
    let lead = vec![String::new(); first_col as usize];
    let mut rows: Vec<Vec<String>> = (0..first_row).map(|_| Vec::new()).collect();
    for row in range.rows() {
        let mut cells = lead.clone();
        cells.extend(row.iter().map(cell_text));
        rows.push(cells);
    }
    rows
}

/// Display string of one cell value.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::DateTime(dt) => match cell.as_datetime() {
            Some(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        },
        Data::Error(e) => e.to_string(),
    }
}
