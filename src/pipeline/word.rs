//! Word documents: body paragraphs in order, then every top-level table.
//!
//! The `.docx` body is read with `quick-xml` directly from
//! `word/document.xml`. Paragraph styles are referenced by id, so
//! `word/styles.xml` is consulted to get the display name ("Heading 1",
//! "Title") that decides whether a paragraph is a heading.
//!
//! Formatting is taken from each run's direct properties (`w:b`, `w:i`,
//! `w:u`); formatting inherited from styles is not resolved. Legacy binary
//! `.doc` files are not zip packages and fail to open.

use crate::error::{ConvertError, ItemError};
use crate::layout::{column_widths, pad_rows, Block, HeadingLevel, Orientation, PageSetup, TableBlock, TableStyle, INCH};
use crate::markup;
use crate::pipeline::ooxml::{attr, toggle, Package};
use crate::pipeline::Converted;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use tracing::{debug, warn};

pub const EMPTY_MESSAGE: &str = "No content found in the document.";

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";

type XmlResult<T> = Result<T, quick_xml::Error>;

/// A run of text with its direct formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    /// Tabs are `\t`, breaks are `\n`.
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordParagraph {
    pub style_id: Option<String>,
    pub runs: Vec<Run>,
}

impl WordParagraph {
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// A top-level element of the document body. The error side holds the
/// reason an element could not be converted.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyItem {
    Paragraph(Result<WordParagraph, String>),
    Table(Result<Vec<Vec<String>>, String>),
}

pub fn convert(bytes: &[u8]) -> Result<Converted, ConvertError> {
    let mut package = Package::open(bytes, "word")?;
    let document = package.read_string(DOCUMENT_PART)?;

    let styles = if package.has_part(STYLES_PART) {
        let xml = package.read_string(STYLES_PART)?;
        parse_styles(&xml).unwrap_or_else(|e| {
            warn!("Ignoring unreadable {}: {}", STYLES_PART, e);
            StyleSheet::default()
        })
    } else {
        StyleSheet::default()
    };

    let items = parse_body(&document).map_err(|e| ConvertError::xml(DOCUMENT_PART, e))?;
    debug!("Document body has {} top-level elements", items.len());
    Ok(layout_document(items, &styles))
}

/// Paragraphs first, in order, then tables, in order.
pub fn layout_document(items: Vec<BodyItem>, styles: &StyleSheet) -> Converted {
    let mut out = Converted::new(PageSetup::a4(Orientation::Portrait, 0.75 * INCH));
    let mut tables = Vec::new();
    let mut paragraph_index = 0;

    for item in items {
        match item {
            BodyItem::Paragraph(p) => {
                paragraph_index += 1;
                match p {
                    Ok(p) => push_paragraph(&mut out, &p, styles),
                    Err(detail) => out.skip(ItemError::Paragraph {
                        index: paragraph_index,
                        detail,
                    }),
                }
            }
            BodyItem::Table(t) => tables.push(t),
        }
    }

    for (i, table) in tables.into_iter().enumerate() {
        match table {
            Ok(rows) => push_table(&mut out, rows),
            Err(detail) => out.skip(ItemError::Table { index: i + 1, detail }),
        }
    }

    out.or_placeholder(EMPTY_MESSAGE)
}

fn push_paragraph(out: &mut Converted, paragraph: &WordParagraph, styles: &StyleSheet) {
    let text = paragraph.text();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        out.blocks.push(Block::Spacer(0.1 * INCH));
        return;
    }
    let style = styles.name_for(paragraph.style_id.as_deref());
    let block = match heading_level(&style) {
        Some(level) => Block::heading(trimmed, level),
        None => Block::paragraph(runs_markup(&paragraph.runs)),
    };
    out.blocks.push(block);
    out.blocks.push(Block::Spacer(0.05 * INCH));
}

fn push_table(out: &mut Converted, mut rows: Vec<Vec<String>>) {
    let columns = pad_rows(&mut rows);
    if rows.is_empty() || columns == 0 {
        return;
    }
    out.blocks.push(Block::Table(TableBlock {
        rows,
        column_widths: column_widths(out.page.content_width(), columns),
        style: TableStyle::document(),
    }));
    out.blocks.push(Block::Spacer(0.2 * INCH));
}

/// Heading level for a style display name; `None` for body text.
pub fn heading_level(style_name: &str) -> Option<HeadingLevel> {
    if style_name.contains("Heading 1") || style_name.contains("Title") {
        Some(HeadingLevel::Primary)
    } else if style_name.contains("Heading") {
        Some(HeadingLevel::Secondary)
    } else {
        None
    }
}

/// Concatenate runs, each escaped and wrapped bold, then italic, then underline.
pub fn runs_markup(runs: &[Run]) -> String {
    let mut out = String::new();
    for run in runs {
        let mut text = markup::escape_multiline(&run.text);
        if run.bold {
            text = format!("<b>{text}</b>");
        }
        if run.italic {
            text = format!("<i>{text}</i>");
        }
        if run.underline {
            text = format!("<u>{text}</u>");
        }
        out.push_str(&text);
    }
    out
}

// ── Styles ───────────────────────────────────────────────────────────────────

/// Paragraph style names by id.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    names: HashMap<String, String>,
    default_paragraph: Option<String>,
}

impl StyleSheet {
    /// Display name of a paragraph's style. Paragraphs without a style, or
    /// with an unknown one, use the default paragraph style.
    pub fn name_for(&self, style_id: Option<&str>) -> String {
        let raw = style_id
            .and_then(|id| self.names.get(id))
            .or(self.default_paragraph.as_ref())
            .map(String::as_str)
            .unwrap_or("Normal");
        display_name(raw)
    }
}

/// Built-in styles are stored lowercase ("heading 1") but shown capitalised.
fn display_name(raw: &str) -> String {
    if let Some(level) = raw.strip_prefix("heading ") {
        return format!("Heading {level}");
    }
    match raw {
        "title" => "Title".to_string(),
        "subtitle" => "Subtitle".to_string(),
        "normal" => "Normal".to_string(),
        _ => raw.to_string(),
    }
}

pub fn parse_styles(xml: &str) -> XmlResult<StyleSheet> {
    let mut reader = Reader::from_str(xml);
    let mut sheet = StyleSheet::default();
    // (type, id, is default, name) of the style being read.
    let mut current: Option<(String, String, bool, Option<String>)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:style" => {
                current = Some((
                    attr(&e, b"w:type").unwrap_or_default(),
                    attr(&e, b"w:styleId").unwrap_or_default(),
                    attr(&e, b"w:default").is_some_and(|v| v == "1" || v == "true"),
                    None,
                ));
            }
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"w:name" => {
                if let Some((_, _, _, name)) = current.as_mut() {
                    *name = attr(&e, b"w:val");
                }
            }
            Event::End(e) if e.name().as_ref() == b"w:style" => {
                if let Some((kind, id, is_default, Some(name))) = current.take() {
                    if kind == "paragraph" {
                        if is_default {
                            sheet.default_paragraph = Some(name.clone());
                        }
                        sheet.names.insert(id, name);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(sheet)
}

// ── Body ─────────────────────────────────────────────────────────────────────

/// Top-level paragraphs and tables of `word/document.xml`, in order.
///
/// Malformed XML is fatal; an element whose text cannot be decoded is
/// returned as an error item so the caller can skip just that element.
pub fn parse_body(xml: &str) -> XmlResult<Vec<BodyItem>> {
    let mut reader = Reader::from_str(xml);
    let mut items = Vec::new();
    let mut in_body = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:body" => in_body = true,
                _ if !in_body => {}
                b"w:p" => items.push(BodyItem::Paragraph(parse_paragraph(&mut reader)?)),
                b"w:tbl" => items.push(BodyItem::Table(parse_table(&mut reader)?)),
                // Content controls wrap body content without changing it.
                b"w:sdt" | b"w:sdtContent" | b"w:customXml" => {}
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::Empty(e) if in_body && e.name().as_ref() == b"w:p" => {
                items.push(BodyItem::Paragraph(Ok(WordParagraph::default())));
            }
            Event::End(e) if e.name().as_ref() == b"w:body" => in_body = false,
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(items)
}

/// Read a paragraph after its `<w:p>` start tag, through `</w:p>`.
fn parse_paragraph(reader: &mut Reader<&[u8]>) -> XmlResult<Result<WordParagraph, String>> {
    let mut paragraph = WordParagraph::default();
    let mut problem = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:pPr" => paragraph.style_id = parse_paragraph_props(reader)?,
                b"w:r" => match parse_run(reader)? {
                    Ok(run) => paragraph.runs.push(run),
                    Err(detail) => {
                        problem.get_or_insert(detail);
                    }
                },
                // Containers whose runs are part of the paragraph text.
                b"w:hyperlink" | b"w:ins" | b"w:smartTag" | b"w:fldSimple" | b"w:sdt" | b"w:sdtContent"
                | b"w:customXml" | b"w:moveTo" | b"w:dir" | b"w:bdo" => {}
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::End(e) if e.name().as_ref() == b"w:p" => break,
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(match problem {
        Some(detail) => Err(detail),
        None => Ok(paragraph),
    })
}

fn parse_paragraph_props(reader: &mut Reader<&[u8]>) -> XmlResult<Option<String>> {
    let mut style = None;
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"w:pStyle" => {
                style = attr(&e, b"w:val");
            }
            Event::Start(e) if e.name().as_ref() == b"w:pPrChange" => {
                reader.read_to_end(e.name())?;
            }
            Event::End(e) if e.name().as_ref() == b"w:pPr" => break,
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(style)
}

fn parse_run(reader: &mut Reader<&[u8]>) -> XmlResult<Result<Run, String>> {
    let mut run = Run::default();
    let mut in_text = false;
    let mut problem = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:rPr" => parse_run_props(reader, &mut run)?,
                b"w:t" => in_text = true,
                // Drawings, embedded objects, deleted text, field codes.
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" | b"w:ptab" => run.text.push('\t'),
                b"w:br" | b"w:cr" => run.text.push('\n'),
                b"w:noBreakHyphen" => run.text.push('-'),
                _ => {}
            },
            Event::Text(t) if in_text => match t.unescape() {
                Ok(text) => run.text.push_str(&text),
                Err(e) => {
                    problem.get_or_insert(e.to_string());
                }
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:r" => break,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(match problem {
        Some(detail) => Err(detail),
        None => Ok(run),
    })
}

fn parse_run_props(reader: &mut Reader<&[u8]>, run: &mut Run) -> XmlResult<()> {
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                b"w:b" => run.bold = toggle(&e, b"w:val"),
                b"w:i" => run.italic = toggle(&e, b"w:val"),
                b"w:u" => run.underline = toggle(&e, b"w:val"),
                b"w:rPrChange" => {
                    reader.read_to_end(e.name())?;
                }
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == b"w:rPr" => break,
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(())
}

/// Read a table after its `<w:tbl>` start tag. Nested tables are skipped.
fn parse_table(reader: &mut Reader<&[u8]>) -> XmlResult<Result<Vec<Vec<String>>, String>> {
    let mut rows = Vec::new();
    let mut problem = None;
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tr" => rows.push(parse_row(reader, &mut problem)?),
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::End(e) if e.name().as_ref() == b"w:tbl" => break,
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(match problem {
        Some(detail) => Err(detail),
        None => Ok(rows),
    })
}

fn parse_row(reader: &mut Reader<&[u8]>, problem: &mut Option<String>) -> XmlResult<Vec<String>> {
    let mut cells = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tc" => {
                    let (text, span) = parse_cell(reader, problem)?;
                    cells.push(text);
                    // A merged cell occupies `span` grid columns.
                    cells.extend(std::iter::repeat(String::new()).take(span.saturating_sub(1)));
                }
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::End(e) if e.name().as_ref() == b"w:tr" => break,
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(cells)
}

/// Cell text (paragraphs joined with `\n`, trimmed) and its grid span.
fn parse_cell(reader: &mut Reader<&[u8]>, problem: &mut Option<String>) -> XmlResult<(String, usize)> {
    let mut paragraphs = Vec::new();
    let mut span = 1;
    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tcPr" => span = parse_cell_props(reader)?,
                b"w:p" => match parse_paragraph(reader)? {
                    Ok(p) => paragraphs.push(p.text()),
                    Err(detail) => {
                        problem.get_or_insert(detail);
                    }
                },
                _ => {
                    reader.read_to_end(e.name())?;
                }
            },
            Event::Empty(e) if e.name().as_ref() == b"w:p" => paragraphs.push(String::new()),
            Event::End(e) if e.name().as_ref() == b"w:tc" => break,
            Event::Eof => break,
            _ => {}
        }
    }
    Ok((paragraphs.join("\n").trim().to_string(), span))
}

fn parse_cell_props(reader: &mut Reader<&[u8]>) -> XmlResult<usize> {
    let mut span = 1;
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"w:gridSpan" => {
                span = attr(&e, b"w:val")
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(1)
                    .max(1);
            }
            Event::Start(e) if e.name().as_ref() == b"w:tcPrChange" => {
                reader.read_to_end(e.name())?;
            }
            Event::End(e) if e.name().as_ref() == b"w:tcPr" => break,
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(span)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"
            xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<w:body>{body}<w:sectPr><w:pgSz w:w="11906" w:h="16838"/></w:sectPr></w:body></w:document>"#
        )
    }

    fn convert_body(body: &str) -> Converted {
        layout_document(parse_body(&document(body)).unwrap(), &StyleSheet::default())
    }

    fn paragraphs(c: &Converted) -> Vec<&str> {
        c.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Paragraph(m) => Some(m.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn runs_carry_their_own_formatting() {
        let c = convert_body(
            r#"<w:p>
                <w:r><w:t xml:space="preserve">plain </w:t></w:r>
                <w:r><w:rPr><w:b/><w:i/></w:rPr><w:t>both</w:t></w:r>
                <w:r><w:rPr><w:b w:val="0"/><w:u w:val="single"/></w:rPr><w:t xml:space="preserve"> under</w:t></w:r>
               </w:p>"#,
        );
        assert_eq!(paragraphs(&c), vec!["plain <i><b>both</b></i><u> under</u>"]);
    }

    #[test]
    fn underline_none_is_not_underlined() {
        let c = convert_body(r#"<w:p><w:r><w:rPr><w:u w:val="none"/></w:rPr><w:t>x</w:t></w:r></w:p>"#);
        assert_eq!(paragraphs(&c), vec!["x"]);
    }

    #[test]
    fn run_text_is_escaped_and_breaks_kept() {
        let c = convert_body(r#"<w:p><w:r><w:t>a &lt; b &amp; c</w:t><w:br/><w:t>next</w:t></w:r></w:p>"#);
        assert_eq!(paragraphs(&c), vec!["a &lt; b &amp; c<br/>next"]);
    }

    #[test]
    fn hyperlink_runs_are_included_and_drawings_skipped() {
        let c = convert_body(
            r#"<w:p>
                <w:r><w:t xml:space="preserve">see </w:t></w:r>
                <w:hyperlink r:id="rId5"><w:r><w:t>the site</w:t></w:r></w:hyperlink>
                <w:r><w:drawing><w:txbxContent><w:p><w:r><w:t>floating</w:t></w:r></w:p></w:txbxContent></w:drawing></w:r>
                <w:del><w:r><w:delText>removed</w:delText></w:r></w:del>
               </w:p>"#,
        );
        assert_eq!(paragraphs(&c), vec!["see the site"]);
    }

    #[test]
    fn field_insertion_and_control_runs_are_text_and_runless_paragraphs_are_spacers() {
        let c = convert_body(
            r#"<w:p>
                <w:fldSimple w:instr="PAGE"><w:r><w:t>7</w:t></w:r></w:fldSimple>
                <w:ins w:id="1"><w:r><w:t xml:space="preserve"> added</w:t></w:r></w:ins>
                <w:sdt><w:sdtPr/><w:sdtContent><w:r><w:t xml:space="preserve"> picked</w:t></w:r></w:sdtContent></w:sdt>
               </w:p>
               <w:p><w:pPr><w:jc w:val="center"/></w:pPr><w:bookmarkStart w:id="0" w:name="x"/><w:proofErr w:type="spellStart"/></w:p>"#,
        );
        assert_eq!(c.blocks[0], Block::paragraph("7 added picked"));
        assert_eq!(&c.blocks[2..], &[Block::Spacer(0.1 * INCH)]);
    }

    #[test]
    fn empty_paragraphs_become_spacers() {
        let c = convert_body(r#"<w:p/><w:p><w:r><w:t>   </w:t></w:r></w:p>"#);
        assert_eq!(c.blocks, vec![Block::Spacer(0.1 * INCH), Block::Spacer(0.1 * INCH)]);
    }

    #[test]
    fn headings_follow_style_names() {
        let styles = parse_styles(
            r#"<w:styles xmlns:w="w">
                <w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>
                <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style>
                <w:style w:type="paragraph" w:styleId="Heading3"><w:name w:val="heading 3"/></w:style>
                <w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/></w:style>
                <w:style w:type="paragraph" w:styleId="Subtitle"><w:name w:val="Subtitle"/></w:style>
                <w:style w:type="character" w:styleId="Strong"><w:name w:val="Strong"/></w:style>
            </w:styles>"#,
        )
        .unwrap();
        let para = |id: &str, text: &str| {
            format!(r#"<w:p><w:pPr><w:pStyle w:val="{id}"/></w:pPr><w:r><w:t>{text}</w:t></w:r></w:p>"#)
        };
        let body = [
            para("Heading1", " Intro "),
            para("Heading3", "Detail"),
            para("Title", "Doc"),
            para("Subtitle", "Sub"),
            para("Unknown", "Body"),
        ]
        .concat();
        let c = layout_document(parse_body(&document(&body)).unwrap(), &styles);
        let blocks: Vec<_> = c.blocks.iter().filter(|b| !b.is_spacer()).cloned().collect();
        assert_eq!(
            blocks,
            vec![
                Block::heading("Intro", HeadingLevel::Primary),
                Block::heading("Detail", HeadingLevel::Secondary),
                Block::heading("Doc", HeadingLevel::Primary),
                Block::paragraph("Sub"),
                Block::paragraph("Body"),
            ]
        );
    }

    #[test]
    fn tables_come_after_all_paragraphs() {
        let c = convert_body(
            r#"<w:p><w:r><w:t>before</w:t></w:r></w:p>
               <w:tbl>
                 <w:tblPr/><w:tblGrid><w:gridCol/><w:gridCol/><w:gridCol/></w:tblGrid>
                 <w:tr>
                   <w:tc><w:tcPr><w:gridSpan w:val="2"/></w:tcPr><w:p><w:r><w:t>wide</w:t></w:r></w:p></w:tc>
                   <w:tc><w:p><w:r><w:t>c</w:t></w:r></w:p></w:tc>
                 </w:tr>
                 <w:tr>
                   <w:tc><w:p><w:r><w:t>one</w:t></w:r></w:p><w:p><w:r><w:t>two </w:t></w:r></w:p></w:tc>
                 </w:tr>
               </w:tbl>
               <w:p><w:r><w:t>after</w:t></w:r></w:p>"#,
        );
        assert_eq!(c.blocks.len(), 6);
        assert_eq!(c.blocks[0], Block::paragraph("before"));
        assert_eq!(c.blocks[2], Block::paragraph("after"));
        let Block::Table(table) = &c.blocks[4] else {
            panic!("expected a table, got {:?}", c.blocks[4]);
        };
        assert_eq!(table.rows, vec![vec!["wide", "", "c"], vec!["one\ntwo", "", ""]]);
        assert_eq!(table.style, TableStyle::document());
        assert_eq!(c.blocks[5], Block::Spacer(0.2 * INCH));
    }

    #[test]
    fn nested_tables_are_not_top_level() {
        let items = parse_body(&document(
            r#"<w:tbl><w:tr><w:tc><w:tbl><w:tr><w:tc><w:p><w:r><w:t>inner</w:t></w:r></w:p></w:tc></w:tr></w:tbl><w:p/></w:tc></w:tr></w:tbl>"#,
        ))
        .unwrap();
        assert_eq!(items, vec![BodyItem::Table(Ok(vec![vec![String::new()]]))]);
    }

    #[test]
    fn bad_entity_skips_only_that_paragraph() {
        let c = convert_body(
            r#"<w:p><w:r><w:t>broken &bogus; entity</w:t></w:r></w:p>
               <w:p><w:r><w:t>fine</w:t></w:r></w:p>"#,
        );
        assert_eq!(paragraphs(&c), vec!["fine"]);
        assert_eq!(c.warnings.len(), 1);
        assert!(matches!(c.warnings[0], ItemError::Paragraph { index: 1, .. }));
    }

    #[test]
    fn empty_document_gets_placeholder() {
        let c = convert_body("");
        assert_eq!(c.blocks, vec![Block::paragraph(EMPTY_MESSAGE)]);
    }

    #[test]
    fn malformed_document_is_fatal() {
        assert!(parse_body("<w:document><w:body><w:p></w:body></w:document>").is_err());
    }

    #[test]
    fn default_style_name_without_styles_part() {
        assert_eq!(StyleSheet::default().name_for(None), "Normal");
        assert_eq!(StyleSheet::default().name_for(Some("Heading1")), "Normal");
    }
}
