//! PDF rendering: lay a block sequence out onto pages and serialise it with lopdf.
//!
//! ## Why a hand-rolled flow layout?
//!
//! lopdf writes PDF objects but knows nothing about pages filling up. The
//! layout needed here is small: a single frame per page, a vertical cursor,
//! greedy word wrap with the Helvetica AFM metrics from [`super::fonts`],
//! and tables whose rows never split. Everything is drawn with the base-14
//! fonts, so no font files are read or embedded.
//!
//! ## Coordinates
//!
//! PDF space has its origin at the bottom-left. The writer tracks `used`,
//! the distance already consumed from the top of the frame, and converts to
//! PDF y only when emitting operators.

use crate::error::ConvertError;
use crate::layout::{Block, CellAlign, HeadingLevel, ImageBlock, PageSetup, Rgb, TableBlock};
use crate::markup::{self, Span, SpanStyle};
use crate::pipeline::fonts::{encode_win_ansi, Font};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::debug;

pub const BODY_FONT_SIZE: f32 = 10.0;
pub const BODY_LEADING: f32 = 12.0;
const HEADING_SPACE_BEFORE: f32 = 12.0;
const HEADING_SPACE_AFTER: f32 = 6.0;
const CELL_PADDING: f32 = 3.0;
/// Leading as a multiple of font size for headings and table cells.
const LINE_SPACING: f32 = 1.2;

/// Value of the `/Producer` entry in the document info dictionary.
pub const PRODUCER: &str = concat!("doc2pdf ", env!("CARGO_PKG_VERSION"));

/// Renderer inputs that do not come from the converter.
#[derive(Debug, Clone)]
pub struct RenderOptions<'a> {
    /// `/Title` of the document info dictionary.
    pub title: &'a str,
    /// Longest edge, in pixels, of embedded images.
    pub max_image_pixels: u32,
}

/// A serialised PDF.
#[derive(Debug)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Lay `blocks` out on pages of `setup` and serialise the result.
///
/// Always produces at least one page, even for an empty block list.
pub fn render(blocks: &[Block], setup: &PageSetup, options: &RenderOptions<'_>) -> Result<RenderedPdf, ConvertError> {
    let mut writer = PageWriter::new(*setup, options.max_image_pixels);
    for block in blocks {
        writer.place(block)?;
    }
    writer.drop_trailing_blank_pages();
    let page_count = writer.pages.len();
    let bytes = writer.finish(options.title)?;
    debug!("Rendered {} blocks onto {} pages ({} bytes)", blocks.len(), page_count, bytes.len());
    Ok(RenderedPdf { bytes, page_count })
}

// ── Line breaking ────────────────────────────────────────────────────────────

/// A same-font stretch of a laid-out line.
#[derive(Debug, Clone, PartialEq)]
struct Fragment {
    text: String,
    font: Font,
    underline: bool,
    width: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Line {
    fragments: Vec<Fragment>,
    width: f32,
}

impl Line {
    fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    fn push(&mut self, text: &str, font: Font, underline: bool, width: f32) {
        self.width += width;
        if let Some(last) = self.fragments.last_mut() {
            if last.font == font && last.underline == underline {
                last.text.push_str(text);
                last.width += width;
                return;
            }
        }
        self.fragments.push(Fragment {
            text: text.to_string(),
            font,
            underline,
            width,
        });
    }
}

/// Split text into alternating whitespace and non-whitespace runs.
fn tokens(text: &str) -> impl Iterator<Item = (bool, &str)> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let first = rest.chars().next()?;
        let space = first.is_whitespace();
        let end = rest
            .char_indices()
            .find(|(_, c)| c.is_whitespace() != space)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let (token, tail) = rest.split_at(end);
        rest = tail;
        Some((space, token))
    })
}

/// Greedy word wrap of styled spans into lines no wider than `max_width`.
///
/// Whitespace runs collapse to a single space and vanish at line starts and
/// ends. Words wider than a whole line are broken between characters.
fn wrap(spans: &[Span], size: f32, max_width: f32) -> Vec<Line> {
    let max_width = max_width.max(1.0);
    let mut lines = Vec::new();
    let mut line = Line::default();
    // Style of the whitespace seen since the last word, if any.
    let mut pending_space: Option<(Font, bool)> = None;

    for span in spans {
        let (text, style) = match span {
            Span::LineBreak => {
                lines.push(std::mem::take(&mut line));
                pending_space = None;
                continue;
            }
            Span::Text { text, style } => (text, style),
        };
        let font = Font::select(style.bold, style.italic);
        for (is_space, token) in tokens(text) {
            if is_space {
                if !line.is_empty() {
                    pending_space = Some((font, style.underline));
                }
                continue;
            }
            let word_width = font.text_width(token, size);
            let space_width = pending_space
                .map(|(f, _)| f.text_width(" ", size))
                .unwrap_or(0.0);
            if !line.is_empty() && line.width + space_width + word_width > max_width {
                lines.push(std::mem::take(&mut line));
                pending_space = None;
            }
            if let Some((space_font, space_underline)) = pending_space.take() {
                line.push(" ", space_font, space_underline, space_width);
            }
            if word_width <= max_width {
                line.push(token, font, style.underline, word_width);
                continue;
            }
            for c in token.chars() {
                let w = font.char_width(c) as f32 * size / 1000.0;
                if !line.is_empty() && line.width + w > max_width {
                    lines.push(std::mem::take(&mut line));
                }
                let mut buf = [0u8; 4];
                line.push(c.encode_utf8(&mut buf), font, style.underline, w);
            }
        }
    }
    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

fn plain_spans(text: &str, bold: bool) -> Vec<Span> {
    let style = SpanStyle {
        bold,
        ..SpanStyle::default()
    };
    let mut spans = Vec::new();
    for (i, part) in text.split('\n').enumerate() {
        if i > 0 {
            spans.push(Span::LineBreak);
        }
        spans.push(Span::Text {
            text: part.to_string(),
            style,
        });
    }
    spans
}

// ── Page writer ──────────────────────────────────────────────────────────────

#[derive(Default)]
struct Page {
    ops: Vec<Operation>,
    /// XObject resource name → image object.
    images: Vec<(String, ObjectId)>,
}

struct PageWriter {
    doc: Document,
    setup: PageSetup,
    max_image_pixels: u32,
    pages: Vec<Page>,
    /// Points consumed from the top of the current page's frame.
    used: f32,
    /// Whether anything visible was drawn on the current page.
    drawn: bool,
    image_count: usize,
}

impl PageWriter {
    fn new(setup: PageSetup, max_image_pixels: u32) -> Self {
        Self {
            doc: Document::with_version("1.5"),
            setup,
            max_image_pixels,
            pages: vec![Page::default()],
            used: 0.0,
            drawn: false,
            image_count: 0,
        }
    }

    fn place(&mut self, block: &Block) -> Result<(), ConvertError> {
        match block {
            Block::Heading { text, level } => self.heading(text, *level),
            Block::Paragraph(markup) => self.paragraph(markup),
            Block::Table(table) => self.table(table),
            Block::Image(image) => self.image(image)?,
            Block::PageBreak => {
                if self.drawn {
                    self.new_page();
                }
            }
            Block::Spacer(height) => {
                if self.used + height > self.setup.content_height() {
                    self.new_page();
                } else {
                    self.used += height;
                }
            }
        }
        Ok(())
    }

    /// A spacer or page break at the very end can leave pages with nothing
    /// on them; the first page always stays.
    fn drop_trailing_blank_pages(&mut self) {
        while self.pages.len() > 1 && self.pages.last().is_some_and(|p| p.ops.is_empty()) {
            self.pages.pop();
        }
    }

    fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.used = 0.0;
        self.drawn = false;
    }

    /// Move to a new page unless `height` still fits. Content taller than a
    /// whole frame is placed at the top of a fresh page and overflows.
    fn reserve(&mut self, height: f32) {
        if self.drawn && self.used + height > self.setup.content_height() {
            self.new_page();
        }
    }

    /// PDF y of a point `offset` below the current cursor.
    fn y_below_cursor(&self, offset: f32) -> f32 {
        self.setup.height - self.setup.margin_top - self.used - offset
    }

    fn ops(&mut self) -> &mut Vec<Operation> {
        // `pages` is never empty: it starts with one page and only grows.
        let last = self.pages.len() - 1;
        &mut self.pages[last].ops
    }

    fn heading(&mut self, text: &str, level: HeadingLevel) {
        let size = level.font_size();
        if self.drawn {
            self.used += HEADING_SPACE_BEFORE;
        }
        let lines = wrap(&plain_spans(text.trim(), true), size, self.setup.content_width());
        self.draw_lines(&lines, size, size * LINE_SPACING, Rgb::BLACK);
        self.used += HEADING_SPACE_AFTER;
    }

    fn paragraph(&mut self, markup: &str) {
        let lines = wrap(&markup::parse(markup), BODY_FONT_SIZE, self.setup.content_width());
        self.draw_lines(&lines, BODY_FONT_SIZE, BODY_LEADING, Rgb::BLACK);
    }

    /// Left-aligned lines at the frame's left edge, breaking pages between lines.
    fn draw_lines(&mut self, lines: &[Line], size: f32, leading: f32, color: Rgb) {
        let x = self.setup.margin_left;
        for line in lines {
            self.reserve(leading);
            let baseline = self.y_below_cursor(size);
            self.draw_line(line, x, baseline, size, color);
            self.used += leading;
            self.drawn = true;
        }
    }

    fn draw_line(&mut self, line: &Line, x: f32, baseline: f32, size: f32, color: Rgb) {
        let mut x = x;
        for fragment in &line.fragments {
            self.ops().extend(text_ops(fragment, x, baseline, size, color));
            if fragment.underline {
                let ops = self.ops();
                ops.push(fill_color(color));
                ops.push(Operation::new(
                    "re",
                    vec![x.into(), (baseline - 1.5).into(), fragment.width.into(), 0.5f32.into()],
                ));
                ops.push(Operation::new("f", vec![]));
            }
            x += fragment.width;
        }
    }

    fn table(&mut self, table: &TableBlock) {
        let style = &table.style;
        let total = table.total_width();
        let frame = self.setup.content_width();
        // Narrow tables are centred; wide ones start at the margin and run off the page.
        let x0 = if total <= frame {
            self.setup.margin_left + (frame - total) / 2.0
        } else {
            self.setup.margin_left
        };

        for (r, row) in table.rows.iter().enumerate() {
            let header = r == 0;
            let (size, text_color, background, bottom_pad) = if header {
                (
                    style.header_font_size,
                    style.header_text,
                    style.header_background,
                    style.header_bottom_padding,
                )
            } else {
                (
                    style.body_font_size,
                    Rgb::BLACK,
                    style.row_backgrounds[(r - 1) % 2],
                    CELL_PADDING,
                )
            };
            let leading = size * LINE_SPACING;

            let cells: Vec<Vec<Line>> = row
                .iter()
                .zip(&table.column_widths)
                .map(|(text, width)| wrap(&plain_spans(text, header), size, width - 2.0 * CELL_PADDING))
                .collect();
            let line_count = cells.iter().map(Vec::len).max().unwrap_or(1).max(1);
            let height = CELL_PADDING + line_count as f32 * leading + bottom_pad;

            self.reserve(height);
            let top = self.y_below_cursor(0.0);
            let bottom = top - height;

            let ops = self.ops();
            ops.push(fill_color(background));
            ops.push(Operation::new(
                "re",
                vec![x0.into(), bottom.into(), total.into(), height.into()],
            ));
            ops.push(Operation::new("f", vec![]));

            let mut cell_x = x0;
            for (lines, width) in cells.iter().zip(&table.column_widths) {
                for (k, line) in lines.iter().enumerate() {
                    let x = match style.align {
                        CellAlign::Left => cell_x + CELL_PADDING,
                        CellAlign::Center => cell_x + (width - line.width) / 2.0,
                    };
                    let baseline = top - CELL_PADDING - k as f32 * leading - size;
                    self.draw_line(line, x, baseline, size, text_color);
                }
                cell_x += width;
            }

            let [gr, gg, gb] = style.grid_color.unit();
            let ops = self.ops();
            ops.push(Operation::new("w", vec![style.grid_width.into()]));
            ops.push(Operation::new("RG", vec![gr.into(), gg.into(), gb.into()]));
            let mut cell_x = x0;
            for width in &table.column_widths {
                ops.push(Operation::new(
                    "re",
                    vec![cell_x.into(), bottom.into(), (*width).into(), height.into()],
                ));
                cell_x += width;
            }
            ops.push(Operation::new("S", vec![]));

            self.used += height;
            self.drawn = true;
        }
    }

    fn image(&mut self, image: &ImageBlock) -> Result<(), ConvertError> {
        self.reserve(image.height);
        let name = self.embed_image(image)?;
        let frame = self.setup.content_width();
        let x = self.setup.margin_left + ((frame - image.width) / 2.0).max(0.0);
        let y = self.y_below_cursor(image.height);
        let ops = self.ops();
        ops.push(Operation::new("q", vec![]));
        ops.push(Operation::new(
            "cm",
            vec![
                image.width.into(),
                0f32.into(),
                0f32.into(),
                image.height.into(),
                x.into(),
                y.into(),
            ],
        ));
        ops.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
        ops.push(Operation::new("Q", vec![]));
        self.used += image.height;
        self.drawn = true;
        Ok(())
    }

    /// Decode, downscale and add an image XObject to the current page's resources.
    fn embed_image(&mut self, image: &ImageBlock) -> Result<String, ConvertError> {
        let decoded = image::open(&image.path).map_err(|e| ConvertError::Image {
            name: image.name.clone(),
            detail: e.to_string(),
        })?;
        let decoded = downscale(decoded, self.max_image_pixels);
        let (width, height) = decoded.dimensions();
        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            rgb_on_white(&decoded),
        );
        let id = self.doc.add_object(stream);
        self.image_count += 1;
        let name = format!("Im{}", self.image_count);
        let last = self.pages.len() - 1;
        self.pages[last].images.push((name.clone(), id));
        debug!(
            "Embedded {} as {} ({}x{} px)",
            image.path.display(),
            name,
            width,
            height
        );
        Ok(name)
    }

    /// Assemble the page tree, catalog and info dictionary and serialise.
    fn finish(mut self, title: &str) -> Result<Vec<u8>, ConvertError> {
        let pages_id = self.doc.new_object_id();

        let mut fonts = Dictionary::new();
        for font in Font::ALL {
            let id = self.doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font.resource_name(), id);
        }
        let fonts_id = self.doc.add_object(fonts);

        let mut kids = Vec::with_capacity(self.pages.len());
        for page in std::mem::take(&mut self.pages) {
            let content = Content {
                operations: page.ops,
            };
            let content_id = self.doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let mut resources = dictionary! { "Font" => fonts_id };
            if !page.images.is_empty() {
                let mut xobjects = Dictionary::new();
                for (name, id) in page.images {
                    xobjects.set(name, id);
                }
                resources.set("XObject", xobjects);
            }
            let page_id = self.doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources,
            });
            kids.push(Object::from(page_id));
        }

        let count = kids.len() as i64;
        self.doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => vec![
                    Object::from(0f32),
                    Object::from(0f32),
                    Object::from(self.setup.width),
                    Object::from(self.setup.height),
                ],
            }),
        );
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = self.doc.add_object(dictionary! {
            "Title" => Object::String(encode_win_ansi(title), StringFormat::Literal),
            "Producer" => Object::string_literal(PRODUCER),
        });
        self.doc.trailer.set("Root", catalog_id);
        self.doc.trailer.set("Info", info_id);

        self.doc.compress();
        let mut out = Vec::new();
        self.doc.save_to(&mut out)?;
        Ok(out)
    }
}

fn fill_color(color: Rgb) -> Operation {
    let [r, g, b] = color.unit();
    Operation::new("rg", vec![r.into(), g.into(), b.into()])
}

fn text_ops(fragment: &Fragment, x: f32, baseline: f32, size: f32, color: Rgb) -> [Operation; 6] {
    [
        Operation::new("BT", vec![]),
        fill_color(color),
        Operation::new(
            "Tf",
            vec![Object::Name(fragment.font.resource_name().as_bytes().to_vec()), size.into()],
        ),
        Operation::new("Td", vec![x.into(), baseline.into()]),
        Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(&fragment.text), StringFormat::Literal)],
        ),
        Operation::new("ET", vec![]),
    ]
}

/// Shrink so the longest edge is at most `max_pixels`. Never enlarges.
fn downscale(image: DynamicImage, max_pixels: u32) -> DynamicImage {
    let (w, h) = image.dimensions();
    if w.max(h) <= max_pixels {
        return image;
    }
    image.resize(max_pixels, max_pixels, FilterType::Lanczos3)
}

/// Raw 8-bit RGB samples; transparent pixels are composited onto white.
fn rgb_on_white(image: &DynamicImage) -> Vec<u8> {
    if !image.color().has_alpha() {
        return image.to_rgb8().into_raw();
    }
    let rgba = image.to_rgba8();
    let mut out = Vec::with_capacity(rgba.width() as usize * rgba.height() as usize * 3);
    for px in rgba.pixels() {
        let [r, g, b, a] = px.0;
        let a = a as u16;
        for c in [r, g, b] {
            out.push(((c as u16 * a + 255 * (255 - a)) / 255) as u8);
        }
    }
    out
}
