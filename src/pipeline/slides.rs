//! Slide decks: a heading per slide, then its pictures, then its text.
//!
//! Slides are read straight from the `.pptx` package: the slide order comes
//! from `p:sldIdLst` in `ppt/presentation.xml`, each slide's shapes from its
//! own part. Only two kinds of shape matter here: text shapes (`p:sp` with a
//! text body) and pictures (`p:pic`, whose `a:blip r:embed` names the image
//! part). Group shapes are flattened; charts, tables and connectors are
//! ignored. Legacy binary `.ppt` files are not zip packages and fail to open.

use crate::error::{ConvertError, ItemError};
use crate::layout::{Block, HeadingLevel, ImageBlock, Orientation, PageSetup, INCH};
use crate::markup;
use crate::pipeline::ooxml::{attr, Package};
use crate::pipeline::{Converted, Scratch};
use image::{DynamicImage, ImageFormat, ImageReader};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

pub const EMPTY_MESSAGE: &str = "No content could be extracted from the presentation.";
pub const EMPTY_SLIDE: &str = "<i>[Empty slide]</i>";

const PRESENTATION_PART: &str = "ppt/presentation.xml";

/// Widest a picture is ever shown, in points.
const MAX_IMAGE_WIDTH: f32 = 5.0 * INCH;

/// A shape of interest on a slide, in drawing order.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Paragraphs joined with `\n`; line breaks inside a paragraph are `\n` too.
    Text(String),
    /// Relationship id of the embedded image.
    Picture(String),
}

pub fn convert(bytes: &[u8], scratch: &Scratch) -> Result<Converted, ConvertError> {
    let mut package = Package::open(bytes, "presentation")?;
    let presentation = package.read_string(PRESENTATION_PART)?;
    let rels = package.relationships(PRESENTATION_PART)?;
    let slide_parts: Vec<String> = slide_ids(&presentation)
        .map_err(|e| ConvertError::xml(PRESENTATION_PART, e))?
        .iter()
        .filter_map(|id| rels.get(id).cloned())
        .collect();
    debug!("Presentation has {} slides", slide_parts.len());

    let mut out = Converted::new(PageSetup::a4(Orientation::Portrait, INCH));
    let total = slide_parts.len();
    for (i, part) in slide_parts.iter().enumerate() {
        let number = i + 1;
        out.blocks.push(Block::heading(format!("Slide {number}"), HeadingLevel::Primary));
        out.blocks.push(Block::Spacer(0.15 * INCH));

        match read_slide(&mut package, part) {
            Ok((shapes, slide_rels)) => {
                add_slide(&mut out, number, &shapes, &slide_rels, &mut package, scratch);
            }
            Err(e) => out.skip(ItemError::Slide {
                slide: number,
                detail: e.to_string(),
            }),
        }

        if number < total {
            out.blocks.push(Block::PageBreak);
        }
    }
    Ok(out.or_placeholder(EMPTY_MESSAGE))
}

fn read_slide(
    package: &mut Package<'_>,
    part: &str,
) -> Result<(Vec<Shape>, HashMap<String, String>), ConvertError> {
    let xml = package.read_string(part)?;
    let shapes = parse_slide(&xml).map_err(|e| ConvertError::xml(part, e))?;
    let rels = package.relationships(part)?;
    Ok((shapes, rels))
}

/// Emit one slide's pictures, then its text, or the empty-slide placeholder.
fn add_slide(
    out: &mut Converted,
    number: usize,
    shapes: &[Shape],
    rels: &HashMap<String, String>,
    package: &mut Package<'_>,
    scratch: &Scratch,
) {
    let max_width = out.page.content_width().min(MAX_IMAGE_WIDTH);
    let max_height = out.page.content_height();
    let mut has_image = false;

    for shape in shapes {
        let Shape::Picture(rel_id) = shape else {
            continue;
        };
        let Some(target) = rels.get(rel_id) else {
            out.skip(ItemError::Image {
                slide: number,
                name: rel_id.clone(),
                detail: "no relationship with this id".into(),
            });
            continue;
        };
        match extract_image(package, scratch, target, max_width, max_height) {
            Ok(image) => {
                debug!("Slide {}: {} → {:.0}x{:.0} pt", number, target, image.width, image.height);
                out.blocks.push(Block::Image(image));
                out.blocks.push(Block::Spacer(0.1 * INCH));
                has_image = true;
            }
            Err(detail) => out.skip(ItemError::Image {
                slide: number,
                name: target.clone(),
                detail,
            }),
        }
    }

    let texts: Vec<&str> = shapes
        .iter()
        .filter_map(|s| match s {
            Shape::Text(t) => Some(t.trim()),
            Shape::Picture(_) => None,
        })
        .filter(|t| !t.is_empty())
        .collect();

    if !texts.is_empty() {
        for text in texts {
            out.blocks.push(Block::paragraph(markup::escape_multiline(text)));
            out.blocks.push(Block::Spacer(0.1 * INCH));
        }
    } else if !has_image {
        out.blocks.push(Block::paragraph(EMPTY_SLIDE));
        out.blocks.push(Block::Spacer(0.1 * INCH));
    }
}

/// Copy an image part into the scratch directory, decode it completely and
/// store the pixels as a PNG the renderer can embed.
///
/// Decoding here, not in the renderer, means a picture with a valid header
/// but corrupt pixel data is skipped like any other bad picture.
fn extract_image(
    package: &mut Package<'_>,
    scratch: &Scratch,
    part: &str,
    max_width: f32,
    max_height: f32,
) -> Result<ImageBlock, String> {
    let bytes = package.read_bytes(part).map_err(|e| e.to_string())?;
    let ext = Path::new(part)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("bin")
        .to_ascii_lowercase();
    let original = scratch.write("slide-", &ext, &bytes).map_err(|e| e.to_string())?;
    let decoded = ImageReader::open(&original)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| e.to_string())?
        .decode()
        .map_err(|e| e.to_string())?;
    let (width, height) = display_size(decoded.width(), decoded.height(), max_width, max_height)?;

    let normalised = if decoded.color().has_alpha() {
        DynamicImage::ImageRgba8(decoded.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(decoded.to_rgb8())
    };
    let mut png = Cursor::new(Vec::new());
    normalised
        .write_to(&mut png, ImageFormat::Png)
        .map_err(|e| e.to_string())?;
    let path = scratch
        .write("slide-", "png", png.get_ref())
        .map_err(|e| e.to_string())?;

    Ok(ImageBlock {
        path,
        name: part.to_string(),
        width,
        height,
    })
}

/// Display size in points: `max_width` wide with the pixel aspect ratio,
/// shrunk further if that would be taller than `max_height`.
pub fn display_size(px_width: u32, px_height: u32, max_width: f32, max_height: f32) -> Result<(f32, f32), String> {
    if px_width == 0 || px_height == 0 {
        return Err(format!("image has no area ({px_width}x{px_height})"));
    }
    let aspect = px_height as f32 / px_width as f32;
    let (mut width, mut height) = (max_width, max_width * aspect);
    if height > max_height {
        height = max_height;
        width = height / aspect;
    }
    Ok((width, height))
}

/// Relationship ids of the slides, in presentation order.
fn slide_ids(presentation: &str) -> Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(presentation);
    let mut ids = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.name().as_ref() == b"p:sldId" => {
                if let Some(id) = attr(&e, b"r:id") {
                    ids.push(id);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(ids)
}

/// Text shapes and pictures of a slide part, in drawing order.
pub fn parse_slide(xml: &str) -> Result<Vec<Shape>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut shapes = Vec::new();
    // Paragraphs of the text shape being read.
    let mut paragraphs: Option<Vec<String>> = None;
    // Blip of the picture being read; outer `Some` while inside `p:pic`.
    let mut picture: Option<Option<String>> = None;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"p:sp" => paragraphs = Some(Vec::new()),
                b"a:p" => {
                    if let Some(p) = paragraphs.as_mut() {
                        p.push(String::new());
                    }
                }
                b"a:t" => in_text = paragraphs.is_some(),
                b"p:pic" => picture = Some(None),
                b"a:blip" => {
                    if let Some(blip @ None) = picture.as_mut() {
                        *blip = attr(&e, b"r:embed");
                    }
                }
                // Alternate content repeats its choice; read the choice only.
                b"mc:Fallback" => {
                    reader.read_to_end(e.name())?;
                }
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"a:br" => {
                    if let Some(last) = paragraphs.as_mut().and_then(|p| p.last_mut()) {
                        last.push('\n');
                    }
                }
                b"a:p" => {
                    if let Some(p) = paragraphs.as_mut() {
                        p.push(String::new());
                    }
                }
                b"a:blip" => {
                    if let Some(blip @ None) = picture.as_mut() {
                        *blip = attr(&e, b"r:embed");
                    }
                }
                _ => {}
            },
            Event::Text(t) if in_text => {
                if let Some(last) = paragraphs.as_mut().and_then(|p| p.last_mut()) {
                    last.push_str(&t.unescape()?);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"a:t" => in_text = false,
                b"p:sp" => {
                    if let Some(p) = paragraphs.take() {
                        shapes.push(Shape::Text(p.join("\n")));
                    }
                }
                b"p:pic" => {
                    if let Some(Some(rel_id)) = picture.take() {
                        shapes.push(Shape::Picture(rel_id));
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(shapes)
}
