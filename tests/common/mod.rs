//! Fixture builders: small but valid xlsx, pptx and docx packages built in
//! memory, plus helpers to look inside the produced PDFs.

#![allow(dead_code)]

use lopdf::content::Content;
use lopdf::{Document, Object};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

// ── Packages ─────────────────────────────────────────────────────────────────

pub fn zip_parts(parts: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, bytes) in parts {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const IMAGE_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
const SLIDE_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const SHEET_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";

fn rels(entries: &[(String, &str, String)]) -> Vec<u8> {
    let body: String = entries
        .iter()
        .map(|(id, ty, target)| format!(r#"<Relationship Id="{id}" Type="{ty}" Target="{target}"/>"#))
        .collect();
    format!(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{REL_NS}">{body}</Relationships>"#)
        .into_bytes()
}

// ── Spreadsheets ─────────────────────────────────────────────────────────────

/// An `.xlsx` with one worksheet per entry; every cell is an inline string.
pub fn xlsx(sheets: &[(&str, Vec<Vec<&str>>)]) -> Vec<u8> {
    let mut parts = Vec::new();
    let mut sheet_entries = String::new();
    let mut rel_entries = Vec::new();

    for (i, (name, rows)) in sheets.iter().enumerate() {
        let n = i + 1;
        sheet_entries.push_str(&format!(r#"<sheet name="{name}" sheetId="{n}" r:id="rId{n}"/>"#));
        rel_entries.push((format!("rId{n}"), SHEET_REL, format!("worksheets/sheet{n}.xml")));

        let mut data = String::new();
        for (r, row) in rows.iter().enumerate() {
            data.push_str(&format!(r#"<row r="{}">"#, r + 1));
            for (c, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                let col = (b'A' + c as u8) as char;
                data.push_str(&format!(
                    r#"<c r="{col}{}" t="inlineStr"><is><t>{value}</t></is></c>"#,
                    r + 1
                ));
            }
            data.push_str("</row>");
        }
        parts.push((
            format!("xl/worksheets/sheet{n}.xml"),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{data}</sheetData></worksheet>"#
            )
            .into_bytes(),
        ));
    }

    parts.push((
        "xl/workbook.xml".to_string(),
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{sheet_entries}</sheets></workbook>"#
        )
        .into_bytes(),
    ));
    parts.push(("xl/_rels/workbook.xml.rels".to_string(), rels(&rel_entries)));
    parts.push((
        "[Content_Types].xml".to_string(),
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/></Types>"#.to_vec(),
    ));

    let borrowed: Vec<(&str, Vec<u8>)> = parts.iter().map(|(n, b)| (n.as_str(), b.clone())).collect();
    zip_parts(&borrowed)
}

// ── Presentations ────────────────────────────────────────────────────────────

/// One slide of a test deck.
#[derive(Default)]
pub struct SlideSpec {
    pub texts: Vec<String>,
    pub image: Option<Vec<u8>>,
}

impl SlideSpec {
    pub fn text(text: &str) -> Self {
        Self {
            texts: vec![text.to_string()],
            image: None,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn picture(png: Vec<u8>) -> Self {
        Self {
            texts: Vec::new(),
            image: Some(png),
        }
    }
}

/// A `.pptx` with the given slides, in order.
pub fn pptx(slides: &[SlideSpec]) -> Vec<u8> {
    let mut parts: Vec<(String, Vec<u8>)> = Vec::new();
    let mut ids = String::new();
    let mut pres_rels = Vec::new();

    for (i, slide) in slides.iter().enumerate() {
        let n = i + 1;
        ids.push_str(&format!(r#"<p:sldId id="{}" r:id="rId{n}"/>"#, 255 + n));
        pres_rels.push((format!("rId{n}"), SLIDE_REL, format!("slides/slide{n}.xml")));

        let mut tree = String::new();
        for text in &slide.texts {
            tree.push_str(&format!(
                r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Text"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:p><a:r><a:t>{text}</a:t></a:r></a:p></p:txBody></p:sp>"#
            ));
        }
        if let Some(ref png) = slide.image {
            tree.push_str(
                r#"<p:pic><p:nvPicPr><p:cNvPr id="3" name="Picture"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId2"/></p:blipFill><p:spPr/></p:pic>"#,
            );
            parts.push((format!("ppt/media/image{n}.png"), png.clone()));
            parts.push((
                format!("ppt/slides/_rels/slide{n}.xml.rels"),
                rels(&[("rId2".to_string(), IMAGE_REL, format!("../media/image{n}.png"))]),
            ));
        }
        parts.push((
            format!("ppt/slides/slide{n}.xml"),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree>{tree}</p:spTree></p:cSld></p:sld>"#
            )
            .into_bytes(),
        ));
    }

    parts.push((
        "ppt/presentation.xml".to_string(),
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:sldIdLst>{ids}</p:sldIdLst></p:presentation>"#
        )
        .into_bytes(),
    ));
    parts.push(("ppt/_rels/presentation.xml.rels".to_string(), rels(&pres_rels)));

    let borrowed: Vec<(&str, Vec<u8>)> = parts.iter().map(|(n, b)| (n.as_str(), b.clone())).collect();
    zip_parts(&borrowed)
}

// ── Word documents ───────────────────────────────────────────────────────────

/// A `.docx` whose body is `body` (raw WordprocessingML) with a styles part
/// defining `Heading1` and `Title`.
pub fn docx(body: &str) -> Vec<u8> {
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}<w:sectPr/></w:body></w:document>"#
    );
    let styles = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style><w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/></w:style></w:styles>"#;
    zip_parts(&[
        ("word/document.xml", document.into_bytes()),
        ("word/styles.xml", styles.as_bytes().to_vec()),
    ])
}

// ── Images ───────────────────────────────────────────────────────────────────

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 30, 30]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

/// A PNG whose pixels do not compress away, so its image data spans many bytes.
pub fn noisy_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        let v = (x.wrapping_mul(7919) ^ y.wrapping_mul(104_729)).wrapping_mul(2_654_435_761);
        image::Rgb([v as u8, (v >> 8) as u8, (v >> 16) as u8])
    });
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

/// `png` with its header chunk intact but the compressed pixel data garbled:
/// the dimensions still read fine, a full decode does not.
pub fn corrupt_pixel_data(mut png: Vec<u8>) -> Vec<u8> {
    let end = png.len() / 2;
    for byte in &mut png[45..end] {
        *byte ^= 0xA5;
    }
    png
}

// ── PDF inspection ───────────────────────────────────────────────────────────

pub fn page_count(pdf: &[u8]) -> usize {
    Document::load_mem(pdf).unwrap().get_pages().len()
}

/// Every `Tj` string in the document, with the font resource active at the
/// time, in page order.
pub fn shown_text(pdf: &[u8]) -> Vec<(String, String)> {
    let doc = Document::load_mem(pdf).unwrap();
    let mut shown = Vec::new();
    for (_, page) in doc.get_pages() {
        let content = Content::decode(&doc.get_page_content(page).unwrap()).unwrap();
        let mut font = String::new();
        for op in content.operations {
            match op.operator.as_str() {
                "Tf" => {
                    if let Some(Object::Name(name)) = op.operands.first() {
                        font = String::from_utf8_lossy(name).into_owned();
                    }
                }
                "Tj" => {
                    if let Some(Object::String(bytes, _)) = op.operands.first() {
                        shown.push((font.clone(), String::from_utf8_lossy(bytes).into_owned()));
                    }
                }
                _ => {}
            }
        }
    }
    shown
}

/// Pixel sizes of every image XObject in the document.
pub fn image_sizes(pdf: &[u8]) -> Vec<(i64, i64)> {
    let doc = Document::load_mem(pdf).unwrap();
    doc.objects
        .values()
        .filter_map(|obj| obj.as_stream().ok())
        .filter(|s| {
            s.dict
                .get(b"Subtype")
                .and_then(|o| o.as_name())
                .map(|n| n == b"Image")
                .unwrap_or(false)
        })
        .map(|s| {
            (
                s.dict.get(b"Width").unwrap().as_i64().unwrap(),
                s.dict.get(b"Height").unwrap().as_i64().unwrap(),
            )
        })
        .collect()
}
