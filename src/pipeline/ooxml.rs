//! Minimal access to Office Open XML packages (`.docx`, `.pptx`).
//!
//! An OOXML file is a zip archive of XML "parts" linked by relationship
//! parts (`_rels/*.rels`). Only what the converters need is implemented:
//! reading a part, resolving a part's relationships to absolute part names,
//! and pulling attributes off `quick-xml` start tags. Element and attribute
//! names are matched by their conventional prefixes (`w:`, `p:`, `a:`, `r:`).

use crate::error::ConvertError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use zip::result::ZipError;
use zip::ZipArchive;

/// An opened OOXML package.
pub struct Package<'a> {
    kind: &'static str,
    archive: ZipArchive<Cursor<&'a [u8]>>,
}

impl<'a> Package<'a> {
    /// Open `bytes` as a zip archive. `kind` only feeds error messages.
    pub fn open(bytes: &'a [u8], kind: &'static str) -> Result<Self, ConvertError> {
        let archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| ConvertError::Package {
            kind,
            detail: e.to_string(),
        })?;
        Ok(Self { kind, archive })
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.archive.index_for_name(name).is_some()
    }

    /// Raw bytes of a part.
    pub fn read_bytes(&mut self, name: &str) -> Result<Vec<u8>, ConvertError> {
        let mut file = match self.archive.by_name(name) {
            Ok(f) => f,
            Err(ZipError::FileNotFound) => {
                return Err(ConvertError::MissingPart {
                    part: name.to_string(),
                })
            }
            Err(e) => {
                return Err(ConvertError::Package {
                    kind: self.kind,
                    detail: format!("{name}: {e}"),
                })
            }
        };
        let mut buf = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut buf).map_err(|e| ConvertError::Package {
            kind: self.kind,
            detail: format!("{name}: {e}"),
        })?;
        Ok(buf)
    }

    /// A part decoded as UTF-8 text.
    pub fn read_string(&mut self, name: &str) -> Result<String, ConvertError> {
        let bytes = self.read_bytes(name)?;
        String::from_utf8(bytes).map_err(|e| ConvertError::xml(name, e))
    }

    /// Relationships of `part`, keyed by id, with targets resolved to part
    /// names. External targets (hyperlinks) are left out. A part without a
    /// relationships part has none.
    pub fn relationships(&mut self, part: &str) -> Result<HashMap<String, String>, ConvertError> {
        let (dir, file) = split_part(part);
        let rels_name = if dir.is_empty() {
            format!("_rels/{file}.rels")
        } else {
            format!("{dir}/_rels/{file}.rels")
        };
        if !self.has_part(&rels_name) {
            return Ok(HashMap::new());
        }
        let xml = self.read_string(&rels_name)?;
        parse_relationships(&xml, dir).map_err(|e| ConvertError::xml(rels_name, e))
    }
}

fn parse_relationships(xml: &str, base_dir: &str) -> Result<HashMap<String, String>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut rels = HashMap::new();
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                if attr(&e, b"TargetMode").as_deref() == Some("External") {
                    continue;
                }
                if let (Some(id), Some(target)) = (attr(&e, b"Id"), attr(&e, b"Target")) {
                    rels.insert(id, resolve_target(base_dir, &target));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(rels)
}

/// Split `ppt/slides/slide1.xml` into (`ppt/slides`, `slide1.xml`).
fn split_part(part: &str) -> (&str, &str) {
    match part.rsplit_once('/') {
        Some((dir, file)) => (dir, file),
        None => ("", part),
    }
}

/// Resolve a relationship target against the source part's directory.
///
/// `../media/image1.png` from `ppt/slides` becomes `ppt/media/image1.png`;
/// a target starting with `/` is already relative to the package root.
pub fn resolve_target(base_dir: &str, target: &str) -> String {
    let mut segments: Vec<&str> = if target.starts_with('/') || base_dir.is_empty() {
        Vec::new()
    } else {
        base_dir.split('/').collect()
    };
    for seg in target.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// Unescaped value of the attribute with exactly this qualified name.
pub fn attr(e: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// OOXML boolean toggle (`<w:b/>`, `<w:b w:val="0"/>`). A missing `val` means on.
pub fn toggle(e: &BytesStart<'_>, val_name: &[u8]) -> bool {
    match attr(e, val_name) {
        None => true,
        Some(v) => !matches!(v.as_str(), "0" | "false" | "off" | "none"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn package(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in parts {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn resolve_relative_targets() {
        assert_eq!(resolve_target("ppt/slides", "../media/image1.png"), "ppt/media/image1.png");
        assert_eq!(resolve_target("ppt", "slides/slide2.xml"), "ppt/slides/slide2.xml");
        assert_eq!(resolve_target("word", "/word/media/a.jpeg"), "word/media/a.jpeg");
        assert_eq!(resolve_target("", "ppt/presentation.xml"), "ppt/presentation.xml");
    }

    #[test]
    fn not_a_zip_is_a_package_error() {
        let err = Package::open(b"definitely not a zip", "word").err().unwrap();
        assert!(matches!(err, ConvertError::Package { kind: "word", .. }));
    }

    #[test]
    fn missing_part_is_reported_by_name() {
        let bytes = package(&[("a.xml", "<a/>")]);
        let mut pkg = Package::open(&bytes, "slides").unwrap();
        assert!(pkg.has_part("a.xml"));
        let err = pkg.read_string("b.xml").unwrap_err();
        assert!(matches!(err, ConvertError::MissingPart { ref part } if part == "b.xml"));
    }

    #[test]
    fn relationships_skip_external_targets() {
        let rels = r#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="image" Target="../media/image1.png"/>
  <Relationship Id="rId2" Type="hyperlink" Target="https://example.com" TargetMode="External"/>
</Relationships>"#;
        let bytes = package(&[("ppt/slides/slide1.xml", "<p:sld/>"), ("ppt/slides/_rels/slide1.xml.rels", rels)]);
        let mut pkg = Package::open(&bytes, "slides").unwrap();
        let map = pkg.relationships("ppt/slides/slide1.xml").unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["rId1"], "ppt/media/image1.png");
        assert!(pkg.relationships("ppt/slides/slide9.xml").unwrap().is_empty());
    }

    #[test]
    fn toggle_values() {
        let mut reader = Reader::from_str(r#"<x><w:b/><w:b w:val="0"/><w:i w:val="true"/></x>"#);
        let mut seen = Vec::new();
        loop {
            match reader.read_event().unwrap() {
                Event::Empty(e) => seen.push(toggle(&e, b"w:val")),
                Event::Eof => break,
                _ => {}
            }
        }
        assert_eq!(seen, vec![true, false, true]);
    }
}
