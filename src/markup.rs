//! Inline paragraph markup.
//!
//! Paragraph blocks carry a tiny markup language so converters can express
//! per-run formatting without knowing anything about fonts:
//!
//! | Markup          | Meaning           |
//! |-----------------|-------------------|
//! | `<b>…</b>`      | bold              |
//! | `<i>…</i>`      | italic            |
//! | `<u>…</u>`      | underline         |
//! | `<br/>`         | forced line break |
//! | `&amp;` `&lt;` `&gt;` `&quot;` `&apos;` `&#NN;` `&#xNN;` | entities |
//!
//! Source text must pass through [`escape`] before it is embedded, otherwise
//! a literal `<` in a document would be read as the start of a tag. The
//! parser is lenient: unknown tags and unknown entities are kept as literal
//! text and stray closing tags are ignored, so malformed markup still
//! renders.

/// Escape the three characters that are structurally significant to the markup.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape `text` and turn every line break (`\r\n`, `\n`, `\r`, `\v`) into `<br/>`.
pub fn escape_multiline(text: &str) -> String {
    let normalised = text.replace("\r\n", "\n").replace(['\r', '\u{b}'], "\n");
    normalised
        .split('\n')
        .map(escape)
        .collect::<Vec<_>>()
        .join("<br/>")
}

/// Formatting flags of a span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpanStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Text { text: String, style: SpanStyle },
    LineBreak,
}

/// Parse markup into spans. Adjacent text with the same style is merged.
pub fn parse(markup: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    let mut buf = String::new();
    // Open-tag depth per flag: bold, italic, underline.
    let mut depth = [0usize; 3];
    let current = |d: &[usize; 3]| SpanStyle {
        bold: d[0] > 0,
        italic: d[1] > 0,
        underline: d[2] > 0,
    };

    let mut rest = markup;
    while let Some(c) = rest.chars().next() {
        match c {
            '<' => {
                let tag = rest
                    .find('>')
                    .and_then(|end| classify(&rest[1..end]).map(|tag| (tag, end + 1)));
                match tag {
                    Some((tag, consumed)) => {
                        flush(&mut spans, &mut buf, current(&depth));
                        match tag {
                            Tag::Break => spans.push(Span::LineBreak),
                            Tag::Open(flag) => depth[flag] += 1,
                            Tag::Close(flag) => depth[flag] = depth[flag].saturating_sub(1),
                        }
                        rest = &rest[consumed..];
                    }
                    None => {
                        buf.push('<');
                        rest = &rest[1..];
                    }
                }
            }
            '&' => match decode_entity(rest) {
                Some((decoded, consumed)) => {
                    buf.push(decoded);
                    rest = &rest[consumed..];
                }
                None => {
                    buf.push('&');
                    rest = &rest[1..];
                }
            },
            _ => {
                buf.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    flush(&mut spans, &mut buf, current(&depth));
    spans
}

enum Tag {
    Break,
    Open(usize),
    Close(usize),
}

/// Recognise the inside of `<…>`. `None` means "not markup, keep literally".
fn classify(raw: &str) -> Option<Tag> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let compact = compact.to_ascii_lowercase();
    let (closing, name) = match compact.strip_prefix('/') {
        Some(name) => (true, name),
        None => (false, compact.as_str()),
    };
    if name == "br" || name == "br/" {
        return if closing { None } else { Some(Tag::Break) };
    }
    let flag = match name {
        "b" | "strong" => 0,
        "i" | "em" => 1,
        "u" => 2,
        _ => return None,
    };
    Some(if closing { Tag::Close(flag) } else { Tag::Open(flag) })
}

/// Plain text of a markup string: tags dropped, entities decoded, `<br/>` as `\n`.
pub fn plain_text(markup: &str) -> String {
    parse(markup)
        .into_iter()
        .map(|s| match s {
            Span::Text { text, .. } => text,
            Span::LineBreak => "\n".to_string(),
        })
        .collect()
}

fn flush(spans: &mut Vec<Span>, buf: &mut String, style: SpanStyle) {
    if buf.is_empty() {
        return;
    }
    let text = std::mem::take(buf);
    if let Some(Span::Text {
        text: prev,
        style: prev_style,
    }) = spans.last_mut()
    {
        if *prev_style == style {
            prev.push_str(&text);
            return;
        }
    }
    spans.push(Span::Text { text, style });
}

/// Decode the entity at the start of `s` (which begins with `&`).
/// Returns the character and the number of bytes consumed.
fn decode_entity(s: &str) -> Option<(char, usize)> {
    let end = s.find(';')?;
    if end > 10 {
        return None;
    }
    let name = &s[1..end];
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse::<u32>().ok()?
            };
            char::from_u32(code)?
        }
    };
    Some((c, end + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(t: &str, bold: bool, italic: bool, underline: bool) -> Span {
        Span::Text {
            text: t.to_string(),
            style: SpanStyle {
                bold,
                italic,
                underline,
            },
        }
    }

    #[test]
    fn escape_only_touches_structural_chars() {
        assert_eq!(escape("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
        assert_eq!(escape("plain \"quoted\" text"), "plain \"quoted\" text");
    }

    #[test]
    fn escaped_text_round_trips_literally() {
        let src = "if (a<b) { x = y & z; } // <b>not bold</b>";
        let spans = parse(&escape(src));
        assert_eq!(spans, vec![text(src, false, false, false)]);
    }

    #[test]
    fn nested_tags_combine() {
        let spans = parse("plain <i><b>both</b></i> <u>under</u>");
        assert_eq!(
            spans,
            vec![
                text("plain ", false, false, false),
                text("both", true, true, false),
                text(" ", false, false, false),
                text("under", false, false, true),
            ]
        );
    }

    #[test]
    fn line_breaks_become_spans() {
        let spans = parse("one<br/>two<br />three");
        assert_eq!(
            spans,
            vec![
                text("one", false, false, false),
                Span::LineBreak,
                text("two", false, false, false),
                Span::LineBreak,
                text("three", false, false, false),
            ]
        );
    }

    #[test]
    fn unknown_tags_and_entities_stay_literal() {
        assert_eq!(plain_text("<font size=3>x</font>"), "<font size=3>x</font>");
        assert_eq!(plain_text("AT&T &bogus; &#65;&#x42;"), "AT&T &bogus; AB");
    }

    #[test]
    fn stray_closing_tags_are_ignored() {
        assert_eq!(parse("</b>text"), vec![text("text", false, false, false)]);
    }

    #[test]
    fn escape_multiline_inserts_breaks() {
        assert_eq!(escape_multiline("a\r\nb\nc<d"), "a<br/>b<br/>c&lt;d");
        assert_eq!(plain_text(&escape_multiline("x\ny")), "x\ny");
    }
}
