//! Plain text: one paragraph per line.

use crate::layout::{Block, Orientation, PageSetup, INCH};
use crate::markup;
use crate::pipeline::Converted;

pub const EMPTY_MESSAGE: &str = "No content found in the text file.";

/// Decode `bytes` as UTF-8 (invalid sequences become U+FFFD) and emit a
/// paragraph per non-blank line and a spacer per blank one.
pub fn convert(bytes: &[u8]) -> Converted {
    let text = String::from_utf8_lossy(bytes);
    let mut out = Converted::new(PageSetup::a4(Orientation::Portrait, 0.75 * INCH));

    for line in text.split('\n') {
        let line = line.trim_end();
        if line.is_empty() {
            out.blocks.push(Block::Spacer(0.1 * INCH));
        } else {
            out.blocks.push(Block::paragraph(markup::escape(line)));
            out.blocks.push(Block::Spacer(0.05 * INCH));
        }
    }

    out.or_placeholder(EMPTY_MESSAGE)
}
