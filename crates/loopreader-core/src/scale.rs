//! Display size estimation from the longest word.

use crate::document::Document;

pub const MIN_FONT_PX: u16 = 40;
pub const MAX_FONT_PX: u16 = 200;
pub const DEFAULT_FONT_PX: u16 = 72;

const MIN_WORD_CHARS: usize = 5;
const VIEWPORT_MARGIN_PX: i64 = 40;

/// Font sizing mode. `manual_px` doubles as the last auto-computed size.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScaleMode {
    pub auto: bool,
    pub manual_px: u16,
}

impl Default for ScaleMode {
    fn default() -> Self {
        Self {
            auto: true,
            manual_px: DEFAULT_FONT_PX,
        }
    }
}

/// Largest font size at which the longest word still fits the viewport.
pub fn estimate_size(doc: &Document, viewport_width_px: u32) -> u16 {
    let chars = doc.longest_word_chars().max(MIN_WORD_CHARS) as i64;
    let usable = viewport_width_px as i64 - VIEWPORT_MARGIN_PX;
    // floor(usable / (chars * 0.6))
    let raw = (usable * 5).div_euclid(chars * 3);
    raw.clamp(MIN_FONT_PX as i64, MAX_FONT_PX as i64) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_word_on_phone_width() {
        let doc = Document::from_text("the configuration file");
        assert_eq!(estimate_size(&doc, 390), 44);
    }

    #[test]
    fn short_words_use_five_char_floor() {
        let doc = Document::from_text("a an it");
        // floor(350 / 3.0)
        assert_eq!(estimate_size(&doc, 390), 116);
    }

    #[test]
    fn result_is_clamped() {
        let doc = Document::from_text("hello");
        assert_eq!(estimate_size(&doc, 4_000), MAX_FONT_PX);
        assert_eq!(estimate_size(&doc, 20), MIN_FONT_PX);

        let huge = Document::from_text("pneumonoultramicroscopicsilicovolcanoconiosis");
        assert_eq!(estimate_size(&huge, 390), MIN_FONT_PX);
    }

    #[test]
    fn empty_document_uses_floor_width() {
        let doc = Document::from_text("   ");
        assert_eq!(estimate_size(&doc, 340), 100);
    }
}
