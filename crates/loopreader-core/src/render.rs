//! App-level view models consumed by the host renderer.

use crate::focus::FocusParts;

/// What the host should draw right now.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Screen<'a> {
    Reading {
        word: FocusParts<'a>,
        wpm: u16,
        loop_label: &'a str,
        playing: bool,
        /// Position within the current pass, 0..=1000.
        progress_permille: u16,
        font_px: u16,
        volume_pct: u8,
        audio_attached: bool,
    },
    /// The document has no words; playback is suppressed.
    Empty {
        font_px: u16,
    },
    Status {
        line1: &'a str,
        line2: &'a str,
    },
}
