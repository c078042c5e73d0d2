//! Word segmentation of raw input text.

use alloc::{
    string::{String, ToString},
    vec,
    vec::Vec,
};

/// Text shown until the user supplies their own.
pub const DEFAULT_TEXT: &str = "Welcome to the rapid reader. Paste any text, or scan a page, \
and it will be shown one word at a time at the pace you choose. Sentences pause a little \
longer at their end, clauses a little longer at a comma; the highlighted letter marks where \
your eye should rest. Turn on looping to repeat a passage, and let the ramp carry you from \
a gentle pace to a brisk one.";

/// Splits raw text into whitespace-free tokens.
///
/// Line breaks and runs of whitespace collapse to single separators. Input that
/// is empty after trimming yields a single empty token, which callers treat as
/// "no content".
pub fn segment(raw: &str) -> Vec<String> {
    let words: Vec<String> = raw.split_whitespace().map(ToString::to_string).collect();
    if words.is_empty() {
        return vec![String::new()];
    }
    words
}

/// Ordered, immutable token sequence derived from raw text.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Document {
    words: Vec<String>,
}

impl Document {
    pub fn from_text(raw: &str) -> Self {
        Self {
            words: segment(raw),
        }
    }

    /// Token count, always at least 1.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn word(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Whether there is at least one non-empty token to show.
    pub fn is_playable(&self) -> bool {
        !(self.words.len() <= 1 && self.words.first().is_none_or(|word| word.is_empty()))
    }

    pub fn last_index(&self) -> usize {
        self.words.len().saturating_sub(1)
    }

    pub fn longest_word_chars(&self) -> usize {
        self.words
            .iter()
            .map(|word| word.chars().count())
            .max()
            .unwrap_or(0)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::from_text(DEFAULT_TEXT)
    }
}
