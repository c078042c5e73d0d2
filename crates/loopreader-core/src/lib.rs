#![cfg_attr(not(test), no_std)]

//! Timed word-display playback engine: segmentation, pacing, looping and
//! audio synchronisation for rapid serial visual presentation.

extern crate alloc;

pub mod app;
pub mod audio;
pub mod document;
pub mod focus;
pub mod input;
pub mod looping;
pub mod ocr;
pub mod pace;
pub mod render;
pub mod scale;
pub mod settings;

/// Read position owned by the scheduler.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PlaybackState {
    pub word_index: usize,
    pub playing: bool,
    /// 1-based pass counter.
    pub loop_count: u16,
}

impl PlaybackState {
    pub const fn new() -> Self {
        Self {
            word_index: 0,
            playing: false,
            loop_count: 1,
        }
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new()
    }
}
