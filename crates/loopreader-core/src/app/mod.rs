//! Playback scheduler: the state machine that paces words, loops, and keeps
//! the audio track in step.

use alloc::string::String;

use log::{debug, info, warn};

use crate::{
    PlaybackState,
    audio::{AudioSync, DEFAULT_VOLUME, MediaPlayer},
    document::Document,
    focus::focus_point,
    input::{InputEvent, InputProvider},
    looping::{LoopDecision, LoopPolicy, decide, loop_label},
    ocr::{RecognitionProgress, TextRecognizer},
    pace::{PacePolicy, current_pace, delay_ms},
    render::Screen,
    scale::{MAX_FONT_PX, MIN_FONT_PX, ScaleMode, estimate_size},
};

const VOLUME_STEP_TENTHS: i32 = 1;
const DEFAULT_VIEWPORT_WIDTH_PX: u32 = 390;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TickResult {
    NoRender,
    RenderRequested,
}

/// The single outstanding timed advance, keyed to the word it was armed for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PendingAdvance {
    pub word_index: usize,
    pub due_ms: u64,
}

/// One-line user notice shown over the reading view until dismissed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StatusNotice {
    pub line1: &'static str,
    pub line2: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReaderConfig {
    pub pace: PacePolicy,
    pub looping: LoopPolicy,
    pub scale: ScaleMode,
    pub viewport_width_px: u32,
    pub volume: f32,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            pace: PacePolicy::default(),
            looping: LoopPolicy::default(),
            scale: ScaleMode::default(),
            viewport_width_px: DEFAULT_VIEWPORT_WIDTH_PX,
            volume: DEFAULT_VOLUME,
        }
    }
}

pub struct ReaderApp<IN, P>
where
    IN: InputProvider,
    P: MediaPlayer,
{
    input: IN,
    audio: AudioSync<P>,
    raw_text: String,
    text_revision: u32,
    document: Document,
    pace: PacePolicy,
    looping: LoopPolicy,
    scale: ScaleMode,
    viewport_width_px: u32,
    state: PlaybackState,
    pending: Option<PendingAdvance>,
    status: Option<StatusNotice>,
    pending_redraw: bool,
}

include!("view.rs");
include!("input.rs");
include!("runtime.rs");
