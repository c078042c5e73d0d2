//! Per-word timing: punctuation-aware delays and linear speed ramps.

use crate::{PlaybackState, looping::LoopPolicy};

pub const MIN_WPM: u16 = 1;
pub const MAX_WPM: u16 = 1_500;
pub const WPM_STEP: u16 = 10;

const SENTENCE_PAUSE_TENTHS: u64 = 22;
const CLAUSE_PAUSE_TENTHS: u64 = 15;
const PLAIN_TENTHS: u64 = 10;

/// User-editable pace settings. The engine only reads them.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PacePolicy {
    pub base_wpm: u16,
    pub ramp_enabled: bool,
    pub start_wpm: u16,
    pub end_wpm: u16,
}

impl Default for PacePolicy {
    fn default() -> Self {
        Self {
            base_wpm: 300,
            ramp_enabled: false,
            start_wpm: 200,
            end_wpm: 400,
        }
    }
}

impl PacePolicy {
    /// Floors every pace at [`MIN_WPM`] so a delay is always defined.
    pub const fn sanitized(mut self) -> Self {
        self.base_wpm = floor_wpm(self.base_wpm);
        self.start_wpm = floor_wpm(self.start_wpm);
        self.end_wpm = floor_wpm(self.end_wpm);
        self
    }

    /// Nudges the base pace by [`WPM_STEP`]. Returns whether it changed.
    pub fn step_base(&mut self, increase: bool) -> bool {
        let next = if increase {
            self.base_wpm.saturating_add(WPM_STEP).min(MAX_WPM)
        } else {
            self.base_wpm.saturating_sub(WPM_STEP).max(MIN_WPM)
        };

        if next != self.base_wpm {
            self.base_wpm = next;
            true
        } else {
            false
        }
    }
}

const fn floor_wpm(wpm: u16) -> u16 {
    if wpm < MIN_WPM { MIN_WPM } else { wpm }
}

/// On-screen duration of `word` at `pace_wpm`, in milliseconds.
pub fn delay_ms(word: &str, pace_wpm: u16) -> u32 {
    let tenths = if word.ends_with(['.', '!', '?']) {
        SENTENCE_PAUSE_TENTHS
    } else if word.ends_with([',', ';', ':']) {
        CLAUSE_PAUSE_TENTHS
    } else {
        PLAIN_TENTHS
    };

    let numerator = 60_000u64 * tenths;
    let denominator = floor_wpm(pace_wpm) as u64 * 10;
    let rounded = (numerator + denominator / 2) / denominator;
    rounded.clamp(1, u32::MAX as u64) as u32
}

/// Instantaneous pace at the current read position.
///
/// With a bounded loop run the ramp spans every pass once; otherwise it spans
/// the current pass only and restarts with each loop.
pub fn current_pace(
    policy: &PacePolicy,
    loop_policy: &LoopPolicy,
    state: &PlaybackState,
    doc_len: usize,
) -> u16 {
    let policy = policy.sanitized();
    if !policy.ramp_enabled {
        return policy.base_wpm;
    }

    let doc_len = doc_len.max(1) as i64;
    let word_index = state.word_index as i64;
    let (position, span) = if loop_policy.is_bounded() {
        let completed_loops = state.loop_count.saturating_sub(1) as i64;
        (
            completed_loops * doc_len + word_index,
            (loop_policy.max_loops as i64 * doc_len - 1).max(1),
        )
    } else {
        (word_index, (doc_len - 1).max(1))
    };
    let position = position.clamp(0, span);

    let start = policy.start_wpm as i64;
    let end = policy.end_wpm as i64;
    // round(start + (end - start) * position / span), halves rounding up.
    let scaled = start * span + (end - start) * position;
    let pace = (2 * scaled + span).div_euclid(2 * span);

    pace.clamp(MIN_WPM as i64, u16::MAX as i64) as u16
}
