//! End-of-document loop policy.

use core::fmt::Write;

use heapless::String;

pub const LOOP_LABEL_BYTES: usize = 24;

/// How often the document repeats. `max_loops == 0` repeats forever.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LoopPolicy {
    pub enabled: bool,
    pub max_loops: u16,
}

impl LoopPolicy {
    pub const fn new(enabled: bool, max_loops: u16) -> Self {
        Self { enabled, max_loops }
    }

    pub const fn is_bounded(self) -> bool {
        self.enabled && self.max_loops > 0
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoopDecision {
    /// Start the next pass at word 0.
    Restart,
    /// End of sequence; playback stops.
    Stop,
}

/// Decision taken when the last word's wait elapses during pass `loop_count`.
pub fn decide(policy: &LoopPolicy, loop_count: u16) -> LoopDecision {
    if !policy.enabled {
        return LoopDecision::Stop;
    }

    if policy.max_loops == 0 || loop_count < policy.max_loops {
        LoopDecision::Restart
    } else {
        LoopDecision::Stop
    }
}

/// Short pass counter for the UI, empty while looping is off.
pub fn loop_label(policy: &LoopPolicy, loop_count: u16) -> String<LOOP_LABEL_BYTES> {
    let mut label = String::new();
    if !policy.enabled {
        return label;
    }

    let _ = if policy.max_loops == 0 {
        write!(label, "Loop {}/∞", loop_count)
    } else {
        write!(label, "Loop {}/{}", loop_count, policy.max_loops)
    };
    label
}
