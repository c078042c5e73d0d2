//! Input abstraction layer.

/// Logical actions consumed by the reader app.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputEvent {
    TogglePlay,
    /// Relaunch from word 0, loop 1, and start playing.
    Restart,
    /// Move one word while paused.
    StepForward,
    StepBack,
    Faster,
    Slower,
    ToggleRamp,
    ToggleLoop,
    MoreLoops,
    FewerLoops,
    ToggleAutoScale,
    VolumeUp,
    VolumeDown,
    DismissStatus,
}

/// Polled input provider.
pub trait InputProvider {
    type Error;

    fn poll_event(&mut self) -> Result<Option<InputEvent>, Self::Error>;
}

/// Input source that never produces events, for hosts driving the app
/// through its mutators only.
#[derive(Default, Debug, Clone, Copy)]
pub struct NoInput;

impl InputProvider for NoInput {
    type Error = core::convert::Infallible;

    fn poll_event(&mut self) -> Result<Option<InputEvent>, Self::Error> {
        Ok(None)
    }
}
