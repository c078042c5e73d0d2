//! Text recognition collaborator used to import a document from an image.

use alloc::string::String;
use core::fmt::Debug;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RecognitionPhase {
    Loading,
    Recognizing,
}

/// Progress report emitted while a recognizer works.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecognitionProgress {
    pub phase: RecognitionPhase,
    /// 0.0..=1.0
    pub fraction: f32,
}

impl RecognitionProgress {
    pub fn new(phase: RecognitionPhase, fraction: f32) -> Self {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        Self { phase, fraction }
    }

    pub fn percent(self) -> u8 {
        (self.fraction * 100.0) as u8
    }
}

/// Converts an image into raw text.
pub trait TextRecognizer {
    type Image: ?Sized;
    type Error: Debug;

    fn recognize(
        &mut self,
        image: &Self::Image,
        progress: &mut dyn FnMut(RecognitionProgress),
    ) -> Result<String, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_clamped() {
        assert_eq!(
            RecognitionProgress::new(RecognitionPhase::Recognizing, 1.4).fraction,
            1.0
        );
        assert_eq!(
            RecognitionProgress::new(RecognitionPhase::Loading, -0.2).fraction,
            0.0
        );
        assert_eq!(
            RecognitionProgress::new(RecognitionPhase::Recognizing, f32::NAN).percent(),
            0
        );
        assert_eq!(
            RecognitionProgress::new(RecognitionPhase::Recognizing, 0.5).percent(),
            50
        );
    }
}
