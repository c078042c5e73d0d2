//! Audio track ownership and play-state mirroring.

use core::fmt::Debug;

use log::{debug, info, warn};

pub const DEFAULT_VOLUME: f32 = 0.7;

/// Media-playback backend driving one loaded audio resource.
///
/// Calls may be refused by the host (autoplay policy, missing device); the
/// engine logs such failures and carries on with text playback.
pub trait MediaPlayer {
    type Source: ?Sized;
    type Error: Debug;

    fn load(&mut self, source: &Self::Source) -> Result<(), Self::Error>;
    fn play(&mut self) -> Result<(), Self::Error>;
    fn pause(&mut self) -> Result<(), Self::Error>;
    fn set_current_time(&mut self, seconds: f32) -> Result<(), Self::Error>;
    fn set_volume(&mut self, level: f32) -> Result<(), Self::Error>;
}

/// Zero-or-one attached audio track, kept in step with the scheduler.
#[derive(Debug)]
pub struct AudioSync<P> {
    track: Option<P>,
    volume: f32,
    playing: bool,
}

impl<P: MediaPlayer> AudioSync<P> {
    pub fn new(volume: f32) -> Self {
        Self {
            track: None,
            volume: sanitize_volume(volume).unwrap_or(DEFAULT_VOLUME),
            playing: false,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.track.is_some()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn track(&self) -> Option<&P> {
        self.track.as_ref()
    }

    /// Loads `source` into `player` and makes it the active track, releasing
    /// any previous one. A failed load leaves no track attached.
    pub fn attach(&mut self, mut player: P, source: &P::Source) -> bool {
        self.release();

        if let Err(err) = player.load(source) {
            warn!("audio: load failed: {:?}", err);
            return false;
        }

        if let Err(err) = player.set_volume(self.volume) {
            warn!("audio: set_volume failed: {:?}", err);
        }
        if self.playing
            && let Err(err) = player.play()
        {
            warn!("audio: play on attach refused: {:?}", err);
        }

        info!("audio: track attached (playing={})", self.playing);
        self.track = Some(player);
        true
    }

    /// Stops and drops the active track.
    pub fn release(&mut self) -> Option<P> {
        let mut player = self.track.take()?;
        if let Err(err) = player.pause() {
            warn!("audio: pause on release failed: {:?}", err);
        }
        info!("audio: track released");
        Some(player)
    }

    /// Mirrors the scheduler's playing flag onto the track.
    pub fn sync_playing(&mut self, playing: bool) {
        if self.playing == playing {
            return;
        }
        self.playing = playing;

        let Some(player) = self.track.as_mut() else {
            return;
        };

        let result = if playing { player.play() } else { player.pause() };
        match result {
            Ok(()) => debug!("audio: playing={}", playing),
            Err(err) => warn!("audio: playing={} refused: {:?}", playing, err),
        }
    }

    /// Seeks the track back to its start.
    pub fn rewind(&mut self) {
        let Some(player) = self.track.as_mut() else {
            return;
        };

        if let Err(err) = player.set_current_time(0.0) {
            warn!("audio: rewind failed: {:?}", err);
        }
    }

    /// Sets the volume, clamped to `0.0..=1.0`. NaN is ignored.
    pub fn set_volume(&mut self, level: f32) -> bool {
        let Some(level) = sanitize_volume(level) else {
            return false;
        };
        if level == self.volume {
            return false;
        }
        self.volume = level;

        if let Some(player) = self.track.as_mut()
            && let Err(err) = player.set_volume(level)
        {
            warn!("audio: set_volume failed: {:?}", err);
        }
        true
    }
}

pub fn sanitize_volume(level: f32) -> Option<f32> {
    if level.is_nan() {
        None
    } else {
        Some(level.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{cell::RefCell, rc::Rc, vec::Vec};

    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub(crate) enum MediaCall {
        Load(&'static str),
        Play,
        Pause,
        Seek(f32),
        Volume(f32),
    }

    /// Records every call; optionally refuses `play` like a blocked autoplay.
    #[derive(Clone, Debug, Default)]
    pub(crate) struct RecordingPlayer {
        pub(crate) calls: Rc<RefCell<Vec<MediaCall>>>,
        pub(crate) refuse_play: bool,
        pub(crate) refuse_load: bool,
    }

    impl RecordingPlayer {
        pub(crate) fn calls(&self) -> Vec<MediaCall> {
            self.calls.borrow().clone()
        }
    }

    impl MediaPlayer for RecordingPlayer {
        type Source = &'static str;
        type Error = &'static str;

        fn load(&mut self, source: &Self::Source) -> Result<(), Self::Error> {
            if self.refuse_load {
                return Err("unsupported media");
            }
            self.calls.borrow_mut().push(MediaCall::Load(*source));
            Ok(())
        }

        fn play(&mut self) -> Result<(), Self::Error> {
            if self.refuse_play {
                return Err("autoplay blocked");
            }
            self.calls.borrow_mut().push(MediaCall::Play);
            Ok(())
        }

        fn pause(&mut self) -> Result<(), Self::Error> {
            self.calls.borrow_mut().push(MediaCall::Pause);
            Ok(())
        }

        fn set_current_time(&mut self, seconds: f32) -> Result<(), Self::Error> {
            self.calls.borrow_mut().push(MediaCall::Seek(seconds));
            Ok(())
        }

        fn set_volume(&mut self, level: f32) -> Result<(), Self::Error> {
            self.calls.borrow_mut().push(MediaCall::Volume(level));
            Ok(())
        }
    }

    #[test]
    fn detached_operations_are_noops() {
        let mut sync = AudioSync::<RecordingPlayer>::new(0.5);
        sync.sync_playing(true);
        sync.rewind();
        assert!(sync.set_volume(0.2));
        assert!(sync.release().is_none());
        assert!(!sync.is_attached());
    }

    #[test]
    fn attach_applies_volume_and_current_play_state() {
        let mut sync = AudioSync::new(0.4);
        sync.sync_playing(true);

        let player = RecordingPlayer::default();
        assert!(sync.attach(player.clone(), &"track.ogg"));
        assert_eq!(
            player.calls(),
            [
                MediaCall::Load("track.ogg"),
                MediaCall::Volume(0.4),
                MediaCall::Play
            ]
        );
    }

    #[test]
    fn attach_replaces_previous_track() {
        let mut sync = AudioSync::new(DEFAULT_VOLUME);
        let first = RecordingPlayer::default();
        let second = RecordingPlayer::default();

        sync.attach(first.clone(), &"one.mp3");
        sync.attach(second.clone(), &"two.mp3");

        assert_eq!(first.calls().last(), Some(&MediaCall::Pause));
        assert_eq!(second.calls().first(), Some(&MediaCall::Load("two.mp3")));
        assert!(sync.is_attached());
    }

    #[test]
    fn failed_load_leaves_nothing_attached() {
        let mut sync = AudioSync::new(DEFAULT_VOLUME);
        let player = RecordingPlayer {
            refuse_load: true,
            ..RecordingPlayer::default()
        };
        assert!(!sync.attach(player, &"broken.bin"));
        assert!(!sync.is_attached());
    }

    #[test]
    fn refused_play_is_not_fatal() {
        let mut sync = AudioSync::new(DEFAULT_VOLUME);
        let player = RecordingPlayer {
            refuse_play: true,
            ..RecordingPlayer::default()
        };
        sync.attach(player.clone(), &"a.wav");
        sync.sync_playing(true);
        sync.sync_playing(false);

        assert_eq!(player.calls().last(), Some(&MediaCall::Pause));
        assert!(sync.is_attached());
    }

    #[test]
    fn volume_is_clamped_and_forwarded() {
        let mut sync = AudioSync::new(DEFAULT_VOLUME);
        let player = RecordingPlayer::default();
        sync.attach(player.clone(), &"a.wav");

        assert!(sync.set_volume(1.7));
        assert_eq!(sync.volume(), 1.0);
        assert!(!sync.set_volume(f32::NAN));
        assert!(!sync.set_volume(1.0));
        assert_eq!(player.calls().last(), Some(&MediaCall::Volume(1.0)));
    }
}
