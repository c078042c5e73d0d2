use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::debug;
use loopreader_core::audio::MediaPlayer;

/// Player that only tracks state, for builds without a sound backend.
#[derive(Debug, Default)]
#[cfg_attr(feature = "audio", allow(dead_code))]
pub(super) struct SilentPlayer {
    loaded: Option<PathBuf>,
    playing: bool,
}

#[cfg_attr(feature = "audio", allow(dead_code))]
impl SilentPlayer {
    pub(super) fn open() -> io::Result<Self> {
        Ok(Self::default())
    }
}

impl MediaPlayer for SilentPlayer {
    type Source = Path;
    type Error = io::Error;

    fn load(&mut self, source: &Path) -> Result<(), Self::Error> {
        if !fs::metadata(source)?.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "audio source is not a file",
            ));
        }
        debug!("audio(silent): loaded {}", source.display());
        self.loaded = Some(source.to_path_buf());
        Ok(())
    }

    fn play(&mut self) -> Result<(), Self::Error> {
        if !self.playing {
            debug!("audio(silent): play {:?}", self.loaded);
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), Self::Error> {
        if self.playing {
            debug!("audio(silent): pause {:?}", self.loaded);
        }
        self.playing = false;
        Ok(())
    }

    fn set_current_time(&mut self, seconds: f32) -> Result<(), Self::Error> {
        debug!("audio(silent): seek {}s", seconds);
        Ok(())
    }

    fn set_volume(&mut self, level: f32) -> Result<(), Self::Error> {
        debug!("audio(silent): volume {}", level);
        Ok(())
    }
}


#[cfg(feature = "audio")]
pub(super) use self::rodio_player::RodioPlayer;

#[cfg(feature = "audio")]
mod rodio_player {
    use std::{
        fs::File,
        io::{self, BufReader},
        path::{Path, PathBuf},
        time::Duration,
    };

    use log::{debug, warn};
    use loopreader_core::audio::MediaPlayer;
    use rodio::{
        Decoder, OutputStream, OutputStreamHandle, PlayError, Sink, StreamError,
        decoder::DecoderError, source::SeekError,
    };

    #[derive(Debug)]
    pub(in super::super) enum RodioError {
        Stream(StreamError),
        Open(io::Error),
        Decode(DecoderError),
        Sink(PlayError),
        Seek(SeekError),
        NotLoaded,
    }

    /// Plays one audio file on the default output device.
    pub(in super::super) struct RodioPlayer {
        // Dropping the stream silences every sink built on its handle.
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sink: Option<Sink>,
        path: Option<PathBuf>,
    }

    impl RodioPlayer {
        pub(in super::super) fn open() -> Result<Self, RodioError> {
            let (stream, handle) = OutputStream::try_default().map_err(RodioError::Stream)?;
            Ok(Self {
                _stream: stream,
                handle,
                sink: None,
                path: None,
            })
        }

        /// Rebuilds the sink from the file, keeping volume and play state.
        fn reload(&mut self) -> Result<(), RodioError> {
            let path = self.path.clone().ok_or(RodioError::NotLoaded)?;
            let (paused, volume) = self
                .sink
                .as_ref()
                .map_or((true, 1.0), |sink| (sink.is_paused(), sink.volume()));

            self.load(&path)?;
            if let Some(sink) = self.sink.as_ref() {
                sink.set_volume(volume);
                if !paused {
                    sink.play();
                }
            }
            Ok(())
        }

        fn sink(&self) -> Result<&Sink, RodioError> {
            self.sink.as_ref().ok_or(RodioError::NotLoaded)
        }
    }

    impl MediaPlayer for RodioPlayer {
        type Source = Path;
        type Error = RodioError;

        fn load(&mut self, source: &Path) -> Result<(), Self::Error> {
            let file = File::open(source).map_err(RodioError::Open)?;
            let decoder = Decoder::new(BufReader::new(file)).map_err(RodioError::Decode)?;
            let sink = Sink::try_new(&self.handle).map_err(RodioError::Sink)?;
            sink.pause();
            sink.append(decoder);

            if let Some(previous) = self.sink.replace(sink) {
                previous.stop();
            }
            self.path = Some(source.to_path_buf());
            debug!("audio: loaded {}", source.display());
            Ok(())
        }

        fn play(&mut self) -> Result<(), Self::Error> {
            self.sink()?.play();
            Ok(())
        }

        fn pause(&mut self) -> Result<(), Self::Error> {
            self.sink()?.pause();
            Ok(())
        }

        fn set_current_time(&mut self, seconds: f32) -> Result<(), Self::Error> {
            let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
            let sink = self.sink()?;

            // A finished track has left the sink; seeking needs a fresh decoder.
            if sink.empty() {
                return self.reload();
            }

            match sink.try_seek(Duration::from_secs_f32(seconds)) {
                Ok(()) => Ok(()),
                Err(err) if seconds == 0.0 => {
                    warn!("audio: seek unsupported ({:?}), reloading track", err);
                    self.reload()
                }
                Err(err) => Err(RodioError::Seek(err)),
            }
        }

        fn set_volume(&mut self, level: f32) -> Result<(), Self::Error> {
            self.sink()?.set_volume(level);
            Ok(())
        }
    }
}
