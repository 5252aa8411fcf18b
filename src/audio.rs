//! The alarm sound.
//!
//! The engine only needs to start, pause and stop one pre loaded sound, all three
//! calls have to be safe to repeat.

#[cfg_attr(test, mockall::automock)]
pub trait AlarmSound {
    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioStatus {
    Playing,
    Paused,
    #[default]
    Stopped,
}

/// used when there is no sound card or no sound file, only logs
#[derive(Debug, Default)]
pub struct SilentAlarmSound {
    status: AudioStatus,
}

impl SilentAlarmSound {
    #[must_use]
    pub const fn status(&self) -> AudioStatus {
        self.status
    }
}

impl AlarmSound for SilentAlarmSound {
    fn play(&mut self) {
        if self.status != AudioStatus::Playing {
            log::info!("alarm sound playing (silent)");
            self.status = AudioStatus::Playing;
        }
    }

    fn pause(&mut self) {
        if self.status == AudioStatus::Playing {
            self.status = AudioStatus::Paused;
        }
    }

    fn stop(&mut self) {
        self.status = AudioStatus::Stopped;
    }
}

#[cfg(feature = "desktop")]
pub use rodio_sound::{AudioError, RodioAlarmSound};

#[cfg(feature = "desktop")]
mod rodio_sound {
    use std::{
        fs::File,
        io::BufReader,
        path::{Path, PathBuf},
    };

    use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};

    use super::{AlarmSound, AudioStatus};

    #[derive(Debug, thiserror::Error)]
    pub enum AudioError {
        #[error("couldn't open audio output: {0}")]
        Stream(#[from] rodio::StreamError),
        #[error("couldn't open sound file {}: {source}", path.display())]
        Open {
            path: PathBuf,
            source: std::io::Error,
        },
        #[error("couldn't decode sound file {}: {source}", path.display())]
        Decode {
            path: PathBuf,
            source: rodio::decoder::DecoderError,
        },
    }

    /// loops the alarm sound on the default output device
    pub struct RodioAlarmSound {
        path: PathBuf,
        sink: Sink,
        status: AudioStatus,
        // the sink goes quiet once the stream is dropped
        _stream: OutputStream,
    }

    impl RodioAlarmSound {
        /// opens the default output and decodes the sound once up front so a
        /// broken file is noticed at startup instead of when the alarm goes off
        ///
        /// # Errors
        /// if there is no output device or the file can't be decoded
        pub fn new(path: impl AsRef<Path>) -> Result<Self, AudioError> {
            let path = path.as_ref().to_path_buf();
            let stream = OutputStreamBuilder::open_default_stream()?;
            let sink = Sink::connect_new(stream.mixer());
            sink.pause();
            let this = Self {
                path,
                sink,
                status: AudioStatus::Stopped,
                _stream: stream,
            };
            this.load()?;
            Ok(this)
        }

        fn load(&self) -> Result<(), AudioError> {
            let file = File::open(&self.path).map_err(|source| AudioError::Open {
                path: self.path.clone(),
                source,
            })?;
            let input = Decoder::new(BufReader::new(file))
                .map_err(|source| AudioError::Decode {
                    path: self.path.clone(),
                    source,
                })?
                .repeat_infinite();
            self.sink.append(input);
            Ok(())
        }
    }

    impl AlarmSound for RodioAlarmSound {
        fn play(&mut self) {
            if self.status == AudioStatus::Playing {
                return;
            }
            if self.sink.empty() {
                if let Err(e) = self.load() {
                    log::error!("{e}");
                    return;
                }
            }
            self.sink.play();
            self.status = AudioStatus::Playing;
        }

        fn pause(&mut self) {
            if self.status == AudioStatus::Playing {
                self.sink.pause();
                self.status = AudioStatus::Paused;
            }
        }

        fn stop(&mut self) {
            if self.status != AudioStatus::Stopped {
                // drops the queued sound and leaves the sink paused
                self.sink.clear();
                self.status = AudioStatus::Stopped;
            }
        }
    }
}
