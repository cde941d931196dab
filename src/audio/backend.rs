use super::asset::open_asset;
use super::format::FrameFormat;
use super::stream::FrameSource;
use super::tap::{WaveformTap, tap};
use crate::error::{PlaybackError, StreamError};
use rodio::mixer::Mixer;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use std::cell::RefCell;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::rc::Rc;

/// Samples of headroom between the audio thread and the frame clock
const RING_CAPACITY: usize = 16 * 1024;

/// Platform side of the playback gate
///
/// `play` begins or resumes output and returns a frame source over what is
/// being played; `pause` halts output and keeps position.
pub trait AudioBackend {
    fn play(&mut self) -> Result<Box<dyn FrameSource>, PlaybackError>;
    fn pause(&mut self);
}

/// Plays one media file on the default output device through rodio
pub struct RodioBackend {
    path: PathBuf,
    looped: bool,
    format: FrameFormat,
    stream: Option<OutputStream>,
    sink: Option<Sink>,
    tap: Option<Rc<RefCell<WaveformTap>>>,
}

impl RodioBackend {
    pub fn new(path: PathBuf, looped: bool) -> Self {
        Self {
            path,
            looped,
            format: FrameFormat::default(),
            stream: None,
            sink: None,
            tap: None,
        }
    }

    fn decode(&self) -> Result<Decoder<BufReader<File>>, PlaybackError> {
        let file = open_asset(&self.path).map_err(|source| PlaybackError::MediaUnavailable {
            path: self.path.clone(),
            source,
        })?;

        Decoder::new(BufReader::new(file)).map_err(|e| PlaybackError::Decode {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn build_sink(&mut self) -> Result<(), PlaybackError> {
        let decoder = self.decode()?;

        let stream = match self.stream.take() {
            Some(stream) => stream,
            None => {
                let mut stream = OutputStreamBuilder::open_default_stream()
                    .map_err(|e| PlaybackError::OutputUnavailable(e.to_string()))?;
                stream.log_on_drop(false);
                stream
            }
        };

        let (sink, tap) = if self.looped {
            attach_tapped(stream.mixer(), decoder.repeat_infinite(), self.format)
        } else {
            attach_tapped(stream.mixer(), decoder, self.format)
        };

        self.stream = Some(stream);
        self.sink = Some(sink);
        self.tap = Some(Rc::new(RefCell::new(tap)));

        tracing::info!("Background music loaded from {}", self.path.display());
        Ok(())
    }
}

fn attach_tapped<S>(mixer: &Mixer, source: S, format: FrameFormat) -> (Sink, WaveformTap)
where
    S: Source + Send + 'static,
{
    let (tapped, tap) = tap(source, RING_CAPACITY, format);
    let sink = Sink::connect_new(mixer);
    sink.append(tapped);
    (sink, tap)
}

impl AudioBackend for RodioBackend {
    fn play(&mut self) -> Result<Box<dyn FrameSource>, PlaybackError> {
        // A finished one-shot track starts over
        if self.sink.as_ref().is_some_and(Sink::empty) {
            tracing::debug!("Previous track finished, rebuilding sink");
            self.sink = None;
            self.tap = None;
        }

        if self.sink.is_none() {
            self.build_sink()?;
        }

        match (&self.sink, &self.tap) {
            (Some(sink), Some(tap)) => {
                tap.borrow_mut().reset();
                sink.play();
                Ok(Box::new(SharedTap(tap.clone())))
            }
            _ => Err(PlaybackError::OutputUnavailable(
                "sink was not initialised".to_string(),
            )),
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }
}

/// Frame source handed out per issued stream handle; all share one tap
struct SharedTap(Rc<RefCell<WaveformTap>>);

impl FrameSource for SharedTap {
    fn read_frame(&mut self, frame: &mut [f32]) -> Result<(), StreamError> {
        self.0.borrow_mut().read_frame(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_media_fails_before_opening_device() {
        let mut backend = RodioBackend::new(PathBuf::from("no-such-track-91c2.mp3"), true);

        match backend.play() {
            Err(PlaybackError::MediaUnavailable { path, .. }) => {
                assert_eq!(path, PathBuf::from("no-such-track-91c2.mp3"));
            }
            other => panic!("expected MediaUnavailable, got {:?}", other.map(|_| ())),
        }
        assert!(backend.sink.is_none());
    }

    #[test]
    fn test_undecodable_media_reports_decode_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"not audio at all").unwrap();
        let mut backend = RodioBackend::new(file.path().to_path_buf(), false);

        assert!(matches!(backend.play(), Err(PlaybackError::Decode { .. })));
    }

    #[test]
    fn test_pause_without_playback_is_noop() {
        let mut backend = RodioBackend::new(PathBuf::from("unused.mp3"), true);
        backend.pause();
        assert!(backend.sink.is_none());
    }
}
