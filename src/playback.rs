use crate::audio::{AudioBackend, AudioStreamHandle};
use crate::error::PlaybackError;
use crate::messages::PlaybackState;
use std::cell::Cell;
use std::rc::Rc;

/// Sole authority over whether background audio is live
///
/// Issues a stream handle on every successful start and invalidates it on
/// stop. Never touches visual state.
pub struct PlaybackGate<B: AudioBackend> {
    backend: B,
    state: PlaybackState,
    issued: Option<Rc<Cell<bool>>>,
}

impl<B: AudioBackend> PlaybackGate<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: PlaybackState::Stopped,
            issued: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn start(&mut self) -> Result<AudioStreamHandle, PlaybackError> {
        let was_playing = self.is_playing();
        if was_playing {
            tracing::debug!("start() while playing, reissuing stream handle");
            self.invalidate();
        }

        let source = match self.backend.play() {
            Ok(source) => source,
            Err(e) => {
                if was_playing {
                    self.backend.pause();
                }
                self.state = PlaybackState::Stopped;
                return Err(e);
            }
        };

        let live = Rc::new(Cell::new(true));
        self.issued = Some(live.clone());
        self.state = PlaybackState::Playing;
        tracing::info!("Playback started");

        Ok(AudioStreamHandle::new(source, live))
    }

    pub fn stop(&mut self) {
        if !self.is_playing() {
            return;
        }

        self.backend.pause();
        self.invalidate();
        self.state = PlaybackState::Stopped;
        tracing::info!("Playback stopped");
    }

    /// Stop if playing, otherwise start; `Ok(None)` means playback was stopped
    pub fn toggle(&mut self) -> Result<Option<AudioStreamHandle>, PlaybackError> {
        if self.is_playing() {
            self.stop();
            Ok(None)
        } else {
            self.start().map(Some)
        }
    }

    #[cfg(test)]
    pub(crate) fn backend(&self) -> &B {
        &self.backend
    }

    fn invalidate(&mut self) {
        if let Some(live) = self.issued.take() {
            live.set(false);
        }
    }
}
