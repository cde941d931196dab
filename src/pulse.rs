use crate::audio::loudness::{classify, loudness};
use crate::audio::{AudioStreamHandle, FrameFormat};
use crate::messages::PulseState;

/// Presentation side of the pulse effect
pub trait PulseDisplay {
    fn set_pulsing(&mut self, pulsing: bool);
}

/// Turns loudness of the playing audio into a pulsing / idle signal
///
/// Holds at most one stream binding. Each `tick` reads one frame from it and
/// reclassifies; changes are pushed to the display. A failed read detaches
/// the controller, so the effect silently degrades to idle.
pub struct PulseController<D: PulseDisplay> {
    display: D,
    threshold: f32,
    binding: Option<AudioStreamHandle>,
    state: PulseState,
    frame: Vec<f32>,
}

impl<D: PulseDisplay> PulseController<D> {
    pub fn new(display: D, threshold: f32, format: FrameFormat) -> Self {
        Self {
            display,
            threshold,
            binding: None,
            state: PulseState::Idle,
            frame: vec![FrameFormat::MIDPOINT; format.frame_len],
        }
    }

    pub fn state(&self) -> PulseState {
        self.state
    }

    pub fn is_attached(&self) -> bool {
        self.binding.is_some()
    }

    /// Bind to a stream, replacing any previous binding
    pub fn attach(&mut self, handle: AudioStreamHandle) {
        if !handle.is_live() {
            tracing::debug!("Attaching a stream that was already stopped");
        }
        if self.binding.replace(handle).is_some() {
            tracing::debug!("Pulse controller rebound to a new stream");
        } else {
            tracing::debug!("Pulse controller attached");
        }
    }

    pub fn detach(&mut self) {
        if self.binding.take().is_some() {
            tracing::debug!("Pulse controller detached");
        }
        self.set_state(PulseState::Idle);
    }

    /// Sample one frame; returns whether the controller is still attached
    pub fn tick(&mut self) -> bool {
        let Some(handle) = self.binding.as_mut() else {
            return false;
        };

        if let Err(e) = handle.read_frame(&mut self.frame) {
            tracing::debug!("Stream read failed ({}), stopping pulse", e);
            self.detach();
            return false;
        }

        let level = loudness(&self.frame);
        self.set_state(classify(level, self.threshold));
        true
    }

    fn set_state(&mut self, state: PulseState) {
        if self.state == state {
            return;
        }
        self.state = state;
        self.display.set_pulsing(state == PulseState::Pulsing);
    }
}
