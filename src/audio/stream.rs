use crate::error::StreamError;
use std::cell::Cell;
use std::rc::Rc;

/// Source of waveform frames for loudness analysis
///
/// Implementations fill the frame with the most recent samples on the byte
/// waveform scale (see `FrameFormat`).
pub trait FrameSource {
    fn read_frame(&mut self, frame: &mut [f32]) -> Result<(), StreamError>;
}

/// Read-only view of a playing audio output, issued by the playback gate.
///
/// The gate keeps the other end of the liveness flag; once it stops playback
/// every read against this handle fails with `StreamError::Invalidated`.
pub struct AudioStreamHandle {
    source: Box<dyn FrameSource>,
    live: Rc<Cell<bool>>,
}

impl AudioStreamHandle {
    pub(crate) fn new(source: Box<dyn FrameSource>, live: Rc<Cell<bool>>) -> Self {
        Self { source, live }
    }

    pub fn is_live(&self) -> bool {
        self.live.get()
    }

    pub fn read_frame(&mut self, frame: &mut [f32]) -> Result<(), StreamError> {
        if !self.live.get() {
            return Err(StreamError::Invalidated);
        }
        self.source.read_frame(frame)
    }
}

impl std::fmt::Debug for AudioStreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioStreamHandle")
            .field("live", &self.live.get())
            .finish_non_exhaustive()
    }
}
