use std::path::PathBuf;
use thiserror::Error;

/// Why background audio could not be started.
///
/// Never fatal: the page stays interactive with the music simply absent.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("No audio output available: {0}")]
    OutputUnavailable(String),

    #[error("Media file unavailable: {path}")]
    MediaUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
}

/// A read against an audio stream handle that can no longer produce frames.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StreamError {
    #[error("stream handle was invalidated by a playback stop")]
    Invalidated,

    #[error("audio source has ended")]
    Ended,
}
