use crate::audio::AudioStreamHandle;
use crate::links::InviteOption;
use tokio::sync::oneshot;

/// Commands for the pulse service
pub enum PulseCommand {
    Attach(AudioStreamHandle, oneshot::Sender<()>),
    Detach(oneshot::Sender<()>),
}

/// Commands for the presenter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiCommand {
    SetPulsing(bool),
    MusicLabel(bool),
    RevealNext,
    ShowOptions,
    SlideIn(InviteOption),
    ShowLink(InviteOption),
}

/// Discrete events from the user input surface
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserEvent {
    ToggleAudio,
    Advance,
    Select(InviteOption),
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PulseState {
    Idle,
    Pulsing,
}
