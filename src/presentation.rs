use crate::links::{LinkRegistry, SlideDirection};
use crate::messages::UiCommand;
use crate::pulse::PulseDisplay;
use std::io::Write;
use tokio::sync::mpsc;

const INTRO: &str = "Welcome.\nCommands: m = music on/off, n = next, 1-3 = choose, q = quit";

/// Renders UI commands as terminal lines
pub struct Presenter<W: Write> {
    rx: mpsc::UnboundedReceiver<UiCommand>,
    out: W,
}

impl<W: Write> Presenter<W> {
    pub fn new(rx: mpsc::UnboundedReceiver<UiCommand>, out: W) -> Self {
        Self { rx, out }
    }

    pub async fn run(mut self) {
        if let Err(e) = writeln!(self.out, "{}", INTRO) {
            tracing::warn!("Failed to render intro: {}", e);
        }

        while let Some(cmd) = self.rx.recv().await {
            let line = render(cmd);
            if let Err(e) = writeln!(self.out, "{}", line).and_then(|_| self.out.flush()) {
                tracing::warn!("Failed to render {:?}: {}", cmd, e);
            }
        }
    }
}

pub fn render(cmd: UiCommand) -> String {
    match cmd {
        UiCommand::SetPulsing(true) => "((( hero vibrating )))".to_string(),
        UiCommand::SetPulsing(false) => "    hero still".to_string(),
        UiCommand::MusicLabel(true) => "Music: ON 🔊".to_string(),
        UiCommand::MusicLabel(false) => "Music: OFF 🔇".to_string(),
        UiCommand::RevealNext => "[n] Next ->".to_string(),
        UiCommand::ShowOptions => "Pick one:".to_string(),
        UiCommand::SlideIn(option) => {
            let arrow = match option.slide_direction() {
                SlideDirection::Top => "v",
                SlideDirection::Left => ">",
                SlideDirection::Right => "<",
            };
            format!(
                "  {} [{}] {}",
                arrow,
                option.number(),
                LinkRegistry::resolve(option).label
            )
        }
        UiCommand::ShowLink(option) => {
            let link = LinkRegistry::resolve(option);
            format!("{}\n  {}", link.label, link.url)
        }
    }
}

/// Sending side of the presenter
#[derive(Clone)]
pub struct UiHandle {
    tx: mpsc::UnboundedSender<UiCommand>,
}

impl UiHandle {
    pub fn new(tx: mpsc::UnboundedSender<UiCommand>) -> Self {
        Self { tx }
    }

    pub fn send(&self, cmd: UiCommand) {
        if self.tx.send(cmd).is_err() {
            tracing::debug!("Presenter gone, dropping {:?}", cmd);
        }
    }
}

impl PulseDisplay for UiHandle {
    fn set_pulsing(&mut self, pulsing: bool) {
        self.send(UiCommand::SetPulsing(pulsing));
    }
}
