use crate::audio::{AudioBackend, ClickFeedback, FrameFormat};
use crate::config::Config;
use crate::links::InviteOption;
use crate::messages::{UiCommand, UserEvent};
use crate::playback::PlaybackGate;
use crate::presentation::UiHandle;
use crate::pulse::PulseController;
use crate::services::pulse::FrameClock;
use crate::services::{PulseHandle, PulseService};

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Intro,
    Options,
    Link(InviteOption),
}

pub struct App<B: AudioBackend> {
    config: Config,
    gate: PlaybackGate<B>,
    pulse: PulseHandle,
    ui: UiHandle,
    click: ClickFeedback,
    stage: Stage,
    next_revealed: bool,
    autoplay_armed: bool,
}

impl<B: AudioBackend> App<B> {
    /// Must be called inside a LocalSet: the pulse service is spawned locally
    pub fn new<C: FrameClock + 'static>(config: Config, backend: B, ui: UiHandle, clock: C) -> Self {
        let pulse = Self::setup_pulse_service(&config, ui.clone(), clock);
        let click = ClickFeedback::new(config.click_sound_path.clone(), config.audio_feedback);
        let autoplay_armed = config.autoplay_on_first_input;
        tracing::debug!("Click feedback enabled: {}", click.is_enabled());

        Self {
            config,
            gate: PlaybackGate::new(backend),
            pulse,
            ui,
            click,
            stage: Stage::Intro,
            next_revealed: false,
            autoplay_armed,
        }
    }

    pub async fn run(mut self, mut events: mpsc::Receiver<UserEvent>) -> Result<()> {
        let reveal = tokio::time::sleep(self.config.next_reveal_delay());
        tokio::pin!(reveal);

        tracing::info!("Ready! Type m to toggle music, n to continue");

        loop {
            tracing::debug!("Main loop: waiting for event");
            tokio::select! {
                () = &mut reveal, if !self.next_revealed => self.reveal_next(),

                event = events.recv() => match event {
                    Some(UserEvent::Quit) | None => break,
                    Some(event) => {
                        if let Err(e) = self.handle_event(event).await {
                            tracing::error!("Error handling {:?}: {}", event, e);
                        }
                    }
                },
            }
        }

        self.shutdown().await
    }

    async fn handle_event(&mut self, event: UserEvent) -> Result<()> {
        tracing::debug!(
            "handle_event: {:?} in {:?}, playback {:?}",
            event,
            self.stage,
            self.gate.state()
        );

        if std::mem::take(&mut self.autoplay_armed) && event != UserEvent::ToggleAudio {
            self.autoplay().await?;
        }

        match event {
            UserEvent::ToggleAudio => self.toggle_music().await?,
            UserEvent::Advance => self.show_options(),
            UserEvent::Select(option) => self.show_link(option),
            UserEvent::Quit => {}
        }

        Ok(())
    }

    /// One attempt on the first interaction, never retried
    async fn autoplay(&mut self) -> Result<()> {
        if self.gate.is_playing() {
            return Ok(());
        }

        match self.gate.start() {
            Ok(handle) => {
                self.pulse.attach(handle).await?;
                self.ui.send(UiCommand::MusicLabel(true));
            }
            Err(e) => {
                tracing::warn!("Music auto-play failed ({}). User must manually toggle.", e);
            }
        }

        Ok(())
    }

    async fn toggle_music(&mut self) -> Result<()> {
        match self.gate.toggle() {
            Ok(Some(handle)) => {
                self.pulse.attach(handle).await?;
                self.ui.send(UiCommand::MusicLabel(true));
            }
            Ok(None) => {
                self.pulse.detach().await?;
                self.ui.send(UiCommand::MusicLabel(false));
            }
            Err(e) => {
                tracing::error!("Music play failed: {}", e);
                self.pulse.detach().await?;
            }
        }

        Ok(())
    }

    fn reveal_next(&mut self) {
        tracing::debug!("Revealing next button");
        self.next_revealed = true;
        self.ui.send(UiCommand::RevealNext);
    }

    fn show_options(&mut self) {
        if self.stage != Stage::Intro || !self.next_revealed {
            tracing::debug!("Next is not available, ignoring");
            return;
        }

        self.click.play();
        self.stage = Stage::Options;
        self.ui.send(UiCommand::ShowOptions);

        let ui = self.ui.clone();
        let stagger = self.config.option_stagger();
        let start = Instant::now();
        tokio::task::spawn_local(async move {
            for (index, option) in InviteOption::ALL.into_iter().enumerate() {
                tokio::time::sleep_until(start + stagger * index as u32).await;
                ui.send(UiCommand::SlideIn(option));
            }
        });
    }

    fn show_link(&mut self, option: InviteOption) {
        if self.stage != Stage::Options {
            tracing::debug!("Options are not shown, ignoring selection");
            return;
        }

        self.click.play();
        self.stage = Stage::Link(option);
        tracing::info!("Selected option {}", option.number());
        self.ui.send(UiCommand::ShowLink(option));
    }

    async fn shutdown(mut self) -> Result<()> {
        self.gate.stop();
        self.pulse.detach().await?;
        tracing::info!("Landing closed");
        Ok(())
    }

    fn setup_pulse_service<C: FrameClock + 'static>(config: &Config, ui: UiHandle, clock: C) -> PulseHandle {
        let controller = PulseController::new(ui, config.pulse_threshold, FrameFormat::default());

        // Stream handles are !Send, so the service lives on the LocalSet
        let (pulse_tx, pulse_rx) = mpsc::channel(10);
        let service = PulseService::new(controller, clock, pulse_rx);
        tokio::task::spawn_local(service.run());

        PulseHandle::new(pulse_tx)
    }
}
