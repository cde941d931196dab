mod app;
mod audio;
mod config;
mod error;
mod input;
mod links;
mod messages;
mod playback;
mod presentation;
mod pulse;
mod services;

use app::App;
use audio::RodioBackend;
use config::Config;
use presentation::{Presenter, UiHandle};
use services::RefreshClock;

use anyhow::Result;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, the landing itself renders on stdout
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    tracing::info!("Starting pulsepage");

    // Load configuration
    let config = Config::load()?;
    config.validate()?;

    // Create LocalSet for !Send futures (stream handles and the pulse loop)
    let local = tokio::task::LocalSet::new();

    local.run_until(async move { run_app(config).await }).await
}

async fn run_app(config: Config) -> Result<()> {
    let (ui_tx, ui_rx) = mpsc::unbounded_channel();
    tokio::task::spawn_local(Presenter::new(ui_rx, std::io::stdout()).run());

    let (event_tx, event_rx) = mpsc::channel(10);
    input::spawn_stdin_reader(event_tx);

    let backend = RodioBackend::new(config.music_path.clone(), config.loop_music);
    let clock = RefreshClock::new(config.refresh_rate_hz);
    let app = App::new(config, backend, UiHandle::new(ui_tx), clock);

    tokio::select! {
        result = app.run(event_rx) => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
    }

    tracing::info!("pulsepage shutdown complete");
    Ok(())
}
