use super::asset::open_asset;
use rodio::OutputStreamBuilder;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Short click played on navigation, best-effort
#[derive(Clone)]
pub struct ClickFeedback {
    path: Option<PathBuf>,
}

impl ClickFeedback {
    pub fn new(path: PathBuf, enabled: bool) -> Self {
        Self {
            path: enabled.then_some(path),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    /// Restart the click from the beginning without waiting for it
    pub fn play(&self) {
        if let Some(path) = self.path.clone() {
            tokio::task::spawn_blocking(move || {
                if let Err(e) = play_sound_blocking(&path) {
                    tracing::warn!("Failed to play sound {}: {}", path.display(), e);
                }
            });
        }
    }
}

fn play_sound_blocking(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file = open_asset(path)?;

    let mut stream_handle = OutputStreamBuilder::open_default_stream()?;
    stream_handle.log_on_drop(false);
    let sink = rodio::play(stream_handle.mixer(), BufReader::new(file))?;
    sink.sleep_until_end();

    Ok(())
}
