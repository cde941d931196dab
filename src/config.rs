use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "default_music_path")]
    pub music_path: PathBuf,

    #[serde(default = "default_click_sound")]
    pub click_sound_path: PathBuf,

    #[serde(default = "default_audio_feedback")]
    pub audio_feedback: bool,

    #[serde(default = "default_loop_music")]
    pub loop_music: bool,

    /// Loudness above which the hero pulses, on the 0-255 waveform scale
    #[serde(default = "default_pulse_threshold")]
    pub pulse_threshold: f32,

    #[serde(default = "default_refresh_rate")]
    pub refresh_rate_hz: u32,

    #[serde(default = "default_next_reveal_delay")]
    pub next_reveal_delay_ms: u64,

    #[serde(default = "default_option_stagger")]
    pub option_stagger_ms: u64,

    #[serde(default = "default_autoplay")]
    pub autoplay_on_first_input: bool,
}

fn default_music_path() -> PathBuf {
    PathBuf::from("background.mp3")
}

fn default_click_sound() -> PathBuf {
    PathBuf::from("click.mp3")
}

fn default_audio_feedback() -> bool {
    true
}

fn default_loop_music() -> bool {
    true
}

fn default_pulse_threshold() -> f32 {
    150.0
}

fn default_refresh_rate() -> u32 {
    60
}

fn default_next_reveal_delay() -> u64 {
    3000
}

fn default_option_stagger() -> u64 {
    200
}

fn default_autoplay() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            music_path: default_music_path(),
            click_sound_path: default_click_sound(),
            audio_feedback: default_audio_feedback(),
            loop_music: default_loop_music(),
            pulse_threshold: default_pulse_threshold(),
            refresh_rate_hz: default_refresh_rate(),
            next_reveal_delay_ms: default_next_reveal_delay(),
            option_stagger_ms: default_option_stagger(),
            autoplay_on_first_input: default_autoplay(),
        }
    }
}

impl Config {
    /// Load configuration from the default location (~/.config/pulsepage/config.json)
    ///
    /// A missing file means defaults; nothing is written back.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!("Config file not found at {:?}, using defaults", config_path);
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;

        tracing::info!("Loaded config from {:?}", config_path);
        Ok(config)
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("PULSEPAGE_CONFIG") {
            return Ok(PathBuf::from(path));
        }

        let config_dir = if let Ok(dir) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(dir)
        } else {
            let home = std::env::var("HOME").context("HOME environment variable not set")?;
            PathBuf::from(home).join(".config")
        };

        Ok(config_dir.join("pulsepage").join("config.json"))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.music_path.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("music_path cannot be empty"));
        }

        if self.audio_feedback && self.click_sound_path.as_os_str().is_empty() {
            return Err(anyhow::anyhow!(
                "click_sound_path cannot be empty when audio_feedback is enabled"
            ));
        }

        if !self.pulse_threshold.is_finite() || self.pulse_threshold < 0.0 {
            return Err(anyhow::anyhow!(
                "pulse_threshold must be a non-negative number"
            ));
        }

        if !(1..=240).contains(&self.refresh_rate_hz) {
            return Err(anyhow::anyhow!("refresh_rate_hz must be between 1 and 240"));
        }

        Ok(())
    }

    pub fn next_reveal_delay(&self) -> Duration {
        Duration::from_millis(self.next_reveal_delay_ms)
    }

    pub fn option_stagger(&self) -> Duration {
        Duration::from_millis(self.option_stagger_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.pulse_threshold, 150.0);
        assert_eq!(config.refresh_rate_hz, 60);
        assert_eq!(config.next_reveal_delay(), Duration::from_secs(3));
        assert_eq!(config.option_stagger(), Duration::from_millis(200));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"music_path": "theme.ogg", "pulse_threshold": 90.5}}"#).unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.music_path, PathBuf::from("theme.ogg"));
        assert_eq!(config.pulse_threshold, 90.5);
        assert!(config.loop_music);
        assert_eq!(config.option_stagger_ms, 200);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = Config::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config {
            refresh_rate_hz: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            pulse_threshold: f32::NAN,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            music_path: PathBuf::new(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            click_sound_path: PathBuf::new(),
            audio_feedback: false,
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }
}
