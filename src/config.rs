//! Application-level configuration loading, including room-code shape and
//! coordination thresholds.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "QUIZ_ROOM_BACK_CONFIG_PATH";

/// Characters used when the server generates a room code. Ambiguous glyphs
/// stay in because the original client generated codes the same way.
const DEFAULT_CODE_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const DEFAULT_CODE_LENGTH: usize = 6;
const DEFAULT_READY_THRESHOLD: usize = 2;
const DEFAULT_PLAY_WINDOW_SECS: u64 = 60;
const DEFAULT_SSE_CAPACITY: usize = 16;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    code_alphabet: String,
    code_length: usize,
    ready_player_threshold: usize,
    duplicate_play_window: Duration,
    sse_channel_capacity: usize,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to baked-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(path = %path.display(), "loaded configuration from file");
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Alphabet used for generated room codes.
    pub fn code_alphabet(&self) -> &str {
        &self.code_alphabet
    }

    /// Length of generated room codes.
    pub fn code_length(&self) -> usize {
        self.code_length
    }

    /// Minimum roster size before the advisory all-ready flag can be true.
    pub fn ready_player_threshold(&self) -> usize {
        self.ready_player_threshold
    }

    /// Window within which an identical play submission counts as a duplicate.
    pub fn duplicate_play_window(&self) -> Duration {
        self.duplicate_play_window
    }

    /// Capacity of each per-room SSE broadcast channel.
    pub fn sse_channel_capacity(&self) -> usize {
        self.sse_channel_capacity
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            code_alphabet: DEFAULT_CODE_ALPHABET.to_string(),
            code_length: DEFAULT_CODE_LENGTH,
            ready_player_threshold: DEFAULT_READY_THRESHOLD,
            duplicate_play_window: Duration::from_secs(DEFAULT_PLAY_WINDOW_SECS),
            sse_channel_capacity: DEFAULT_SSE_CAPACITY,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    code_alphabet: Option<String>,
    code_length: Option<usize>,
    ready_player_threshold: Option<usize>,
    duplicate_play_window_secs: Option<u64>,
    sse_channel_capacity: Option<usize>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = AppConfig::default();
        Self {
            code_alphabet: value
                .code_alphabet
                .filter(|alphabet| !alphabet.is_empty())
                .unwrap_or(defaults.code_alphabet),
            code_length: value
                .code_length
                .filter(|length| *length > 0)
                .unwrap_or(defaults.code_length),
            ready_player_threshold: value
                .ready_player_threshold
                .unwrap_or(defaults.ready_player_threshold),
            duplicate_play_window: value
                .duplicate_play_window_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.duplicate_play_window),
            sse_channel_capacity: value
                .sse_channel_capacity
                .filter(|capacity| *capacity > 0)
                .unwrap_or(defaults.sse_channel_capacity),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_config_fills_missing_fields_with_defaults() {
        let raw: RawConfig = serde_json::from_str(r#"{"code_length": 8}"#).unwrap();
        let config: AppConfig = raw.into();
        assert_eq!(config.code_length(), 8);
        assert_eq!(config.ready_player_threshold(), DEFAULT_READY_THRESHOLD);
        assert_eq!(
            config.duplicate_play_window(),
            Duration::from_secs(DEFAULT_PLAY_WINDOW_SECS)
        );
    }

    #[test]
    fn zero_code_length_is_rejected() {
        let raw: RawConfig = serde_json::from_str(r#"{"code_length": 0}"#).unwrap();
        let config: AppConfig = raw.into();
        assert_eq!(config.code_length(), DEFAULT_CODE_LENGTH);
    }
}
