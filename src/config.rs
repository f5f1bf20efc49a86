//! Application-level configuration loading for timing and code-generation knobs.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::codes::{MAX_CODE_LENGTH, MIN_CODE_LENGTH};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "STUDY_ROOM_BACK_CONFIG_PATH";

/// Maximum heartbeat age before a participant drops out of the live count.
const DEFAULT_PRESENCE_TIMEOUT_SECONDS: u64 = 30;
/// Heartbeat cadence advertised to clients; the timeout should stay around
/// three times this value so a single missed beat does not flicker anyone
/// out of the count.
const DEFAULT_HEARTBEAT_INTERVAL_SECONDS: u64 = 10;
/// Length of generated room join codes.
const DEFAULT_CODE_LENGTH: usize = 6;
/// How many colliding candidates the code generator draws before giving up.
const DEFAULT_CODE_RETRY_LIMIT: u32 = 5;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    presence_timeout: Duration,
    heartbeat_interval: Duration,
    code_length: usize,
    code_retry_limit: u32,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        presence_timeout_seconds = app_config.presence_timeout.as_secs(),
                        "loaded configuration"
                    );
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

    /// Maximum heartbeat age before a participant is considered absent.
    pub fn presence_timeout(&self) -> Duration {
        self.presence_timeout
    }

    /// Heartbeat cadence clients are asked to follow, in whole seconds.
    pub fn heartbeat_interval_seconds(&self) -> u64 {
        self.heartbeat_interval.as_secs()
    }

    /// Length of generated room join codes.
    pub fn code_length(&self) -> usize {
        self.code_length
    }

    /// Collision retry budget for the room code generator.
    pub fn code_retry_limit(&self) -> u32 {
        self.code_retry_limit
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            presence_timeout: Duration::from_secs(DEFAULT_PRESENCE_TIMEOUT_SECONDS),
            heartbeat_interval: Duration::from_secs(DEFAULT_HEARTBEAT_INTERVAL_SECONDS),
            code_length: DEFAULT_CODE_LENGTH,
            code_retry_limit: DEFAULT_CODE_RETRY_LIMIT,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    presence_timeout_seconds: Option<u64>,
    heartbeat_interval_seconds: Option<u64>,
    code_length: Option<usize>,
    code_retry_limit: Option<u32>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            presence_timeout: value
                .presence_timeout_seconds
                .map(Duration::from_secs)
                .unwrap_or(defaults.presence_timeout),
            heartbeat_interval: value
                .heartbeat_interval_seconds
                .map(Duration::from_secs)
                .unwrap_or(defaults.heartbeat_interval),
            code_length: value
                .code_length
                .map(clamp_code_length)
                .unwrap_or(defaults.code_length),
            code_retry_limit: value.code_retry_limit.unwrap_or(defaults.code_retry_limit),
        }
    }
}

/// Keep the configured code length inside the window the code format
/// validator accepts; a value outside it would make every generated code
/// fail validation at the door.
fn clamp_code_length(configured: usize) -> usize {
    let clamped = configured.clamp(MIN_CODE_LENGTH, MAX_CODE_LENGTH);
    if clamped != configured {
        warn!(
            configured,
            clamped, "code_length outside {MIN_CODE_LENGTH}-{MAX_CODE_LENGTH}; clamping"
        );
    }
    clamped
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
