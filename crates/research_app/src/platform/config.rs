//! Runtime configuration read from a RON file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use research_engine::{ClientSettings, DEFAULT_ENDPOINT};
use serde::Deserialize;
use thiserror::Error;

use super::logging::LogDestination;

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("could not read config: {0}")]
    Read(#[from] std::io::Error),
    #[error("could not parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub(crate) endpoint: String,
    pub(crate) step_interval_ms: u64,
    pub(crate) connect_timeout_ms: u64,
    pub(crate) request_timeout_ms: Option<u64>,
    /// Where `answer.html` is written after each successful answer.
    pub(crate) report_dir: Option<PathBuf>,
    pub(crate) log: LogDestination,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            step_interval_ms: research_core::STEP_INTERVAL.as_millis() as u64,
            connect_timeout_ms: 10_000,
            request_timeout_ms: None,
            report_dir: None,
            log: LogDestination::File,
        }
    }
}

impl AppConfig {
    pub(crate) fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub(crate) fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        if config.step_interval_ms == 0 {
            return Err(ConfigError::Invalid("step_interval_ms must be positive".into()));
        }
        if config.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("endpoint must not be empty".into()));
        }
        Ok(config)
    }

    pub(crate) fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_interval_ms)
    }

    pub(crate) fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            endpoint: self.endpoint.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: self.request_timeout_ms.map(Duration::from_millis),
        }
    }
}
