//! Application configuration
//!
//! Settings come from a TOML file (an explicit path, or `config.toml` in the
//! platform config directory) and are then overridden by environment
//! variables.

use crate::error::{Error, Result};
use crate::orchestrator::DEFAULT_EMPTY_SENTINEL;
use crate::risk::UnknownColorPolicy;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const ENV_BASE_URL: &str = "DEFECT_PULSE_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "DEFECT_PULSE_TIMEOUT_SECS";
pub const ENV_UNKNOWN_COLOR: &str = "DEFECT_PULSE_UNKNOWN_COLOR";

const CONFIG_FILE_NAME: &str = "config.toml";

/// Location of the default config file, if a home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "defect-pulse", "defect-pulse")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Root of the defect-tracking REST service
    pub base_url: String,
    /// Per-request timeout for the HTTP client; 0 disables it
    pub request_timeout_secs: u64,
    /// Messages that mark an upstream answer as "no data"
    pub empty_sentinels: Vec<String>,
    /// Tier for projects whose card color is not recognized
    pub unknown_color_policy: UnknownColorPolicy,
    /// Verbosity level for logging
    pub verbose: u8,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            request_timeout_secs: 30,
            empty_sentinels: vec![DEFAULT_EMPTY_SENTINEL.to_string()],
            unknown_color_policy: UnknownColorPolicy::default(),
            verbose: 0,
        }
    }
}

impl DashboardConfig {
    /// Load from `path`, or from the default location when `path` is `None`.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path).await?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path).await?,
                _ => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };
        config.merge_env_vars()?;
        config.validate()?;
        Ok(config)
    }

    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::Config(format!("Cannot read config {}: {}", path.display(), e))
        })?;
        let config: Self = toml::from_str(&content)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply `DEFECT_PULSE_*` environment overrides.
    pub fn merge_env_vars(&mut self) -> Result<()> {
        self.merge_env_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn merge_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.base_url = base_url;
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = timeout.trim().parse().map_err(|_| {
                Error::Config(format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds"))
            })?;
        }

        if let Some(policy) = lookup(ENV_UNKNOWN_COLOR) {
            self.unknown_color_policy = policy.parse().map_err(Error::Config)?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url)?;
        if self.empty_sentinels.iter().all(|s| s.trim().is_empty()) {
            return Err(Error::Config(
                "empty_sentinels must contain at least one message".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// Get the log level string based on verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            2 => "trace",
            _ => "trace,hyper=debug,reqwest=debug",
        }
    }
}
