//! Configuration management for the hub client.

use crate::network::DEFAULT_HUB_URL;
use crate::{Error, Result};
use serde::Deserialize;
use std::env;
use std::path::Path;

/// Hub client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HubConfig {
    /// Base URL of the hub, without a trailing slash.
    #[serde(default = "default_hub_url")]
    pub hub_url: String,
    /// Optional per-request timeout. Unset means requests never time out.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_hub_url() -> String {
    DEFAULT_HUB_URL.to_string()
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            hub_url: default_hub_url(),
            timeout_secs: None,
        }
    }
}

/// Environment variable overriding the hub URL.
pub const HUB_URL_ENV: &str = "SNAPSHOT_HUB_URL";

/// Environment variable overriding the request timeout, in seconds.
pub const HUB_TIMEOUT_ENV: &str = "SNAPSHOT_HUB_TIMEOUT_SECS";

#[allow(clippy::result_large_err)]
fn timeout_from_env() -> Result<Option<u64>> {
    match env::var(HUB_TIMEOUT_ENV) {
        Ok(raw) => raw.trim().parse().map(Some).map_err(|_| Error::Config {
            message: format!("{} is not a number: {}", HUB_TIMEOUT_ENV, raw),
        }),
        Err(_) => Ok(None),
    }
}

impl HubConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads `SNAPSHOT_HUB_URL` and `SNAPSHOT_HUB_TIMEOUT_SECS`, after loading
    /// a `.env` file if one is present.
    #[allow(clippy::result_large_err)]
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Self {
            hub_url: env::var(HUB_URL_ENV).unwrap_or_else(|_| default_hub_url()),
            timeout_secs: timeout_from_env()?,
        }
        .validated()
    }

    /// Load configuration from a file, then apply the same environment
    /// overrides as [`HubConfig::from_env`].
    ///
    /// Any format supported by the `config` crate works (TOML, YAML, JSON).
    #[allow(clippy::result_large_err)]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let timeout_secs = timeout_from_env()?.map(|secs| secs as i64);
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .set_override_option("hub_url", env::var(HUB_URL_ENV).ok())?
            .set_override_option("timeout_secs", timeout_secs)?
            .build()?;

        settings.try_deserialize::<HubConfig>()?.validated()
    }

    /// Use a specific hub URL.
    pub fn with_hub_url(mut self, hub_url: impl Into<String>) -> Self {
        self.hub_url = hub_url.into();
        self
    }

    /// Set a request timeout in seconds.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    #[allow(clippy::result_large_err)]
    pub(crate) fn validated(mut self) -> Result<Self> {
        let trimmed = self.hub_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(Error::Config {
                message: "hub URL must not be empty".to_string(),
            });
        }
        self.hub_url = trimmed.to_string();
        Ok(self)
    }
}

/// Serializes tests that touch process-wide environment variables.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
pub(crate) fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
