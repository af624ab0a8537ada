//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Duration;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use wt_core::{NoiseFilterConfig, ReferenceZone};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Hakuna landing page, e.g. `https://company.hakuna.ch`.
    #[serde(default)]
    pub base_uri: Option<String>,

    /// Hakuna username.
    #[serde(default)]
    pub username: Option<String>,

    /// Hakuna password.
    #[serde(default)]
    pub password: Option<String>,

    /// Wake periods this short or shorter are noise.
    pub min_wake_minutes: u32,

    /// Sleep gaps this short or shorter are bridged.
    pub min_sleep_minutes: u32,

    /// Zone used for "today" and for Hakuna's wall-clock times.
    pub timezone: ReferenceZone,

    /// Command whose stdout is the power log.
    pub log_command: Vec<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_uri", &self.base_uri)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("min_wake_minutes", &self.min_wake_minutes)
            .field("min_sleep_minutes", &self.min_sleep_minutes)
            .field("timezone", &self.timezone)
            .field("log_command", &self.log_command)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_uri: None,
            username: None,
            password: None,
            min_wake_minutes: 10,
            min_sleep_minutes: 30,
            timezone: ReferenceZone::Local,
            log_command: vec!["pmset".into(), "-g".into(), "log".into()],
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (WT_*)
        figment = figment.merge(Env::prefixed("WT_"));

        figment.extract()
    }

    /// Noise filter thresholds.
    pub fn noise_filter(&self) -> NoiseFilterConfig {
        NoiseFilterConfig {
            min_wake_duration: Duration::minutes(i64::from(self.min_wake_minutes)),
            min_sleep_duration: Duration::minutes(i64::from(self.min_sleep_minutes)),
        }
    }
}

/// Returns the platform-specific config directory for wt.
///
/// On Linux: `~/.config/wt`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("wt"))
}
