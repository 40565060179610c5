//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cycle_core::EngineConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the entry store snapshot.
    pub entries_path: PathBuf,

    /// API key for the AI enhancement service.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for AI enhancement.
    pub model: String,

    /// Upper bound on the whole AI enhancement call.
    pub ai_timeout_secs: u64,

    /// Cycle length assumed without history.
    pub default_cycle_length: f64,

    /// Period length assumed without logged end dates.
    pub default_period_length: f64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("entries_path", &self.entries_path)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("ai_timeout_secs", &self.ai_timeout_secs)
            .field("default_cycle_length", &self.default_cycle_length)
            .field("default_period_length", &self.default_period_length)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        let engine = EngineConfig::default();
        Self {
            entries_path: data_dir.join("entries.json"),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            ai_timeout_secs: 5,
            default_cycle_length: engine.default_cycle_length_days,
            default_period_length: engine.default_period_length_days,
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

        // Load from environment variables (CYCLE_*)
        figment = figment.merge(Env::prefixed("CYCLE_"));

        figment.extract()
    }

    /// Engine fallbacks from the configured defaults.
    ///
    /// Non-positive values are ignored.
    pub fn engine(&self) -> EngineConfig {
        let defaults = EngineConfig::default();
        EngineConfig {
            default_cycle_length_days: Some(self.default_cycle_length)
                .filter(|days| *days > 0.0)
                .unwrap_or(defaults.default_cycle_length_days),
            default_period_length_days: Some(self.default_period_length)
                .filter(|days| *days > 0.0)
                .unwrap_or(defaults.default_period_length_days),
        }
    }

    /// The API key, if one is set and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub const fn ai_timeout(&self) -> Duration {
        Duration::from_secs(self.ai_timeout_secs)
    }
}

/// Returns the platform-specific config directory for cycle.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("cycle"))
}

/// Returns the platform-specific data directory for cycle.
///
/// On Linux: `~/.local/share/cycle`
fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("cycle"))
}
