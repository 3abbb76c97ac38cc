//! Postwire configuration system.
//!
//! A single TOML file under `~/.postwire/` carries the backend base URL,
//! workflow timings, and the locally stored Twitter session. The base URL
//! can also be overridden with the `POSTWIRE_API_BASE` environment
//! variable, which wins over the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PostwireError, Result};
use crate::types::TwitterCredentials;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostwireConfig {
    /// Base URL of the posting backend.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Bounded timeout for the listing refresh, seconds.
    #[serde(default = "default_refresh_timeout")]
    pub refresh_timeout_secs: u64,
    /// Due-post sweep interval, seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
    /// Stored Twitter session. Presence of this section is the
    /// authenticated-session flag.
    #[serde(default)]
    pub twitter: Option<TwitterCredentials>,
}

fn default_api_base() -> String {
    "http://localhost:5000".into()
}
fn default_refresh_timeout() -> u64 {
    5
}
fn default_sweep_interval() -> u64 {
    60
}

impl Default for PostwireConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            refresh_timeout_secs: default_refresh_timeout(),
            sweep_interval_secs: default_sweep_interval(),
            twitter: None,
        }
    }
}

impl PostwireConfig {
    /// Load config from the default path, falling back to defaults when the
    /// file does not exist. Applies the environment override.
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        if let Ok(base) = std::env::var("POSTWIRE_API_BASE")
            && !base.is_empty()
        {
            config.api_base = base;
        }
        Ok(config)
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PostwireError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| PostwireError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Save config to the default path.
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| PostwireError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Whether a Twitter session is stored.
    pub fn twitter_authenticated(&self) -> bool {
        self.twitter.is_some()
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the Postwire home directory (~/.postwire).
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".postwire")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = PostwireConfig::default();
        assert_eq!(config.refresh_timeout_secs, 5);
        assert_eq!(config.sweep_interval_secs, 60);
        assert!(!config.twitter_authenticated());
    }

    #[test]
    fn parse_partial_toml() {
        let config: PostwireConfig = toml::from_str(
            r#"
            api_base = "https://posts.example.com"

            [twitter]
            username = "jo"
            access_token = "tok"
            access_token_secret = "sec"
            "#,
        )
        .unwrap();
        assert_eq!(config.api_base, "https://posts.example.com");
        assert_eq!(config.sweep_interval_secs, 60);
        assert!(config.twitter_authenticated());
    }
}
