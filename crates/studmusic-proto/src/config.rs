use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::platform;
use crate::playback::DEFAULT_VOLUME;

/// Environment variable holding the search bearer token. Overrides
/// `lookup.token` from the config file.
pub const TOKEN_ENV: &str = "STUDMUSIC_SPOTIFY_TOKEN";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Remote track search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    #[serde(default = "default_lookup_enabled")]
    pub enabled: bool,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Bearer token. Usually left unset in favour of `STUDMUSIC_SPOTIFY_TOKEN`.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_query")]
    pub query: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_volume")]
    pub default_volume: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Key-value store file holding the recently-played ledger.
    /// Defaults to `~/.local/share/studmusic/storage.json`.
    #[serde(default = "default_store_file")]
    pub store_file: PathBuf,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            enabled: default_lookup_enabled(),
            endpoint: default_endpoint(),
            token: None,
            query: default_query(),
            limit: default_limit(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            default_volume: default_volume(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            store_file: default_store_file(),
        }
    }
}

impl LookupConfig {
    /// Token from the environment first, then the config file. Blank values
    /// count as unset.
    pub fn bearer_token(&self) -> Option<String> {
        std::env::var(TOKEN_ENV)
            .ok()
            .or_else(|| self.token.clone())
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    }
}

impl PlayerConfig {
    pub fn tick_interval(&self) -> Duration {
        // A zero period would make tokio's interval panic.
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

fn default_lookup_enabled() -> bool {
    true
}

fn default_endpoint() -> String {
    "https://api.spotify.com/v1/search".to_string()
}

fn default_query() -> String {
    "trending".to_string()
}

fn default_limit() -> u32 {
    6
}

fn default_tick_interval_ms() -> u64 {
    300
}

fn default_volume() -> u8 {
    DEFAULT_VOLUME
}

fn default_store_file() -> PathBuf {
    platform::data_dir().join("storage.json")
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save_to(&config_path)?;
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.lookup.enabled);
        assert_eq!(config.lookup.limit, 6);
        assert!(config.lookup.endpoint.starts_with("https://"));
        assert_eq!(config.player.tick_interval(), Duration::from_millis(300));
        assert_eq!(config.player.default_volume, 70);
        assert!(config.paths.store_file.ends_with("studmusic/storage.json"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [player]
            tick_interval_ms = 50

            [lookup]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(config.player.tick_interval_ms, 50);
        assert_eq!(config.player.default_volume, 70);
        assert!(!config.lookup.enabled);
        assert_eq!(config.lookup.limit, 6);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf").join("config.toml");
        let mut config = Config::default();
        config.lookup.query = "lofi".into();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.lookup.query, "lofi");
    }

    #[test]
    fn test_zero_tick_interval_is_floored() {
        let player = PlayerConfig {
            tick_interval_ms: 0,
            ..PlayerConfig::default()
        };
        assert_eq!(player.tick_interval(), Duration::from_millis(1));
    }
}
