use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub cache: CacheConfig,
    pub history: HistoryConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the dictionary backend.
    pub base_url: String,

    /// Base URL used when building shareable links.
    pub share_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached searches.
    pub max_entries: usize,

    /// Minutes before a cached search expires.
    pub expiration_minutes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of history items kept.
    pub max_entries: usize,

    /// Override for the history file location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show the pronunciation line under each headword.
    pub show_pronunciations: bool,

    /// Show verbal illustrations under each sense.
    pub show_examples: bool,

    /// Words offered on the empty home screen.
    pub recommended_words: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            cache: CacheConfig::default(),
            history: HistoryConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            share_base_url: "http://localhost:3000".to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 100,
            expiration_minutes: 30,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: 20,
            file: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_pronunciations: true,
            show_examples: true,
            recommended_words: vec![
                "serendipity".to_string(),
                "curious".to_string(),
                "eloquent".to_string(),
                "resilience".to_string(),
                "ephemeral".to_string(),
                "meticulous".to_string(),
            ],
        }
    }
}

impl Config {
    /// Load config from the default location, creating it with defaults on
    /// first run. `DICT_API_URL` overrides the configured backend URL.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file();

        let mut config = if config_path.exists() {
            let contents = fs::read_to_string(&config_path)?;
            toml::from_str(&contents)?
        } else {
            let default_config = Self::default();
            default_config.save()?;
            default_config
        };

        if let Ok(url) = std::env::var("DICT_API_URL") {
            config.api.base_url = url;
        }

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_file();
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&config_path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn config_file() -> PathBuf {
        config_dir().join("config.toml")
    }

    pub fn cache_expiration(&self) -> Duration {
        Duration::from_secs(self.cache.expiration_minutes * 60)
    }

    pub fn history_file(&self) -> PathBuf {
        self.history
            .file
            .clone()
            .unwrap_or_else(|| config_dir().join("history.json"))
    }
}

/// Directory holding config, history, and logs (`~/.dict-cli`).
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".dict-cli")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip_through_toml() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.cache.max_entries, 100);
        assert_eq!(parsed.cache.expiration_minutes, 30);
        assert_eq!(parsed.history.max_entries, 20);
    }

    #[test]
    fn test_partial_config_fills_in_defaults() {
        let parsed: Config = toml::from_str("[api]\nbase_url = \"https://dict.example.com\"\n")
            .unwrap();
        assert_eq!(parsed.api.base_url, "https://dict.example.com");
        assert_eq!(parsed.cache.max_entries, 100);
        assert!(parsed.display.show_examples);
    }
}
