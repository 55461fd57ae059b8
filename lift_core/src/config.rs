//! Configuration file support for liftstat.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/liftstat/config.toml`.

use crate::units::UnitSystem;
use crate::{Error, Result, SortOrder};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub user: UserConfig,

    #[serde(default)]
    pub units: UnitsConfig,

    #[serde(default)]
    pub history: HistoryConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Owner of the personal records written by this installation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default = "default_owner")]
    pub owner: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            owner: default_owner(),
        }
    }
}

/// Display units
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct UnitsConfig {
    #[serde(default)]
    pub system: UnitSystem,
}

/// History view defaults
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct HistoryConfig {
    #[serde(default)]
    pub default_order: SortOrder,
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("liftstat")
}

fn default_owner() -> String {
    "local".into()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("liftstat").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.user.owner.trim().is_empty() {
            return Err(Error::Config("user.owner must not be empty".into()));
        }
        Ok(())
    }

    /// Path of the JSONL session log
    pub fn session_log_path(data_dir: &Path) -> PathBuf {
        data_dir.join("sessions.jsonl")
    }

    /// Path of the personal record store
    pub fn records_path(data_dir: &Path) -> PathBuf {
        data_dir.join("records.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.user.owner, "local");
        assert_eq!(config.units.system, UnitSystem::Metric);
        assert_eq!(config.history.default_order, SortOrder::NewestFirst);
        assert!(config.data.data_dir.ends_with("liftstat"));
    }

    #[test]
    fn test_config_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested/config.toml");

        let mut config = Config::default();
        config.units.system = UnitSystem::Imperial;
        config.user.owner = "alex".into();
        config.save_to(&path).unwrap();

        let parsed = Config::load_from(&path).unwrap();
        assert_eq!(parsed.units.system, UnitSystem::Imperial);
        assert_eq!(parsed.user.owner, "alex");
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[units]
system = "imperial"

[history]
default_order = "oldest_first"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.units.system, UnitSystem::Imperial);
        assert_eq!(config.history.default_order, SortOrder::OldestFirst);
        assert_eq!(config.user.owner, "local"); // default
    }

    #[test]
    fn test_empty_owner_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[user]\nowner = \"  \"\n").unwrap();

        match Config::load_from(&path) {
            Err(Error::Config(msg)) => assert!(msg.contains("owner")),
            other => panic!("Expected config error, got {:?}", other),
        }
    }
}
