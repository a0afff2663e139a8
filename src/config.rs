//! Configuration management for tapspeed
//!
//! Provides persistent configuration that is automatically saved to and
//! loaded from a platform-specific config file.
//!
//! ## Config File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/tapspeed/config.toml` |
//! | macOS | `~/Library/Application Support/tapspeed/config.toml` |
//! | Windows | `%APPDATA%\tapspeed\config.toml` |

use crate::leaderboard;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Error type for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to determine config directory
    #[error("could not determine config directory")]
    NoConfigDir,
    /// IO error reading or writing the config file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Failed to parse the config file
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize config
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Returns the path to the config file.
///
/// Creates the config directory if it doesn't exist.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    let app_dir = config_dir.join("tapspeed");

    if !app_dir.exists() {
        fs::create_dir_all(&app_dir)?;
    }

    Ok(app_dir.join("config.toml"))
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Hit timer settings
    pub timer: TimerConfig,
    /// High-score table settings
    pub leaderboard: LeaderboardConfig,
}

/// Hit timer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Key-state polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 10,
        }
    }
}

/// High-score table configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    /// Number of scores kept
    pub capacity: usize,
    /// File name of the score store inside the data directory
    pub file_name: String,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            capacity: leaderboard::DEFAULT_CAPACITY,
            file_name: "high_scores.txt".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// Useful for testing or using custom config locations.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default config file.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Key-state polling interval as a Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.timer.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_config_path() -> PathBuf {
        env::temp_dir().join(format!("tapspeed-config-test-{}.toml", std::process::id()))
    }

    #[test]
    fn config_default_values() {
        let config = Config::default();
        assert_eq!(config.timer.poll_interval_ms, 10);
        assert_eq!(config.leaderboard.capacity, 10);
        assert_eq!(config.leaderboard.file_name, "high_scores.txt");
    }

    #[test]
    fn config_poll_interval() {
        let mut config = Config::default();
        assert_eq!(config.poll_interval(), Duration::from_millis(10));

        config.timer.poll_interval_ms = 16;
        assert_eq!(config.poll_interval(), Duration::from_millis(16));
    }

    #[test]
    fn config_save_and_load_roundtrip() {
        let path = temp_config_path();

        let mut config = Config::default();
        config.timer.poll_interval_ms = 5;
        config.leaderboard.capacity = 3;

        config.save_to(&path).expect("Failed to save config");
        let loaded = Config::load_from(&path).expect("Failed to load config");

        assert_eq!(loaded.timer.poll_interval_ms, 5);
        assert_eq!(loaded.leaderboard.capacity, 3);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn config_load_missing_file_is_an_error() {
        let path = PathBuf::from("/nonexistent/path/config.toml");
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn config_serializes_to_toml() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");

        assert!(toml_str.contains("[timer]"));
        assert!(toml_str.contains("[leaderboard]"));
        assert!(toml_str.contains("poll_interval_ms = 10"));
        assert!(toml_str.contains("capacity = 10"));
    }

    #[test]
    fn config_deserializes_from_toml() {
        let toml_str = r#"
[timer]
poll_interval_ms = 8

[leaderboard]
capacity = 5
file_name = "scores.txt"
"#;

        let config: Config = toml::from_str(toml_str).expect("Failed to deserialize");

        assert_eq!(config.timer.poll_interval_ms, 8);
        assert_eq!(config.leaderboard.capacity, 5);
        assert_eq!(config.leaderboard.file_name, "scores.txt");
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::NoConfigDir;
        assert_eq!(err.to_string(), "could not determine config directory");

        let io_err = ConfigError::Io(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        assert!(io_err.to_string().contains("IO error"));
    }
}
