//! # Configuration
//!
//! TOML configuration for gymkeeper. Every section has defaults, so a config
//! file only needs the values it wants to change.
//!
//! ## Sections
//!
//! - [`GymConfig`] - club name and welcome banner
//! - [`StorageConfig`] - data directory and sled database path
//! - [`SessionConfig`] - workout animation, injury odds, optional RNG seed
//! - [`MaintenanceConfig`] - thresholds for the equipment repair pass
//! - [`LoggingConfig`] - log level and optional log file
//!
//! ## Example
//!
//! ```toml
//! [gym]
//! name = "Pain to Progress Health and Fitness Club"
//!
//! [storage]
//! data_dir = "./data"
//!
//! [session]
//! workout_frames = 10
//! frame_delay_ms = 200
//! low_quality_threshold = 3
//! injury_avoid_odds = 10
//! ```

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GymConfig {
    pub name: String,
    #[serde(default)]
    pub welcome: String,
}

impl Default for GymConfig {
    fn default() -> Self {
        Self {
            name: "Pain to Progress Health and Fitness Club".to_string(),
            welcome: "Transform your pain into progress.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    /// Optional override for the sled database path; defaults to `<data_dir>/gym`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            db_path: None,
        }
    }
}

impl StorageConfig {
    pub fn resolved_db_path(&self) -> PathBuf {
        match &self.db_path {
            Some(p) if !p.trim().is_empty() => PathBuf::from(p),
            _ => PathBuf::from(&self.data_dir).join("gym"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Frames of the "working out" animation; 0 disables it.
    #[serde(default = "default_workout_frames")]
    pub workout_frames: u32,
    #[serde(default = "default_frame_delay_ms")]
    pub frame_delay_ms: u64,
    /// Fixed RNG seed for reproducible visits. Unset means OS entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rng_seed: Option<u64>,
    /// Equipment below this quality (checked before wear) risks injury.
    #[serde(default = "default_low_quality_threshold")]
    pub low_quality_threshold: u8,
    /// Injury is avoided only on a roll of 1 on a die with this many sides.
    #[serde(default = "default_injury_avoid_odds")]
    pub injury_avoid_odds: u8,
}

fn default_workout_frames() -> u32 {
    10
}

fn default_frame_delay_ms() -> u64 {
    200
}

fn default_low_quality_threshold() -> u8 {
    3
}

fn default_injury_avoid_odds() -> u8 {
    10
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            workout_frames: default_workout_frames(),
            frame_delay_ms: default_frame_delay_ms(),
            rng_seed: None,
            low_quality_threshold: default_low_quality_threshold(),
            injury_avoid_odds: default_injury_avoid_odds(),
        }
    }
}

impl SessionConfig {
    /// Settings for scripted runs: no animation, default odds.
    pub fn quiet() -> Self {
        Self {
            workout_frames: 0,
            frame_delay_ms: 0,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceConfig {
    #[serde(default = "default_attention_threshold")]
    pub attention_threshold: u8,
    #[serde(default = "default_repaired_quality")]
    pub repaired_quality: u8,
}

fn default_attention_threshold() -> u8 {
    4
}

fn default_repaired_quality() -> u8 {
    10
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            attention_threshold: default_attention_threshold(),
            repaired_quality: default_repaired_quality(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: Some("gymkeeper.log".to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gym: GymConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub maintenance: MaintenanceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        Self::from_toml(&content).map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.session.injury_avoid_odds == 0 {
            return Err(anyhow!("session.injury_avoid_odds must be at least 1"));
        }
        if self.session.low_quality_threshold > 10 {
            return Err(anyhow!("session.low_quality_threshold must be within 0..=10"));
        }
        if self.maintenance.repaired_quality == 0 || self.maintenance.repaired_quality > 10 {
            return Err(anyhow!("maintenance.repaired_quality must be within 1..=10"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_house_rules() {
        let config = Config::default();
        assert_eq!(config.session.low_quality_threshold, 3);
        assert_eq!(config.session.injury_avoid_odds, 10);
        assert_eq!(config.maintenance.attention_threshold, 4);
        assert_eq!(config.maintenance.repaired_quality, 10);
        assert!(config.session.rng_seed.is_none());
        assert_eq!(
            config.storage.resolved_db_path(),
            PathBuf::from("./data").join("gym")
        );
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config = Config::from_toml(
            r#"
[session]
workout_frames = 0
rng_seed = 99

[storage]
data_dir = "/tmp/gym-data"
db_path = "/tmp/elsewhere"
"#,
        )
        .expect("parse");
        assert_eq!(config.session.workout_frames, 0);
        assert_eq!(config.session.rng_seed, Some(99));
        assert_eq!(config.session.frame_delay_ms, 200);
        assert_eq!(config.storage.resolved_db_path(), PathBuf::from("/tmp/elsewhere"));
        assert_eq!(config.gym.name, GymConfig::default().name);
    }

    #[test]
    fn zero_injury_odds_rejected() {
        let err = Config::from_toml("[session]\ninjury_avoid_odds = 0\n").unwrap_err();
        assert!(err.to_string().contains("injury_avoid_odds"));
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let text = toml::to_string_pretty(&Config::default()).expect("serialize");
        let parsed = Config::from_toml(&text).expect("parse");
        assert_eq!(parsed.gym.name, Config::default().gym.name);
        assert_eq!(parsed.logging.level, "info");
    }
}
