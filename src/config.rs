//! Configuration management with validation and defaults

use crate::errors::{CheckersError, CheckersResult, ConfigurationError};
use chrono::Duration as ChronoDuration;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Upper bound on a turn, 100 years
pub const MAX_TURN_DURATION_SECS: u64 = 100 * 365 * 24 * 3_600;

/// Top-level configuration of the checkers module
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckersConfig {
    pub game: GameConfig,
    pub gas: GasConfig,
    pub storage: StorageConfig,
    pub monitoring: MonitoringConfig,
}

/// Game lifecycle parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Time a player has to make a move before the game can be forfeited
    pub max_turn_duration_secs: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_turn_duration_secs: 24 * 3_600, // 1 day
        }
    }
}

/// Fixed gas charged (or refunded) by the message handlers
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GasConfig {
    pub create_game: u64,
    pub play_move: u64,
    pub reject_game_refund: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            create_game: 15_000,
            play_move: 1_000,
            reject_game_refund: 14_000,
        }
    }
}

/// RocksDB settings for the persistent game store
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_directory: String,
    pub write_buffer_size_mb: usize,
    pub max_write_buffer_number: i32,
    pub compression_type: CompressionType,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum CompressionType {
    None,
    Snappy,
    Lz4,
    Zstd,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_directory: "./DB/checkers_data".to_string(),
            write_buffer_size_mb: 64,
            max_write_buffer_number: 4,
            compression_type: CompressionType::Lz4,
        }
    }
}

/// Logging and metrics configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enable_metrics: bool,
    pub log_level: LogLevel,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            enable_metrics: true,
            log_level: LogLevel::Info,
        }
    }
}

impl CheckersConfig {
    /// Configuration for production deployment with persistence
    pub fn production() -> Self {
        Self {
            storage: StorageConfig {
                write_buffer_size_mb: 128,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Short turns for manual testing from a local node
    pub fn testing() -> Self {
        Self {
            game: GameConfig {
                max_turn_duration_secs: 5 * 60,
            },
            monitoring: MonitoringConfig {
                log_level: LogLevel::Debug,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn from_toml_str(raw: &str) -> CheckersResult<Self> {
        let config: CheckersConfig = toml::from_str(raw)?;
        config.validate().map_err(|e| {
            CheckersError::Configuration(ConfigurationError::ValidationFailed(e.to_string()))
        })?;
        Ok(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> CheckersResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Validate configuration for logical consistency
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.game.max_turn_duration_secs == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "max_turn_duration_secs must be > 0".to_string(),
            ));
        }

        if self.game.max_turn_duration_secs > MAX_TURN_DURATION_SECS {
            return Err(ConfigValidationError::InvalidValue(format!(
                "max_turn_duration_secs must be <= {}",
                MAX_TURN_DURATION_SECS
            )));
        }

        if self.gas.reject_game_refund > self.gas.create_game {
            return Err(ConfigValidationError::LogicalInconsistency(
                "reject_game_refund cannot exceed create_game gas".to_string(),
            ));
        }

        if self.storage.data_directory.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "storage.data_directory".to_string(),
            ));
        }

        Ok(())
    }

    pub fn max_turn_duration(&self) -> Duration {
        Duration::from_secs(self.game.max_turn_duration_secs)
    }
}

impl GameConfig {
    /// Turn duration as a chrono offset for deadline arithmetic; `None` when
    /// chrono cannot represent it
    pub fn turn_duration(&self) -> Option<ChronoDuration> {
        i64::try_from(self.max_turn_duration_secs)
            .ok()
            .and_then(ChronoDuration::try_seconds)
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
    #[error("Configuration logical inconsistency: {0}")]
    LogicalInconsistency(String),
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
