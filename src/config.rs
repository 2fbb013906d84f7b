//! Configuration management for the croupier wagering core

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::CoreError;

/// Main configuration for the wagering core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Wager orchestration configuration
    pub wager: WagerConfig,
    /// Daily spin configuration
    pub spin: SpinConfig,
    /// Statistics and leaderboard configuration
    pub stats: StatsConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            wager: WagerConfig::default(),
            spin: SpinConfig::default(),
            stats: StatsConfig::default(),
        }
    }
}

/// Wager orchestration configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WagerConfig {
    /// Maximum time to wait for a user's play lock before giving up (milliseconds)
    pub lock_wait_ms: u64,
    /// Retry attempts for the compensating refund after a mid-sequence failure
    pub compensation_retries: u32,
    /// Maximum page size accepted by listing endpoints
    pub max_page_limit: u32,
}

impl Default for WagerConfig {
    fn default() -> Self {
        Self {
            lock_wait_ms: 5_000,
            compensation_retries: 3,
            max_page_limit: 100,
        }
    }
}

/// Daily spin configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinConfig {
    /// Free spins granted per calendar day
    pub free_spins_per_day: u32,
    /// Flat KC cost of a spin once the free quota is exhausted
    pub premium_spin_cost: u64,
    /// Platform-local timezone as a fixed offset from UTC, in minutes
    ///
    /// All timestamps are stored in UTC; the offset only affects calendar
    /// bucketing (spin quota reset, day/week/month windows).
    pub utc_offset_minutes: i32,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            free_spins_per_day: 3,
            premium_spin_cost: 100,
            utc_offset_minutes: 0,
        }
    }
}

/// Statistics and leaderboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Leaderboard size when the caller does not supply a limit
    pub default_leaderboard_limit: usize,
    /// Hard cap on requested leaderboard size
    pub max_leaderboard_limit: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            default_leaderboard_limit: 10,
            max_leaderboard_limit: 100,
        }
    }
}

impl CoreConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CoreError> {
        let content = fs::read_to_string(path).map_err(|e| CoreError::Configuration {
            message: format!("Failed to read config file: {}", e),
            field: "config_file".to_string(),
        })?;

        let config: CoreConfig = toml::from_str(&content).map_err(|e| CoreError::Configuration {
            message: format!("Failed to parse config file: {}", e),
            field: "config_format".to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CoreError> {
        let content = toml::to_string_pretty(self).map_err(|e| CoreError::Configuration {
            message: format!("Failed to serialize config: {}", e),
            field: "config_serialization".to_string(),
        })?;

        fs::write(path, content).map_err(|e| CoreError::Configuration {
            message: format!("Failed to write config file: {}", e),
            field: "config_write".to_string(),
        })?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.wager.lock_wait_ms == 0 {
            return Err(CoreError::Configuration {
                message: "Lock wait must be greater than 0".to_string(),
                field: "wager.lock_wait_ms".to_string(),
            });
        }

        if self.wager.max_page_limit == 0 {
            return Err(CoreError::Configuration {
                message: "Max page limit must be greater than 0".to_string(),
                field: "wager.max_page_limit".to_string(),
            });
        }

        if self.spin.premium_spin_cost == 0 {
            return Err(CoreError::Configuration {
                message: "Premium spin cost must be greater than 0".to_string(),
                field: "spin.premium_spin_cost".to_string(),
            });
        }

        // Offsets beyond +-18h do not correspond to any real timezone
        if self.spin.utc_offset_minutes.abs() > 18 * 60 {
            return Err(CoreError::Configuration {
                message: "UTC offset out of range".to_string(),
                field: "spin.utc_offset_minutes".to_string(),
            });
        }

        if self.stats.default_leaderboard_limit == 0
            || self.stats.default_leaderboard_limit > self.stats.max_leaderboard_limit
        {
            return Err(CoreError::Configuration {
                message: "Default leaderboard limit must be between 1 and the max limit".to_string(),
                field: "stats.default_leaderboard_limit".to_string(),
            });
        }

        Ok(())
    }

    /// Create a production-ready configuration
    pub fn production() -> Self {
        Self {
            wager: WagerConfig {
                lock_wait_ms: 2_000,       // Fail fast under contention
                compensation_retries: 5,   // More persistence before escalating
                max_page_limit: 50,
            },
            spin: SpinConfig::default(),
            stats: StatsConfig {
                default_leaderboard_limit: 10,
                max_leaderboard_limit: 50,
            },
        }
    }

    /// Create a development configuration with relaxed settings
    pub fn development() -> Self {
        Self {
            wager: WagerConfig {
                lock_wait_ms: 30_000,
                compensation_retries: 1,
                max_page_limit: 1_000,
            },
            spin: SpinConfig {
                free_spins_per_day: 100,   // Effectively unlimited for testing
                premium_spin_cost: 1,
                utc_offset_minutes: 0,
            },
            stats: StatsConfig {
                default_leaderboard_limit: 25,
                max_leaderboard_limit: 1_000,
            },
        }
    }
}
