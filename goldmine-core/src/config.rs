//! Game configuration.
//!
//! Settings can be given as JSON; any field left out takes its default.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest accepted tick rate.
pub const MAX_TICK_RATE_HZ: u32 = 1000;

/// Invalid or unreadable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON did not parse.
    #[error("failed to parse game config")]
    Parse(#[from] serde_json::Error),

    /// A field parsed but holds an unusable value.
    #[error("invalid config field `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Timing and persistence settings for a game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Game loop ticks per second.
    #[serde(default = "default_tick_rate_hz")]
    pub tick_rate_hz: u32,
    /// Time between automatic saves.
    #[serde(default = "default_autosave_interval_ms")]
    pub autosave_interval_ms: u64,
    /// Time between refreshes of a visible dynamic tooltip.
    #[serde(default = "default_tooltip_refresh_ms")]
    pub tooltip_refresh_ms: u64,
    /// Key the save is stored under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_tick_rate_hz() -> u32 {
    30
}

fn default_autosave_interval_ms() -> u64 {
    7000
}

fn default_tooltip_refresh_ms() -> u64 {
    500
}

fn default_storage_key() -> String {
    "idg_save_data".to_string()
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: default_tick_rate_hz(),
            autosave_interval_ms: default_autosave_interval_ms(),
            tooltip_refresh_ms: default_tooltip_refresh_ms(),
            storage_key: default_storage_key(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check field values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate_hz == 0 {
            return Err(ConfigError::Invalid {
                field: "tick_rate_hz",
                reason: "must be greater than zero",
            });
        }
        if self.tick_rate_hz > MAX_TICK_RATE_HZ {
            return Err(ConfigError::Invalid {
                field: "tick_rate_hz",
                reason: "must be at most 1000",
            });
        }
        if self.storage_key.is_empty() {
            return Err(ConfigError::Invalid {
                field: "storage_key",
                reason: "must not be empty",
            });
        }
        Ok(())
    }

    /// Time between ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate_hz.clamp(1, MAX_TICK_RATE_HZ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config = GameConfig::from_json("{}").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.tick_rate_hz, 30);
        assert_eq!(config.autosave_interval_ms, 7000);
        assert_eq!(config.storage_key, "idg_save_data");
    }

    #[test]
    fn fields_override_defaults() {
        let config =
            GameConfig::from_json(r#"{"tick_rate_hz": 60, "storage_key": "slot2"}"#).unwrap();
        assert_eq!(config.tick_rate_hz, 60);
        assert_eq!(config.storage_key, "slot2");
        assert_eq!(config.tooltip_refresh_ms, 500);
    }

    #[test]
    fn zero_tick_rate_is_rejected() {
        assert!(matches!(
            GameConfig::from_json(r#"{"tick_rate_hz": 0}"#),
            Err(ConfigError::Invalid { field: "tick_rate_hz", .. })
        ));
    }

    #[test]
    fn excessive_tick_rate_is_rejected() {
        assert!(matches!(
            GameConfig::from_json(r#"{"tick_rate_hz": 2000000000}"#),
            Err(ConfigError::Invalid { field: "tick_rate_hz", .. })
        ));
        assert!(GameConfig::from_json(r#"{"tick_rate_hz": 1000}"#).is_ok());

        let unchecked = GameConfig {
            tick_rate_hz: 2_000_000_000,
            ..GameConfig::default()
        };
        assert_eq!(unchecked.tick_interval(), Duration::from_millis(1));
    }

    #[test]
    fn bad_json_is_a_parse_error() {
        assert!(matches!(
            GameConfig::from_json("tick_rate_hz = 30"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn tick_interval_matches_rate() {
        let config = GameConfig::default();
        assert_eq!(config.tick_interval(), Duration::from_secs(1) / 30);
    }
}
