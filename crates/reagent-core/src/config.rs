//! Configuration for injectors, livers and the engine.
//!
//! All structs deserialize from JSON with per-field defaults, so a
//! prototype only needs to name the fields it overrides. Field names
//! follow the prototype convention (`injectOnly`, `transferAmount`, ...).

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use reagent_logic::{InjectorMode, ReagentUnit};

/// Injector device options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InjectorConfig {
    /// Single-use devices can only inject
    pub inject_only: bool,
    /// Units moved per application
    pub transfer_amount: ReagentUnit,
    /// Accepted for prototype compatibility; the initial mode is derived
    /// from `inject_only`
    pub toggle_state: InjectorMode,
    /// Capacity of the injector's own reservoir
    pub max_volume: ReagentUnit,
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            inject_only: true,
            transfer_amount: 5,
            toggle_state: InjectorMode::Draw,
            max_volume: 15,
        }
    }
}

impl InjectorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.transfer_amount == 0 {
            return Err(ConfigError::Invalid {
                field: "transferAmount",
                reason: "must be positive".to_string(),
            });
        }
        if self.max_volume == 0 {
            return Err(ConfigError::Invalid {
                field: "maxVolume",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Liver options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LiverConfig {
    #[serde(alias = "max_volume")]
    pub max_volume: ReagentUnit,
}

impl Default for LiverConfig {
    fn default() -> Self {
        Self { max_volume: 20 }
    }
}

impl LiverConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_volume == 0 {
            return Err(ConfigError::Invalid {
                field: "maxVolume",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Engine timing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Seconds of accumulated frame time between metabolism passes
    pub metabolism_interval: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            metabolism_interval: 1.0,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.metabolism_interval.is_finite() || self.metabolism_interval <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "metabolismInterval",
                reason: format!("must be a positive number, got {}", self.metabolism_interval),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_injector_defaults() {
        let config = InjectorConfig::from_json("{}").unwrap();
        assert!(config.inject_only);
        assert_eq!(config.transfer_amount, 5);
        assert_eq!(config.toggle_state, InjectorMode::Draw);
        assert_eq!(config, InjectorConfig::default());
    }

    #[test]
    fn test_injector_overrides() {
        let config =
            InjectorConfig::from_json(r#"{"injectOnly": false, "transferAmount": 10}"#).unwrap();
        assert!(!config.inject_only);
        assert_eq!(config.transfer_amount, 10);
        assert_eq!(config.max_volume, 15);
    }

    #[test]
    fn test_injector_rejects_zero_transfer() {
        let err = InjectorConfig::from_json(r#"{"transferAmount": 0}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "transferAmount",
                ..
            }
        ));
    }

    #[test]
    fn test_liver_accepts_snake_case_volume() {
        assert_eq!(LiverConfig::from_json("{}").unwrap().max_volume, 20);
        assert_eq!(
            LiverConfig::from_json(r#"{"max_volume": 40}"#).unwrap().max_volume,
            40
        );
        assert_eq!(
            LiverConfig::from_json(r#"{"maxVolume": 30}"#).unwrap().max_volume,
            30
        );
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            LiverConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_engine_interval_validation() {
        assert!(EngineConfig::from_json(r#"{"metabolismInterval": 0.5}"#).is_ok());
        assert!(EngineConfig::from_json(r#"{"metabolismInterval": 0.0}"#).is_err());
        assert!(EngineConfig::from_json(r#"{"metabolismInterval": -1.0}"#).is_err());
    }
}
