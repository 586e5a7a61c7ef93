use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};

/// How the store synthesizes ids for new cards and columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Prefix followed by a monotonic counter (e.g. card-1, card-2)
    #[default]
    Sequential,
    /// Prefix followed by a random UUID v4
    Random,
}

/// Store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub card_id_prefix: String,
    pub column_id_prefix: String,
    pub id_strategy: IdStrategy,
    /// Reject adds and cross-column moves into columns that reached their limit
    pub enforce_limits: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            card_id_prefix: "card-".to_string(),
            column_id_prefix: "column-".to_string(),
            id_strategy: IdStrategy::Sequential,
            enforce_limits: false,
        }
    }
}

impl StoreConfig {
    /// Parses a config from JSON, filling missing keys with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: StoreConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_enforced_limits(mut self) -> Self {
        self.enforce_limits = true;
        self
    }

    pub fn with_id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    /// Checks that the id prefixes can tell cards and columns apart
    pub fn validate(&self) -> Result<()> {
        if self.card_id_prefix.trim().is_empty() {
            return Err(BoardError::ConfigError(
                "card_id_prefix must not be empty".to_string(),
            ));
        }
        if self.column_id_prefix.trim().is_empty() {
            return Err(BoardError::ConfigError(
                "column_id_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.card_id_prefix, "card-");
        assert_eq!(config.id_strategy, IdStrategy::Sequential);
        assert!(!config.enforce_limits);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = StoreConfig::from_json(r#"{ "enforce_limits": true, "id_strategy": "random" }"#)
            .unwrap();
        assert!(config.enforce_limits);
        assert_eq!(config.id_strategy, IdStrategy::Random);
        assert_eq!(config.column_id_prefix, "column-");
    }

    #[test]
    fn test_from_json_rejects_empty_prefix() {
        let err = StoreConfig::from_json(r#"{ "card_id_prefix": "  " }"#).unwrap_err();
        assert!(matches!(err, BoardError::ConfigError(_)));
    }

    #[test]
    fn test_from_json_malformed() {
        let err = StoreConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, BoardError::SerializationError(_)));
    }
}
