//! Bus configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configuration for the event bus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventBusConfig {
    /// Keep category resolutions after the first publish of a category.
    pub cache_resolutions: bool,
    /// Abort a drain once it has dispatched this many records.
    pub max_dispatches_per_drain: Option<usize>,
    /// Whether to keep event history.
    pub enable_history: bool,
    /// Maximum number of events to retain in history.
    pub max_history_size: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            cache_resolutions: true,
            max_dispatches_per_drain: None,
            enable_history: false,
            max_history_size: 1000,
        }
    }
}

impl EventBusConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EventBusConfig::default();
        assert!(config.cache_resolutions);
        assert_eq!(config.max_dispatches_per_drain, None);
        assert!(!config.enable_history);
        assert_eq!(config.max_history_size, 1000);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config =
            EventBusConfig::from_json(r#"{ "enable_history": true, "max_history_size": 5 }"#)
                .unwrap();
        assert!(config.enable_history);
        assert_eq!(config.max_history_size, 5);
        assert!(config.cache_resolutions);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = EventBusConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, crate::error::BusError::Config(_)));
    }

    #[test]
    fn test_json_roundtrip_keeps_limit() {
        let config = EventBusConfig {
            max_dispatches_per_drain: Some(64),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(EventBusConfig::from_json(&json).unwrap(), config);
    }
}
