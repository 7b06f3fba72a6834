//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Default number of retries after a lost compare-and-swap race.
pub const DEFAULT_MAX_RETRIES: usize = 3;

/// Tunables for a [`StateMachine`](super::StateMachine).
///
/// Deserializable with missing fields defaulted, so it can be embedded in a
/// larger configuration document.
///
/// ```rust
/// use lifecycle::engine::EngineConfig;
///
/// let config = EngineConfig::from_json(r#"{ "max_retries": 5 }"#).unwrap();
/// assert_eq!(config.max_retries, 5);
///
/// let config = EngineConfig::from_json("{}").unwrap();
/// assert_eq!(config, EngineConfig::default());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Retries after the first compare-and-swap attempt. Zero means a single
    /// lost race fails the call.
    pub max_retries: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Total compare-and-swap attempts a call may make.
    pub fn max_attempts(&self) -> usize {
        self.max_retries + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_allows_three_retries() {
        let config = EngineConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.max_attempts(), 4);
    }

    #[test]
    fn unknown_shape_is_rejected() {
        assert!(EngineConfig::from_json(r#"{ "max_retries": "many" }"#).is_err());
    }
}
