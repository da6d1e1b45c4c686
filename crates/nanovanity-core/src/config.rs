//! Search tuning knobs

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Delay before the first throughput refresh, in milliseconds
    pub estimate_delay_ms: u64,
    /// Factor the refresh delay grows by after every refresh
    pub estimate_backoff: f64,
    /// Bound on queued worker messages
    pub channel_capacity: usize,
    /// How many crashed workers a session may replace
    pub max_respawns: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            estimate_delay_ms: 3000,
            estimate_backoff: 1.5,
            channel_capacity: 4096,
            max_respawns: 0,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.estimate_delay_ms == 0 {
            return Err(SearchError::InvalidConfig(
                "estimate_delay_ms must be positive".into(),
            ));
        }
        if !(self.estimate_backoff.is_finite() && self.estimate_backoff >= 1.0) {
            return Err(SearchError::InvalidConfig(format!(
                "estimate_backoff must be at least 1.0, got {}",
                self.estimate_backoff
            )));
        }
        if self.channel_capacity == 0 {
            return Err(SearchError::InvalidConfig(
                "channel_capacity must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_shrinking_backoff() {
        let config = SearchConfig {
            estimate_backoff: 0.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SearchError::InvalidConfig(_))));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: SearchConfig = serde_json::from_str(r#"{"max_respawns": 3}"#).unwrap();
        assert_eq!(config.max_respawns, 3);
        assert_eq!(config.estimate_delay_ms, 3000);
        assert_eq!(config.estimate_backoff, 1.5);
    }
}
