//! Configuration for the Extractor

use crate::error::ExtractorError;
use leasefacts_llm::openai::DEFAULT_TIMEOUT_SECS;
use leasefacts_llm::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Characters of document text sent to the model fallback
pub const DEFAULT_FALLBACK_MAX_CHARS: usize = 12_000;

/// Overall fallback deadline; covers three 10s attempts and their backoff
pub const DEFAULT_FALLBACK_TIMEOUT_SECS: u64 = 40;

/// Configuration for the lease extractor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Whether the model fallback may run; set from credential presence
    pub fallback_enabled: bool,

    /// Maximum characters of document text included in the model prompt
    pub fallback_max_chars: usize,

    /// Maximum time to wait for the model fallback (seconds)
    pub fallback_timeout_secs: u64,

    /// Timeout for a single model request (seconds)
    pub request_timeout_secs: u64,
}

impl ExtractorConfig {
    /// Deterministic-only configuration
    pub fn deterministic() -> Self {
        Self::default()
    }

    /// Return a copy with the model fallback switched on or off
    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.fallback_enabled = enabled;
        self
    }

    /// Get the fallback timeout as a Duration
    pub fn fallback_timeout(&self) -> Duration {
        Duration::from_secs(self.fallback_timeout_secs)
    }

    /// Get the per-request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Time the provider needs to exhaust its retries
    pub fn retry_budget(&self) -> Duration {
        RetryPolicy::default().worst_case(self.request_timeout())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExtractorError> {
        if self.fallback_max_chars == 0 {
            return Err(ExtractorError::Config(
                "fallback_max_chars must be greater than 0".to_string(),
            ));
        }
        if self.fallback_timeout_secs == 0 {
            return Err(ExtractorError::Config(
                "fallback_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ExtractorError::Config(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }
        // The provider must give up before the extractor abandons it
        let budget = self.retry_budget();
        if self.fallback_timeout() < budget {
            return Err(ExtractorError::Config(format!(
                "fallback_timeout_secs ({}) must be at least {}s to cover retries of request_timeout_secs ({})",
                self.fallback_timeout_secs,
                budget.as_secs(),
                self.request_timeout_secs
            )));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| ExtractorError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ExtractorError> {
        toml::to_string_pretty(self)
            .map_err(|e| ExtractorError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}

impl Default for ExtractorConfig {
    /// Deterministic only; 12k characters, 10s requests and a 40s deadline once enabled
    fn default() -> Self {
        Self {
            fallback_enabled: false,
            fallback_max_chars: DEFAULT_FALLBACK_MAX_CHARS,
            fallback_timeout_secs: DEFAULT_FALLBACK_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.fallback_enabled);
        assert_eq!(config.fallback_max_chars, 12_000);
        assert!(config.retry_budget() <= config.fallback_timeout());
    }

    #[test]
    fn test_with_fallback() {
        let config = ExtractorConfig::deterministic().with_fallback(true);
        assert!(config.fallback_enabled);
    }

    #[test]
    fn test_invalid_max_chars() {
        let mut config = ExtractorConfig::default();
        config.fallback_max_chars = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_timeout() {
        let mut config = ExtractorConfig::default();
        config.fallback_timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ExtractorError::Config(_))));
    }

    #[test]
    fn test_deadline_must_cover_retries() {
        let mut config = ExtractorConfig::default();
        config.fallback_timeout_secs = 30;
        assert!(matches!(config.validate(), Err(ExtractorError::Config(_))));

        config.fallback_timeout_secs = 33;
        assert!(config.validate().is_ok());

        config.request_timeout_secs = 20;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_request_timeout() {
        let mut config = ExtractorConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ExtractorConfig::from_toml("fallback_timeout_secs = 60").unwrap();
        assert_eq!(config.fallback_timeout(), Duration::from_secs(60));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.fallback_max_chars, DEFAULT_FALLBACK_MAX_CHARS);
        assert!(!config.fallback_enabled);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::default().with_fallback(true);
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }
}
