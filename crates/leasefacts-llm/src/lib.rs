//! Leasefacts LLM Provider Layer
//!
//! Pluggable LLM provider implementations backing the lease fact fallback.
//!
//! # Architecture
//!
//! This crate provides implementations of the `LlmProvider` trait from
//! `leasefacts-domain`. The extractor only ever talks to that trait.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OpenAiProvider`: OpenAI-compatible chat completions with JSON mode
//!
//! # Examples
//!
//! ```
//! use leasefacts_llm::MockProvider;
//! use leasefacts_domain::LlmProvider;
//!
//! let provider = MockProvider::new(r#"{"tenant_name": "Acme Corp"}"#);
//! let result = provider.generate_structured("prompt", "schema").unwrap();
//! assert!(result.contains("Acme Corp"));
//! ```

#![warn(missing_docs)]

pub mod openai;
pub mod retry;

use leasefacts_domain::LlmProvider as LlmProviderTrait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub use openai::OpenAiProvider;
pub use retry::RetryPolicy;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Credential rejected by the service
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl LlmError {
    /// Whether retrying the same request may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, LlmError::Communication(_) | LlmError::RateLimitExceeded)
    }
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns a pre-configured response without making any network
/// calls, and remembers the last prompt it was given.
///
/// # Examples
///
/// ```
/// use leasefacts_llm::MockProvider;
/// use leasefacts_domain::LlmProvider;
///
/// let provider = MockProvider::new("{}");
/// provider.generate("first").unwrap();
/// assert_eq!(provider.call_count(), 1);
/// assert_eq!(provider.last_prompt().as_deref(), Some("first"));
///
/// let failing = MockProvider::failing("service down");
/// assert!(failing.generate("anything").is_err());
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    response: Result<String, String>,
    state: Arc<Mutex<MockState>>,
}

#[derive(Debug, Default)]
struct MockState {
    call_count: usize,
    last_prompt: Option<String>,
    last_schema: Option<String>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: Ok(response.into()),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Create a MockProvider whose every call fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Err(message.into()),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Get the number of times the provider was called
    pub fn call_count(&self) -> usize {
        self.state().call_count
    }

    /// The prompt of the most recent call
    pub fn last_prompt(&self) -> Option<String> {
        self.state().last_prompt.clone()
    }

    /// The schema of the most recent structured call
    pub fn last_schema(&self) -> Option<String> {
        self.state().last_schema.clone()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn respond(&self, prompt: &str, schema: Option<&str>) -> Result<String, LlmError> {
        {
            let mut state = self.state();
            state.call_count += 1;
            state.last_prompt = Some(prompt.to_string());
            state.last_schema = schema.map(str::to_string);
        }
        self.response.clone().map_err(LlmError::Other)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("{}")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.respond(prompt, None)
    }

    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error> {
        self.respond(prompt, Some(schema))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.generate("any prompt");
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "Test response");
    }

    #[test]
    fn test_mock_provider_call_count() {
        let provider = MockProvider::new("test");

        assert_eq!(provider.call_count(), 0);

        provider.generate("prompt1").unwrap();
        assert_eq!(provider.call_count(), 1);

        provider.generate_structured("prompt2", "schema").unwrap();
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.last_prompt().as_deref(), Some("prompt2"));
        assert_eq!(provider.last_schema().as_deref(), Some("schema"));
    }

    #[test]
    fn test_mock_provider_error() {
        let provider = MockProvider::failing("boom");

        let result = provider.generate_structured("prompt", "schema");
        assert!(matches!(result.unwrap_err(), LlmError::Other(msg) if msg == "boom"));
        assert_eq!(provider.call_count(), 1);
    }

    #[test]
    fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.generate("test").unwrap();

        // Both should share the same call count due to Arc
        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }

    #[test]
    fn test_transient_errors() {
        assert!(LlmError::Communication("reset".into()).is_transient());
        assert!(LlmError::RateLimitExceeded.is_transient());
        assert!(!LlmError::Authentication("bad key".into()).is_transient());
        assert!(!LlmError::InvalidResponse("garbage".into()).is_transient());
        assert!(!LlmError::ModelNotAvailable("gpt".into()).is_transient());
    }
}
