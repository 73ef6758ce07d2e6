//! Model-backed fact suggester

use crate::config::DEFAULT_FALLBACK_MAX_CHARS;
use crate::error::ExtractorError;
use crate::parser::parse_llm_response;
use crate::prompt::{response_schema, PromptBuilder};
use leasefacts_domain::{FactRecord, FactSuggester, LlmProvider};
use std::fmt::Display;
use tracing::{debug, warn};

/// Suggests facts by prompting an LLM provider
///
/// Any failure along the way (transport, auth, malformed output) yields an
/// empty record through [`FactSuggester::suggest`]; use
/// [`LlmSuggester::try_suggest`] to see the error.
pub struct LlmSuggester<L> {
    provider: L,
    max_chars: usize,
    name: String,
}

impl<L> LlmSuggester<L>
where
    L: LlmProvider + Send + Sync,
    L::Error: Display,
{
    /// Wrap a provider
    pub fn new(provider: L) -> Self {
        Self {
            provider,
            max_chars: DEFAULT_FALLBACK_MAX_CHARS,
            name: "llm".to_string(),
        }
    }

    /// Limit how much document text is sent
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Name reported in extraction metadata, usually the model id
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// The wrapped provider
    pub fn provider(&self) -> &L {
        &self.provider
    }

    /// Prompt the model and parse its answer
    pub fn try_suggest(&self, text: &str) -> Result<FactRecord, ExtractorError> {
        let prompt = PromptBuilder::new(text)
            .with_max_chars(self.max_chars)
            .build();
        debug!("Prompt length: {} chars", prompt.len());

        let response = self
            .provider
            .generate_structured(&prompt, &response_schema())
            .map_err(|e| ExtractorError::Llm(e.to_string()))?;
        debug!("LLM response length: {} chars", response.len());

        parse_llm_response(&response)
    }
}

impl<L> FactSuggester for LlmSuggester<L>
where
    L: LlmProvider + Send + Sync,
    L::Error: Display,
{
    fn suggest(&self, text: &str) -> FactRecord {
        match self.try_suggest(text) {
            Ok(record) => record,
            Err(e) => {
                warn!("Model suggestion '{}' failed: {}", self.name, e);
                FactRecord::new()
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leasefacts_domain::FactField;
    use leasefacts_llm::MockProvider;

    #[test]
    fn test_suggest_parses_model_output() {
        let provider = MockProvider::new(r#"{"tenant_name": "Acme Corp", "base_year": "2024"}"#);
        let suggester = LlmSuggester::new(provider);

        let record = suggester.suggest("Tenant: Acme Corp");
        assert_eq!(record.get(FactField::TenantName).as_deref(), Some("Acme Corp"));
        assert_eq!(record.get(FactField::BaseYear).as_deref(), Some("2024"));
        assert_eq!(suggester.provider().call_count(), 1);
    }

    #[test]
    fn test_prompt_and_schema_sent() {
        let suggester = LlmSuggester::new(MockProvider::new("{}")).with_max_chars(5);
        suggester.suggest("ABCDEFGHIJ");

        let prompt = suggester.provider().last_prompt().unwrap();
        assert!(prompt.ends_with("ABCDE"));
        let schema = suggester.provider().last_schema().unwrap();
        assert!(schema.contains("security_deposit"));
    }

    #[test]
    fn test_provider_failure_gives_empty_record() {
        let suggester = LlmSuggester::new(MockProvider::failing("connection refused"));
        assert!(suggester.suggest("Tenant: Acme").is_empty());
        assert!(matches!(
            suggester.try_suggest("Tenant: Acme"),
            Err(ExtractorError::Llm(_))
        ));
    }

    #[test]
    fn test_malformed_output_gives_empty_record() {
        let suggester = LlmSuggester::new(MockProvider::new("Sorry, I cannot help with that."));
        assert!(suggester.suggest("anything").is_empty());
    }

    #[test]
    fn test_name() {
        let suggester = LlmSuggester::new(MockProvider::default());
        assert_eq!(suggester.name(), "llm");
        let suggester = suggester.with_name("gpt-4o-mini");
        assert_eq!(suggester.name(), "gpt-4o-mini");
    }
}
