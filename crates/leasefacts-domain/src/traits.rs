//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the extraction core and the
//! model-backed infrastructure. Implementations live in other crates.

use crate::record::FactRecord;

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (leasefacts-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate text completion
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Generate output constrained to a JSON object described by `schema`
    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error>;
}

/// A source of suggested facts for the fields patterns could not find
///
/// Implementations never fail: any error becomes an all-missing record.
/// Implemented by the application layer (leasefacts-extractor) and by test stubs.
pub trait FactSuggester: Send + Sync {
    /// Suggest a fact record for the given document text
    fn suggest(&self, text: &str) -> FactRecord;

    /// Short name used in logs and metadata
    fn name(&self) -> &str {
        "suggester"
    }
}
