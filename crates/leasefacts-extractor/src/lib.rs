//! Leasefacts Extractor
//!
//! Converts the plain text of a commercial lease into the eleven-key fact
//! record.
//!
//! # Overview
//!
//! Extraction is pattern-first. A fixed set of case-insensitive rules reads
//! the parties, premises, dates, area, share, base year and deposit straight
//! from the text and normalizes what they capture. An optional model-backed
//! suggester runs alongside the rules; its answers only fill the fields the
//! rules left missing.
//!
//! # Architecture
//!
//! ```text
//! Text → DeterministicPipeline ─────────┐
//!      → FactSuggester (optional) ──────┴→ merge → FactRecord
//! ```
//!
//! # Key Features
//!
//! - **Deterministic Rules**: the same text always yields the same facts
//! - **Normalization**: `DD-MM-YYYY` dates, digit-only amounts, compact percentages
//! - **Tiered Address Search**: labelled line, bare street line, then any suite marker
//! - **Model Fallback**: OpenAI-compatible JSON mode through [`LlmSuggester`]
//! - **Provenance Tracking**: every present field is attributed to its stage
//!
//! # Example Usage
//!
//! ```
//! use leasefacts_domain::FactField;
//! use leasefacts_extractor::{ExtractorConfig, LeaseExtractor};
//!
//! let extractor = LeaseExtractor::new(ExtractorConfig::deterministic());
//! let result = extractor.extract_sync("Tenant: Acme Corp\nBase Year: 2024\n");
//!
//! assert_eq!(result.facts.get(FactField::TenantName).as_deref(), Some("Acme Corp"));
//! assert_eq!(result.facts.get(FactField::BaseYear).as_deref(), Some("2024"));
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod parser;
mod prompt;
mod suggester;
mod types;

pub mod address;
pub mod document;
pub mod normalize;
pub mod pipeline;
pub mod rules;


pub use config::{ExtractorConfig, DEFAULT_FALLBACK_MAX_CHARS};
pub use document::{extract_pdf_text, is_declared_pdf, looks_like_pdf, PDF_CONTENT_TYPE};
pub use error::ExtractorError;
pub use extractor::LeaseExtractor;
pub use parser::parse_llm_response;
pub use pipeline::{extract_facts, DeterministicPipeline};
pub use prompt::{response_schema, PromptBuilder};
pub use suggester::LlmSuggester;
pub use types::{ExtractionMetadata, ExtractionResult};
