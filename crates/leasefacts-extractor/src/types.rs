//! Result types for extraction

use leasefacts_domain::{FactField, FactRecord, FactSource};
use serde::Serialize;
use std::collections::BTreeMap;

/// Result of extracting facts from one lease
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Merged fact record
    pub facts: FactRecord,

    /// Which stage supplied each present field
    pub provenance: BTreeMap<FactField, FactSource>,

    /// Metadata about the extraction
    pub metadata: ExtractionMetadata,
}

impl ExtractionResult {
    /// Source of a field's value, `None` when the field is missing
    pub fn source_of(&self, field: FactField) -> Option<FactSource> {
        self.provenance.get(&field).copied()
    }

    /// Provenance keyed by wire name
    pub fn sources(&self) -> BTreeMap<&'static str, &'static str> {
        self.provenance
            .iter()
            .map(|(field, source)| (field.key(), source.as_str()))
            .collect()
    }
}

/// Metadata about an extraction operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionMetadata {
    /// Whether the model fallback ran
    pub fallback_used: bool,

    /// Name of the suggester that ran, if any
    pub suggester: Option<String>,

    /// Number of fields filled by the model
    pub fields_from_model: usize,

    /// Number of fields still missing after merge
    pub fields_missing: usize,

    /// Characters of input text
    pub text_chars: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}
