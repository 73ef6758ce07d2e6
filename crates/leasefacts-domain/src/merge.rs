//! Merge module - combining the pattern record with the model record
//!
//! The primary record always wins. The secondary record only fills fields the
//! primary left missing. The derived combined address is recomputed from the
//! merged parts, so it stays consistent with them.

use crate::field::FactField;
use crate::record::FactRecord;
use std::collections::BTreeMap;

/// Which extraction stage supplied a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactSource {
    /// Deterministic pattern matching
    Pattern,

    /// Probabilistic model fallback
    Model,
}

impl FactSource {
    /// Get the source name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            FactSource::Pattern => "pattern",
            FactSource::Model => "model",
        }
    }
}

impl std::fmt::Display for FactSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Merge two records, preferring `primary` field by field
pub fn merge(primary: &FactRecord, secondary: &FactRecord) -> FactRecord {
    merge_with_provenance(primary, secondary).0
}

/// Merge two records and report where each present value came from
///
/// The derived field is attributed to `Pattern` when either of its parts came
/// from the primary record.
pub fn merge_with_provenance(
    primary: &FactRecord,
    secondary: &FactRecord,
) -> (FactRecord, BTreeMap<FactField, FactSource>) {
    let mut merged = FactRecord::new();
    let mut provenance = BTreeMap::new();

    for field in FactField::ALL.iter().copied().filter(|f| !f.is_derived()) {
        if let Some(value) = primary.get(field) {
            merged = merged.with(field, Some(value));
            provenance.insert(field, FactSource::Pattern);
        } else if let Some(value) = secondary.get(field) {
            merged = merged.with(field, Some(value));
            provenance.insert(field, FactSource::Model);
        }
    }

    if !merged.is_missing(FactField::PropertyAddressAndSuite) {
        let parts = [FactField::PropertyAddress, FactField::Suite];
        let source = if parts
            .iter()
            .any(|p| provenance.get(p) == Some(&FactSource::Pattern))
        {
            FactSource::Pattern
        } else {
            FactSource::Model
        };
        provenance.insert(FactField::PropertyAddressAndSuite, source);
    }

    (merged, provenance)
}
