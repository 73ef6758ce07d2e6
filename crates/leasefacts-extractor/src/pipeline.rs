//! Deterministic extraction pipeline
//!
//! Runs every pattern rule once over the same text and assembles a fact
//! record. A rule that finds nothing leaves its field missing; the pipeline
//! itself cannot fail.

use crate::address::extract_address_and_suite;
use crate::rules;
use leasefacts_domain::{FactField, FactRecord};
use tracing::debug;

/// A single-field rule: full document text in, normalized value out
pub type FieldRule = fn(&str) -> Option<String>;

/// Single-field rules in the order they run
pub const FIELD_RULES: [(FactField, FieldRule); 8] = [
    (FactField::TenantName, rules::tenant_name),
    (FactField::LandlordName, rules::landlord_name),
    (FactField::TotalSquareFeet, rules::total_square_feet),
    (FactField::LeaseCommencementDate, rules::commencement_date),
    (FactField::LeaseExpirationDate, rules::expiration_date),
    (FactField::ProportionateShare, rules::proportionate_share),
    (FactField::BaseYear, rules::base_year),
    (FactField::SecurityDeposit, rules::security_deposit),
];

/// The regex-only extraction stage
#[derive(Debug, Clone, Copy, Default)]
pub struct DeterministicPipeline;

impl DeterministicPipeline {
    /// Create the pipeline
    pub fn new() -> Self {
        Self
    }

    /// Extract every field the patterns can find
    pub fn run(&self, text: &str) -> FactRecord {
        let location = extract_address_and_suite(text);

        let record = FIELD_RULES
            .iter()
            .fold(FactRecord::new(), |record, (field, rule)| {
                record.with(*field, rule(text))
            })
            .with(FactField::PropertyAddress, location.address)
            .with(FactField::Suite, location.suite);

        debug!(
            "Pattern pass found {} of {} fields",
            record.len_present(),
            FactField::ALL.len()
        );
        record
    }
}

/// Run the deterministic pipeline over `text`
pub fn extract_facts(text: &str) -> FactRecord {
    DeterministicPipeline::new().run(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_LEASE: &str = "\
OFFICE LEASE AGREEMENT

Landlord: Big Realty LLC
Tenant: Acme Corp
Premises: 123 Main Street, Suite 4B
Rentable Square Feet: 12,345
Lease Commencement Date: March 1, 2023
Lease Expiration Date: February 28, 2033
Tenant's Proportionate Share: 4.5%
Base Year: 2023
Security Deposit: $25,000.00
";

    #[test]
    fn test_full_sample_lease() {
        let record = extract_facts(SAMPLE_LEASE);

        assert_eq!(record.get(FactField::TenantName).as_deref(), Some("Acme Corp"));
        assert_eq!(record.get(FactField::LandlordName).as_deref(), Some("Big Realty LLC"));
        assert_eq!(record.get(FactField::PropertyAddress).as_deref(), Some("123 Main Street"));
        assert_eq!(record.get(FactField::Suite).as_deref(), Some("4B"));
        assert_eq!(
            record.get(FactField::PropertyAddressAndSuite).as_deref(),
            Some("123 Main Street Suite 4B")
        );
        assert_eq!(record.get(FactField::TotalSquareFeet).as_deref(), Some("12345"));
        assert_eq!(record.get(FactField::LeaseCommencementDate).as_deref(), Some("01-03-2023"));
        assert_eq!(record.get(FactField::LeaseExpirationDate).as_deref(), Some("28-02-2033"));
        assert_eq!(record.get(FactField::ProportionateShare).as_deref(), Some("4.5%"));
        assert_eq!(record.get(FactField::BaseYear).as_deref(), Some("2023"));
        assert_eq!(record.get(FactField::SecurityDeposit).as_deref(), Some("25000.00"));
        assert!(record.missing_fields().is_empty());
    }

    #[test]
    fn test_empty_text_gives_all_missing() {
        let record = extract_facts("");
        assert!(record.is_empty());
    }

    #[test]
    fn test_one_miss_does_not_affect_others() {
        let record = extract_facts("Tenant: Acme Corp\nCommencement Date: upon delivery\n");
        assert_eq!(record.get(FactField::TenantName).as_deref(), Some("Acme Corp"));
        assert!(record.is_missing(FactField::LeaseCommencementDate));
        assert_eq!(record.present_fields(), vec![FactField::TenantName]);
    }

    #[test]
    fn test_rules_cover_every_stored_field_once() {
        let mut fields: Vec<_> = FIELD_RULES.iter().map(|(f, _)| *f).collect();
        fields.push(FactField::PropertyAddress);
        fields.push(FactField::Suite);
        fields.sort();
        fields.dedup();
        assert_eq!(fields.len(), FactField::ALL.len() - 1);
        assert!(!fields.contains(&FactField::PropertyAddressAndSuite));
    }
}
