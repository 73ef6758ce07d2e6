//! Leasefacts Domain Layer
//!
//! This crate holds the fixed lease fact schema and the rules that every
//! extraction stage shares. It has no knowledge of regexes, HTTP or models.
//!
//! ## Key Concepts
//!
//! - **Fact Field**: one of the eleven keys of the schema
//! - **Fact Record**: a value-or-missing per field; the combined address is
//!   always derived, never stored
//! - **Merge**: pattern facts first, model facts only fill gaps
//! - **Fact Suggester**: the narrow seam behind which the model fallback lives
//!
//! ## Example
//!
//! ```
//! use leasefacts_domain::{merge, FactField, FactRecord};
//!
//! let patterns = FactRecord::new().with(FactField::TenantName, Some("Acme Corp"));
//! let model = FactRecord::new()
//!     .with(FactField::TenantName, Some("ACME"))
//!     .with(FactField::BaseYear, Some("2024"));
//!
//! let merged = merge(&patterns, &model);
//! assert_eq!(merged.get(FactField::TenantName).as_deref(), Some("Acme Corp"));
//! assert_eq!(merged.get(FactField::BaseYear).as_deref(), Some("2024"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod field;
pub mod merge;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use field::FactField;
pub use merge::{merge, merge_with_provenance, FactSource};
pub use record::FactRecord;
pub use traits::{FactSuggester, LlmProvider};
