//! Single-field extraction rules
//!
//! Each rule is a pure function over the full document text returning the
//! normalized value or `None`. Matching is case-insensitive. The address and
//! suite pair is handled separately in [`crate::address`].

use crate::normalize::{normalize_currency, normalize_date, normalize_number, normalize_percentage};
use regex::Regex;
use std::sync::LazyLock;

static TENANT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bTenant\s*:\s*(.+)").unwrap());

static LANDLORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bLandlord\s*:\s*(.+)").unwrap());

static SQUARE_FEET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:Rentable|Leasable|Approx\.?|Total)?\s*(?:Square\s*Feet|Sq\.?\s*Ft\.?|SF)[^\d]*(\d[\d,.]+)",
    )
    .unwrap()
});

static COMMENCEMENT_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:Lease\s*)?Commencement\s*Date\s*:?\s*([^\n\r]+)").unwrap()
});

static EXPIRATION_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:Lease\s*)?(?:Expiration|Expiry)\s*Date\s*:?\s*([^\n\r]+)").unwrap()
});

static PROPORTIONATE_SHARE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bProportionate\s+Share\s*:?\s*(\d{1,2}(?:\.\d+)?\s*%)").unwrap()
});

static BASE_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bBase\s+Year\s*:?\s*(\d{4})\b").unwrap());

static SECURITY_DEPOSIT_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bSecurity\s+Deposit\s*:?\s*(?:\$\s*)?(\d[\d,]*(?:\.\d{2})?)\b").unwrap()
});

/// Negation must appear in the same statement: before a line break or period
static SECURITY_DEPOSIT_NONE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bSecurity\s+Deposit\b[^\n\r.]*?(?:\bNone\b|\bN/A\b|\bNo\s+Deposit\b)").unwrap()
});

/// Literal value stored when the lease states there is no deposit
pub const NO_DEPOSIT: &str = "None";

/// First capture group of the first match, trimmed; `None` when empty
pub(crate) fn first_capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Rest of the line after `Tenant:`
pub fn tenant_name(text: &str) -> Option<String> {
    first_capture(&TENANT, text)
}

/// Rest of the line after `Landlord:`
pub fn landlord_name(text: &str) -> Option<String> {
    first_capture(&LANDLORD, text)
}

/// Numeric run after a square-footage unit
pub fn total_square_feet(text: &str) -> Option<String> {
    first_capture(&SQUARE_FEET, text).and_then(|raw| normalize_number(&raw))
}

/// Commencement date as `DD-MM-YYYY`
pub fn commencement_date(text: &str) -> Option<String> {
    first_capture(&COMMENCEMENT_DATE, text).and_then(|raw| normalize_date(&raw))
}

/// Expiration date as `DD-MM-YYYY`
pub fn expiration_date(text: &str) -> Option<String> {
    first_capture(&EXPIRATION_DATE, text).and_then(|raw| normalize_date(&raw))
}

/// Proportionate share with a trailing `%`
pub fn proportionate_share(text: &str) -> Option<String> {
    first_capture(&PROPORTIONATE_SHARE, text).and_then(|raw| normalize_percentage(&raw))
}

/// Four-digit base year, verbatim
pub fn base_year(text: &str) -> Option<String> {
    first_capture(&BASE_YEAR, text)
}

/// Deposit amount with cents, or [`NO_DEPOSIT`] when explicitly waived
pub fn security_deposit(text: &str) -> Option<String> {
    if let Some(amount) = first_capture(&SECURITY_DEPOSIT_AMOUNT, text) {
        return normalize_currency(&amount);
    }
    SECURITY_DEPOSIT_NONE
        .is_match(text)
        .then(|| NO_DEPOSIT.to_string())
}
