//! Address and suite extraction
//!
//! Leases name the premises under different labels, or only as a bare street
//! line. Three strategies run in a fixed order and each may fill the address,
//! the suite, or both; a field found by an earlier strategy is never replaced.
//!
//! 1. [`AddressStrategy::LabelBased`]: a line starting `Premises:`, `Property Address -`, `Address:` ...
//! 2. [`AddressStrategy::StreetPattern`]: first line that looks like a street address,
//!    only while the address is still missing
//! 3. [`AddressStrategy::GlobalSuite`]: first suite marker anywhere, only while the
//!    suite is still missing

use crate::rules::first_capture;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static ADDRESS_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^\s*(?:Premises(?:\s*Address)?|Property(?:\s*Address)?|Address)\s*(?::|-)\s*(.+)",
    )
    .unwrap()
});

/// `Suite4B` may be glued when the designator starts with a digit; `Ste` never
/// is, so words like "Steven" stay out
static SUITE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bSuite\.?\s*(\d[\w\-]*)|\b(?:Suite|Ste)\b\.?\s*([\w\-]+)|#\s*([\w\-]+)").unwrap()
});

/// A suite marker together with the separator in front of it
static SUITE_WITH_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| {
        Regex::new(r"(?i),?\s*(?:\bSuite\.?\s*\d[\w\-]*|\b(?:Suite|Ste)\b\.?\s*[\w\-]+|#\s*[\w\-]+)")
            .unwrap()
    });

static STREET_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*\d{1,6}\s+.+?(?:(?:Street|Avenue|Road|Boulevard|Lane|Drive|Court|Way|Terrace)\b|(?:St|Ave|Rd|Blvd|Ln|Dr|Ct|Ter)\.)",
    )
    .unwrap()
});

const ADDRESS_TRIM: &[char] = &[' ', ',', ';', '-'];

/// Address and suite found so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressMatch {
    /// Street address without the suite designator
    pub address: Option<String>,

    /// Suite or unit designator
    pub suite: Option<String>,
}

impl AddressMatch {
    /// Keep every field already found, fill the rest from `found`
    fn fill_from(self, found: AddressMatch) -> Self {
        Self {
            address: self.address.or(found.address),
            suite: self.suite.or(found.suite),
        }
    }

    fn is_empty(&self) -> bool {
        self.address.is_none() && self.suite.is_none()
    }
}

/// One tier of the address/suite search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressStrategy {
    /// Labelled line such as `Premises: 123 Main Street, Suite 4B`
    LabelBased,

    /// Bare street line, suite on the same or the next line
    StreetPattern,

    /// Any suite marker in the document
    GlobalSuite,
}

impl AddressStrategy {
    /// Strategies in precedence order
    pub const ORDERED: [AddressStrategy; 3] = [
        AddressStrategy::LabelBased,
        AddressStrategy::StreetPattern,
        AddressStrategy::GlobalSuite,
    ];

    /// Whether this tier still has work to do given what was found so far
    pub fn applies_to(&self, current: &AddressMatch) -> bool {
        match self {
            AddressStrategy::LabelBased => true,
            AddressStrategy::StreetPattern => current.address.is_none(),
            AddressStrategy::GlobalSuite => current.suite.is_none(),
        }
    }

    /// Run this tier alone over the document
    pub fn attempt(&self, text: &str) -> Option<AddressMatch> {
        let found = match self {
            AddressStrategy::LabelBased => label_based(text),
            AddressStrategy::StreetPattern => street_pattern(text),
            AddressStrategy::GlobalSuite => AddressMatch {
                address: None,
                suite: find_suite(text),
            },
        };
        (!found.is_empty()).then_some(found)
    }
}

/// Run the strategies in order and combine their results
pub fn extract_address_and_suite(text: &str) -> AddressMatch {
    AddressStrategy::ORDERED
        .iter()
        .fold(AddressMatch::default(), |current, strategy| {
            if !strategy.applies_to(&current) {
                return current;
            }
            match strategy.attempt(text) {
                Some(found) => {
                    debug!("Address strategy {:?} matched: {:?}", strategy, found);
                    current.fill_from(found)
                }
                None => current,
            }
        })
}

/// First suite designator in `text`
pub fn find_suite(text: &str) -> Option<String> {
    SUITE
        .captures(text)
        .and_then(|caps| caps.iter().skip(1).flatten().next())
        .map(|m| m.as_str().to_string())
}

fn label_based(text: &str) -> AddressMatch {
    let Some(candidate) = first_capture(&ADDRESS_LABEL, text) else {
        return AddressMatch::default();
    };

    match find_suite(&candidate) {
        Some(suite) => {
            let stripped = SUITE_WITH_SEPARATOR.replace_all(&candidate, "");
            AddressMatch {
                address: non_empty(stripped.trim_matches(ADDRESS_TRIM)),
                suite: Some(suite),
            }
        }
        None => AddressMatch {
            address: non_empty(candidate.trim_matches(ADDRESS_TRIM)),
            suite: None,
        },
    }
}

fn street_pattern(text: &str) -> AddressMatch {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();

    lines
        .iter()
        .position(|line| STREET_LINE.is_match(line))
        .map(|idx| AddressMatch {
            address: non_empty(lines[idx].trim_matches(ADDRESS_TRIM)),
            suite: lines[idx..]
                .iter()
                .take(2)
                .find_map(|line| find_suite(line)),
        })
        .unwrap_or_default()
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
