//! LLM prompt engineering for lease fact extraction

use crate::config::DEFAULT_FALLBACK_MAX_CHARS;
use leasefacts_domain::FactField;

/// Builds prompts for the LLM to extract lease facts
pub struct PromptBuilder<'a> {
    text: &'a str,
    max_chars: usize,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            max_chars: DEFAULT_FALLBACK_MAX_CHARS,
        }
    }

    /// Limit how much of the document is included
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\nReturn ONLY a JSON object with these exact keys: ");
        prompt.push_str(&key_list());
        prompt.push_str(".\n\n");
        prompt.push_str(FIELD_RULES);
        prompt.push_str("\n\nLease Text:\n");
        prompt.push_str(truncate_chars(self.text, self.max_chars));

        prompt
    }
}

/// JSON object shape requested from the model
pub fn response_schema() -> String {
    let fields: Vec<String> = FactField::ALL
        .iter()
        .map(|field| format!("  \"{}\": string or null", field.key()))
        .collect();
    format!("{{\n{}\n}}", fields.join(",\n"))
}

fn key_list() -> String {
    FactField::ALL
        .iter()
        .map(|field| field.key())
        .collect::<Vec<_>>()
        .join(", ")
}

/// At most `max_chars` characters of `text`, cut on a character boundary
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

const EXTRACTION_INSTRUCTIONS: &str =
    "You are an expert commercial lease analyst. Extract the key facts listed below from the lease text.";

const FIELD_RULES: &str = r#"Rules:
- property_address: the street address only, without any suite.
- suite: only the suite, ste or # designator (e.g. 120B).
- property_address_and_suite: "<address> Suite <suite>" when both exist.
- Dates must be DD-MM-YYYY.
- Percentages include the % sign (e.g. 4.5%).
- Currency amounts contain only digits and a decimal point (e.g. 1234.56).
- security_deposit is "None" only when the lease says there is no deposit.
- Use null for any fact the lease does not state."#;
