//! Output formatting for the CLI.

use crate::error::Result;
use colored::*;
use leasefacts_domain::FactField;
use leasefacts_extractor::ExtractionResult;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

/// Placeholder for a missing value in tables
const MISSING: &str = "-";

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// The selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format an extraction result.
    pub fn format_result(&self, result: &ExtractionResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&result.facts)?),
            OutputFormat::Table => Ok(self.format_table(result)),
        }
    }

    /// Format the facts as a field / value / source table.
    fn format_table(&self, result: &ExtractionResult) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value", "Source"]);

        for field in FactField::ALL {
            let (value, source) = match (result.facts.get(field), result.source_of(field)) {
                (Some(value), Some(source)) => (value.into_owned(), self.source_label(source.as_str())),
                _ => (self.colorize(MISSING, "yellow"), String::new()),
            };
            builder.push_record([field.key().to_string(), value, source]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// One-line summary printed after the table.
    pub fn summary(&self, result: &ExtractionResult) -> String {
        let found = FactField::ALL.len() - result.metadata.fields_missing;
        let mut message = format!(
            "{} of {} facts found in {} ms",
            found,
            FactField::ALL.len(),
            result.metadata.processing_time_ms
        );
        if result.metadata.fallback_used {
            message.push_str(&format!(", {} from the model", result.metadata.fields_from_model));
        }
        self.info(&message)
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    fn source_label(&self, source: &str) -> String {
        match source {
            "model" => self.colorize(source, "magenta"),
            _ => self.colorize(source, "green"),
        }
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}
