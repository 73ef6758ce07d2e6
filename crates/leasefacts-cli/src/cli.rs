//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use leasefacts_llm::openai::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use std::path::PathBuf;

/// Leasefacts CLI - Extract key facts from commercial lease documents.
#[derive(Debug, Parser)]
#[command(name = "leasefacts")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Field, value and source table (default)
    Table,
    /// Flat JSON object with all eleven keys
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract lease facts from a PDF or text file
    Extract(ExtractArgs),
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Lease document; `.pdf` files are read through their text layer
    pub file: PathBuf,

    /// Use pattern extraction only, even when an API key is available
    #[arg(long)]
    pub no_fallback: bool,

    /// API key for the model fallback
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model used by the fallback
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// OpenAI-compatible endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,
}

impl ExtractArgs {
    /// The API key when the fallback should run
    pub fn fallback_key(&self) -> Option<&str> {
        if self.no_fallback {
            return None;
        }
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl From<CliFormat> for crate::output::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::output::OutputFormat::Table,
            CliFormat::Json => crate::output::OutputFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_command() {
        let cli = Cli::parse_from(["leasefacts", "extract", "lease.pdf", "--api-key", "k"]);
        assert_eq!(cli.format, CliFormat::Table);
        assert!(!cli.no_color);
        let Command::Extract(args) = cli.command;
        assert_eq!(args.file, PathBuf::from("lease.pdf"));
        assert_eq!(args.model, DEFAULT_MODEL);
        assert_eq!(args.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(args.fallback_key(), Some("k"));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "leasefacts",
            "extract",
            "lease.txt",
            "--format",
            "json",
            "--no-color",
            "--no-fallback",
            "--api-key",
            "k",
        ]);
        assert_eq!(cli.format, CliFormat::Json);
        assert!(cli.no_color);
        let Command::Extract(args) = cli.command;
        assert_eq!(args.fallback_key(), None);
    }

    #[test]
    fn test_blank_key_disables_fallback() {
        let cli = Cli::parse_from(["leasefacts", "extract", "lease.txt", "--api-key", "  "]);
        let Command::Extract(args) = cli.command;
        assert_eq!(args.fallback_key(), None);
    }

    #[test]
    fn test_file_is_required() {
        assert!(Cli::try_parse_from(["leasefacts", "extract"]).is_err());
    }
}
