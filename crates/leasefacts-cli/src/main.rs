//! Leasefacts CLI - Command-line interface for lease fact extraction.

use clap::Parser;
use leasefacts_cli::commands;
use leasefacts_cli::{Cli, Command, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Logs go to stderr so JSON output stays parseable
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Create formatter
    let formatter = Formatter::new(cli.format.into(), !cli.no_color);

    // Handle commands
    let result = match cli.command {
        Command::Extract(args) => commands::execute_extract(args, &formatter).await,
    };

    if let Err(e) = result {
        eprintln!("{}", formatter.error(&e.to_string()));
        std::process::exit(1);
    }
}
