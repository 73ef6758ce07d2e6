//! Leasefacts Server binary
//!
//! Starts the HTTP server for lease PDF upload and fact extraction.

use leasefacts_domain::FactSuggester;
use leasefacts_extractor::LlmSuggester;
use leasefacts_llm::OpenAiProvider;
use leasefacts_server::{config::ServerConfig, init_tracing, start_server, ServerError};
use std::env;
use std::process;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    // Parse command-line arguments
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        ServerConfig::from_file(&args[2])?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        info!("No config file specified, using defaults");
        ServerConfig::from_toml("")?
    };

    let suggester = build_suggester(&config)?;
    start_server(config, suggester).await
}

/// The model fallback, when the configured API key variable is set
fn build_suggester(config: &ServerConfig) -> Result<Option<Arc<dyn FactSuggester>>, ServerError> {
    let api_key = match env::var(&config.llm.api_key_env) {
        Ok(key) if !key.trim().is_empty() => key,
        _ => {
            warn!(
                "{} is not set; serving pattern extraction only",
                config.llm.api_key_env
            );
            return Ok(None);
        }
    };

    let provider = OpenAiProvider::new(api_key, &config.llm.model)?
        .with_endpoint(&config.llm.endpoint)
        .with_timeout(config.extractor.request_timeout());
    let suggester: Arc<dyn FactSuggester> = Arc::new(
        LlmSuggester::new(provider)
            .with_max_chars(config.extractor.fallback_max_chars)
            .with_name(&config.llm.model),
    );

    Ok(Some(suggester))
}

fn print_help() {
    println!("Leasefacts Server - Lease PDF upload and fact extraction");
    println!();
    println!("USAGE:");
    println!("    leasefacts-server [--config <path-to-config.toml>]");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("ENDPOINTS:");
    println!("    GET  /health                 Liveness check");
    println!("    POST /upload-pdf             Store a PDF (multipart field 'file')");
    println!("    POST /extract-lease-facts    Extract lease facts from a PDF");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file may contain:");
    println!("    - bind_address, bind_port (default 127.0.0.1:8000)");
    println!("    - upload_dir (default ~/Downloads/pdf_uploads)");
    println!("    - max_upload_bytes (default 25 MiB)");
    println!("    - strict_pdf_signature (default false)");
    println!("    - [extractor] fallback_max_chars, fallback_timeout_secs,");
    println!("      request_timeout_secs (defaults 12000, 40, 10)");
    println!("    - [llm] endpoint, model, api_key_env (default OPENAI_API_KEY)");
    println!();
    println!("    RUST_LOG controls log verbosity (default: info).");
    println!();
}
