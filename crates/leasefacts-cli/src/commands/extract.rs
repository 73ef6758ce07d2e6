//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::error::{CliError, Result};
use crate::output::{Formatter, OutputFormat};
use leasefacts_extractor::{extract_pdf_text, ExtractorConfig, LeaseExtractor, LlmSuggester};
use leasefacts_llm::OpenAiProvider;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Execute the extract command.
pub async fn execute_extract(args: ExtractArgs, formatter: &Formatter) -> Result<()> {
    let text = load_document_text(&args.file)?;
    if text.trim().is_empty() {
        eprintln!(
            "{}",
            formatter.warning("Document has no extractable text (scanned PDF?)")
        );
    }

    let extractor = build_extractor(&args)?;
    let result = extractor.extract(&text).await;

    println!("{}", formatter.format_result(&result)?);
    if formatter.format() == OutputFormat::Table {
        eprintln!("{}", formatter.summary(&result));
    }

    Ok(())
}

/// Read a lease as plain text; `.pdf` files go through PDF text extraction.
pub fn load_document_text(path: &Path) -> Result<String> {
    let is_pdf = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);

    if is_pdf {
        let bytes = std::fs::read(path)?;
        debug!("Read {} bytes of PDF from {}", bytes.len(), path.display());
        Ok(extract_pdf_text(&bytes)?)
    } else {
        let bytes = std::fs::read(path)?;
        String::from_utf8(bytes).map_err(|_| {
            CliError::InvalidInput(format!("{} is neither a PDF nor UTF-8 text", path.display()))
        })
    }
}

/// Build the extractor, attaching the model fallback when a key is available.
pub fn build_extractor(args: &ExtractArgs) -> Result<LeaseExtractor> {
    let Some(api_key) = args.fallback_key() else {
        debug!("Model fallback disabled");
        return Ok(LeaseExtractor::new(ExtractorConfig::deterministic()));
    };

    let config = ExtractorConfig::default().with_fallback(true);
    let provider = OpenAiProvider::new(api_key, &args.model)?
        .with_endpoint(&args.endpoint)
        .with_timeout(config.request_timeout());
    let suggester = LlmSuggester::new(provider)
        .with_max_chars(config.fallback_max_chars)
        .with_name(&args.model);

    Ok(LeaseExtractor::new(config).with_suggester(Arc::new(suggester)))
}
