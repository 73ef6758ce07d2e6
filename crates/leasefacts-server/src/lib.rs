//! Leasefacts Server
//!
//! HTTP shell around the lease extractor: PDF upload, lease fact extraction
//! and a health check.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::ServerConfig;
use handlers::{create_router, AppState};
use leasefacts_domain::FactSuggester;
use leasefacts_extractor::LeaseExtractor;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Model client could not be built
    #[error("LLM setup error: {0}")]
    Llm(#[from] leasefacts_llm::LlmError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Initialize tracing from `RUST_LOG`, defaulting to `info`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second initialization (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Build the shared state from configuration and an optional suggester
pub fn build_state(config: &ServerConfig, suggester: Option<Arc<dyn FactSuggester>>) -> AppState {
    let extractor_config = config
        .extractor
        .clone()
        .with_fallback(config.extractor.fallback_enabled || suggester.is_some());

    let extractor = match suggester {
        Some(suggester) => LeaseExtractor::new(extractor_config).with_suggester(suggester),
        None => LeaseExtractor::new(extractor_config),
    };

    AppState {
        extractor: Arc::new(extractor),
        upload_dir: config.upload_dir.clone(),
        strict_pdf_signature: config.strict_pdf_signature,
        max_upload_bytes: config.max_upload_bytes,
    }
}

/// Start the HTTP server
///
/// The suggester, when given, enables the model fallback for every request.
pub async fn start_server(
    config: ServerConfig,
    suggester: Option<Arc<dyn FactSuggester>>,
) -> Result<(), ServerError> {
    info!("Starting Leasefacts Server");
    info!("Bind address: {}", config.bind_addr());
    info!("Upload directory: {}", config.upload_dir.display());
    info!(
        "Model fallback: {}",
        match &suggester {
            Some(s) => s.name().to_string(),
            None => "disabled".to_string(),
        }
    );

    let state = build_state(&config, suggester);
    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use leasefacts_domain::FactRecord;

    struct NoopSuggester;

    impl FactSuggester for NoopSuggester {
        fn suggest(&self, _text: &str) -> FactRecord {
            FactRecord::new()
        }
    }

    #[test]
    fn test_state_without_suggester_is_deterministic() {
        let config = ServerConfig::default_test_config();
        let state = build_state(&config, None);
        assert!(!state.extractor.fallback_active());
        assert_eq!(state.max_upload_bytes, 25 * 1024 * 1024);
    }

    #[test]
    fn test_suggester_enables_fallback() {
        let config = ServerConfig::default_test_config();
        let state = build_state(&config, Some(Arc::new(NoopSuggester)));
        assert!(state.extractor.fallback_active());
    }
}
