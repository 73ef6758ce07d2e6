//! Core LeaseExtractor implementation

use crate::config::ExtractorConfig;
use crate::pipeline::DeterministicPipeline;
use crate::types::{ExtractionMetadata, ExtractionResult};
use leasefacts_domain::{merge_with_provenance, FactRecord, FactSource, FactSuggester};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// The LeaseExtractor turns lease text into a merged fact record
///
/// Patterns always run. The suggester runs alongside them only when the
/// configuration enables the fallback and one is attached; its values fill
/// the fields the patterns left missing.
pub struct LeaseExtractor {
    pipeline: DeterministicPipeline,
    suggester: Option<Arc<dyn FactSuggester>>,
    config: ExtractorConfig,
}

impl LeaseExtractor {
    /// Create a deterministic-only extractor
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            pipeline: DeterministicPipeline::new(),
            suggester: None,
            config,
        }
    }

    /// Attach the model fallback
    pub fn with_suggester(mut self, suggester: Arc<dyn FactSuggester>) -> Self {
        self.suggester = Some(suggester);
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Whether `extract` will consult the suggester
    pub fn fallback_active(&self) -> bool {
        self.config.fallback_enabled && self.suggester.is_some()
    }

    /// Extract facts, running patterns and the fallback concurrently
    pub async fn extract(&self, text: &str) -> ExtractionResult {
        let start_time = Instant::now();
        let text: Arc<str> = Arc::from(text);

        info!(
            "Starting extraction, text length {} chars, fallback {}",
            text.chars().count(),
            if self.fallback_active() { "on" } else { "off" }
        );

        let pipeline = self.pipeline;
        let pattern_text = Arc::clone(&text);
        let patterns = tokio::task::spawn_blocking(move || pipeline.run(&pattern_text));

        let (patterns, suggested) = match self.active_suggester() {
            Some(suggester) => {
                let (patterns, suggested) =
                    tokio::join!(patterns, self.run_suggester(suggester, Arc::clone(&text)));
                (patterns, Some(suggested))
            }
            None => (patterns.await, None),
        };

        let patterns = patterns.unwrap_or_else(|e| {
            warn!("Pattern stage failed: {}", e);
            FactRecord::new()
        });

        let result = self.finish(&text, patterns, suggested, start_time);
        info!(
            "Extraction complete: {} fields found, {} from model, {} missing",
            result.provenance.len(),
            result.metadata.fields_from_model,
            result.metadata.fields_missing
        );
        result
    }

    /// Deterministic-only extraction on the calling thread
    pub fn extract_sync(&self, text: &str) -> ExtractionResult {
        let start_time = Instant::now();
        let patterns = self.pipeline.run(text);
        self.finish(text, patterns, None, start_time)
    }

    fn active_suggester(&self) -> Option<Arc<dyn FactSuggester>> {
        if self.config.fallback_enabled {
            self.suggester.clone()
        } else {
            None
        }
    }

    /// Run the suggester on a blocking thread; any failure becomes an empty record
    async fn run_suggester(&self, suggester: Arc<dyn FactSuggester>, text: Arc<str>) -> FactRecord {
        let limit = self.config.fallback_timeout();
        let name = suggester.name().to_string();
        let task = tokio::task::spawn_blocking(move || suggester.suggest(&text));

        match timeout(limit, task).await {
            Ok(Ok(record)) => {
                debug!("Suggester '{}' returned {} fields", name, record.len_present());
                record
            }
            Ok(Err(e)) => {
                warn!("Suggester '{}' task failed: {}", name, e);
                FactRecord::new()
            }
            Err(_) => {
                warn!("Suggester '{}' timed out after {:?}", name, limit);
                FactRecord::new()
            }
        }
    }

    fn finish(
        &self,
        text: &str,
        patterns: FactRecord,
        suggested: Option<FactRecord>,
        start_time: Instant,
    ) -> ExtractionResult {
        let fallback_used = suggested.is_some();
        let suggested = suggested.unwrap_or_default();
        let (facts, provenance) = merge_with_provenance(&patterns, &suggested);

        let metadata = ExtractionMetadata {
            fallback_used,
            suggester: fallback_used
                .then(|| self.suggester.as_ref().map(|s| s.name().to_string()))
                .flatten(),
            fields_from_model: provenance
                .values()
                .filter(|source| **source == FactSource::Model)
                .count(),
            fields_missing: facts.missing_fields().len(),
            text_chars: text.chars().count(),
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        };

        ExtractionResult {
            facts,
            provenance,
            metadata,
        }
    }
}

impl Default for LeaseExtractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default())
    }
}
