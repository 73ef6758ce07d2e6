//! OpenAI Provider Implementation
//!
//! Provides integration with OpenAI-compatible chat completion APIs.
//!
//! # Features
//!
//! - Async HTTP communication with the chat completions endpoint
//! - JSON object response mode for structured generation
//! - Retry logic with capped exponential backoff
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use leasefacts_llm::OpenAiProvider;
//!
//! # async fn example() -> Result<(), leasefacts_llm::LlmError> {
//! let provider = OpenAiProvider::new("sk-...", "gpt-4o-mini")?;
//! let json = provider.chat("Return {\"ok\": true}", true).await?;
//! # Ok(())
//! # }
//! ```

use crate::retry::RetryPolicy;
use crate::LlmError;
use leasefacts_domain::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Default OpenAI API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default timeout for a single request (10 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default completion budget
pub const DEFAULT_MAX_TOKENS: u32 = 400;

/// System message sent with every request
pub const SYSTEM_PROMPT: &str = "Extract structured facts as valid JSON only.";

/// OpenAI-compatible chat completions provider
pub struct OpenAiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    retry: RetryPolicy,
    timeout: Duration,
    max_tokens: u32,
}

/// Request body for the chat completions API
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Response from the chat completions API
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a new provider against the default endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key: api_key.into(),
            client,
            retry: RetryPolicy::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_tokens: DEFAULT_MAX_TOKENS,
        })
    }

    /// Bound each attempt; retries get a fresh timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Longest a call can run with the current retry policy and timeout
    pub fn worst_case_duration(&self) -> Duration {
        self.retry.worst_case(self.timeout)
    }

    /// Point the provider at another OpenAI-compatible endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the retry policy
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the completion token budget
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Name of the configured model
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one prompt and return the message content
    ///
    /// With `json_mode` the service is asked for a JSON object response.
    /// Transient failures (transport errors, HTTP 429 and 5xx) are retried
    /// according to the retry policy.
    ///
    /// # Errors
    ///
    /// Returns the last error once attempts are exhausted, or immediately for
    /// authentication failures, unknown models and malformed responses.
    pub async fn chat(&self, prompt: &str, json_mode: bool) -> Result<String, LlmError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.0,
            max_tokens: self.max_tokens,
            response_format: json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        };

        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.send_once(&request_body).await {
                Ok(content) => return Ok(content),
                Err(e) if e.is_transient() && self.retry.should_retry(attempts) => {
                    let delay = self.retry.delay_for(attempts);
                    warn!(
                        "LLM request attempt {}/{} failed: {}; retrying in {:?}",
                        attempts, self.retry.max_attempts, e, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once(&self, request_body: &ChatRequest<'_>) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.endpoint);

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .bearer_auth(&self.api_key)
            .json(request_body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            let chat: ChatResponse = response
                .json()
                .await
                .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;
            let content = chat
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .ok_or_else(|| LlmError::InvalidResponse("Response has no message content".to_string()))?;
            debug!("LLM response length: {} chars", content.len());
            return Ok(content);
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        Err(match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                LlmError::Authentication(format!("HTTP {}", status))
            }
            reqwest::StatusCode::NOT_FOUND => LlmError::ModelNotAvailable(self.model.clone()),
            reqwest::StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded,
            s if s.is_server_error() => {
                LlmError::Communication(format!("HTTP {}: {}", status, error_text))
            }
            _ => LlmError::Other(format!("HTTP {}: {}", status, error_text)),
        })
    }
}

/// Drive an async request to completion from synchronous code
///
/// Must be called from a blocking thread (e.g. `spawn_blocking`) when a tokio
/// runtime is running; outside any runtime a private one is created.
fn block_on<F: Future>(future: F) -> Result<F::Output, LlmError> {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => Ok(handle.block_on(future)),
        Err(_) => tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map(|runtime| runtime.block_on(future))
            .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e))),
    }
}

impl LlmProviderTrait for OpenAiProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        block_on(self.chat(prompt, false))?
    }

    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error> {
        let prompt = format!("{}\n\nRespond with a JSON object matching:\n{}", prompt, schema);
        block_on(self.chat(&prompt, true))?
    }
}
