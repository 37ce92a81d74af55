/// Augmentation — optional rewording of the rule-based follow-up question.
///
/// The engine's decision is final before augmentation runs. A missing,
/// slow, or failing augmenter only means the rule-based wording is used.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const MESSAGES_PATH: &str = "/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 512;
const MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BACKOFF: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum AugmentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Augmenter returned empty content")]
    EmptyContent,
}

/// Text-enrichment capability, injected into the conversation service.
#[async_trait]
pub trait Augmenter: Send + Sync {
    async fn augment(&self, prompt: &str) -> Result<String, AugmentError>;
}

/// What happened to an augmentation attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum AugmentOutcome {
    NotConfigured,
    TimedOut,
    Failed(String),
    Augmented(String),
}

impl AugmentOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            AugmentOutcome::Augmented(text) => Some(text),
            _ => None,
        }
    }
}

/// Runs the augmenter under a caller-imposed timeout. Never fails.
pub async fn augment_with_timeout(
    augmenter: Option<&dyn Augmenter>,
    prompt: &str,
    timeout: Duration,
) -> AugmentOutcome {
    let Some(augmenter) = augmenter else {
        return AugmentOutcome::NotConfigured;
    };

    match tokio::time::timeout(timeout, augmenter.augment(prompt)).await {
        Ok(Ok(text)) => AugmentOutcome::Augmented(text),
        Ok(Err(e)) => {
            warn!("Augmentation failed, using rule-based wording: {e}");
            AugmentOutcome::Failed(e.to_string())
        }
        Err(_) => {
            warn!(
                "Augmentation timed out after {}ms, using rule-based wording",
                timeout.as_millis()
            );
            AugmentOutcome::TimedOut
        }
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl AnthropicResponse {
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Anthropic Messages API augmenter. Rate limits and server errors are
/// retried with exponential backoff; any other failure returns at once.
#[derive(Clone)]
pub struct AnthropicAugmenter {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    backoff: Duration,
}

impl AnthropicAugmenter {
    pub fn new(api_key: String, model: String) -> Result<Self, AugmentError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()?,
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            backoff: DEFAULT_BACKOFF,
        })
    }

    /// Points the client at another host, e.g. a proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// First retry delay; each later retry doubles it.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn backoff_delay(&self, retry: u32) -> Duration {
        self.backoff * 2u32.pow(retry.saturating_sub(1))
    }

    async fn send_once(&self, body: &AnthropicRequest<'_>) -> Result<String, Attempt> {
        let response = self
            .client
            .post(format!("{}{MESSAGES_PATH}", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| Attempt::Retry(AugmentError::Http(e)))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AnthropicError>(&raw)
                .map(|e| e.error.message)
                .unwrap_or(raw);
            let error = AugmentError::Api { status, message };
            return Err(if is_retryable(status) {
                Attempt::Retry(error)
            } else {
                Attempt::Fatal(error)
            });
        }

        let parsed: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| Attempt::Fatal(AugmentError::Http(e)))?;
        debug!(
            input_tokens = parsed.usage.input_tokens,
            output_tokens = parsed.usage.output_tokens,
            "augment call succeeded"
        );

        let text = parsed
            .text()
            .map(strip_fences)
            .filter(|t| !t.is_empty())
            .ok_or(Attempt::Fatal(AugmentError::EmptyContent))?;
        Ok(text.to_string())
    }
}

/// Outcome of one failed HTTP attempt.
enum Attempt {
    Retry(AugmentError),
    Fatal(AugmentError),
}

fn is_retryable(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

#[async_trait]
impl Augmenter for AnthropicAugmenter {
    async fn augment(&self, prompt: &str) -> Result<String, AugmentError> {
        let body = AnthropicRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system: prompts::AUGMENT_SYSTEM,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error = None;
        for retry in 0..MAX_ATTEMPTS {
            if retry > 0 {
                let delay = self.backoff_delay(retry);
                warn!(retry, delay_ms = delay.as_millis() as u64, "retrying augment call");
                tokio::time::sleep(delay).await;
            }
            match self.send_once(&body).await {
                Ok(text) => return Ok(text),
                Err(Attempt::Fatal(e)) => return Err(e),
                Err(Attempt::Retry(e)) => {
                    warn!("augment attempt {} failed: {e}", retry + 1);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(AugmentError::RateLimited {
            retries: MAX_ATTEMPTS,
        }))
    }
}

/// Strips ``` fences (with or without a language tag) and surrounding quotes.
fn strip_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = match text.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphabetic());
            rest.trim_start()
                .strip_suffix("```")
                .unwrap_or(rest.trim_start())
        }
        None => text,
    };
    inner.trim().trim_matches('"').trim()
}
