//! Completion capability abstraction.
//!
//! The planner, the response synthesizer, and every judge consume the same
//! narrow interface: one prompt in, one text completion out. Provider
//! backends (Anthropic, OpenAI, Gemini) are thin adapters behind
//! [`CompletionClient`]; swapping backends never touches routing or judging
//! logic.

pub mod factory;
pub mod providers;

use async_trait::async_trait;
use thiserror::Error;

/// A single completion exchange.
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    /// Optional system instruction, sent separately where the provider
    /// supports it and prepended to the prompt otherwise.
    pub system: Option<String>,
    /// The user-facing prompt body.
    pub prompt: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new<S: Into<String>>(prompt: S) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_system<S: Into<String>>(mut self, system: S) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

/// Generative completion capability, for dependency injection and testing.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Provider name (e.g. "anthropic", "openai", "gemini").
    fn name(&self) -> &str;

    /// Generate a completion for the given request.
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;

    /// Check that the provider is configured and reachable.
    async fn health_check(&self) -> Result<(), LlmError>;
}

/// Completion provider errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LlmError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("API error: {0}")]
    ApiError(String),
}

/// Strip one optional layer of triple-backtick fencing from model output.
///
/// Models regularly wrap JSON in ```` ```json ... ``` ```` despite being told
/// not to. Exactly one layer is removed; anything else is left for the JSON
/// decoder to reject.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence line.
    match inner.split_once('\n') {
        Some((first_line, body)) if first_line.trim().chars().all(char::is_alphanumeric) => {
            body.trim()
        }
        _ => inner.trim(),
    }
}
