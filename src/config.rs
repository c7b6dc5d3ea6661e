//! Configuration for the answer gate.
//!
//! Configuration is loaded from a TOML file. API keys are never stored in the
//! file; each provider section names the environment variable that holds its
//! key and the value is resolved at client construction time.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Top-level configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GateConfig {
    pub llm: LlmSection,
    /// Judge model settings; defaults to the planner model when omitted.
    #[serde(default)]
    pub judges: JudgeSection,
    #[serde(default)]
    pub retrieval: RetrievalSection,
}

/// Completion provider section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LlmSection {
    /// Provider name: "anthropic", "openai" or "gemini".
    pub provider: String,
    /// Model identifier.
    pub model: String,
    /// Environment variable containing the API key.
    pub api_key_env: String,
    /// Optional temperature (0.0 to 2.0).
    pub temperature: Option<f32>,
    /// Optional max tokens per completion.
    pub max_tokens: Option<u32>,
}

/// Judge pipeline section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JudgeSection {
    /// Model used for judge calls; planner model when absent.
    pub model: Option<String>,
    /// Max tokens per judge completion.
    pub max_tokens: Option<u32>,
}

/// Evidence retrieval section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalSection {
    /// Number of evidence documents fetched per query.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalSection {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

fn default_top_k() -> usize {
    5
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GateConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: GateConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.llm.provider.as_str() {
            "anthropic" | "openai" | "gemini" => {}
            other => {
                return Err(ConfigError::InvalidConfig(format!(
                    "Unknown provider '{other}' (expected anthropic, openai or gemini)"
                )));
            }
        }
        if self.llm.model.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "llm.model must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        std::env::var(&self.llm.api_key_env)
            .map_err(|_| ConfigError::EnvVarNotFound(self.llm.api_key_env.clone()))
    }

    /// Model used for judge calls.
    pub fn judge_model(&self) -> &str {
        self.judges.model.as_deref().unwrap_or(&self.llm.model)
    }
}
