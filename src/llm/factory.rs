//! Provider construction from configuration.
//!
//! One completion capability interface, three thin backends. The factory is
//! the only place that knows provider names; everything downstream holds an
//! `Arc<dyn CompletionClient>`.

use std::sync::Arc;

use crate::config::GateConfig;
use crate::error::GateError;
use crate::llm::providers::{
    AnthropicClient, AnthropicConfig, GeminiClient, GeminiConfig, OpenAiClient, OpenAiConfig,
};
use crate::llm::CompletionClient;

/// Build the completion client named by the configuration.
///
/// The API key is resolved from the configured environment variable here,
/// never stored in config files.
pub fn build_client(config: &GateConfig) -> Result<Arc<dyn CompletionClient>, GateError> {
    client_for_model(config, config.llm.model.clone())
}

/// Build the client used for judge calls.
///
/// The same provider as the planner, but with the `[judges]` model when one
/// is configured. Callers typically reuse the planner client when no
/// override is set rather than constructing a second one.
pub fn build_judge_client(config: &GateConfig) -> Result<Arc<dyn CompletionClient>, GateError> {
    client_for_model(config, config.judge_model().to_string())
}

fn client_for_model(
    config: &GateConfig,
    model: String,
) -> Result<Arc<dyn CompletionClient>, GateError> {
    let api_key = config.api_key()?;

    let client: Arc<dyn CompletionClient> = match config.llm.provider.as_str() {
        "anthropic" => Arc::new(AnthropicClient::new(AnthropicConfig {
            api_key,
            model,
            ..Default::default()
        })?),
        "openai" => Arc::new(OpenAiClient::new(OpenAiConfig {
            api_key,
            model,
            ..Default::default()
        })?),
        "gemini" => Arc::new(GeminiClient::new(GeminiConfig {
            api_key,
            model,
            ..Default::default()
        })?),
        other => {
            return Err(GateError::Llm(crate::llm::LlmError::NotConfigured(
                format!("Unknown provider: {other}"),
            )));
        }
    };

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{JudgeSection, LlmSection, RetrievalSection};

    fn config_for(provider: &str, key_env: &str) -> GateConfig {
        GateConfig {
            llm: LlmSection {
                provider: provider.to_string(),
                model: "test-model".to_string(),
                api_key_env: key_env.to_string(),
                temperature: None,
                max_tokens: None,
            },
            judges: JudgeSection::default(),
            retrieval: RetrievalSection::default(),
        }
    }

    #[test]
    fn test_build_anthropic_client() {
        std::env::set_var("BULAGATE_TEST_KEY_A", "k");
        let client = build_client(&config_for("anthropic", "BULAGATE_TEST_KEY_A")).unwrap();
        assert_eq!(client.name(), "anthropic");
    }

    #[test]
    fn test_build_gemini_client() {
        std::env::set_var("BULAGATE_TEST_KEY_G", "k");
        let client = build_client(&config_for("gemini", "BULAGATE_TEST_KEY_G")).unwrap();
        assert_eq!(client.name(), "gemini");
    }

    #[test]
    fn test_build_judge_client_with_model_override() {
        std::env::set_var("BULAGATE_TEST_KEY_J", "k");
        let mut config = config_for("anthropic", "BULAGATE_TEST_KEY_J");
        config.judges.model = Some("judge-model".to_string());

        let client = build_judge_client(&config).unwrap();
        assert_eq!(client.name(), "anthropic");
    }

    #[test]
    fn test_missing_env_var_is_config_error() {
        let result = build_client(&config_for("openai", "BULAGATE_TEST_KEY_MISSING"));
        assert!(matches!(result, Err(GateError::Config(_))));
    }
}
