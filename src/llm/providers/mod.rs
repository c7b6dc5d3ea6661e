//! Completion provider backends.

pub mod anthropic;
pub mod gemini;
pub mod openai;

pub use anthropic::{AnthropicClient, AnthropicConfig};
pub use gemini::{GeminiClient, GeminiConfig};
pub use openai::{OpenAiClient, OpenAiConfig};
