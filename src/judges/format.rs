//! Format judge.
//!
//! Scores structure, length and mode-appropriate presentation of the
//! generated answer.

use std::sync::Arc;

use tracing::debug;

use crate::judges::schema::{FormatVerdict, JudgeContext};
use crate::judges::{decode_verdict, ensure_score};
use crate::llm::{CompletionClient, CompletionRequest, LlmError};

const FORMAT_RUBRIC: &str = "\
You are a Format Judge for medication information responses.

DIMENSIONS:
1. STRUCTURE: Logical organization, headings or lists where helpful.
2. LENGTH: Appropriate for the question, no padding.
3. TONE: Matches the stated mode (patient-friendly vs. professional).
4. READABILITY: Plain sentences, defined terms.

Return exactly one JSON object:
{
    \"format_score\": <0-100>,
    \"format_status\": \"EXCELLENT|GOOD|ACCEPTABLE|POOR\",
    \"dimension_scores\": {\"structure\": <0-100>, \"length\": <0-100>, \"tone\": <0-100>, \"readability\": <0-100>},
    \"issues\": [{\"issue\": \"...\", \"location\": \"...\"}],
    \"approved\": true/false
}";

/// LLM-backed format judge.
pub struct FormatJudge {
    client: Arc<dyn CompletionClient>,
    max_tokens: u32,
}

impl FormatJudge {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            max_tokens: crate::judges::JUDGE_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub async fn evaluate(&self, context: &JudgeContext) -> Result<FormatVerdict, LlmError> {
        // Format needs no evidence, only the mode and the answer itself.
        let prompt = format!(
            "{FORMAT_RUBRIC}\n\n## Mode: {}\n## Question: {}\n## Response: {}\n\nEvaluate and return JSON.",
            context.mode.as_str(),
            context.query,
            context.answer,
        );

        let response = self
            .client
            .complete(
                CompletionRequest::new(prompt)
                    .with_temperature(crate::judges::JUDGE_TEMPERATURE)
                    .with_max_tokens(self.max_tokens),
            )
            .await?;

        let verdict: FormatVerdict = decode_verdict("format", &response)?;
        ensure_score("format", verdict.format_score)?;

        debug!(
            score = verdict.format_score,
            approved = verdict.approved,
            "Format judge completed"
        );
        Ok(verdict)
    }
}
