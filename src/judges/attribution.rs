//! Source attribution judge.
//!
//! Counts factual claims in the answer and how many are supported by the
//! retrieved evidence.

use std::sync::Arc;

use tracing::debug;

use crate::judges::schema::{AttributionVerdict, JudgeContext};
use crate::judges::{decode_verdict, ensure_score, evidence_excerpt};
use crate::llm::{CompletionClient, CompletionRequest, LlmError};

const ATTRIBUTION_RUBRIC: &str = "\
You are a Source Attribution Judge for medication information responses.

Identify every factual claim in the response and check whether it is
supported by the evidence documents.

SCORING (0-100): the share of claims that are attributed, scaled to 100.

Return exactly one JSON object:
{
    \"attribution_score\": <0-100>,
    \"total_claims\": <int>,
    \"attributed_claims\": <int>,
    \"unattributed_claims\": <int>,
    \"approved\": true/false
}";

/// LLM-backed source attribution judge.
pub struct AttributionJudge {
    client: Arc<dyn CompletionClient>,
    max_tokens: u32,
}

impl AttributionJudge {
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

    pub async fn evaluate(&self, context: &JudgeContext) -> Result<AttributionVerdict, LlmError> {
        let prompt = format!(
            "{ATTRIBUTION_RUBRIC}\n\n## Question: {}\n## Response: {}\n## Evidence:\n{}\n\nEvaluate and return JSON.",
            context.query,
            context.answer,
            evidence_excerpt(&context.documents),
        );

        let response = self
            .client
            .complete(
                CompletionRequest::new(prompt)
                    .with_temperature(crate::judges::JUDGE_TEMPERATURE)
                    .with_max_tokens(self.max_tokens),
            )
            .await?;

        let verdict: AttributionVerdict = decode_verdict("attribution", &response)?;
        ensure_score("attribution", verdict.attribution_score)?;

        debug!(
            score = verdict.attribution_score,
            total_claims = verdict.total_claims,
            attributed_claims = verdict.attributed_claims,
            "Attribution judge completed"
        );
        Ok(verdict)
    }
}
