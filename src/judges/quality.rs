//! Quality judge.
//!
//! Scores completeness, accuracy against the evidence, clarity for the
//! requested mode, and actionability.

use std::sync::Arc;

use tracing::debug;

use crate::judges::schema::{JudgeContext, QualityVerdict};
use crate::judges::{decode_verdict, ensure_score, evidence_excerpt};
use crate::llm::{CompletionClient, CompletionRequest, LlmError};

const QUALITY_RUBRIC: &str = "\
You are a Quality Judge for medication information responses.

Evaluate the response against the evidence documents.

DIMENSIONS:
1. COMPLETENESS: Does it fully answer the question?
2. ACCURACY: Is every statement consistent with the evidence?
3. CLARITY: Is the language appropriate for the stated mode?
4. ACTIONABILITY: Can the user act on it correctly?

SCORING (0-100): 90-100 EXCELLENT, 75-89 GOOD, 60-74 ACCEPTABLE, 0-59 POOR.

Return exactly one JSON object:
{
    \"quality_score\": <0-100>,
    \"quality_status\": \"EXCELLENT|GOOD|ACCEPTABLE|POOR\",
    \"dimension_scores\": {\"completeness\": <0-100>, \"accuracy\": <0-100>, \"clarity\": <0-100>, \"actionability\": <0-100>},
    \"factual_issues\": [{\"claim\": \"...\", \"problem\": \"...\"}],
    \"missing_information\": [\"...\"],
    \"approved\": true/false
}";

/// LLM-backed quality judge.
pub struct QualityJudge {
    client: Arc<dyn CompletionClient>,
    max_tokens: u32,
}

impl QualityJudge {
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

    pub async fn evaluate(&self, context: &JudgeContext) -> Result<QualityVerdict, LlmError> {
        let prompt = format!(
            "{QUALITY_RUBRIC}\n\n## Mode: {}\n## Question: {}\n## Response: {}\n## Evidence:\n{}\n\nEvaluate and return JSON.",
            context.mode.as_str(),
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

        let verdict: QualityVerdict = decode_verdict("quality", &response)?;
        ensure_score("quality", verdict.quality_score)?;

        debug!(
            score = verdict.quality_score,
            approved = verdict.approved,
            "Quality judge completed"
        );
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judges::schema::QualityStatus;
    use crate::testing::mocks::MockCompletionClient;
    use serde_json::json;

    #[tokio::test]
    async fn test_evaluate_parses_dimension_scores() {
        let client = Arc::new(MockCompletionClient::new(vec![Ok(json!({
            "quality_score": 85,
            "quality_status": "GOOD",
            "dimension_scores": {"completeness": 80, "accuracy": 90},
            "factual_issues": [],
            "missing_information": ["maximum treatment duration"],
            "approved": true
        })
        .to_string())]));

        let judge = QualityJudge::new(client);
        let verdict = judge
            .evaluate(&JudgeContext::new("dose?", "4g daily."))
            .await
            .unwrap();

        assert_eq!(verdict.quality_status, QualityStatus::Good);
        assert_eq!(verdict.dimension_scores["accuracy"], 90);
        assert_eq!(verdict.missing_information.len(), 1);
    }

    #[tokio::test]
    async fn test_fenced_verdict_accepted() {
        let body = json!({
            "quality_score": 70,
            "quality_status": "ACCEPTABLE",
            "approved": true
        });
        let client = Arc::new(MockCompletionClient::new(vec![Ok(format!(
            "```json\n{body}\n```"
        ))]));

        let judge = QualityJudge::new(client);
        let verdict = judge
            .evaluate(&JudgeContext::new("dose?", "4g daily."))
            .await
            .unwrap();

        assert_eq!(verdict.quality_score, 70);
    }
}
