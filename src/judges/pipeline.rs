//! Concurrent judge fan-out.
//!
//! The one true concurrency point in the crate: all four judge calls launch
//! together and the pipeline waits for every one to settle, so total latency
//! is bounded by the slowest judge rather than the sum. A failed call is
//! logged and leaves its [`JudgeOutcomes`] slot empty; it never cancels the
//! other judges and never fabricates a passing score.

use std::sync::Arc;

use tracing::{info, warn};

use crate::judges::aggregate::aggregate;
use crate::judges::schema::{AggregatedJudgment, JudgeContext, JudgeOutcomes};
use crate::judges::{AttributionJudge, FormatJudge, QualityJudge, SafetyJudge};
use crate::llm::CompletionClient;

/// Runs all four judges over one `(query, answer, evidence, mode)` tuple.
pub struct JudgePipeline {
    safety: SafetyJudge,
    quality: QualityJudge,
    attribution: AttributionJudge,
    format: FormatJudge,
}

impl JudgePipeline {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            safety: SafetyJudge::new(client.clone()),
            quality: QualityJudge::new(client.clone()),
            attribution: AttributionJudge::new(client.clone()),
            format: FormatJudge::new(client),
        }
    }

    /// Cap every judge completion at the given token budget.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.safety = self.safety.with_max_tokens(max_tokens);
        self.quality = self.quality.with_max_tokens(max_tokens);
        self.attribution = self.attribution.with_max_tokens(max_tokens);
        self.format = self.format.with_max_tokens(max_tokens);
        self
    }

    /// Evaluate the answer and aggregate whatever verdicts arrive.
    pub async fn evaluate(&self, context: &JudgeContext) -> AggregatedJudgment {
        let outcomes = self.collect_verdicts(context).await;
        let judgment = aggregate(&outcomes);

        info!(
            decision = ?judgment.final_decision,
            overall_score = judgment.overall_score,
            degraded = judgment.degraded,
            "Judge pipeline completed"
        );
        judgment
    }

    /// Fan out all judges concurrently, isolating per-call failures.
    pub async fn collect_verdicts(&self, context: &JudgeContext) -> JudgeOutcomes {
        let (safety, quality, attribution, format) = tokio::join!(
            self.safety.evaluate(context),
            self.quality.evaluate(context),
            self.attribution.evaluate(context),
            self.format.evaluate(context),
        );

        JudgeOutcomes {
            safety: safety
                .map_err(|e| warn!(judge = "safety", error = %e, "Judge call failed"))
                .ok(),
            quality: quality
                .map_err(|e| warn!(judge = "quality", error = %e, "Judge call failed"))
                .ok(),
            attribution: attribution
                .map_err(|e| warn!(judge = "attribution", error = %e, "Judge call failed"))
                .ok(),
            format: format
                .map_err(|e| warn!(judge = "format", error = %e, "Judge call failed"))
                .ok(),
        }
    }
}
