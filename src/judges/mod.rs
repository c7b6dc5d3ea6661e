//! Multi-judge evaluation engine.
//!
//! Four independent judges score the same `(query, answer, evidence, mode)`
//! tuple along separate dimensions: safety, quality, source attribution and
//! format. The pipeline fans the calls out concurrently and tolerates
//! individual failures; the aggregator combines whatever verdicts arrived
//! into one pass/fail decision.

pub mod aggregate;
pub mod attribution;
pub mod format;
pub mod pipeline;
pub mod quality;
pub mod safety;
pub mod schema;

pub use aggregate::aggregate;
pub use attribution::AttributionJudge;
pub use format::FormatJudge;
pub use pipeline::JudgePipeline;
pub use quality::QualityJudge;
pub use safety::SafetyJudge;
pub use schema::{
    AggregatedJudgment, AnswerMode, AttributionVerdict, CriticalIssue, Decision, FormatVerdict,
    JudgeContext, JudgeOutcomes, QualityStatus, QualityVerdict, SafetyStatus, SafetyVerdict,
};

use serde::de::DeserializeOwned;

use crate::llm::{strip_code_fence, LlmError};
use crate::retrieval::Document;

/// Judges run deterministic rubrics.
pub(crate) const JUDGE_TEMPERATURE: f32 = 0.0;
pub(crate) const JUDGE_MAX_TOKENS: u32 = 1000;

/// How much evidence each judge sees.
const EXCERPT_DOCS: usize = 3;
const EXCERPT_CHARS: usize = 500;

/// Build a bounded evidence excerpt for a judge prompt: the top documents,
/// content capped per document.
pub(crate) fn evidence_excerpt(documents: &[Document]) -> String {
    if documents.is_empty() {
        return "No evidence documents were retrieved.".to_string();
    }
    documents
        .iter()
        .take(EXCERPT_DOCS)
        .map(|d| d.content.chars().take(EXCERPT_CHARS).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Decode a judge's JSON verdict, unwrapping one optional code fence.
pub(crate) fn decode_verdict<T: DeserializeOwned>(
    judge: &str,
    response: &str,
) -> Result<T, LlmError> {
    let body = strip_code_fence(response);
    serde_json::from_str(body)
        .map_err(|e| LlmError::InvalidResponse(format!("{judge} judge verdict: {e}")))
}

/// Reject out-of-range scores before they reach aggregation.
pub(crate) fn ensure_score(judge: &str, score: u8) -> Result<(), LlmError> {
    if score > 100 {
        return Err(LlmError::InvalidResponse(format!(
            "{judge} judge score {score} out of range 0-100"
        )));
    }
    Ok(())
}
