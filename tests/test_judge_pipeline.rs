//! Judge pipeline fan-out, aggregation and gating behavior.

use std::sync::Arc;

use serde_json::json;

use bulario_gate::judges::{Decision, JudgeContext, JudgePipeline};
use bulario_gate::llm::LlmError;
use bulario_gate::retrieval::Document;
use bulario_gate::testing::mocks::MockCompletionClient;

fn safety(score: u8, status: &str, approved: bool, disclaimers: &[&str]) -> Result<String, LlmError> {
    Ok(json!({
        "safety_score": score,
        "safety_status": status,
        "required_disclaimers": disclaimers,
        "approved": approved
    })
    .to_string())
}

fn quality(score: u8) -> Result<String, LlmError> {
    Ok(json!({"quality_score": score, "quality_status": "GOOD", "approved": true}).to_string())
}

fn attribution(score: u8) -> Result<String, LlmError> {
    Ok(json!({
        "attribution_score": score,
        "total_claims": 3,
        "attributed_claims": 2,
        "unattributed_claims": 1,
        "approved": true
    })
    .to_string())
}

fn format_verdict(score: u8) -> Result<String, LlmError> {
    Ok(json!({"format_score": score, "format_status": "GOOD", "approved": true}).to_string())
}

fn context() -> JudgeContext {
    let mut ctx = JudgeContext::new(
        "What is the maximum daily dose of paracetamol?",
        "The maximum daily dose for adults is 4 grams.",
    );
    ctx.documents = vec![Document::new(
        "d1",
        "Paracetamol maximum daily dose is 4 grams for adults.",
    )
    .with_source("Paracetamol - Dosage")];
    ctx
}

#[tokio::test]
async fn test_approved_with_caveats_band() {
    // (70*0.4 + 75*0.3 + 60*0.2 + 80*0.1) = 70.5 -> floor 70, between 60 and 80.
    let client = Arc::new(MockCompletionClient::new(vec![
        safety(70, "WARNING", true, &["Do not exceed the stated dose."]),
        quality(75),
        attribution(60),
        format_verdict(80),
    ]));

    let judgment = JudgePipeline::new(client).evaluate(&context()).await;

    assert_eq!(judgment.overall_score, 70);
    assert_eq!(judgment.final_decision, Decision::ApprovedWithCaveats);
    assert_eq!(
        judgment.disclaimers_to_add,
        vec!["Do not exceed the stated dose.".to_string()]
    );
}

#[tokio::test]
async fn test_safety_veto_overrides_high_scores() {
    let client = Arc::new(MockCompletionClient::new(vec![
        safety(20, "UNSAFE", false, &[]),
        quality(100),
        attribution(100),
        format_verdict(100),
    ]));

    let judgment = JudgePipeline::new(client).evaluate(&context()).await;

    assert_eq!(judgment.final_decision, Decision::Rejected);
    assert!(!judgment.degraded);
}

#[tokio::test]
async fn test_fenced_verdicts_accepted() {
    let fence = |body: String| Ok(format!("```json\n{body}\n```"));
    let client = Arc::new(MockCompletionClient::new(vec![
        fence(safety(90, "SAFE", true, &[]).unwrap()),
        fence(quality(90).unwrap()),
        fence(attribution(90).unwrap()),
        fence(format_verdict(90).unwrap()),
    ]));

    let judgment = JudgePipeline::new(client).evaluate(&context()).await;
    assert_eq!(judgment.overall_score, 90);
    assert_eq!(judgment.final_decision, Decision::Approved);
}

#[tokio::test]
async fn test_malformed_verdict_excludes_that_judge() {
    // Safety returns prose; its weight drops out of aggregation.
    let client = Arc::new(MockCompletionClient::new(vec![
        Ok("The answer looks safe to me.".to_string()),
        quality(90),
        attribution(90),
        format_verdict(90),
    ]));

    let judgment = JudgePipeline::new(client).evaluate(&context()).await;

    assert!(!judgment.score_breakdown.contains_key("safety"));
    // (90*0.3 + 90*0.2 + 90*0.1) / 0.6 = 90
    assert_eq!(judgment.overall_score, 90);
    assert_eq!(judgment.final_decision, Decision::Approved);
}

#[tokio::test]
async fn test_total_judge_outage_forces_revision() {
    let client = Arc::new(MockCompletionClient::failing());

    let judgment = JudgePipeline::new(client).evaluate(&context()).await;

    assert!(judgment.degraded);
    assert_eq!(judgment.final_decision, Decision::NeedsRevision);
    assert_eq!(judgment.overall_score, 0);
    assert!(judgment.score_breakdown.is_empty());
}
