//! End-to-end planning and execution against the default tool catalog.

use std::sync::Arc;

use serde_json::json;

use bulario_gate::error::GateError;
use bulario_gate::retrieval::Document;
use bulario_gate::routing::{
    default_executors, default_registry, PlanExecutor, Planner, UserContext,
};
use bulario_gate::testing::mocks::{MockCompletionClient, MockDocumentStore};

fn evidence_store() -> Arc<MockDocumentStore> {
    Arc::new(MockDocumentStore::new(vec![
        Document::new(
            "d1",
            "Paracetamol maximum daily dose is 4 grams for adults.",
        )
        .with_source("Paracetamol - Dosage"),
        Document::new("d2", "Ibuprofen should be taken with food.")
            .with_source("Ibuprofen - Administration"),
    ]))
}

fn two_step_plan() -> String {
    json!({
        "reasoning": "Search first, then pull detailed context.",
        "selected_tools": [
            {"tool_id": "drug_context", "reason": "detailed answer", "order": 2,
             "inputs": {"query": "paracetamol dose"}},
            {"tool_id": "drug_search", "reason": "locate the leaflet", "order": 1,
             "inputs": {"query": "paracetamol"}}
        ],
        "execution_plan": ["Search for paracetamol", "Retrieve dosage context"],
        "confidence": "high",
        "fallback_plan": "Answer from drug_search results only.",
        "estimated_cost": "low",
        "estimated_time": "fast"
    })
    .to_string()
}

#[tokio::test]
async fn test_plan_then_execute_in_order() {
    let client = Arc::new(MockCompletionClient::new(vec![Ok(two_step_plan())]));
    let registry = Arc::new(default_registry().unwrap());
    let planner = Planner::new(client, registry);

    let decision = planner
        .plan(&UserContext::new("max paracetamol dose?"))
        .await
        .unwrap();
    assert_eq!(decision.selected_tools.len(), 2);

    let executors = default_executors(evidence_store());
    let result = PlanExecutor::new().execute(&decision, &executors).await;

    assert!(result.success);
    // Execution follows plan order, not declaration order.
    assert_eq!(result.tool_results[0].tool_id, "drug_search");
    assert_eq!(result.tool_results[1].tool_id, "drug_context");

    let context = &result.tool_results[1].result.as_ref().unwrap()["context"];
    assert!(context.as_str().unwrap().contains("4 grams"));
}

#[tokio::test]
async fn test_plan_referencing_unknown_tool_still_completes() {
    let plan = json!({
        "reasoning": "Uses a tool that has no executor.",
        "selected_tools": [
            {"tool_id": "dose_calculator", "reason": "compute dose", "order": 2, "inputs": {}},
            {"tool_id": "drug_search", "reason": "locate leaflet", "order": 1,
             "inputs": {"query": "paracetamol"}}
        ],
        "execution_plan": ["Search", "Calculate"],
        "confidence": "medium",
        "fallback_plan": "Search only.",
        "estimated_cost": "low",
        "estimated_time": "fast"
    })
    .to_string();

    let client = Arc::new(MockCompletionClient::new(vec![Ok(plan)]));
    let planner = Planner::new(client, Arc::new(default_registry().unwrap()));
    let decision = planner
        .plan(&UserContext::new("how much paracetamol can I take?"))
        .await
        .unwrap();

    let executors = default_executors(evidence_store());
    let result = PlanExecutor::new().execute(&decision, &executors).await;

    assert!(!result.success);
    assert_eq!(result.tool_results.len(), 2);
    assert!(result.tool_results[0].success);
    assert!(!result.tool_results[1].success);
    assert!(result.tool_results[1]
        .error
        .as_deref()
        .unwrap()
        .contains("No executor registered"));
}

#[tokio::test]
async fn test_prose_plan_is_a_parse_error() {
    let client = Arc::new(MockCompletionClient::new(vec![Ok(
        "First I would search for the drug, then check its dosage section.".to_string(),
    )]));
    let planner = Planner::new(client, Arc::new(default_registry().unwrap()));

    let result = planner.plan(&UserContext::new("max dose?")).await;
    assert!(matches!(result, Err(GateError::PlanParse { .. })));
}

#[tokio::test]
async fn test_fenced_plan_accepted() {
    let fenced = format!("```json\n{}\n```", two_step_plan());
    let client = Arc::new(MockCompletionClient::new(vec![Ok(fenced)]));
    let planner = Planner::new(client, Arc::new(default_registry().unwrap()));

    let decision = planner.plan(&UserContext::new("max dose?")).await.unwrap();
    assert_eq!(decision.selected_tools.len(), 2);
}
