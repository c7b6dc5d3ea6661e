//! Store-backed executors for the default tool catalog.
//!
//! Each default tool resolves against the evidence [`DocumentStore`]. Input
//! validation mirrors the registry's input schemas: a missing required field
//! is an [`ToolError::InvalidInputs`], a store failure is
//! [`ToolError::ExecutionFailed`].

use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::retrieval::{format_documents, DocumentStore};
use crate::routing::executor::{executor_fn, ExecutorMap, ToolError};

const DEFAULT_N_RESULTS: usize = 5;

fn required_str(inputs: &Map<String, Value>, field: &str) -> Result<String, ToolError> {
    inputs
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ToolError::InvalidInputs(format!("missing required field: {field}")))
}

fn n_results(inputs: &Map<String, Value>) -> usize {
    inputs
        .get("n_results")
        .and_then(Value::as_u64)
        .map(|n| n as usize)
        .unwrap_or(DEFAULT_N_RESULTS)
}

/// Build executors for every tool in the default registry.
pub fn default_executors(store: Arc<dyn DocumentStore>) -> ExecutorMap {
    let mut executors = ExecutorMap::new();

    let search_store = store.clone();
    executors.insert(
        "drug_search".to_string(),
        executor_fn(move |inputs| {
            let store = search_store.clone();
            async move {
                let query = required_str(&inputs, "query")?;
                let hits = store
                    .search(&query, n_results(&inputs))
                    .await
                    .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
                let count = hits.len();
                Ok(json!({"results": hits, "count": count}))
            }
        }),
    );

    let context_store = store.clone();
    executors.insert(
        "drug_context".to_string(),
        executor_fn(move |inputs| {
            let store = context_store.clone();
            async move {
                let query = required_str(&inputs, "query")?;
                let hits = store
                    .search(&query, n_results(&inputs))
                    .await
                    .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
                Ok(json!({"context": format_documents(&hits)}))
            }
        }),
    );

    let interaction_store = store.clone();
    executors.insert(
        "interaction_check".to_string(),
        executor_fn(move |inputs| {
            let store = interaction_store.clone();
            async move {
                let drugs: Vec<String> = inputs
                    .get("drugs")
                    .and_then(Value::as_array)
                    .map(|a| {
                        a.iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();
                if drugs.len() < 2 {
                    return Err(ToolError::InvalidInputs(
                        "interaction_check requires at least 2 drugs".to_string(),
                    ));
                }

                let query = format!("{} interaction", drugs.join(" "));
                let hits = store
                    .search(&query, DEFAULT_N_RESULTS)
                    .await
                    .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
                let evidence_found = !hits.is_empty();
                Ok(json!({
                    "drugs": drugs,
                    "interactions": hits,
                    "evidence_found": evidence_found
                }))
            }
        }),
    );

    executors.insert(
        "drug_summary".to_string(),
        executor_fn(move |inputs| {
            let store = store.clone();
            async move {
                let drug_name = required_str(&inputs, "drug_name")?;
                let query = match inputs.get("section").and_then(Value::as_str) {
                    Some(section) => format!("{drug_name} {section}"),
                    None => drug_name.clone(),
                };
                let hits = store
                    .search(&query, DEFAULT_N_RESULTS)
                    .await
                    .map_err(|e| ToolError::ExecutionFailed(e.to_string()))?;
                Ok(json!({
                    "drug_name": drug_name,
                    "summary": format_documents(&hits)
                }))
            }
        }),
    );

    executors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::Document;
    use crate::testing::mocks::MockDocumentStore;

    fn store() -> Arc<dyn DocumentStore> {
        Arc::new(MockDocumentStore::new(vec![Document::new(
            "d1",
            "Paracetamol maximum daily dose is 4 grams.",
        )
        .with_source("Paracetamol - Dosage")]))
    }

    fn inputs(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[tokio::test]
    async fn test_drug_search_returns_hits() {
        let executors = default_executors(store());
        let result = executors["drug_search"]
            .call(inputs(json!({"query": "paracetamol"})))
            .await
            .unwrap();

        assert_eq!(result["count"], json!(1));
    }

    #[tokio::test]
    async fn test_drug_search_missing_query_rejected() {
        let executors = default_executors(store());
        let result = executors["drug_search"].call(Map::new()).await;
        assert!(matches!(result, Err(ToolError::InvalidInputs(_))));
    }

    #[tokio::test]
    async fn test_drug_context_formats_documents() {
        let executors = default_executors(store());
        let result = executors["drug_context"]
            .call(inputs(json!({"query": "dose"})))
            .await
            .unwrap();

        let context = result["context"].as_str().unwrap();
        assert!(context.contains("### Paracetamol - Dosage"));
    }

    #[tokio::test]
    async fn test_interaction_check_needs_two_drugs() {
        let executors = default_executors(store());

        let too_few = executors["interaction_check"]
            .call(inputs(json!({"drugs": ["aspirin"]})))
            .await;
        assert!(matches!(too_few, Err(ToolError::InvalidInputs(_))));

        let ok = executors["interaction_check"]
            .call(inputs(json!({"drugs": ["aspirin", "ibuprofen"]})))
            .await
            .unwrap();
        assert_eq!(ok["drugs"], json!(["aspirin", "ibuprofen"]));
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_execution_error() {
        let executors = default_executors(Arc::new(MockDocumentStore::failing()));
        let result = executors["drug_search"]
            .call(inputs(json!({"query": "paracetamol"})))
            .await;
        assert!(matches!(result, Err(ToolError::ExecutionFailed(_))));
    }
}
