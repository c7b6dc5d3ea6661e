//! Default medication tool catalog.
//!
//! Descriptors for the capabilities the planner can route to when answering
//! medication questions. The descriptors are data only; actual executors are
//! supplied by the caller at execution time.

use serde_json::json;

use crate::routing::schema::{CostTier, LatencyTier, RegistryError, Tool, ToolRegistry};

/// Build the default medication tool registry.
pub fn default_registry() -> Result<ToolRegistry, RegistryError> {
    ToolRegistry::new(
        vec![
            Tool {
                id: "drug_search".to_string(),
                description: "Search the leaflet database by drug name, active ingredient or indication"
                    .to_string(),
                capabilities: vec![
                    "search_by_name".to_string(),
                    "search_by_ingredient".to_string(),
                    "search_by_indication".to_string(),
                    "semantic_search".to_string(),
                ],
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "query": {"type": "string"},
                        "n_results": {"type": "integer", "default": 5}
                    },
                    "required": ["query"]
                }),
                output_schema: json!({
                    "type": "object",
                    "properties": {
                        "results": {"type": "array"},
                        "count": {"type": "integer"}
                    }
                }),
                cost_tier: CostTier::Low,
                latency_tier: LatencyTier::Fast,
                requirements: vec![],
                examples: vec![
                    "Search for paracetamol".to_string(),
                    "Find drugs indicated for headache".to_string(),
                ],
            },
            Tool {
                id: "drug_context".to_string(),
                description: "Retrieve detailed leaflet context for a drug to answer a question"
                    .to_string(),
                capabilities: vec![
                    "get_full_context".to_string(),
                    "get_section".to_string(),
                    "rag_retrieval".to_string(),
                ],
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "query": {"type": "string"},
                        "n_results": {"type": "integer", "default": 5},
                        "mode": {"type": "string", "enum": ["patient", "professional"]}
                    },
                    "required": ["query"]
                }),
                output_schema: json!({
                    "type": "object",
                    "properties": {"context": {"type": "string"}}
                }),
                cost_tier: CostTier::Low,
                latency_tier: LatencyTier::Fast,
                requirements: vec![],
                examples: vec![
                    "What are the side effects of paracetamol?".to_string(),
                    "Contraindications of dipyrone".to_string(),
                ],
            },
            Tool {
                id: "interaction_check".to_string(),
                description: "Check drug-drug interactions between two or more medications"
                    .to_string(),
                capabilities: vec![
                    "check_pair".to_string(),
                    "check_multiple".to_string(),
                    "severity_assessment".to_string(),
                ],
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "drugs": {
                            "type": "array",
                            "items": {"type": "string"},
                            "minItems": 2
                        }
                    },
                    "required": ["drugs"]
                }),
                output_schema: json!({
                    "type": "object",
                    "properties": {
                        "interactions": {"type": "array"},
                        "severity": {"type": "string"}
                    }
                }),
                cost_tier: CostTier::Medium,
                latency_tier: LatencyTier::Moderate,
                requirements: vec!["At least 2 medications".to_string()],
                examples: vec![
                    "Check interaction between aspirin and ibuprofen".to_string(),
                ],
            },
            Tool {
                id: "drug_summary".to_string(),
                description: "Generate a complete summary of a drug leaflet".to_string(),
                capabilities: vec![
                    "full_summary".to_string(),
                    "section_summary".to_string(),
                    "patient_friendly".to_string(),
                ],
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "drug_name": {"type": "string"},
                        "section": {"type": "string"}
                    },
                    "required": ["drug_name"]
                }),
                output_schema: json!({
                    "type": "object",
                    "properties": {"summary": {"type": "string"}}
                }),
                cost_tier: CostTier::Medium,
                latency_tier: LatencyTier::Moderate,
                requirements: vec![],
                examples: vec!["Full summary of paracetamol".to_string()],
            },
        ],
        vec![],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_builds() {
        let registry = default_registry().unwrap();
        assert_eq!(
            registry.list_ids(),
            vec!["drug_search", "drug_context", "interaction_check", "drug_summary"]
        );
    }

    #[test]
    fn test_interaction_check_requires_two_drugs() {
        let registry = default_registry().unwrap();
        let tool = registry.get("interaction_check").unwrap();

        assert_eq!(tool.cost_tier, CostTier::Medium);
        assert_eq!(
            tool.input_schema["properties"]["drugs"]["minItems"],
            serde_json::json!(2)
        );
    }
}
