//! Response synthesis over tool results.
//!
//! One further completion call turns the decision's reasoning, its execution
//! plan and every tool result (successes and FAILED-labeled errors alike)
//! into a single user-facing answer. When that call fails the caller falls
//! back to [`ResponseAggregator::fallback_summary`], which is deterministic
//! and never fails.

use std::sync::Arc;

use tracing::debug;

use crate::llm::{CompletionClient, CompletionRequest, LlmError};
use crate::routing::schema::{RoutingDecision, ToolExecutionResult};

/// Synthesizes one answer from a plan's tool results.
pub struct ResponseAggregator {
    client: Arc<dyn CompletionClient>,
    max_tokens: u32,
}

impl ResponseAggregator {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            max_tokens: 1500,
        }
    }

    /// Combine tool outputs into a coherent response via one completion call.
    pub async fn synthesize(
        &self,
        decision: &RoutingDecision,
        tool_results: &[ToolExecutionResult],
    ) -> Result<String, LlmError> {
        let prompt = Self::build_prompt(decision, tool_results);
        debug!(results = tool_results.len(), "Synthesizing final response");

        self.client
            .complete(CompletionRequest::new(prompt).with_max_tokens(self.max_tokens))
            .await
    }

    fn build_prompt(decision: &RoutingDecision, tool_results: &[ToolExecutionResult]) -> String {
        let results_text = tool_results
            .iter()
            .map(Self::label_result)
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "Based on the following tool execution results, provide a clear, helpful \
response to the user's original request.\n\n\
Original request context:\n{}\n\n\
Execution plan:\n{}\n\n\
Tool results:\n{results_text}\n\n\
Provide a concise response that summarizes what was accomplished, presents the \
key findings, and notes any issues or limitations encountered.",
            decision.reasoning,
            decision.execution_plan.join("\n"),
        )
    }

    fn label_result(result: &ToolExecutionResult) -> String {
        if result.success {
            let value = result
                .result
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_else(|| "null".to_string());
            format!("Tool '{}': {value}", result.tool_id)
        } else {
            format!(
                "Tool '{}' FAILED: {}",
                result.tool_id,
                result.error.as_deref().unwrap_or("unknown error")
            )
        }
    }

    /// Deterministic fallback when synthesis is unavailable: each tool's
    /// labeled raw result or error, concatenated. Never fails.
    pub fn fallback_summary(tool_results: &[ToolExecutionResult]) -> String {
        tool_results
            .iter()
            .map(|r| {
                let body = if r.success {
                    r.result
                        .as_ref()
                        .map(|v| v.to_string())
                        .unwrap_or_else(|| "null".to_string())
                } else {
                    r.error.clone().unwrap_or_else(|| "unknown error".to_string())
                };
                format!("**{}**: {body}", r.tool_id)
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
