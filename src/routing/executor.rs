//! Plan execution with per-step failure isolation.
//!
//! Steps run strictly in sequence, sorted by the plan's 1-based `order`
//! (stable on ties), because later tool inputs may depend on earlier
//! outputs. A missing executor or a failing tool is recorded as a failed
//! [`ToolExecutionResult`] and never halts subsequent steps. No deadline is
//! enforced here; callers wrap individual executors when bounding is
//! required.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, warn};

use crate::routing::aggregator::ResponseAggregator;
use crate::routing::schema::{ExecutionResult, RoutingDecision, ToolExecutionResult};

/// Tool invocation errors.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid inputs: {0}")]
    InvalidInputs(String),
    #[error("Tool execution failed: {0}")]
    ExecutionFailed(String),
}

/// A caller-supplied tool implementation.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn call(&self, inputs: Map<String, Value>) -> Result<Value, ToolError>;
}

/// Executor lookup by tool id.
pub type ExecutorMap = HashMap<String, Arc<dyn ToolExecutor>>;

struct FnExecutor<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> ToolExecutor for FnExecutor<F>
where
    F: Fn(Map<String, Value>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, ToolError>> + Send,
{
    async fn call(&self, inputs: Map<String, Value>) -> Result<Value, ToolError> {
        (self.f)(inputs).await
    }
}

/// Wrap an async closure as a [`ToolExecutor`].
pub fn executor_fn<F, Fut>(f: F) -> Arc<dyn ToolExecutor>
where
    F: Fn(Map<String, Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, ToolError>> + Send + 'static,
{
    Arc::new(FnExecutor { f })
}

/// Runs routing plans against caller-supplied executors.
#[derive(Default)]
pub struct PlanExecutor {
    aggregator: Option<ResponseAggregator>,
}

impl PlanExecutor {
    pub fn new() -> Self {
        Self { aggregator: None }
    }

    /// Enable final-response synthesis after the run.
    pub fn with_aggregator(aggregator: ResponseAggregator) -> Self {
        Self {
            aggregator: Some(aggregator),
        }
    }

    /// Execute every selected tool in plan order.
    ///
    /// The run always completes: unknown tool ids and executor errors become
    /// failed results. Overall `success` is the conjunction of per-step
    /// success.
    pub async fn execute(
        &self,
        decision: &RoutingDecision,
        executors: &ExecutorMap,
    ) -> ExecutionResult {
        let run_start = Instant::now();
        let mut tool_results: Vec<ToolExecutionResult> =
            Vec::with_capacity(decision.selected_tools.len());

        let mut sorted_tools: Vec<_> = decision.selected_tools.iter().collect();
        sorted_tools.sort_by_key(|t| t.order);

        for selected in sorted_tools {
            let tool_id = selected.tool_id.as_str();
            debug!(tool_id, order = selected.order, "Executing tool");

            let Some(executor) = executors.get(tool_id) else {
                warn!(tool_id, "No executor registered for tool");
                tool_results.push(ToolExecutionResult::failed(
                    tool_id.to_string(),
                    format!("No executor registered for tool: {tool_id}"),
                    0.0,
                ));
                continue;
            };

            let step_start = Instant::now();
            let outcome = executor.call(selected.inputs.clone()).await;
            let elapsed_ms = step_start.elapsed().as_secs_f64() * 1000.0;

            match outcome {
                Ok(result) => {
                    debug!(tool_id, elapsed_ms, "Tool completed");
                    tool_results.push(ToolExecutionResult::succeeded(
                        tool_id.to_string(),
                        result,
                        elapsed_ms,
                    ));
                }
                Err(e) => {
                    warn!(tool_id, error = %e, "Tool failed");
                    tool_results.push(ToolExecutionResult::failed(
                        tool_id.to_string(),
                        e.to_string(),
                        elapsed_ms,
                    ));
                }
            }
        }

        let success = tool_results.iter().all(|r| r.success);
        // Synthesis is not part of the tool run; stop the clock here.
        let total_time_ms = run_start.elapsed().as_secs_f64() * 1000.0;

        let final_response = match &self.aggregator {
            Some(aggregator) if !tool_results.is_empty() => {
                match aggregator.synthesize(decision, &tool_results).await {
                    Ok(text) => Some(text),
                    Err(e) => {
                        warn!(error = %e, "Response synthesis failed");
                        None
                    }
                }
            }
            _ => None,
        };

        ExecutionResult {
            decision: decision.clone(),
            tool_results,
            final_response,
            success,
            total_time_ms,
        }
    }
}
