//! Error taxonomy for the routing and evaluation core.
//!
//! Nothing in this crate is fatal to the host process: planner failures are
//! surfaced before any execution is attempted, per-tool failures are recorded
//! inside the execution result, and judge failures degrade the aggregated
//! judgment instead of escaping as panics.

use thiserror::Error;

use crate::config::ConfigError;
use crate::llm::LlmError;
use crate::retrieval::RetrievalError;

/// Top-level error type for the answer gate.
#[derive(Debug, Error)]
pub enum GateError {
    /// The planner returned output that could not be decoded into a
    /// [`RoutingDecision`](crate::routing::RoutingDecision). No execution is
    /// attempted; retry and default-plan policy belong to the caller.
    #[error("Plan parse failed: {message}")]
    PlanParse { message: String },

    #[error("LLM provider error: {0}")]
    Llm(#[from] LlmError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Retrieval error: {0}")]
    Retrieval(#[from] RetrievalError),
}

impl GateError {
    /// Create a plan parse error.
    pub fn plan_parse<S: Into<String>>(message: S) -> Self {
        Self::PlanParse {
            message: message.into(),
        }
    }
}

/// Result type for gate operations.
pub type GateResult<T> = Result<T, GateError>;
