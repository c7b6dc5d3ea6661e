//! Bulario Gate - Medication QA decision and evaluation core
//!
//! Turns free-text medication questions into validated, evidence-grounded
//! answers in two stages:
//!
//! - **Plan and execute**: an LLM planner selects tools from a typed
//!   registry and orders them into an execution plan; the executor runs
//!   them sequentially with per-step failure isolation and synthesizes one
//!   final response.
//! - **Judge and gate**: four independent LLM judges (safety, quality,
//!   source attribution, format) score the draft concurrently; a weighted
//!   aggregation gates delivery, with an unconditional safety veto.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bulario_gate::retrieval::InMemoryStore;
//! use bulario_gate::routing::{default_registry, executor_fn, ExecutorMap};
//! use bulario_gate::service::AnswerService;
//! use bulario_gate::testing::mocks::MockCompletionClient;
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(MockCompletionClient::new(vec![]));
//! let store = Arc::new(InMemoryStore::new(vec![]));
//!
//! let mut executors = ExecutorMap::new();
//! executors.insert(
//!     "drug_search".to_string(),
//!     executor_fn(|inputs| async move { Ok(json!({"inputs": inputs})) }),
//! );
//!
//! let service = AnswerService::new(client, Arc::new(default_registry()?), store, executors);
//! let outcome = service.answer("What is the maximum daily dose of paracetamol?").await?;
//! println!("{}", outcome.answer);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod judges;
pub mod llm;
pub mod observability;
pub mod retrieval;
pub mod routing;
pub mod service;
pub mod testing;

pub use config::GateConfig;
pub use error::{GateError, GateResult};
pub use judges::{AggregatedJudgment, Decision, JudgePipeline};
pub use routing::{Planner, RoutingDecision, ToolRegistry};
pub use service::{AnswerOutcome, AnswerService};
