//! Planning and execution engine.
//!
//! Turns a free-text request into an ordered set of tool invocations
//! ([`Planner`]), runs them sequentially with per-step failure isolation
//! ([`PlanExecutor`]), and optionally synthesizes one final response
//! ([`ResponseAggregator`]).

pub mod aggregator;
pub mod executor;
pub mod planner;
pub mod registry;
pub mod schema;
pub mod tools;

pub use aggregator::ResponseAggregator;
pub use executor::{executor_fn, ExecutorMap, PlanExecutor, ToolError, ToolExecutor};
pub use planner::Planner;
pub use registry::default_registry;
pub use tools::default_executors;
pub use schema::{
    ApiEndpoint, Confidence, ConversationTurn, CostTier, ExecutionResult, LatencyTier, Priority,
    RegistryError, RoutingDecision, SelectedTool, Tool, ToolExecutionResult, ToolRegistry,
    UserContext, UserPreferences,
};
