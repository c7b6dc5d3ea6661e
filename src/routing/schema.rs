//! Data model for routing decisions and execution results.
//!
//! The plan-side types ([`RoutingDecision`], [`SelectedTool`]) derive
//! `schemars::JsonSchema` so the planner can embed the exact output schema in
//! its instruction prompt; a completion that round-trips through this schema
//! is the only accepted wire format.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

/// Request priority levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

/// Tool/operation cost classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CostTier {
    Low,
    Medium,
    High,
}

/// Expected latency classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LatencyTier {
    Fast,
    Moderate,
    Slow,
}

/// Planner confidence in its decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// A capability descriptor in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Unique tool identifier.
    pub id: String,
    /// What this tool does.
    pub description: String,
    pub capabilities: Vec<String>,
    /// Expected input parameters (JSON Schema).
    pub input_schema: Value,
    /// Expected output format (JSON Schema).
    pub output_schema: Value,
    pub cost_tier: CostTier,
    pub latency_tier: LatencyTier,
    /// Prerequisites for using this tool.
    #[serde(default)]
    pub requirements: Vec<String>,
    /// Example use cases.
    #[serde(default)]
    pub examples: Vec<String>,
}

/// An external API descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEndpoint {
    pub name: String,
    pub endpoint: String,
    pub methods: Vec<String>,
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub auth_required: bool,
}

/// Registry construction errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Duplicate tool id: {0}")]
    DuplicateToolId(String),
}

/// Static catalog of tools and external APIs.
///
/// Built once at startup and read-only afterwards; requests never mutate it,
/// so it can be shared without locking.
#[derive(Debug, Clone, Serialize)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
    apis: Vec<ApiEndpoint>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Build a registry, enforcing tool id uniqueness.
    pub fn new(tools: Vec<Tool>, apis: Vec<ApiEndpoint>) -> Result<Self, RegistryError> {
        let mut index = HashMap::with_capacity(tools.len());
        for (position, tool) in tools.iter().enumerate() {
            if index.insert(tool.id.clone(), position).is_some() {
                return Err(RegistryError::DuplicateToolId(tool.id.clone()));
            }
        }
        Ok(Self { tools, apis, index })
    }

    /// Look up a tool by id.
    pub fn get(&self, tool_id: &str) -> Option<&Tool> {
        self.index.get(tool_id).map(|&i| &self.tools[i])
    }

    /// All registered tool ids, in registration order.
    pub fn list_ids(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.id.as_str()).collect()
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn apis(&self) -> &[ApiEndpoint] {
        &self.apis
    }
}

/// User preferences for tool selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreferences {
    /// Prioritize faster tools over accuracy.
    #[serde(default)]
    pub prefer_speed: bool,
    pub cost_sensitivity: CostTier,
    #[serde(default)]
    pub preferred_tools: Vec<String>,
    #[serde(default)]
    pub avoided_tools: Vec<String>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            prefer_speed: false,
            cost_sensitivity: CostTier::Medium,
            preferred_tools: Vec::new(),
            avoided_tools: Vec::new(),
        }
    }
}

/// One prior conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: String,
    pub content: String,
}

/// Full context for one routed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserContext {
    pub message: String,
    pub priority: Priority,
    pub preferences: UserPreferences,
    #[serde(default)]
    pub conversation_history: Vec<ConversationTurn>,
}

impl UserContext {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
            priority: Priority::Medium,
            preferences: UserPreferences::default(),
            conversation_history: Vec::new(),
        }
    }
}

/// A tool selected for execution within a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SelectedTool {
    /// Id of the selected tool, verbatim from the registry.
    pub tool_id: String,
    /// Why this tool was chosen.
    pub reason: String,
    /// Execution order, 1-based. Ties keep plan order.
    pub order: u32,
    /// Input parameters for the tool.
    #[serde(default)]
    pub inputs: Map<String, Value>,
}

/// The planner's complete decision output. Ephemeral, one per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RoutingDecision {
    /// Detailed thought process behind the selection.
    pub reasoning: String,
    pub selected_tools: Vec<SelectedTool>,
    /// Step-by-step description of the plan.
    pub execution_plan: Vec<String>,
    /// Alternatives considered and why this approach won.
    #[serde(default)]
    pub trade_offs: String,
    pub confidence: Confidence,
    /// Alternative if the primary plan fails.
    pub fallback_plan: String,
    pub estimated_cost: CostTier,
    pub estimated_time: LatencyTier,
}

impl RoutingDecision {
    /// JSON schema of the expected planner output, embedded in the
    /// instruction prompt.
    pub fn json_schema() -> Value {
        let schema = schemars::schema_for!(RoutingDecision);
        serde_json::to_value(schema).unwrap_or(Value::Null)
    }
}

/// Result of one tool invocation within a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolExecutionResult {
    pub tool_id: String,
    pub success: bool,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
    pub execution_time_ms: f64,
}

impl ToolExecutionResult {
    pub fn succeeded(tool_id: String, result: Value, execution_time_ms: f64) -> Self {
        Self {
            tool_id,
            success: true,
            result: Some(result),
            error: None,
            execution_time_ms,
        }
    }

    pub fn failed(tool_id: String, error: String, execution_time_ms: f64) -> Self {
        Self {
            tool_id,
            success: false,
            result: None,
            error: Some(error),
            execution_time_ms,
        }
    }
}

/// Complete result of executing a routing plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub decision: RoutingDecision,
    pub tool_results: Vec<ToolExecutionResult>,
    /// Synthesized answer; `None` when synthesis was skipped or failed.
    #[serde(default)]
    pub final_response: Option<String>,
    /// True only when every tool step succeeded.
    pub success: bool,
    pub total_time_ms: f64,
}
