//! Request planning via a completion capability.
//!
//! The planner turns one free-text request into a structured
//! [`RoutingDecision`]: it serializes the tool registry, the user's
//! preferences and recent conversation into an instruction prompt, asks the
//! completion client for exactly one JSON object, and decodes strictly.
//! Malformed or schema-incomplete output fails with
//! [`GateError::PlanParse`]; retry policy and default plans belong to the
//! caller. Referenced tool ids are deliberately not checked here: the
//! executor is the single authority that surfaces unknown ids as failed
//! steps.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{GateError, GateResult};
use crate::llm::{strip_code_fence, CompletionClient, CompletionRequest};
use crate::routing::schema::{RoutingDecision, ToolRegistry, UserContext};

const PLANNER_SYSTEM_PROMPT: &str = "\
You are a routing planner for a medication information assistant. You analyze \
user requests and select the optimal tools from a registry to fulfill them.

Rules:
1. ONLY reference tool ids that exist in the provided registry, verbatim.
2. NEVER invent tools that are not in the registry.
3. Weigh user priority and preferences (speed, cost, preferred/avoided tools).
4. Plan execution order for multi-step workflows; later steps may consume \
earlier outputs.
5. Provide a realistic fallback plan and honest confidence.
6. Respond with exactly one JSON object matching the provided schema. \
No prose, no markdown fences, no extra text.";

/// How many prior conversation turns are included in the prompt.
const HISTORY_WINDOW: usize = 5;

/// LLM-backed planner over a read-only tool registry.
pub struct Planner {
    client: Arc<dyn CompletionClient>,
    registry: Arc<ToolRegistry>,
    temperature: f32,
    max_tokens: u32,
}

impl Planner {
    pub fn new(client: Arc<dyn CompletionClient>, registry: Arc<ToolRegistry>) -> Self {
        Self {
            client,
            registry,
            // Low temperature for consistent planning.
            temperature: 0.1,
            max_tokens: 1500,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Produce a routing decision for the given request context.
    pub async fn plan(&self, context: &UserContext) -> GateResult<RoutingDecision> {
        let prompt = self.build_prompt(context);
        debug!(message = %context.message, "Planning request");

        let request = CompletionRequest::new(prompt)
            .with_system(PLANNER_SYSTEM_PROMPT)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

        let response = self.client.complete(request).await?;
        let decision = Self::parse_decision(&response)?;

        info!(
            tools = ?decision.selected_tools.iter().map(|t| t.tool_id.as_str()).collect::<Vec<_>>(),
            confidence = ?decision.confidence,
            "Planned request"
        );

        Ok(decision)
    }

    fn build_prompt(&self, context: &UserContext) -> String {
        let registry_json = serde_json::to_string_pretty(self.registry.as_ref())
            .unwrap_or_else(|_| "{}".to_string());

        let preferences_json = serde_json::to_string_pretty(&serde_json::json!({
            "priority": context.priority,
            "preferences": context.preferences,
        }))
        .unwrap_or_else(|_| "{}".to_string());

        let recent_turns = context
            .conversation_history
            .iter()
            .rev()
            .take(HISTORY_WINDOW)
            .rev()
            .collect::<Vec<_>>();
        let history_json = if recent_turns.is_empty() {
            String::new()
        } else {
            serde_json::to_string_pretty(&recent_turns).unwrap_or_default()
        };

        let schema_json = serde_json::to_string_pretty(&RoutingDecision::json_schema())
            .unwrap_or_else(|_| "{}".to_string());

        let mut prompt = format!(
            "TOOL REGISTRY:\n{registry_json}\n\nUSER CONTEXT:\n{preferences_json}\n"
        );
        if !history_json.is_empty() {
            prompt.push_str(&format!("\nCONVERSATION HISTORY (most recent last):\n{history_json}\n"));
        }
        prompt.push_str(&format!(
            "\nOUTPUT SCHEMA:\n{schema_json}\n\nUSER REQUEST:\n{}\n\nReturn the routing decision as one JSON object.",
            context.message
        ));
        prompt
    }

    /// Decode planner output, stripping one optional layer of code fencing.
    fn parse_decision(response: &str) -> GateResult<RoutingDecision> {
        let body = strip_code_fence(response);
        serde_json::from_str(body)
            .map_err(|e| GateError::plan_parse(format!("{e} in planner output")))
    }
}
