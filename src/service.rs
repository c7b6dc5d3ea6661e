//! End-to-end answer lifecycle.
//!
//! [`AnswerService`] wires the stages together: retrieve evidence, plan tool
//! invocations, execute them, synthesize an answer, then run the judge
//! pipeline over the result. The judged decision gates what the caller gets
//! back: a rejected answer is replaced by a conservative refusal, and any
//! required disclaimers are appended before delivery.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::GateConfig;
use crate::error::GateResult;
use crate::judges::{AggregatedJudgment, AnswerMode, Decision, JudgeContext, JudgePipeline};
use crate::llm::CompletionClient;
use crate::retrieval::{Document, DocumentStore};
use crate::routing::{
    ExecutionResult, ExecutorMap, PlanExecutor, Planner, ResponseAggregator, ToolRegistry,
    UserContext,
};

/// Answer returned when the judges reject the generated response outright.
pub const REFUSAL_MESSAGE: &str = "I cannot provide a reliable answer to this question. \
Please consult a pharmacist or physician for guidance about this medication.";

const DEFAULT_TOP_K: usize = 5;

/// Everything produced for one question.
#[derive(Debug, Serialize)]
pub struct AnswerOutcome {
    pub request_id: Uuid,
    /// The delivered answer, post-gating.
    pub answer: String,
    pub judgment: AggregatedJudgment,
    pub execution: ExecutionResult,
    pub documents: Vec<Document>,
}

/// Orchestrates retrieve, plan, execute, judge, and gate for each question.
pub struct AnswerService {
    planner: Planner,
    executor: PlanExecutor,
    executors: ExecutorMap,
    pipeline: JudgePipeline,
    store: Arc<dyn DocumentStore>,
    top_k: usize,
    mode: AnswerMode,
}

impl AnswerService {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        registry: Arc<ToolRegistry>,
        store: Arc<dyn DocumentStore>,
        executors: ExecutorMap,
    ) -> Self {
        Self {
            planner: Planner::new(client.clone(), registry),
            executor: PlanExecutor::with_aggregator(ResponseAggregator::new(client.clone())),
            executors,
            pipeline: JudgePipeline::new(client),
            store,
            top_k: DEFAULT_TOP_K,
            mode: AnswerMode::Patient,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Run judge calls on a separate client, e.g. a cheaper model.
    ///
    /// Apply before [`with_config`](Self::with_config) so configured judge
    /// settings land on the replacement pipeline.
    pub fn with_judge_client(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.pipeline = JudgePipeline::new(client);
        self
    }

    /// Apply completion and retrieval settings from configuration.
    pub fn with_config(mut self, config: &GateConfig) -> Self {
        if let Some(temperature) = config.llm.temperature {
            self.planner = self.planner.with_temperature(temperature);
        }
        if let Some(max_tokens) = config.llm.max_tokens {
            self.planner = self.planner.with_max_tokens(max_tokens);
        }
        if let Some(max_tokens) = config.judges.max_tokens {
            self.pipeline = self.pipeline.with_max_tokens(max_tokens);
        }
        self.top_k = config.retrieval.top_k;
        self
    }

    /// Address the answer to patients or to healthcare professionals.
    pub fn with_mode(mut self, mode: AnswerMode) -> Self {
        self.mode = mode;
        self
    }

    /// Answer one question, returning the gated answer plus full judgment.
    pub async fn answer(&self, question: &str) -> GateResult<AnswerOutcome> {
        let request_id = Uuid::new_v4();
        let span = info_span!("answer_request", %request_id);
        self.answer_inner(request_id, question).instrument(span).await
    }

    async fn answer_inner(&self, request_id: Uuid, question: &str) -> GateResult<AnswerOutcome> {
        let documents = match self.store.search(question, self.top_k).await {
            Ok(docs) => docs,
            Err(e) => {
                warn!(error = %e, "Evidence retrieval failed, continuing without documents");
                Vec::new()
            }
        };
        info!(document_count = documents.len(), "Evidence retrieved");

        let context = UserContext::new(question);
        let decision = self.planner.plan(&context).await?;
        info!(
            tool_count = decision.selected_tools.len(),
            confidence = ?decision.confidence,
            "Plan ready"
        );

        let execution = self.executor.execute(&decision, &self.executors).await;

        let draft = match &execution.final_response {
            Some(text) => text.clone(),
            None => ResponseAggregator::fallback_summary(&execution.tool_results),
        };

        let judge_context = JudgeContext {
            query: question.to_string(),
            answer: draft.clone(),
            documents: documents.clone(),
            mode: self.mode,
        };
        let judgment = self.pipeline.evaluate(&judge_context).await;

        let answer = Self::gate_answer(draft, &judgment);

        info!(
            decision = ?judgment.final_decision,
            overall_score = judgment.overall_score,
            "Request completed"
        );

        Ok(AnswerOutcome {
            request_id,
            answer,
            judgment,
            execution,
            documents,
        })
    }

    /// Apply the judged decision to the draft answer.
    fn gate_answer(draft: String, judgment: &AggregatedJudgment) -> String {
        if judgment.final_decision == Decision::Rejected {
            return REFUSAL_MESSAGE.to_string();
        }
        if judgment.disclaimers_to_add.is_empty() {
            return draft;
        }

        let notices = judgment
            .disclaimers_to_add
            .iter()
            .map(|d| format!("- {d}"))
            .collect::<Vec<_>>()
            .join("\n");
        format!("{draft}\n\n---\n\n**Important:**\n{notices}")
    }
}
