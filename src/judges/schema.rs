//! Data model for judge verdicts and the aggregated judgment.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

use crate::retrieval::Document;

/// Response mode the answer was generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerMode {
    Patient,
    Professional,
}

impl AnswerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerMode::Patient => "patient",
            AnswerMode::Professional => "professional",
        }
    }
}

/// Everything a judge sees: the same tuple for all four dimensions.
#[derive(Debug, Clone)]
pub struct JudgeContext {
    pub query: String,
    pub answer: String,
    pub documents: Vec<Document>,
    pub mode: AnswerMode,
}

impl JudgeContext {
    pub fn new<S: Into<String>>(query: S, answer: S) -> Self {
        Self {
            query: query.into(),
            answer: answer.into(),
            documents: Vec::new(),
            mode: AnswerMode::Patient,
        }
    }
}

/// Safety evaluation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafetyStatus {
    #[serde(rename = "SAFE")]
    Safe,
    #[serde(rename = "WARNING")]
    Warning,
    #[serde(rename = "UNSAFE")]
    Unsafe,
}

/// Quality evaluation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityStatus {
    #[serde(rename = "EXCELLENT")]
    Excellent,
    #[serde(rename = "GOOD")]
    Good,
    #[serde(rename = "ACCEPTABLE")]
    Acceptable,
    #[serde(rename = "POOR")]
    Poor,
}

/// A critical issue identified by the safety judge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalIssue {
    pub issue: String,
    /// CRITICAL, HIGH or MEDIUM.
    pub severity: String,
    pub category: String,
}

/// Verdict from the Safety judge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyVerdict {
    pub safety_score: u8,
    pub safety_status: SafetyStatus,
    #[serde(default)]
    pub critical_issues: Vec<CriticalIssue>,
    #[serde(default)]
    pub required_disclaimers: Vec<String>,
    #[serde(default)]
    pub recommendations: Option<String>,
    pub approved: bool,
}

/// Verdict from the Quality judge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityVerdict {
    pub quality_score: u8,
    pub quality_status: QualityStatus,
    #[serde(default)]
    pub dimension_scores: HashMap<String, u8>,
    #[serde(default)]
    pub factual_issues: Vec<Value>,
    #[serde(default)]
    pub missing_information: Vec<String>,
    pub approved: bool,
}

/// Verdict from the Source Attribution judge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributionVerdict {
    pub attribution_score: u8,
    #[serde(default)]
    pub total_claims: u32,
    #[serde(default)]
    pub attributed_claims: u32,
    #[serde(default)]
    pub unattributed_claims: u32,
    pub approved: bool,
}

/// Verdict from the Format judge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatVerdict {
    pub format_score: u8,
    #[serde(default = "default_format_status")]
    pub format_status: String,
    #[serde(default)]
    pub dimension_scores: HashMap<String, u8>,
    #[serde(default)]
    pub issues: Vec<Value>,
    pub approved: bool,
}

fn default_format_status() -> String {
    "GOOD".to_string()
}

/// Verdicts from the judges that actually completed. A failed judge call
/// leaves its slot `None` and is excluded from aggregation.
#[derive(Debug, Clone, Default)]
pub struct JudgeOutcomes {
    pub safety: Option<SafetyVerdict>,
    pub quality: Option<QualityVerdict>,
    pub attribution: Option<AttributionVerdict>,
    pub format: Option<FormatVerdict>,
}

/// Final gate decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Approved,
    ApprovedWithCaveats,
    NeedsRevision,
    Rejected,
}

/// Weighted combination of all judge verdicts into one decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedJudgment {
    pub final_decision: Decision,
    pub overall_score: u8,
    /// Per-dimension scores for the judges that completed.
    pub score_breakdown: BTreeMap<String, u8>,
    /// Deduplicated, order-preserving union of required disclaimers.
    pub disclaimers_to_add: Vec<String>,
    /// `overall_score / 100`.
    pub confidence: f64,
    /// True when every judge call failed and the decision is the
    /// conservative default rather than an evaluated one.
    #[serde(default)]
    pub degraded: bool,
}
