//! Pure, deterministic judgment aggregation.
//!
//! Canonical weights: safety 0.40, quality 0.30, attribution 0.20,
//! format 0.10. The overall score is the floor of the weighted sum divided
//! by the sum of the weights actually present; absent judges drop out of
//! both numerator and denominator (no renormalization to 1.0).
//!
//! Decision precedence:
//! 1. Safety present and not approved: REJECTED (absolute veto).
//! 2. overall >= 80: APPROVED.
//! 3. overall >= 60: APPROVED_WITH_CAVEATS.
//! 4. otherwise: NEEDS_REVISION.
//!
//! A low overall score alone never reaches REJECTED; only the safety veto
//! does. When every judge is absent the result is the conservative
//! NEEDS_REVISION with zero confidence and the `degraded` flag set, never a
//! silent approval.

use std::collections::BTreeMap;

use crate::judges::schema::{AggregatedJudgment, Decision, JudgeOutcomes};

pub const SAFETY_WEIGHT: f64 = 0.40;
pub const QUALITY_WEIGHT: f64 = 0.30;
pub const ATTRIBUTION_WEIGHT: f64 = 0.20;
pub const FORMAT_WEIGHT: f64 = 0.10;

const APPROVE_THRESHOLD: u8 = 80;
const CAVEAT_THRESHOLD: u8 = 60;

/// Combine the verdicts that arrived into one decision. No I/O; identical
/// input always yields identical output.
pub fn aggregate(outcomes: &JudgeOutcomes) -> AggregatedJudgment {
    let mut score_breakdown = BTreeMap::new();
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;

    if let Some(safety) = &outcomes.safety {
        score_breakdown.insert("safety".to_string(), safety.safety_score);
        weighted_sum += f64::from(safety.safety_score) * SAFETY_WEIGHT;
        weight_total += SAFETY_WEIGHT;
    }
    if let Some(quality) = &outcomes.quality {
        score_breakdown.insert("quality".to_string(), quality.quality_score);
        weighted_sum += f64::from(quality.quality_score) * QUALITY_WEIGHT;
        weight_total += QUALITY_WEIGHT;
    }
    if let Some(attribution) = &outcomes.attribution {
        score_breakdown.insert("attribution".to_string(), attribution.attribution_score);
        weighted_sum += f64::from(attribution.attribution_score) * ATTRIBUTION_WEIGHT;
        weight_total += ATTRIBUTION_WEIGHT;
    }
    if let Some(format) = &outcomes.format {
        score_breakdown.insert("format".to_string(), format.format_score);
        weighted_sum += f64::from(format.format_score) * FORMAT_WEIGHT;
        weight_total += FORMAT_WEIGHT;
    }

    if weight_total == 0.0 {
        // Every judge failed: conservative default, visibly degraded.
        return AggregatedJudgment {
            final_decision: Decision::NeedsRevision,
            overall_score: 0,
            score_breakdown,
            disclaimers_to_add: Vec::new(),
            confidence: 0.0,
            degraded: true,
        };
    }

    let overall_score = (weighted_sum / weight_total).floor() as u8;

    let safety_vetoed = outcomes
        .safety
        .as_ref()
        .is_some_and(|s| !s.approved);

    let final_decision = if safety_vetoed {
        Decision::Rejected
    } else if overall_score >= APPROVE_THRESHOLD {
        Decision::Approved
    } else if overall_score >= CAVEAT_THRESHOLD {
        Decision::ApprovedWithCaveats
    } else {
        Decision::NeedsRevision
    };

    let disclaimers_to_add = outcomes
        .safety
        .as_ref()
        .map(|s| dedup_preserving_order(&s.required_disclaimers))
        .unwrap_or_default();

    AggregatedJudgment {
        final_decision,
        overall_score,
        score_breakdown,
        disclaimers_to_add,
        confidence: f64::from(overall_score) / 100.0,
        degraded: false,
    }
}

/// First occurrence wins; order preserved.
fn dedup_preserving_order(items: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .iter()
        .filter(|item| seen.insert(item.as_str()))
        .cloned()
        .collect()
}
