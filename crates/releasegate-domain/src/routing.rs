//! Confidence scoring and decision routing.

use crate::engine::RuleEngineResult;
use releasegate_types::{Confidence, Decision, Severity, ids};

const SCORE_NO_RULES: f64 = 0.95;
const SCORE_HIGH: f64 = 0.90;
const SCORE_MEDIUM: f64 = 0.75;
const SCORE_LOW: f64 = 0.60;
const ABSTAIN_SCORE_CAP: f64 = 0.60;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoutingConfig {
    /// Minimum score for a clean draft to auto-pass.
    pub auto_pass_confidence: f64,
    /// On abstention route to `needs_changes` instead of `escalate`.
    pub prefer_needs_changes_on_uncertainty: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            auto_pass_confidence: 0.90,
            prefer_needs_changes_on_uncertainty: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RoutingResult {
    pub decision: Decision,
    pub severity: Severity,
    pub confidence: Confidence,
    pub abstained: bool,
}

pub fn compute_confidence(result: &RuleEngineResult) -> Confidence {
    let (score, reason) = if result.fired_rule_ids.is_empty() {
        (SCORE_NO_RULES, ids::REASON_NO_RULES_FIRED)
    } else {
        match result.severity {
            Severity::High => (SCORE_HIGH, ids::REASON_HIGH_FIRED),
            Severity::Medium => (SCORE_MEDIUM, ids::REASON_MEDIUM_FIRED),
            Severity::Low => (SCORE_LOW, ids::REASON_LOW_FIRED),
        }
    };
    Confidence {
        score,
        reason: Some(reason.to_string()),
    }
}

/// Route a rule-engine result to a decision.
///
/// Precedence: `high` escalates, `medium` needs changes, a clean `low` result
/// above the auto-pass threshold passes, anything else abstains.
pub fn route(result: &RuleEngineResult, config: &RoutingConfig) -> RoutingResult {
    let confidence = compute_confidence(result);
    let severity = result.severity;

    let decided = |decision| RoutingResult {
        decision,
        severity,
        confidence: confidence.clone(),
        abstained: false,
    };

    match severity {
        Severity::High => decided(Decision::Escalate),
        Severity::Medium => decided(Decision::NeedsChanges),
        Severity::Low
            if result.violations.is_empty()
                && confidence.score >= config.auto_pass_confidence =>
        {
            decided(Decision::Pass)
        }
        Severity::Low => RoutingResult {
            decision: if config.prefer_needs_changes_on_uncertainty {
                Decision::NeedsChanges
            } else {
                Decision::Escalate
            },
            severity,
            confidence: Confidence {
                score: confidence.score.min(ABSTAIN_SCORE_CAP),
                reason: Some(ids::REASON_ABSTAINED.to_string()),
            },
            abstained: true,
        },
    }
}
