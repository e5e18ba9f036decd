use crate::engine::RuleEngineResult;
use crate::routing::RoutingResult;
use releasegate_types::{Evaluation, RewriteSuggestion};
use time::OffsetDateTime;

/// Merge rule-engine output and routing into the persisted evaluation shape.
pub fn assemble(
    result: RuleEngineResult,
    evaluated_at: OffsetDateTime,
    routing: RoutingResult,
) -> Evaluation {
    Evaluation {
        evaluated_at,
        policy_version: result.policy_version,
        decision: routing.decision,
        severity: routing.severity,
        confidence: routing.confidence,
        violations: result.violations,
        required_disclosures: result.required_disclosures,
        rewrite_suggestions: Vec::new(),
        abstained: routing.abstained,
    }
}

/// Attach advisory suggestions. Decision, severity and confidence are untouched.
pub fn with_rewrite_suggestions(
    mut evaluation: Evaluation,
    suggestions: Vec<RewriteSuggestion>,
) -> Evaluation {
    evaluation.rewrite_suggestions = suggestions;
    evaluation
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{RoutingConfig, route};
    use crate::test_support::{engine_result, suggestion, violation};
    use releasegate_types::{Decision, Severity};
    use time::macros::datetime;

    #[test]
    fn assemble_carries_routing_and_rule_output() {
        let result = engine_result(Severity::Medium, vec![violation("R-1", Severity::Medium)]);
        let routing = route(&result, &RoutingConfig::default());
        let eval = assemble(result, datetime!(2026-01-01 0:00 UTC), routing);

        assert_eq!(eval.decision, Decision::NeedsChanges);
        assert_eq!(eval.severity, Severity::Medium);
        assert_eq!(eval.fired_rule_ids(), vec!["R-1"]);
        assert_eq!(eval.policy_version, "TEST_v1");
        assert!(!eval.abstained);
        assert!(eval.rewrite_suggestions.is_empty());
    }

    #[test]
    fn suggestions_do_not_alter_the_decision() {
        let result = engine_result(Severity::High, vec![violation("R-1", Severity::High)]);
        let routing = route(&result, &RoutingConfig::default());
        let eval = assemble(result, datetime!(2026-01-01 0:00 UTC), routing);
        let before = eval.clone();

        let merged = with_rewrite_suggestions(eval, vec![suggestion("Safer wording.")]);
        assert_eq!(merged.rewrite_suggestions.len(), 1);
        assert_eq!(merged.decision, before.decision);
        assert_eq!(merged.severity, before.severity);
        assert_eq!(merged.confidence, before.confidence);
    }
}
