//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - Segmentation determinism, coverage and offset mapping
//! - Severity aggregation and one-violation-per-rule
//! - Routing precedence
//! - Workflow gate monotonicity

use crate::engine::evaluate;
use crate::routing::{RoutingConfig, route};
use crate::segment::{find_sentence_index_for_offset, segment_sentences};
use crate::test_support::{compiled, engine_result, rule, submission, violation};
use crate::workflow::{can_approve, can_publish};
use releasegate_types::{CaseStatus, Channel, Decision, PolicyRule, Severity};
use proptest::prelude::*;
use std::collections::BTreeSet;

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

/// Draft-like text: words, sentence punctuation, whitespace and some multibyte chars.
fn arb_draft_text() -> impl Strategy<Value = String> {
    let token = prop_oneof![
        Just("alpha".to_string()),
        Just("beta".to_string()),
        Just("gamma".to_string()),
        Just("Delta".to_string()),
        Just("risk".to_string()),
        Just("—".to_string()),
        Just("é".to_string()),
        Just(".".to_string()),
        Just("!".to_string()),
        Just("?".to_string()),
        Just(" ".to_string()),
        Just("  ".to_string()),
        Just("\n".to_string()),
        Just("\t".to_string()),
        Just("\r\n".to_string()),
    ];
    prop::collection::vec(token, 0..60).prop_map(|tokens| tokens.concat())
}

/// Fully arbitrary text, for robustness.
fn arb_any_text() -> impl Strategy<Value = String> {
    prop_oneof![arb_draft_text(), any::<String>()]
}

fn rule_pool() -> Vec<PolicyRule> {
    vec![
        rule("R-A", Severity::Low, &["alpha"], &["D-1"]),
        rule("R-B", Severity::Medium, &[r"\bbeta\b"], &["D-1", "D-2"]),
        rule("R-C", Severity::High, &["gamma"], &[]),
        rule("R-D", Severity::Medium, &["delta", "alpha"], &["D-3"]),
        rule("R-E", Severity::Low, &[r"risk\.\s+alpha"], &[]),
    ]
}

fn arb_rules() -> impl Strategy<Value = Vec<PolicyRule>> {
    prop::sample::subsequence(rule_pool(), 0..=5)
}

fn arb_severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Low),
        Just(Severity::Medium),
        Just(Severity::High),
    ]
}

fn arb_routing_config() -> impl Strategy<Value = RoutingConfig> {
    (0.0f64..=1.0, any::<bool>()).prop_map(|(auto_pass_confidence, prefer)| RoutingConfig {
        auto_pass_confidence,
        prefer_needs_changes_on_uncertainty: prefer,
    })
}

fn arb_status() -> impl Strategy<Value = CaseStatus> {
    prop_oneof![
        Just(CaseStatus::Draft),
        Just(CaseStatus::Evaluated),
        Just(CaseStatus::Approved),
        Just(CaseStatus::Blocked),
        Just(CaseStatus::Published),
    ]
}

fn arb_decision() -> impl Strategy<Value = Option<Decision>> {
    prop_oneof![
        Just(None),
        Just(Some(Decision::Pass)),
        Just(Some(Decision::NeedsChanges)),
        Just(Some(Decision::Escalate)),
    ]
}

// ============================================================================
// Segmentation
// ============================================================================

proptest! {
    #[test]
    fn segmentation_is_deterministic(text in arb_any_text()) {
        prop_assert_eq!(segment_sentences(&text), segment_sentences(&text));
    }

    #[test]
    fn spans_are_ordered_trimmed_and_offset_stable(text in arb_any_text()) {
        let spans = segment_sentences(&text);
        let mut prev_end = 0usize;
        for (i, span) in spans.iter().enumerate() {
            prop_assert_eq!(span.index, i);
            prop_assert!(span.start < span.end);
            prop_assert!(span.end <= text.len());
            prop_assert!(span.start >= prev_end, "spans overlap at {}", i);
            prop_assert_eq!(&text[span.start..span.end], span.text.as_str());
            prop_assert_eq!(span.text.trim(), span.text.as_str());
            prev_end = span.end;
        }
    }

    #[test]
    fn every_non_blank_char_is_covered(text in arb_any_text()) {
        let spans = segment_sentences(&text);
        for (offset, ch) in text.char_indices() {
            if ch.is_whitespace() {
                continue;
            }
            prop_assert!(
                spans.iter().any(|s| s.start <= offset && offset < s.end),
                "char {:?} at {} not covered", ch, offset
            );
        }
    }

    #[test]
    fn offsets_inside_a_span_map_to_it(text in arb_draft_text()) {
        let spans = segment_sentences(&text);
        for span in &spans {
            for (rel, _) in span.text.char_indices() {
                prop_assert_eq!(
                    find_sentence_index_for_offset(&spans, span.start + rel),
                    span.index
                );
            }
        }
    }
}

// ============================================================================
// Rule engine
// ============================================================================

proptest! {
    #[test]
    fn severity_is_max_of_fired_rules(text in arb_draft_text(), rules in arb_rules()) {
        let pack = compiled(rules);
        let result = evaluate(&submission(&text, Channel::Email), &pack);

        let expected = result
            .violations
            .iter()
            .map(|v| v.severity)
            .max()
            .unwrap_or(Severity::Low);
        prop_assert_eq!(result.severity, expected);
    }

    #[test]
    fn at_most_one_violation_per_rule(text in arb_draft_text(), rules in arb_rules()) {
        let rule_count = rules.len();
        let pack = compiled(rules);
        let result = evaluate(&submission(&text, Channel::Email), &pack);

        prop_assert!(result.violations.len() <= rule_count);
        let ids: BTreeSet<_> = result.violations.iter().map(|v| v.rule_id.as_str()).collect();
        prop_assert_eq!(ids.len(), result.violations.len());
        let fired: Vec<_> = result.violations.iter().map(|v| v.rule_id.clone()).collect();
        prop_assert_eq!(fired, result.fired_rule_ids.clone());
    }

    #[test]
    fn citations_point_into_the_draft(text in arb_draft_text(), rules in arb_rules()) {
        let pack = compiled(rules);
        let result = evaluate(&submission(&text, Channel::Email), &pack);
        let span_count = segment_sentences(&text).len().max(1);

        for v in &result.violations {
            let c = &v.citation;
            prop_assert!(c.start < c.end);
            prop_assert!(c.end <= text.len());
            prop_assert!(c.sentence_index < span_count);
            prop_assert!(text.contains(c.snippet.as_str()));
        }
    }

    #[test]
    fn disclosures_are_unique(text in arb_draft_text(), rules in arb_rules()) {
        let pack = compiled(rules);
        let result = evaluate(&submission(&text, Channel::Email), &pack);
        let unique: BTreeSet<_> = result.required_disclosures.iter().collect();
        prop_assert_eq!(unique.len(), result.required_disclosures.len());
    }
}

// ============================================================================
// Routing
// ============================================================================

proptest! {
    #[test]
    fn routing_precedence(
        severity in arb_severity(),
        fired in 0usize..3,
        cfg in arb_routing_config(),
    ) {
        let violations = (0..fired)
            .map(|i| violation(&format!("R-{i}"), severity))
            .collect::<Vec<_>>();
        let routed = route(&engine_result(severity, violations), &cfg);

        prop_assert!((0.0..=1.0).contains(&routed.confidence.score));
        prop_assert_eq!(routed.severity, severity);
        match severity {
            Severity::High => {
                prop_assert_eq!(routed.decision, Decision::Escalate);
                prop_assert!(!routed.abstained);
            }
            Severity::Medium => {
                prop_assert_eq!(routed.decision, Decision::NeedsChanges);
                prop_assert!(!routed.abstained);
            }
            Severity::Low => {
                let passes = fired == 0 && 0.95 >= cfg.auto_pass_confidence;
                prop_assert_eq!(routed.decision == Decision::Pass, passes);
                prop_assert_eq!(routed.abstained, !passes);
                if routed.abstained {
                    prop_assert!(routed.confidence.score <= 0.6);
                    let expected = if cfg.prefer_needs_changes_on_uncertainty {
                        Decision::NeedsChanges
                    } else {
                        Decision::Escalate
                    };
                    prop_assert_eq!(routed.decision, expected);
                }
            }
        }
    }
}

// ============================================================================
// Workflow gate
// ============================================================================

proptest! {
    #[test]
    fn publish_only_from_approved(status in arb_status()) {
        prop_assert_eq!(can_publish(status).is_ok(), status == CaseStatus::Approved);
    }

    #[test]
    fn approve_never_from_terminal_states(status in arb_status(), decision in arb_decision()) {
        let allowed = can_approve(status, decision).is_ok();
        if matches!(status, CaseStatus::Approved | CaseStatus::Published) || decision.is_none() {
            prop_assert!(!allowed);
        } else {
            prop_assert!(allowed);
        }
    }
}
