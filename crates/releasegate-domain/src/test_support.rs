use crate::engine::RuleEngineResult;
use crate::policy::CompiledPack;
use releasegate_types::{
    CaseStatus, CaseSummary, Channel, Citation, Confidence, Decision, DraftContext,
    DraftSubmission, Evaluation, PolicyPack, PolicyRule, ReleaseCase, Revision,
    RewriteSuggestion, Severity, Violation,
};
use time::macros::datetime;

pub const TEST_POLICY_VERSION: &str = "TEST_v1";

pub fn rule(id: &str, severity: Severity, patterns: &[&str], disclosures: &[&str]) -> PolicyRule {
    PolicyRule {
        id: id.to_string(),
        severity,
        description: None,
        patterns: patterns.iter().map(|p| p.to_string()).collect(),
        message: format!("{id} fired"),
        required_disclosures: disclosures.iter().map(|d| d.to_string()).collect(),
    }
}

pub fn pack(rules: Vec<PolicyRule>) -> PolicyPack {
    PolicyPack {
        policy_version: TEST_POLICY_VERSION.to_string(),
        rules,
    }
}

pub fn compiled(rules: Vec<PolicyRule>) -> CompiledPack {
    CompiledPack::compile(&pack(rules)).expect("test pack compiles")
}

pub fn submission(text: &str, channel: Channel) -> DraftSubmission {
    DraftSubmission {
        text: text.to_string(),
        context: DraftContext {
            channel,
            product: None,
            audience: None,
        },
    }
}

pub fn violation(rule_id: &str, severity: Severity) -> Violation {
    Violation {
        rule_id: rule_id.to_string(),
        severity,
        message: format!("{rule_id} fired"),
        citation: Citation {
            sentence_index: 0,
            start: 0,
            end: 1,
            snippet: "x".to_string(),
        },
        required_disclosures: Vec::new(),
    }
}

pub fn engine_result(severity: Severity, violations: Vec<Violation>) -> RuleEngineResult {
    RuleEngineResult {
        policy_version: TEST_POLICY_VERSION.to_string(),
        fired_rule_ids: violations.iter().map(|v| v.rule_id.clone()).collect(),
        violations,
        required_disclosures: Vec::new(),
        severity,
    }
}

pub fn suggestion(text: &str) -> RewriteSuggestion {
    RewriteSuggestion {
        citation: Citation {
            sentence_index: 0,
            start: 0,
            end: 1,
            snippet: "x".to_string(),
        },
        suggested_text: text.to_string(),
        rationale: "test".to_string(),
    }
}

fn severity_for(decision: Decision) -> Severity {
    match decision {
        Decision::Pass => Severity::Low,
        Decision::NeedsChanges => Severity::Medium,
        Decision::Escalate => Severity::High,
    }
}

pub fn revision(id: &str, text: &str, decision: Decision) -> Revision {
    Revision {
        id: id.to_string(),
        case_id: "rc_1".to_string(),
        created_at: datetime!(2026-01-15 10:00 UTC),
        submission: submission(text, Channel::Email),
        evaluation: Evaluation {
            evaluated_at: datetime!(2026-01-15 10:00 UTC),
            policy_version: TEST_POLICY_VERSION.to_string(),
            decision,
            severity: severity_for(decision),
            confidence: Confidence {
                score: 0.9,
                reason: None,
            },
            violations: Vec::new(),
            required_disclosures: Vec::new(),
            rewrite_suggestions: Vec::new(),
            abstained: false,
        },
    }
}

pub fn case_with_status(id: &str, status: CaseStatus) -> ReleaseCase {
    ReleaseCase {
        id: id.to_string(),
        created_at: datetime!(2026-01-15 10:00 UTC),
        updated_at: datetime!(2026-01-15 10:00 UTC),
        status,
        context: DraftContext {
            channel: Channel::Email,
            product: None,
            audience: None,
        },
        latest: Some(CaseSummary {
            revision_id: "rev_1".to_string(),
            policy_version: TEST_POLICY_VERSION.to_string(),
            decision: Decision::Pass,
            severity: Severity::Low,
            confidence_score: 0.95,
        }),
    }
}
