use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Rule severity. Ordering is meaningful: `Low < Medium < High`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Pass,
    NeedsChanges,
    Escalate,
}

impl Decision {
    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Pass => "pass",
            Decision::NeedsChanges => "needs_changes",
            Decision::Escalate => "escalate",
        }
    }
}

/// Pointer into the original draft text.
///
/// `start`/`end` are byte offsets into the draft; `snippet` is surrounding context
/// for reviewers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub sentence_index: usize,
    pub start: usize,
    pub end: usize,
    pub snippet: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    pub citation: Citation,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_disclosures: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Confidence {
    /// Always within `[0, 1]`.
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Advisory rewrite produced by the optional suggestion service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RewriteSuggestion {
    pub citation: Citation,
    pub suggested_text: String,
    pub rationale: String,
}

/// The evaluation recorded for one revision. Immutable once persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub evaluated_at: OffsetDateTime,
    pub policy_version: String,
    pub decision: Decision,
    pub severity: Severity,
    pub confidence: Confidence,
    pub violations: Vec<Violation>,
    /// Union over fired rules, first-seen order.
    pub required_disclosures: Vec<String>,
    #[serde(default)]
    pub rewrite_suggestions: Vec<RewriteSuggestion>,
    #[serde(default)]
    pub abstained: bool,
}

impl Evaluation {
    pub fn fired_rule_ids(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.rule_id.as_str()).collect()
    }
}
