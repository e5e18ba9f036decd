use crate::{Decision, DraftContext, DraftSubmission, Evaluation, Severity};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    Draft,
    Evaluated,
    Approved,
    Blocked,
    Published,
}

impl CaseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CaseStatus::Draft => "draft",
            CaseStatus::Evaluated => "evaluated",
            CaseStatus::Approved => "approved",
            CaseStatus::Blocked => "blocked",
            CaseStatus::Published => "published",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Denormalized view of the latest revision kept on the case row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CaseSummary {
    pub revision_id: String,
    pub policy_version: String,
    pub decision: Decision,
    pub severity: Severity,
    pub confidence_score: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseCase {
    pub id: String,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub status: CaseStatus,
    pub context: DraftContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest: Option<CaseSummary>,
}

impl ReleaseCase {
    pub fn latest_decision(&self) -> Option<Decision> {
        self.latest.as_ref().map(|s| s.decision)
    }
}

/// One evaluated snapshot of a case's submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    pub id: String,
    pub case_id: String,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub submission: DraftSubmission,
    pub evaluation: Evaluation,
}
