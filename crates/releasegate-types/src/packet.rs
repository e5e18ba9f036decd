use crate::{
    CaseStatus, Confidence, Decision, DraftContext, RewriteSuggestion, Severity, Violation,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for exported approval packets.
pub const SCHEMA_PACKET_V1: &str = "releasegate.packet.v1";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PacketDraft {
    pub text: String,
    /// Hex SHA-256 of `text`.
    pub input_hash: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevisionSummary {
    pub revision_id: String,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub decision: Decision,
    pub severity: Severity,
    pub confidence_score: f64,
}

/// Length comparison against the previous revision.
///
/// Without a previous revision only `changed: false` is emitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PacketDiff {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_length: Option<usize>,
    pub changed: bool,
}

/// The exported audit document for one `(caseId, revisionId)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalPacket {
    pub schema: String,
    pub case_id: String,
    pub revision_id: String,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub status: CaseStatus,
    pub context: DraftContext,
    pub policy_version: String,
    pub decision: Decision,
    pub severity: Severity,
    pub confidence: Confidence,
    pub abstained: bool,
    pub required_disclosures: Vec<String>,
    pub violations: Vec<Violation>,
    pub rewrite_suggestions: Vec<RewriteSuggestion>,
    pub draft: PacketDraft,
    /// Newest first.
    pub revision_history: Vec<RevisionSummary>,
    pub diff: PacketDiff,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HumanSignoff {
    pub approver_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approver_email: Option<String>,
    pub override_reason: String,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub signed_at: OffsetDateTime,
}

/// Stored packet row: the immutable document plus the signoff attached later.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PacketRecord {
    pub id: String,
    pub case_id: String,
    pub revision_id: String,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub packet: ApprovalPacket,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub human_signoff: Option<HumanSignoff>,
}
