//! Approval packet construction.

use crate::fingerprint::input_hash;
use releasegate_types::{
    ApprovalPacket, PacketDiff, PacketDraft, ReleaseCase, Revision, RevisionSummary,
    SCHEMA_PACKET_V1,
};
use time::OffsetDateTime;

/// Everything needed to build a packet for one revision.
#[derive(Clone, Debug)]
pub struct PacketInput<'a> {
    pub case: &'a ReleaseCase,
    pub revision: &'a Revision,
    /// All revisions of the case, newest first.
    pub history: &'a [Revision],
    /// Draft text of the revision before `revision`, if any.
    pub previous_text: Option<&'a str>,
    pub created_at: OffsetDateTime,
}

pub fn build_packet(input: PacketInput<'_>) -> ApprovalPacket {
    let PacketInput {
        case,
        revision,
        history,
        previous_text,
        created_at,
    } = input;
    let evaluation = &revision.evaluation;
    let text = revision.submission.text.as_str();

    ApprovalPacket {
        schema: SCHEMA_PACKET_V1.to_string(),
        case_id: case.id.clone(),
        revision_id: revision.id.clone(),
        created_at,
        status: case.status,
        context: revision.submission.context.clone(),
        policy_version: evaluation.policy_version.clone(),
        decision: evaluation.decision,
        severity: evaluation.severity,
        confidence: evaluation.confidence.clone(),
        abstained: evaluation.abstained,
        required_disclosures: evaluation.required_disclosures.clone(),
        violations: evaluation.violations.clone(),
        rewrite_suggestions: evaluation.rewrite_suggestions.clone(),
        draft: PacketDraft {
            text: text.to_string(),
            input_hash: input_hash(text),
        },
        revision_history: summarize_revisions(history),
        diff: packet_diff(previous_text, text),
    }
}

/// Lengths are counted in chars.
pub fn packet_diff(previous: Option<&str>, latest: &str) -> PacketDiff {
    match previous {
        None => PacketDiff {
            previous_length: None,
            latest_length: None,
            changed: false,
        },
        Some(prev) => PacketDiff {
            previous_length: Some(prev.chars().count()),
            latest_length: Some(latest.chars().count()),
            changed: prev != latest,
        },
    }
}

pub fn summarize_revisions(history: &[Revision]) -> Vec<RevisionSummary> {
    history
        .iter()
        .map(|r| RevisionSummary {
            revision_id: r.id.clone(),
            created_at: r.created_at,
            decision: r.evaluation.decision,
            severity: r.evaluation.severity,
            confidence_score: r.evaluation.confidence.score,
        })
        .collect()
}

/// Text of the revision immediately older than `revision_id` in a newest-first history.
pub fn previous_text<'a>(history: &'a [Revision], revision_id: &str) -> Option<&'a str> {
    let pos = history.iter().position(|r| r.id == revision_id)?;
    history.get(pos + 1).map(|r| r.submission.text.as_str())
}
