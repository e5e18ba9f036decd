//! Workflow gate: which status transitions are legal, and why not.
//!
//! ```text
//! draft -> evaluated -> approved -> published
//!              |            |
//!              +--> blocked <+
//! ```

use releasegate_types::{CaseStatus, Decision, HumanSignoff, ids};
use time::OffsetDateTime;

/// A refused transition. `Display` is the user-facing reason.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GateRejection {
    #[error("{}", ids::GATE_ALREADY_PUBLISHED)]
    AlreadyPublished,
    #[error("{}", ids::GATE_ALREADY_APPROVED)]
    AlreadyApproved,
    #[error("{}", ids::GATE_ALREADY_BLOCKED)]
    AlreadyBlocked,
    #[error("{}", ids::GATE_NO_DECISION)]
    NoDecision,
    #[error("{}", ids::GATE_NOT_APPROVED)]
    NotApproved,
    #[error("{}", ids::GATE_NO_REVISIONS)]
    NoRevisions,
    #[error("{}", ids::GATE_PACKET_NOT_FOUND)]
    PacketNotFound,
    #[error("{}", ids::GATE_MISSING_APPROVER_NAME)]
    MissingApproverName,
    #[error("{}", ids::GATE_MISSING_OVERRIDE_REASON)]
    MissingOverrideReason,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApprovalRequirements {
    pub needs_signoff: bool,
}

/// Signoff fields as entered by the approver, before validation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignoffRequest {
    pub approver_name: Option<String>,
    pub approver_email: Option<String>,
    pub override_reason: Option<String>,
}

pub fn can_approve(status: CaseStatus, decision: Option<Decision>) -> Result<(), GateRejection> {
    match status {
        CaseStatus::Published => return Err(GateRejection::AlreadyPublished),
        CaseStatus::Approved => return Err(GateRejection::AlreadyApproved),
        _ => {}
    }
    if decision.is_none() {
        return Err(GateRejection::NoDecision);
    }
    Ok(())
}

pub fn approval_requirements(decision: Decision) -> ApprovalRequirements {
    ApprovalRequirements {
        needs_signoff: decision == Decision::Escalate,
    }
}

/// Validate signoff against the requirements for `decision`.
///
/// Returns the signoff to record, or `None` when the decision needs none.
pub fn prepare_signoff(
    decision: Decision,
    request: &SignoffRequest,
    signed_at: OffsetDateTime,
) -> Result<Option<HumanSignoff>, GateRejection> {
    if !approval_requirements(decision).needs_signoff {
        return Ok(None);
    }

    let approver_name =
        non_blank(request.approver_name.as_deref()).ok_or(GateRejection::MissingApproverName)?;
    let override_reason = non_blank(request.override_reason.as_deref())
        .ok_or(GateRejection::MissingOverrideReason)?;

    Ok(Some(HumanSignoff {
        approver_name: approver_name.to_string(),
        approver_email: non_blank(request.approver_email.as_deref()).map(str::to_string),
        override_reason: override_reason.to_string(),
        signed_at,
    }))
}

pub fn can_publish(status: CaseStatus) -> Result<(), GateRejection> {
    match status {
        CaseStatus::Published => Err(GateRejection::AlreadyPublished),
        CaseStatus::Approved => Ok(()),
        _ => Err(GateRejection::NotApproved),
    }
}

pub fn can_block(status: CaseStatus, decision: Option<Decision>) -> Result<(), GateRejection> {
    match status {
        CaseStatus::Published => Err(GateRejection::AlreadyPublished),
        CaseStatus::Blocked => Err(GateRejection::AlreadyBlocked),
        CaseStatus::Draft => Err(GateRejection::NoDecision),
        CaseStatus::Evaluated | CaseStatus::Approved if decision.is_none() => {
            Err(GateRejection::NoDecision)
        }
        CaseStatus::Evaluated | CaseStatus::Approved => Ok(()),
    }
}

/// A new revision is accepted until the case is published.
pub fn can_revise(status: CaseStatus) -> Result<(), GateRejection> {
    match status {
        CaseStatus::Published => Err(GateRejection::AlreadyPublished),
        _ => Ok(()),
    }
}

fn non_blank(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}
