//! Approve, publish and block.
//!
//! Each use case reads the case, runs the gate against the observed status,
//! then writes with that status as the expected precondition.

use crate::AppError;
use releasegate_domain::GateRejection;
use releasegate_domain::workflow::{self, SignoffRequest};
use releasegate_store::{CaseStore, StoreError};
use releasegate_types::{CaseStatus, HumanSignoff, ReleaseCase};
use time::OffsetDateTime;
use tracing::{info, warn};

#[derive(Clone, Debug)]
pub struct ApproveOutput {
    pub case: ReleaseCase,
    /// The signoff on the approved packet, if it carries one.
    pub signoff: Option<HumanSignoff>,
}

pub fn approve_case(
    store: &dyn CaseStore,
    case_id: &str,
    request: &SignoffRequest,
) -> Result<ApproveOutput, AppError> {
    let loaded = store.get_with_revisions(case_id)?;
    let latest = loaded.latest_revision().ok_or(GateRejection::NoRevisions)?;
    let decision = latest.evaluation.decision;
    let observed = loaded.case.status;

    workflow::can_approve(observed, Some(decision))?;

    let packet = store
        .get_packet(case_id, &latest.id)?
        .ok_or(GateRejection::PacketNotFound)?;

    // A signoff already on this packet satisfies the requirement.
    let signoff = match packet.human_signoff {
        Some(_) => None,
        None => workflow::prepare_signoff(decision, request, OffsetDateTime::now_utc())?,
    };

    let approval = store
        .approve(case_id, &packet.revision_id, observed, signoff)
        .map_err(|err| conflict(case_id, observed, err))?;
    if let Some(signoff) = &approval.packet.human_signoff {
        info!(
            case_id = %case_id,
            packet_id = %approval.packet.id,
            approver = %signoff.approver_name,
            "signoff on record"
        );
    }
    info!(case_id = %case_id, decision = ?decision, "case approved");
    Ok(ApproveOutput {
        case: approval.case,
        signoff: approval.packet.human_signoff,
    })
}

pub fn publish_case(store: &dyn CaseStore, case_id: &str) -> Result<ReleaseCase, AppError> {
    let observed = store.get_with_revisions(case_id)?.case.status;
    workflow::can_publish(observed)?;

    let case = transition(store, case_id, observed, CaseStatus::Published)?;
    info!(case_id = %case_id, "case published");
    Ok(case)
}

pub fn block_case(store: &dyn CaseStore, case_id: &str) -> Result<ReleaseCase, AppError> {
    let loaded = store.get_with_revisions(case_id)?;
    let observed = loaded.case.status;
    let decision = loaded.latest_revision().map(|r| r.evaluation.decision);
    workflow::can_block(observed, decision)?;

    let case = transition(store, case_id, observed, CaseStatus::Blocked)?;
    info!(case_id = %case_id, "case blocked");
    Ok(case)
}

fn transition(
    store: &dyn CaseStore,
    case_id: &str,
    expected: CaseStatus,
    next: CaseStatus,
) -> Result<ReleaseCase, AppError> {
    store
        .transition_status(case_id, expected, next)
        .map_err(|err| conflict(case_id, expected, err))
}

fn conflict(case_id: &str, expected: CaseStatus, err: StoreError) -> AppError {
    if let StoreError::StatusConflict { actual, .. } = &err {
        warn!(
            case_id = %case_id,
            expected = %expected,
            actual = %actual,
            "status changed concurrently"
        );
    }
    AppError::from(err)
}
