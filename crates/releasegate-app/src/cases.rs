//! Case use cases: submit, revise, list, show.

use crate::submission::{SubmissionInput, validate_submission};
use crate::{AppError, Pipeline};
use releasegate_domain::workflow;
use releasegate_store::{CaseStore, CaseWithRevisions};
use releasegate_types::{Evaluation, PacketRecord, ReleaseCase, Revision};
use time::OffsetDateTime;
use tracing::info;

/// Result of a stateless evaluation or of recording a revision.
#[derive(Clone, Debug)]
pub struct SubmitOutput {
    pub case: ReleaseCase,
    pub revision: Revision,
}

/// A case with its revisions and the packet exported for its latest revision.
#[derive(Clone, Debug)]
pub struct ShowOutput {
    pub loaded: CaseWithRevisions,
    pub packet: Option<PacketRecord>,
}

/// Validate and evaluate without touching the store.
pub fn evaluate_draft(pipeline: &Pipeline, input: SubmissionInput) -> Result<Evaluation, AppError> {
    let submission = validate_submission(input)?;
    Ok(pipeline.evaluate(&submission, OffsetDateTime::now_utc()))
}

/// Create a case and record its first evaluated revision.
pub fn submit_case(
    store: &dyn CaseStore,
    pipeline: &Pipeline,
    input: SubmissionInput,
) -> Result<SubmitOutput, AppError> {
    let submission = validate_submission(input)?;
    let evaluation = pipeline.evaluate(&submission, OffsetDateTime::now_utc());

    let case = store.create_case(submission.context.clone())?;
    let revision = store.append_revision(&case.id, case.status, submission, evaluation)?;
    info!(
        case_id = %case.id,
        revision_id = %revision.id,
        decision = ?revision.evaluation.decision,
        "case submitted"
    );

    let case = store.get_with_revisions(&case.id)?.case;
    Ok(SubmitOutput { case, revision })
}

/// Evaluate an edited draft as a new revision of an existing case.
pub fn revise_case(
    store: &dyn CaseStore,
    pipeline: &Pipeline,
    case_id: &str,
    input: SubmissionInput,
) -> Result<SubmitOutput, AppError> {
    let submission = validate_submission(input)?;
    let current = store.get_with_revisions(case_id)?.case;
    workflow::can_revise(current.status)?;

    let evaluation = pipeline.evaluate(&submission, OffsetDateTime::now_utc());
    let revision = store.append_revision(case_id, current.status, submission, evaluation)?;
    info!(
        case_id = %case_id,
        revision_id = %revision.id,
        decision = ?revision.evaluation.decision,
        "case revised"
    );

    let case = store.get_with_revisions(case_id)?.case;
    Ok(SubmitOutput { case, revision })
}

pub fn list_cases(store: &dyn CaseStore, limit: usize) -> Result<Vec<ReleaseCase>, AppError> {
    Ok(store.list_cases(limit)?)
}

pub fn show_case(store: &dyn CaseStore, case_id: &str) -> Result<ShowOutput, AppError> {
    let loaded = store.get_with_revisions(case_id)?;
    let packet = match loaded.latest_revision() {
        Some(latest) => store.get_packet(case_id, &latest.id)?,
        None => None,
    };
    Ok(ShowOutput { loaded, packet })
}

/// Plain-text table of cases for terminal display.
pub fn format_case_list(cases: &[ReleaseCase]) -> String {
    if cases.is_empty() {
        return "No cases.\n".to_string();
    }
    let mut out = String::new();
    out.push_str(&format!(
        "{:<12} {:<10} {:<14} {:<8} {}\n",
        "CASE", "STATUS", "DECISION", "SEVERITY", "UPDATED"
    ));
    for c in cases {
        let (decision, severity) = match &c.latest {
            Some(s) => (s.decision.as_str(), s.severity.as_str()),
            None => ("-", "-"),
        };
        let updated = c
            .updated_at
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_default();
        out.push_str(&format!(
            "{:<12} {:<10} {:<14} {:<8} {}\n",
            c.id,
            c.status.as_str(),
            decision,
            severity,
            updated
        ));
    }
    out
}
