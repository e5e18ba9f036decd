//! Render use cases: map evaluations and cases onto the renderer model.

use releasegate_render::{
    RenderableDecision, RenderableLocation, RenderableRevision, RenderableReview,
    RenderableSeverity, RenderableSignoff, RenderableSuggestion, RenderableViolation, line_col,
};
use releasegate_store::CaseWithRevisions;
use releasegate_types::{Decision, Evaluation, PacketRecord, Severity};
use time::format_description::well_known::Rfc3339;

fn severity(s: Severity) -> RenderableSeverity {
    match s {
        Severity::Low => RenderableSeverity::Low,
        Severity::Medium => RenderableSeverity::Medium,
        Severity::High => RenderableSeverity::High,
    }
}

fn decision(d: Decision) -> RenderableDecision {
    match d {
        Decision::Pass => RenderableDecision::Pass,
        Decision::NeedsChanges => RenderableDecision::NeedsChanges,
        Decision::Escalate => RenderableDecision::Escalate,
    }
}

/// Review model for one evaluated draft.
///
/// `path` names the draft for annotation locations; `text` is the evaluated
/// draft the citation offsets point into.
pub fn review_for_draft(
    subject: &str,
    path: &str,
    text: &str,
    evaluation: &Evaluation,
) -> RenderableReview {
    let violations = evaluation
        .violations
        .iter()
        .map(|v| {
            let (line, col) = line_col(text, v.citation.start);
            RenderableViolation {
                severity: severity(v.severity),
                rule_id: v.rule_id.clone(),
                message: v.message.clone(),
                snippet: v.citation.snippet.clone(),
                location: Some(RenderableLocation {
                    path: path.to_string(),
                    line: Some(line),
                    col: Some(col),
                }),
                required_disclosures: v.required_disclosures.clone(),
            }
        })
        .collect();

    let suggestions = evaluation
        .rewrite_suggestions
        .iter()
        .map(|s| RenderableSuggestion {
            snippet: s.citation.snippet.clone(),
            suggested_text: s.suggested_text.clone(),
            rationale: s.rationale.clone(),
        })
        .collect();

    RenderableReview {
        subject: subject.to_string(),
        status: None,
        policy_version: evaluation.policy_version.clone(),
        decision: decision(evaluation.decision),
        severity: severity(evaluation.severity),
        confidence: evaluation.confidence.score,
        confidence_reason: evaluation.confidence.reason.clone(),
        abstained: evaluation.abstained,
        violations,
        required_disclosures: evaluation.required_disclosures.clone(),
        suggestions,
        signoff: None,
        history: Vec::new(),
    }
}

/// Review model for a case's latest revision, with its history and the
/// signoff recorded on `packet`. `None` without revisions.
pub fn review_for_case(
    loaded: &CaseWithRevisions,
    packet: Option<&PacketRecord>,
) -> Option<RenderableReview> {
    let latest = loaded.latest_revision()?;
    let mut review = review_for_draft(
        &loaded.case.id,
        &loaded.case.id,
        &latest.submission.text,
        &latest.evaluation,
    );
    review.status = Some(loaded.case.status.to_string());
    review.signoff = packet.and_then(|p| {
        let s = p.human_signoff.as_ref()?;
        Some(RenderableSignoff {
            packet_id: p.id.clone(),
            approver_name: s.approver_name.clone(),
            approver_email: s.approver_email.clone(),
            override_reason: s.override_reason.clone(),
            signed_at: s.signed_at.format(&Rfc3339).unwrap_or_default(),
        })
    });
    review.history = loaded
        .revisions
        .iter()
        .map(|r| RenderableRevision {
            revision_id: r.id.clone(),
            created_at: r.created_at.format(&Rfc3339).unwrap_or_default(),
            decision: decision(r.evaluation.decision),
            severity: severity(r.evaluation.severity),
            confidence: r.evaluation.confidence.score,
        })
        .collect();
    Some(review)
}

pub fn render_markdown(review: &RenderableReview) -> String {
    releasegate_render::render_markdown(review)
}

pub fn render_annotations(review: &RenderableReview, max: usize) -> Vec<String> {
    releasegate_render::render_github_annotations(review)
        .into_iter()
        .take(max)
        .collect()
}
