use crate::{RenderableDecision, RenderableReview, RenderableSeverity};

fn decision_label(decision: RenderableDecision) -> &'static str {
    match decision {
        RenderableDecision::Pass => "PASS",
        RenderableDecision::NeedsChanges => "NEEDS CHANGES",
        RenderableDecision::Escalate => "ESCALATE",
    }
}

fn severity_label(severity: RenderableSeverity) -> &'static str {
    match severity {
        RenderableSeverity::Low => "low",
        RenderableSeverity::Medium => "medium",
        RenderableSeverity::High => "high",
    }
}

pub fn render_markdown(review: &RenderableReview) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Releasegate review: {}\n\n", review.subject));
    out.push_str(&format!(
        "- Decision: **{}**\n- Severity: {}\n",
        decision_label(review.decision),
        severity_label(review.severity)
    ));
    match &review.confidence_reason {
        Some(reason) => out.push_str(&format!(
            "- Confidence: {:.2} ({})\n",
            review.confidence, reason
        )),
        None => out.push_str(&format!("- Confidence: {:.2}\n", review.confidence)),
    }
    out.push_str(&format!("- Policy: `{}`\n", review.policy_version));
    if let Some(status) = &review.status {
        out.push_str(&format!("- Status: {}\n", status));
    }
    if review.abstained {
        out.push_str("\n> Note: the gate abstained; a reviewer must decide.\n");
    }
    out.push('\n');

    if review.violations.is_empty() {
        out.push_str("No violations.\n");
    } else {
        out.push_str("## Violations\n\n");
        for v in &review.violations {
            let sev = severity_label(v.severity).to_uppercase();
            let position = v
                .location
                .as_ref()
                .and_then(|loc| Some((loc.line?, loc.col?)))
                .map(|(line, col)| format!(" (line {}, col {})", line, col))
                .unwrap_or_default();
            out.push_str(&format!(
                "- [{}] `{}`: {}{}\n",
                sev, v.rule_id, v.message, position
            ));
            out.push_str(&format!("  - evidence: \"{}\"\n", v.snippet));
            for d in &v.required_disclosures {
                out.push_str(&format!("  - requires: {}\n", d));
            }
        }
    }

    if !review.required_disclosures.is_empty() {
        out.push_str("\n## Required disclosures\n\n");
        for d in &review.required_disclosures {
            out.push_str(&format!("- {}\n", d));
        }
    }

    if !review.suggestions.is_empty() {
        out.push_str("\n## Suggested rewrites\n\n");
        for s in &review.suggestions {
            out.push_str(&format!(
                "- \"{}\" -> \"{}\"\n",
                s.snippet, s.suggested_text
            ));
            if !s.rationale.is_empty() {
                out.push_str(&format!("  - why: {}\n", s.rationale));
            }
        }
    }

    if let Some(signoff) = &review.signoff {
        out.push_str("\n## Signoff\n\n");
        match &signoff.approver_email {
            Some(email) => out.push_str(&format!(
                "- Approver: {} <{}>\n",
                signoff.approver_name, email
            )),
            None => out.push_str(&format!("- Approver: {}\n", signoff.approver_name)),
        }
        out.push_str(&format!("- Override reason: {}\n", signoff.override_reason));
        out.push_str(&format!("- Signed: {}\n", signoff.signed_at));
        out.push_str(&format!("- Packet: `{}`\n", signoff.packet_id));
    }

    if !review.history.is_empty() {
        out.push_str("\n## Revision history\n\n");
        out.push_str("| Revision | Created | Decision | Severity | Confidence |\n");
        out.push_str("|---|---|---|---|---|\n");
        for r in &review.history {
            out.push_str(&format!(
                "| {} | {} | {} | {} | {:.2} |\n",
                r.revision_id,
                r.created_at,
                decision_label(r.decision),
                severity_label(r.severity),
                r.confidence
            ));
        }
    }

    out
}
