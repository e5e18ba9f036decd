use crate::policy::CompiledPack;
use crate::segment::{find_sentence_index_for_offset, segment_sentences};
use releasegate_types::{Citation, DraftSubmission, Severity, Violation};

const SNIPPET_CHARS_BEFORE: usize = 20;
const SNIPPET_CHARS_AFTER: usize = 40;

/// Raw output of matching one draft against one pack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleEngineResult {
    pub policy_version: String,
    /// Pack order, at most one per rule.
    pub violations: Vec<Violation>,
    /// Deduplicated, first-seen order.
    pub required_disclosures: Vec<String>,
    /// Max over fired rules; `Low` when nothing fired.
    pub severity: Severity,
    pub fired_rule_ids: Vec<String>,
}

/// Match a submission against every rule in pack order.
///
/// Patterns run against the full draft text, so a match may cross sentence
/// boundaries; its citation points at the sentence holding the match start.
pub fn evaluate(submission: &DraftSubmission, pack: &CompiledPack) -> RuleEngineResult {
    let text = submission.text.as_str();
    let spans = segment_sentences(text);

    let mut violations = Vec::new();
    let mut required_disclosures: Vec<String> = Vec::new();
    let mut fired_rule_ids = Vec::new();
    let mut severity = Severity::Low;

    for compiled in &pack.rules {
        let rule = &compiled.rule;
        let hit = compiled
            .matchers
            .iter()
            .find_map(|re| re.find_iter(text).find(|m| !m.is_empty()));
        let Some(m) = hit else {
            continue;
        };

        fired_rule_ids.push(rule.id.clone());
        severity = severity.max(rule.severity);
        for disclosure in &rule.required_disclosures {
            if !required_disclosures.contains(disclosure) {
                required_disclosures.push(disclosure.clone());
            }
        }

        violations.push(Violation {
            rule_id: rule.id.clone(),
            severity: rule.severity,
            message: rule.message.clone(),
            citation: Citation {
                sentence_index: find_sentence_index_for_offset(&spans, m.start()),
                start: m.start(),
                end: m.end(),
                snippet: snippet(text, m.start(), m.end()).to_string(),
            },
            required_disclosures: rule.required_disclosures.clone(),
        });
    }

    RuleEngineResult {
        policy_version: pack.policy_version.clone(),
        violations,
        required_disclosures,
        severity,
        fired_rule_ids,
    }
}

/// Context window around a match, clamped to the text and to char boundaries.
fn snippet(text: &str, start: usize, end: usize) -> &str {
    let from = text[..start]
        .char_indices()
        .rev()
        .nth(SNIPPET_CHARS_BEFORE - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let to = text[end..]
        .char_indices()
        .nth(SNIPPET_CHARS_AFTER)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    &text[from..to]
}
