//! The `explain` use case: describe a rule from the active pack.

use releasegate_types::{PolicyPack, PolicyRule};

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    Found {
        policy_version: String,
        rule: PolicyRule,
    },
    /// Unknown rule id; lists the ids the pack does define.
    NotFound {
        identifier: String,
        available_rule_ids: Vec<String>,
    },
}

/// Look up a rule by id. Matching ignores ASCII case.
pub fn run_explain(pack: &PolicyPack, identifier: &str) -> ExplainOutput {
    let identifier = identifier.trim();
    match pack
        .rules
        .iter()
        .find(|r| r.id.eq_ignore_ascii_case(identifier))
    {
        Some(rule) => ExplainOutput::Found {
            policy_version: pack.policy_version.clone(),
            rule: rule.clone(),
        },
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available_rule_ids: pack.rule_ids().into_iter().map(str::to_string).collect(),
        },
    }
}

/// Format a rule for terminal display.
pub fn format_explanation(policy_version: &str, rule: &PolicyRule) -> String {
    let mut out = String::new();

    out.push_str(&rule.id);
    out.push('\n');
    out.push_str(&"=".repeat(rule.id.len()));
    out.push_str("\n\n");
    out.push_str(&format!("Policy: {}\n", policy_version));
    out.push_str(&format!("Severity: {}\n\n", rule.severity.as_str()));
    if let Some(description) = &rule.description {
        out.push_str(description);
        out.push_str("\n\n");
    }
    out.push_str("Message\n");
    out.push_str("-------\n");
    out.push_str(&rule.message);
    out.push_str("\n\n");
    out.push_str("Patterns (case-insensitive)\n");
    out.push_str("---------------------------\n");
    for p in &rule.patterns {
        out.push_str(&format!("  - {}\n", p));
    }
    if !rule.required_disclosures.is_empty() {
        out.push_str("\nRequired disclosures\n");
        out.push_str("--------------------\n");
        for d in &rule.required_disclosures {
            out.push_str(&format!("  - {}\n", d));
        }
    }

    out
}

/// Format the "not found" error message for terminal display.
pub fn format_not_found(identifier: &str, rule_ids: &[String]) -> String {
    let mut out = String::new();

    out.push_str(&format!("Unknown rule id: {}\n\n", identifier));
    out.push_str("Available rule ids:\n");
    for id in rule_ids {
        out.push_str(&format!("  - {}\n", id));
    }

    out
}
