//! Stable identifiers: built-in rule ids, confidence reasons and gate reasons.
//!
//! Gate reasons are user-facing and matched verbatim by callers and tests.

// Rules shipped with the built-in `generic.v0.1` pack.
pub const RULE_SUPERLATIVE_BEST: &str = "R-SUPERLATIVE-BEST";
pub const RULE_RISK_NO_RISK: &str = "R-RISK-NO-RISK";
pub const RULE_RETURNS_GUARANTEE: &str = "R-RETURNS-GUARANTEE";
pub const RULE_PERCENT_RETURN: &str = "R-PERCENT-RETURN";
pub const RULE_FEES_ABSOLUTE: &str = "R-FEES-ABSOLUTE";
pub const RULE_BEAT_THE_MARKET: &str = "R-BEAT-THE-MARKET";
pub const RULE_URGENCY_PRESSURE: &str = "R-URGENCY-PRESSURE";
pub const RULE_REGULATOR_ENDORSEMENT: &str = "R-REGULATOR-ENDORSEMENT";

// Disclosures
pub const DISCLOSURE_PAST_PERFORMANCE: &str =
    "Past performance is not indicative of future results";
pub const DISCLOSURE_FEE_SCHEDULE: &str = "Fee schedule and applicable conditions";

// Confidence reasons
pub const REASON_NO_RULES_FIRED: &str = "No policy rules fired";
pub const REASON_HIGH_FIRED: &str = "High severity rule(s) fired";
pub const REASON_MEDIUM_FIRED: &str = "Medium severity rule(s) fired";
pub const REASON_LOW_FIRED: &str = "Low severity rule(s) fired";
pub const REASON_ABSTAINED: &str = "Abstained due to uncertainty";

// Gate reasons
pub const GATE_ALREADY_PUBLISHED: &str = "Already published";
pub const GATE_ALREADY_APPROVED: &str = "Already approved";
pub const GATE_ALREADY_BLOCKED: &str = "Already blocked";
pub const GATE_NO_DECISION: &str = "No decision yet";
pub const GATE_NOT_APPROVED: &str = "Not approved";
pub const GATE_NO_REVISIONS: &str = "No revisions found";
pub const GATE_PACKET_NOT_FOUND: &str =
    "Approval packet not found. Export an approval packet first.";
pub const GATE_MISSING_APPROVER_NAME: &str = "Missing approverName";
pub const GATE_MISSING_OVERRIDE_REASON: &str = "Missing overrideReason";

// Submission validation
pub const VALIDATION_EMPTY_DRAFT: &str = "Paste a draft to review.";
