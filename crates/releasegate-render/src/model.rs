#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableSeverity {
    Low,
    Medium,
    High,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableDecision {
    Pass,
    NeedsChanges,
    Escalate,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableLocation {
    pub path: String,
    pub line: Option<u32>,
    pub col: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableViolation {
    pub severity: RenderableSeverity,
    pub rule_id: String,
    pub message: String,
    pub snippet: String,
    pub location: Option<RenderableLocation>,
    pub required_disclosures: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableSuggestion {
    pub snippet: String,
    pub suggested_text: String,
    pub rationale: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderableRevision {
    pub revision_id: String,
    pub created_at: String,
    pub decision: RenderableDecision,
    pub severity: RenderableSeverity,
    pub confidence: f64,
}

/// A recorded human override on an approval packet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableSignoff {
    pub packet_id: String,
    pub approver_name: String,
    pub approver_email: Option<String>,
    pub override_reason: String,
    pub signed_at: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderableReview {
    /// Case id, or the draft path for stateless evaluations.
    pub subject: String,
    pub status: Option<String>,
    pub policy_version: String,
    pub decision: RenderableDecision,
    pub severity: RenderableSeverity,
    pub confidence: f64,
    pub confidence_reason: Option<String>,
    pub abstained: bool,
    pub violations: Vec<RenderableViolation>,
    pub required_disclosures: Vec<String>,
    pub suggestions: Vec<RenderableSuggestion>,
    pub signoff: Option<RenderableSignoff>,
    /// Newest first.
    pub history: Vec<RenderableRevision>,
}
