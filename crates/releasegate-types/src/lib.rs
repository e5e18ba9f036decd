//! Stable DTOs and IDs used across the releasegate workspace.
//!
//! This crate is intentionally boring:
//! - data types for submissions, evaluations, cases and approval packets
//! - the declarative policy pack format
//! - stable string IDs, schema names and gate reasons

#![forbid(unsafe_code)]

pub mod case;
pub mod evaluation;
pub mod ids;
pub mod packet;
pub mod policy;
pub mod submission;

pub use case::{CaseStatus, CaseSummary, ReleaseCase, Revision};
pub use evaluation::{
    Citation, Confidence, Decision, Evaluation, RewriteSuggestion, Severity, Violation,
};
pub use packet::{
    ApprovalPacket, HumanSignoff, PacketDiff, PacketDraft, PacketRecord, RevisionSummary,
    SCHEMA_PACKET_V1,
};
pub use policy::{PolicyPack, PolicyRule};
pub use submission::{Channel, DraftContext, DraftSubmission, UnknownChannel};
