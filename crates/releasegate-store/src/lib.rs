//! Persistence for release cases, revisions and approval packets.
//!
//! The application layer only sees the [`CaseStore`] trait. Both backends share
//! the same in-memory [`state::StoreState`] so their semantics cannot drift.

#![forbid(unsafe_code)]

mod error;
mod file;
mod memory;
mod state;

#[cfg(test)]
mod conformance;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;

use releasegate_types::{
    ApprovalPacket, CaseStatus, DraftContext, DraftSubmission, Evaluation, HumanSignoff,
    PacketRecord, ReleaseCase, Revision,
};

/// A case together with its revisions, newest first.
#[derive(Clone, Debug, PartialEq)]
pub struct CaseWithRevisions {
    pub case: ReleaseCase,
    pub revisions: Vec<Revision>,
}

impl CaseWithRevisions {
    pub fn latest_revision(&self) -> Option<&Revision> {
        self.revisions.first()
    }
}

/// Result of [`CaseStore::approve`].
#[derive(Clone, Debug, PartialEq)]
pub struct Approval {
    pub case: ReleaseCase,
    /// The packet as stored, with whichever signoff it now carries.
    pub packet: PacketRecord,
}

/// The storage trait for releasegate backends.
///
/// ## OCC
///
/// `append_revision`, `approve` and `transition_status` take the status the caller
/// observed when it ran its gate check. If the stored status differs the call
/// returns `Err(StoreError::StatusConflict { .. })` and nothing is written.
///
/// ## Packets
///
/// There is at most one packet per `(case_id, revision_id)`. `create_packet`
/// is insert-if-absent: when a packet already exists it is returned unchanged.
pub trait CaseStore: Send + Sync {
    /// Create a case in status `draft`.
    fn create_case(&self, context: DraftContext) -> Result<ReleaseCase, StoreError>;

    /// Record a new evaluated revision, refresh the case summary and set the
    /// case to `evaluated`.
    fn append_revision(
        &self,
        case_id: &str,
        expected: CaseStatus,
        submission: DraftSubmission,
        evaluation: Evaluation,
    ) -> Result<Revision, StoreError>;

    fn get_with_revisions(&self, case_id: &str) -> Result<CaseWithRevisions, StoreError>;

    /// Most recently updated first.
    fn list_cases(&self, limit: usize) -> Result<Vec<ReleaseCase>, StoreError>;

    fn get_packet(
        &self,
        case_id: &str,
        revision_id: &str,
    ) -> Result<Option<PacketRecord>, StoreError>;

    fn create_packet(&self, packet: ApprovalPacket) -> Result<PacketRecord, StoreError>;

    /// Approve a case in one step: check `expected`, attach `signoff` to the
    /// packet for `revision_id` and set the case to `approved`.
    ///
    /// A packet keeps the first signoff it was given; later ones are ignored.
    /// On `StatusConflict` neither the packet nor the case is changed.
    fn approve(
        &self,
        case_id: &str,
        revision_id: &str,
        expected: CaseStatus,
        signoff: Option<HumanSignoff>,
    ) -> Result<Approval, StoreError>;

    fn transition_status(
        &self,
        case_id: &str,
        expected: CaseStatus,
        next: CaseStatus,
    ) -> Result<ReleaseCase, StoreError>;
}
