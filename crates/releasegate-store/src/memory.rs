use crate::state::StoreState;
use crate::{Approval, CaseStore, CaseWithRevisions, StoreError};
use releasegate_types::{
    ApprovalPacket, CaseStatus, DraftContext, DraftSubmission, Evaluation, HumanSignoff,
    PacketRecord, ReleaseCase, Revision,
};
use std::sync::{Mutex, MutexGuard};
use time::OffsetDateTime;

/// Process-local store. Every operation holds one mutex, so each call is atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CaseStore for MemoryStore {
    fn create_case(&self, context: DraftContext) -> Result<ReleaseCase, StoreError> {
        Ok(self.lock().create_case(context, OffsetDateTime::now_utc()))
    }

    fn append_revision(
        &self,
        case_id: &str,
        expected: CaseStatus,
        submission: DraftSubmission,
        evaluation: Evaluation,
    ) -> Result<Revision, StoreError> {
        self.lock().append_revision(
            case_id,
            expected,
            submission,
            evaluation,
            OffsetDateTime::now_utc(),
        )
    }

    fn get_with_revisions(&self, case_id: &str) -> Result<CaseWithRevisions, StoreError> {
        self.lock().get_with_revisions(case_id)
    }

    fn list_cases(&self, limit: usize) -> Result<Vec<ReleaseCase>, StoreError> {
        Ok(self.lock().list_cases(limit))
    }

    fn get_packet(
        &self,
        case_id: &str,
        revision_id: &str,
    ) -> Result<Option<PacketRecord>, StoreError> {
        Ok(self.lock().get_packet(case_id, revision_id))
    }

    fn create_packet(&self, packet: ApprovalPacket) -> Result<PacketRecord, StoreError> {
        self.lock().create_packet(packet).map(|(record, _)| record)
    }

    fn approve(
        &self,
        case_id: &str,
        revision_id: &str,
        expected: CaseStatus,
        signoff: Option<HumanSignoff>,
    ) -> Result<Approval, StoreError> {
        self.lock()
            .approve(case_id, revision_id, expected, signoff, OffsetDateTime::now_utc())
    }

    fn transition_status(
        &self,
        case_id: &str,
        expected: CaseStatus,
        next: CaseStatus,
    ) -> Result<ReleaseCase, StoreError> {
        self.lock()
            .transition_status(case_id, expected, next, OffsetDateTime::now_utc())
    }
}
