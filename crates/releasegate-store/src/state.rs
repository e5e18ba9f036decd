use crate::{Approval, CaseWithRevisions, StoreError};
use releasegate_types::{
    ApprovalPacket, CaseStatus, CaseSummary, DraftContext, DraftSubmission, Evaluation,
    HumanSignoff, PacketRecord, ReleaseCase, Revision,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// The whole store as one serializable value.
///
/// Revisions and packets are kept in insertion order.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StoreState {
    next_case: u64,
    next_revision: u64,
    next_packet: u64,
    cases: BTreeMap<String, ReleaseCase>,
    revisions: Vec<Revision>,
    packets: Vec<PacketRecord>,
}

fn next_id(counter: &mut u64, prefix: &str) -> String {
    *counter += 1;
    format!("{prefix}_{:06}", *counter)
}

impl StoreState {
    pub(crate) fn create_case(&mut self, context: DraftContext, now: OffsetDateTime) -> ReleaseCase {
        let case = ReleaseCase {
            id: next_id(&mut self.next_case, "rc"),
            created_at: now,
            updated_at: now,
            status: CaseStatus::Draft,
            context,
            latest: None,
        };
        self.cases.insert(case.id.clone(), case.clone());
        case
    }

    pub(crate) fn append_revision(
        &mut self,
        case_id: &str,
        expected: CaseStatus,
        submission: DraftSubmission,
        evaluation: Evaluation,
        now: OffsetDateTime,
    ) -> Result<Revision, StoreError> {
        let case = self.case_mut(case_id)?;
        check_expected(case, expected)?;

        let id = next_id(&mut self.next_revision, "rev");
        let case = self.case_mut(case_id)?;
        case.status = CaseStatus::Evaluated;
        case.updated_at = now;
        case.context = submission.context.clone();
        case.latest = Some(CaseSummary {
            revision_id: id.clone(),
            policy_version: evaluation.policy_version.clone(),
            decision: evaluation.decision,
            severity: evaluation.severity,
            confidence_score: evaluation.confidence.score,
        });

        let revision = Revision {
            id,
            case_id: case_id.to_string(),
            created_at: now,
            submission,
            evaluation,
        };
        self.revisions.push(revision.clone());
        Ok(revision)
    }

    pub(crate) fn get_with_revisions(&self, case_id: &str) -> Result<CaseWithRevisions, StoreError> {
        let case = self
            .cases
            .get(case_id)
            .cloned()
            .ok_or_else(|| StoreError::CaseNotFound(case_id.to_string()))?;
        let revisions = self
            .revisions
            .iter()
            .rev()
            .filter(|r| r.case_id == case_id)
            .cloned()
            .collect();
        Ok(CaseWithRevisions { case, revisions })
    }

    pub(crate) fn list_cases(&self, limit: usize) -> Vec<ReleaseCase> {
        let mut cases: Vec<_> = self.cases.values().cloned().collect();
        // Newest update first; id breaks ties deterministically.
        cases.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        cases.truncate(limit);
        cases
    }

    pub(crate) fn get_packet(&self, case_id: &str, revision_id: &str) -> Option<PacketRecord> {
        self.packets
            .iter()
            .find(|p| p.case_id == case_id && p.revision_id == revision_id)
            .cloned()
    }

    /// Returns the stored record and whether it was inserted by this call.
    pub(crate) fn create_packet(
        &mut self,
        packet: ApprovalPacket,
    ) -> Result<(PacketRecord, bool), StoreError> {
        if let Some(existing) = self.get_packet(&packet.case_id, &packet.revision_id) {
            return Ok((existing, false));
        }
        if !self.cases.contains_key(&packet.case_id) {
            return Err(StoreError::CaseNotFound(packet.case_id.clone()));
        }
        let known_revision = self
            .revisions
            .iter()
            .any(|r| r.case_id == packet.case_id && r.id == packet.revision_id);
        if !known_revision {
            return Err(StoreError::RevisionNotFound {
                case_id: packet.case_id.clone(),
                revision_id: packet.revision_id.clone(),
            });
        }

        let record = PacketRecord {
            id: next_id(&mut self.next_packet, "pkt"),
            case_id: packet.case_id.clone(),
            revision_id: packet.revision_id.clone(),
            created_at: packet.created_at,
            packet,
            human_signoff: None,
        };
        self.packets.push(record.clone());
        Ok((record, true))
    }

    /// Check `expected`, record `signoff` unless the packet already carries
    /// one, then set the case to `approved`. Nothing is written on error.
    pub(crate) fn approve(
        &mut self,
        case_id: &str,
        revision_id: &str,
        expected: CaseStatus,
        signoff: Option<HumanSignoff>,
        now: OffsetDateTime,
    ) -> Result<Approval, StoreError> {
        check_expected(self.case_mut(case_id)?, expected)?;

        let record = self
            .packets
            .iter_mut()
            .find(|p| p.case_id == case_id && p.revision_id == revision_id)
            .ok_or_else(|| StoreError::PacketNotFound {
                case_id: case_id.to_string(),
                revision_id: revision_id.to_string(),
            })?;
        if record.human_signoff.is_none() {
            record.human_signoff = signoff;
        }
        let packet = record.clone();

        let case = self.case_mut(case_id)?;
        case.status = CaseStatus::Approved;
        case.updated_at = now;
        Ok(Approval {
            case: case.clone(),
            packet,
        })
    }

    pub(crate) fn transition_status(
        &mut self,
        case_id: &str,
        expected: CaseStatus,
        next: CaseStatus,
        now: OffsetDateTime,
    ) -> Result<ReleaseCase, StoreError> {
        let case = self.case_mut(case_id)?;
        check_expected(case, expected)?;
        case.status = next;
        case.updated_at = now;
        Ok(case.clone())
    }

    fn case_mut(&mut self, case_id: &str) -> Result<&mut ReleaseCase, StoreError> {
        self.cases
            .get_mut(case_id)
            .ok_or_else(|| StoreError::CaseNotFound(case_id.to_string()))
    }
}

fn check_expected(case: &ReleaseCase, expected: CaseStatus) -> Result<(), StoreError> {
    if case.status != expected {
        return Err(StoreError::StatusConflict {
            case_id: case.id.clone(),
            expected,
            actual: case.status,
        });
    }
    Ok(())
}
