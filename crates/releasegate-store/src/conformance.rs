//! Behavior every `CaseStore` backend must share, run against each backend.

use crate::{CaseStore, FileStore, MemoryStore, StoreError};
use camino::Utf8PathBuf;
use releasegate_types::{
    ApprovalPacket, CaseStatus, Channel, Confidence, Decision, DraftContext, DraftSubmission,
    Evaluation, HumanSignoff, PacketDiff, PacketDraft, SCHEMA_PACKET_V1, Severity,
};
use std::sync::{Arc, Barrier};
use time::macros::datetime;

pub(crate) fn context() -> DraftContext {
    DraftContext {
        channel: Channel::Email,
        product: Some("Cash account".to_string()),
        audience: None,
    }
}

fn submission(text: &str) -> DraftSubmission {
    DraftSubmission {
        text: text.to_string(),
        context: context(),
    }
}

fn evaluation(decision: Decision) -> Evaluation {
    Evaluation {
        evaluated_at: datetime!(2026-04-01 8:00 UTC),
        policy_version: "TEST_v1".to_string(),
        decision,
        severity: Severity::Low,
        confidence: Confidence {
            score: 0.95,
            reason: None,
        },
        violations: Vec::new(),
        required_disclosures: Vec::new(),
        rewrite_suggestions: Vec::new(),
        abstained: false,
    }
}

fn packet(case_id: &str, revision_id: &str) -> ApprovalPacket {
    ApprovalPacket {
        schema: SCHEMA_PACKET_V1.to_string(),
        case_id: case_id.to_string(),
        revision_id: revision_id.to_string(),
        created_at: datetime!(2026-04-01 9:00 UTC),
        status: CaseStatus::Evaluated,
        context: context(),
        policy_version: "TEST_v1".to_string(),
        decision: Decision::Escalate,
        severity: Severity::High,
        confidence: Confidence {
            score: 0.9,
            reason: None,
        },
        abstained: false,
        required_disclosures: Vec::new(),
        violations: Vec::new(),
        rewrite_suggestions: Vec::new(),
        draft: PacketDraft {
            text: "x".to_string(),
            input_hash: "00".to_string(),
        },
        revision_history: Vec::new(),
        diff: PacketDiff {
            previous_length: None,
            latest_length: None,
            changed: false,
        },
    }
}

fn signoff(name: &str) -> HumanSignoff {
    HumanSignoff {
        approver_name: name.to_string(),
        approver_email: None,
        override_reason: "reviewed".to_string(),
        signed_at: datetime!(2026-04-01 10:00 UTC),
    }
}

/// Run `check` against a fresh instance of every backend.
fn for_each_backend(check: impl Fn(Arc<dyn CaseStore>)) {
    check(Arc::new(MemoryStore::new()));

    let tmp = tempfile::tempdir().expect("create temp dir");
    let dir = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 temp dir");
    check(Arc::new(FileStore::open(&dir).expect("open file store")));
}

#[test]
fn new_case_starts_as_draft() {
    for_each_backend(|store| {
        let case = store.create_case(context()).unwrap();
        assert_eq!(case.status, CaseStatus::Draft);
        assert!(case.latest.is_none());
        assert!(case.id.starts_with("rc_"));
    });
}

#[test]
fn append_revision_updates_summary_and_status() {
    for_each_backend(|store| {
        let case = store.create_case(context()).unwrap();
        let rev = store
            .append_revision(
                &case.id,
                CaseStatus::Draft,
                submission("first"),
                evaluation(Decision::Escalate),
            )
            .unwrap();

        let loaded = store.get_with_revisions(&case.id).unwrap();
        assert_eq!(loaded.case.status, CaseStatus::Evaluated);
        let latest = loaded.case.latest.unwrap();
        assert_eq!(latest.revision_id, rev.id);
        assert_eq!(latest.decision, Decision::Escalate);
    });
}

#[test]
fn revisions_are_returned_newest_first() {
    for_each_backend(|store| {
        let case = store.create_case(context()).unwrap();
        let first = store
            .append_revision(&case.id, CaseStatus::Draft, submission("a"), evaluation(Decision::Pass))
            .unwrap();
        let second = store
            .append_revision(
                &case.id,
                CaseStatus::Evaluated,
                submission("b"),
                evaluation(Decision::NeedsChanges),
            )
            .unwrap();

        let loaded = store.get_with_revisions(&case.id).unwrap();
        let ids: Vec<_> = loaded.revisions.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, vec![second.id.clone(), first.id]);
        assert_eq!(loaded.latest_revision().map(|r| r.id.as_str()), Some(second.id.as_str()));
    });
}

#[test]
fn unknown_case_is_not_found() {
    for_each_backend(|store| {
        assert!(matches!(
            store.get_with_revisions("rc_missing"),
            Err(StoreError::CaseNotFound(_))
        ));
    });
}

#[test]
fn list_cases_orders_by_update_and_limits() {
    for_each_backend(|store| {
        let a = store.create_case(context()).unwrap();
        let b = store.create_case(context()).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        store
            .append_revision(&a.id, CaseStatus::Draft, submission("a"), evaluation(Decision::Pass))
            .unwrap();

        let listed = store.list_cases(10).unwrap();
        assert_eq!(listed[0].id, a.id);
        assert_eq!(listed[1].id, b.id);
        assert_eq!(store.list_cases(1).unwrap().len(), 1);
    });
}

#[test]
fn create_packet_is_insert_if_absent() {
    for_each_backend(|store| {
        let case = store.create_case(context()).unwrap();
        let rev = store
            .append_revision(&case.id, CaseStatus::Draft, submission("a"), evaluation(Decision::Pass))
            .unwrap();

        let first = store.create_packet(packet(&case.id, &rev.id)).unwrap();
        let mut other = packet(&case.id, &rev.id);
        other.created_at = datetime!(2030-01-01 0:00 UTC);
        let second = store.create_packet(other).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            store.get_packet(&case.id, &rev.id).unwrap(),
            Some(first.clone())
        );
        assert!(first.id.starts_with("pkt_"));
    });
}

#[test]
fn packet_for_unknown_revision_is_rejected() {
    for_each_backend(|store| {
        let case = store.create_case(context()).unwrap();
        assert!(matches!(
            store.create_packet(packet(&case.id, "rev_404")),
            Err(StoreError::RevisionNotFound { .. })
        ));
    });
}

#[test]
fn approve_records_signoff_and_status_together() {
    for_each_backend(|store| {
        let case = store.create_case(context()).unwrap();
        let rev = store
            .append_revision(&case.id, CaseStatus::Draft, submission("a"), evaluation(Decision::Escalate))
            .unwrap();
        store.create_packet(packet(&case.id, &rev.id)).unwrap();

        let approval = store
            .approve(&case.id, &rev.id, CaseStatus::Evaluated, Some(signoff("Dana")))
            .unwrap();
        assert_eq!(approval.case.status, CaseStatus::Approved);
        assert_eq!(approval.packet.human_signoff.unwrap().approver_name, "Dana");

        // Lift a block: the packet keeps the first signoff.
        store
            .transition_status(&case.id, CaseStatus::Approved, CaseStatus::Blocked)
            .unwrap();
        let again = store
            .approve(&case.id, &rev.id, CaseStatus::Blocked, Some(signoff("Eve")))
            .unwrap();
        assert_eq!(again.case.status, CaseStatus::Approved);
        assert_eq!(again.packet.human_signoff.unwrap().approver_name, "Dana");
    });
}

#[test]
fn approve_conflict_writes_nothing() {
    for_each_backend(|store| {
        let case = store.create_case(context()).unwrap();
        let rev = store
            .append_revision(&case.id, CaseStatus::Draft, submission("a"), evaluation(Decision::Escalate))
            .unwrap();
        store.create_packet(packet(&case.id, &rev.id)).unwrap();
        store
            .transition_status(&case.id, CaseStatus::Evaluated, CaseStatus::Blocked)
            .unwrap();

        let err = store
            .approve(&case.id, &rev.id, CaseStatus::Evaluated, Some(signoff("Dana")))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::StatusConflict {
                expected: CaseStatus::Evaluated,
                actual: CaseStatus::Blocked,
                ..
            }
        ));
        let stored = store.get_packet(&case.id, &rev.id).unwrap().unwrap();
        assert!(stored.human_signoff.is_none());
        assert_eq!(
            store.get_with_revisions(&case.id).unwrap().case.status,
            CaseStatus::Blocked
        );
    });
}

#[test]
fn approve_requires_the_packet() {
    for_each_backend(|store| {
        let case = store.create_case(context()).unwrap();
        let rev = store
            .append_revision(&case.id, CaseStatus::Draft, submission("a"), evaluation(Decision::Pass))
            .unwrap();

        assert!(matches!(
            store.approve(&case.id, &rev.id, CaseStatus::Evaluated, None),
            Err(StoreError::PacketNotFound { .. })
        ));
        assert_eq!(
            store.get_with_revisions(&case.id).unwrap().case.status,
            CaseStatus::Evaluated
        );
    });
}

#[test]
fn transition_requires_expected_status() {
    for_each_backend(|store| {
        let case = store.create_case(context()).unwrap();
        store
            .append_revision(&case.id, CaseStatus::Draft, submission("a"), evaluation(Decision::Pass))
            .unwrap();

        let err = store
            .transition_status(&case.id, CaseStatus::Approved, CaseStatus::Published)
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::StatusConflict {
                expected: CaseStatus::Approved,
                actual: CaseStatus::Evaluated,
                ..
            }
        ));

        let approved = store
            .transition_status(&case.id, CaseStatus::Evaluated, CaseStatus::Approved)
            .unwrap();
        assert_eq!(approved.status, CaseStatus::Approved);
    });
}

#[test]
fn append_revision_checks_expected_status() {
    for_each_backend(|store| {
        let case = store.create_case(context()).unwrap();
        let err = store
            .append_revision(
                &case.id,
                CaseStatus::Evaluated,
                submission("a"),
                evaluation(Decision::Pass),
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::StatusConflict { .. }));
        assert!(store.get_with_revisions(&case.id).unwrap().revisions.is_empty());
    });
}

#[test]
fn concurrent_transitions_exactly_one_wins() {
    for_each_backend(|store| {
        let case = store.create_case(context()).unwrap();
        store
            .append_revision(&case.id, CaseStatus::Draft, submission("a"), evaluation(Decision::Pass))
            .unwrap();

        let contenders = 8;
        let barrier = Arc::new(Barrier::new(contenders));
        let handles: Vec<_> = (0..contenders)
            .map(|_| {
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                let id = case.id.clone();
                std::thread::spawn(move || {
                    barrier.wait();
                    store.transition_status(&id, CaseStatus::Evaluated, CaseStatus::Approved)
                })
            })
            .collect();

        let results: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked"))
            .collect();
        let wins = results.iter().filter(|r| r.is_ok()).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Err(StoreError::StatusConflict { .. })))
            .count();

        assert_eq!(wins, 1);
        assert_eq!(conflicts, contenders - 1);
    });
}
