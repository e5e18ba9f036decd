//! The `export` use case: one approval packet per `(caseId, revisionId)`.

use crate::AppError;
use releasegate_domain::GateRejection;
use releasegate_domain::packet::{PacketInput, build_packet, previous_text};
use releasegate_store::CaseStore;
use releasegate_types::{ApprovalPacket, PacketRecord};
use time::OffsetDateTime;
use tracing::{debug, info};

/// Return the packet for the case's latest revision, building it on first export.
///
/// An existing packet is returned unchanged, `createdAt` included.
pub fn export_packet(store: &dyn CaseStore, case_id: &str) -> Result<PacketRecord, AppError> {
    let loaded = store.get_with_revisions(case_id)?;
    let latest = loaded.latest_revision().ok_or(GateRejection::NoRevisions)?;

    if let Some(existing) = store.get_packet(case_id, &latest.id)? {
        debug!(case_id = %case_id, packet_id = %existing.id, "packet already exported");
        return Ok(existing);
    }

    let packet = build_packet(PacketInput {
        case: &loaded.case,
        revision: latest,
        history: &loaded.revisions,
        previous_text: previous_text(&loaded.revisions, &latest.id),
        created_at: OffsetDateTime::now_utc(),
    });
    // Insert-if-absent: a concurrent export may have won; its packet is returned.
    let record = store.create_packet(packet)?;
    info!(
        case_id = %case_id,
        revision_id = %record.revision_id,
        packet_id = %record.id,
        "approval packet exported"
    );
    Ok(record)
}

/// Pretty JSON of the exported document, newline-terminated.
pub fn serialize_packet(packet: &ApprovalPacket) -> serde_json::Result<String> {
    let mut json = serde_json::to_string_pretty(packet)?;
    json.push('\n');
    Ok(json)
}
