//! Public facade over the releasegate evaluator.
//!
//! Re-exports the stable DTOs from `releasegate-types` and the pure engine
//! from `releasegate-domain`. No IO happens here.

#![forbid(unsafe_code)]

pub use releasegate_domain::packet::{PacketInput, build_packet, previous_text};
pub use releasegate_domain::workflow::{
    SignoffRequest, can_approve, can_block, can_publish, can_revise, prepare_signoff,
};
pub use releasegate_domain::{
    CompiledPack, GateRejection, PackCache, PolicyError, RoutingConfig, RuleEngineResult, route,
};
pub use releasegate_types::*;

use time::OffsetDateTime;

/// Match, route and assemble one submission.
///
/// No rewrite suggestions are attached.
pub fn check_draft(
    pack: &CompiledPack,
    submission: &DraftSubmission,
    routing: &RoutingConfig,
    evaluated_at: OffsetDateTime,
) -> Evaluation {
    let result = releasegate_domain::evaluate(submission, pack);
    let routed = route(&result, routing);
    releasegate_domain::assemble(result, evaluated_at, routed)
}
