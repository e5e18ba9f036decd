//! Pure draft evaluation (no IO).
//!
//! Input: a validated submission and a compiled policy pack.
//! Output: violations + routed decision + the artifacts that gate approval.

#![forbid(unsafe_code)]

pub mod evaluation;
pub mod fingerprint;
pub mod packet;
pub mod policy;
pub mod routing;
pub mod segment;
pub mod workflow;

mod engine;

#[cfg(test)]
mod proptest;
#[cfg(test)]
pub(crate) mod test_support;

pub use engine::{RuleEngineResult, evaluate};
pub use evaluation::{assemble, with_rewrite_suggestions};
pub use policy::{CompiledPack, PackCache, PolicyError};
pub use routing::{RoutingConfig, RoutingResult, compute_confidence, route};
pub use segment::{SentenceSpan, find_sentence_index_for_offset, segment_sentences};
pub use workflow::GateRejection;
