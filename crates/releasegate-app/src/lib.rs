//! Use case orchestration for releasegate.
//!
//! This crate is the application layer: it coordinates the pure pipeline, the
//! case store, the optional rewrite service and the renderers. The CLI depends
//! on this and only handles argument parsing and file I/O.

#![forbid(unsafe_code)]

mod cases;
mod error;
mod explain;
mod packet;
mod pipeline;
mod render;
mod submission;
mod workflow;

#[cfg(test)]
mod test_support;

pub use cases::{
    ShowOutput, SubmitOutput, evaluate_draft, format_case_list, list_cases, revise_case, show_case,
    submit_case,
};
pub use error::AppError;
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use packet::{export_packet, serialize_packet};
pub use pipeline::{Pipeline, RewriteHook, load_policy_pack};
pub use render::{render_annotations, render_markdown, review_for_case, review_for_draft};
pub use submission::{SubmissionInput, validate_submission};
pub use workflow::{ApproveOutput, approve_case, block_case, publish_case};

pub use releasegate_domain::workflow::SignoffRequest;
