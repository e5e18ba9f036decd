//! Rendering for CI and reviewer surfaces (Markdown summaries, GitHub annotations).

#![forbid(unsafe_code)]

mod gha;
mod markdown;
mod model;

pub use gha::{line_col, render_github_annotations};
pub use markdown::render_markdown;
pub use model::{
    RenderableDecision, RenderableLocation, RenderableRevision, RenderableReview,
    RenderableSeverity, RenderableSignoff, RenderableSuggestion, RenderableViolation,
};
