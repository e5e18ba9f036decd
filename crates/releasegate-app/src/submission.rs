//! Submission validation: runs before any rule is evaluated.

use crate::AppError;
use releasegate_types::{Channel, DraftContext, DraftSubmission, ids};

/// Raw submission fields as entered.
#[derive(Clone, Debug, Default)]
pub struct SubmissionInput {
    pub text: String,
    pub channel: String,
    pub product: Option<String>,
    pub audience: Option<String>,
}

/// Trim and check a submission.
///
/// Blank `product`/`audience` become absent. Channel names are case-insensitive.
pub fn validate_submission(input: SubmissionInput) -> Result<DraftSubmission, AppError> {
    let text = input.text.trim();
    if text.is_empty() {
        return Err(AppError::Validation(ids::VALIDATION_EMPTY_DRAFT.to_string()));
    }

    let channel: Channel = input
        .channel
        .trim()
        .to_lowercase()
        .parse()
        .map_err(|_| AppError::Validation(format!("Unknown channel: {}", input.channel)))?;

    Ok(DraftSubmission {
        text: text.to_string(),
        context: DraftContext {
            channel,
            product: non_blank(input.product),
            audience: non_blank(input.audience),
        },
    })
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
