#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    #[error("rewrite service not configured: {0}")]
    NotConfigured(String),

    #[error("rewrite request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rewrite service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("No JSON object found in model output")]
    NoJsonObject,

    #[error("invalid model output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("rewrite suggestions timed out after {0} ms")]
    Timeout(u64),
}
