use releasegate_types::CaseStatus;

/// All errors that can be returned by a `CaseStore` implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("case not found: {0}")]
    CaseNotFound(String),

    #[error("revision not found: {case_id}/{revision_id}")]
    RevisionNotFound {
        case_id: String,
        revision_id: String,
    },

    #[error("approval packet not found: {case_id}/{revision_id}")]
    PacketNotFound {
        case_id: String,
        revision_id: String,
    },

    /// Optimistic concurrency conflict: the case moved on since it was read.
    #[error("status conflict on case {case_id}: expected {expected}, found {actual}")]
    StatusConflict {
        case_id: String,
        expected: CaseStatus,
        actual: CaseStatus,
    },

    /// The store is missing or misconfigured. Callers surface this as setup-required.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store data is corrupt: {0}")]
    Corrupt(String),

    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn is_setup(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}
