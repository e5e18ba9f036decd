use releasegate_domain::GateRejection;
use releasegate_store::StoreError;

/// Failures surfaced by the use cases.
///
/// `Display` is what the user sees; gate and validation messages are the
/// stable reason strings.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Input rejected before any rule ran.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Gate(#[from] GateRejection),

    /// The store is missing or misconfigured.
    #[error("{0}")]
    Setup(String),

    #[error("{0}")]
    NotFound(String),

    /// The case changed status between the gate check and the write.
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Store(StoreError),

    #[error("{0}")]
    Policy(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(_) => AppError::Setup(err.to_string()),
            StoreError::CaseNotFound(_) => AppError::NotFound(err.to_string()),
            StoreError::StatusConflict { .. } => AppError::Conflict(err.to_string()),
            other => AppError::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use releasegate_types::CaseStatus;

    #[test]
    fn store_errors_map_to_kinds() {
        assert!(matches!(
            AppError::from(StoreError::Unavailable("no dir".into())),
            AppError::Setup(_)
        ));
        assert!(matches!(
            AppError::from(StoreError::CaseNotFound("rc_1".into())),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            AppError::from(StoreError::StatusConflict {
                case_id: "rc_1".into(),
                expected: CaseStatus::Evaluated,
                actual: CaseStatus::Approved,
            }),
            AppError::Conflict(_)
        ));
        assert!(matches!(
            AppError::from(StoreError::Corrupt("bad".into())),
            AppError::Store(_)
        ));
    }

    #[test]
    fn gate_rejection_displays_reason() {
        let err = AppError::from(GateRejection::AlreadyPublished);
        assert_eq!(err.to_string(), "Already published");
    }
}
