//! Advisory rewrite suggestions for flagged drafts.
//!
//! The evaluation pipeline never depends on this crate succeeding: callers go
//! through [`suggest_or_empty`], which bounds the call by a deadline and turns
//! every failure into an empty list.

#![forbid(unsafe_code)]

mod error;
mod http;
pub mod response;

pub use error::RewriteError;
pub use http::{HttpSuggester, HttpSuggesterConfig};

use releasegate_types::{RewriteSuggestion, Violation};
use std::sync::{Arc, mpsc};
use std::time::Duration;
use tracing::warn;

/// What the suggestion service is asked about.
#[derive(Clone, Copy, Debug)]
pub struct RewriteRequest<'a> {
    pub text: &'a str,
    pub violations: &'a [Violation],
    pub required_disclosures: &'a [String],
}

pub trait RewriteSuggester: Send + Sync {
    fn suggest(&self, request: &RewriteRequest<'_>) -> Result<Vec<RewriteSuggestion>, RewriteError>;
}

/// Ask for suggestions, giving up after `deadline`.
///
/// The call runs on a worker thread; on timeout its eventual result is dropped.
/// Errors and timeouts are logged and yield an empty list.
pub fn suggest_or_empty(
    suggester: Arc<dyn RewriteSuggester>,
    request: RewriteRequest<'_>,
    deadline: Duration,
) -> Vec<RewriteSuggestion> {
    let text = request.text.to_string();
    let violations = request.violations.to_vec();
    let disclosures = request.required_disclosures.to_vec();
    let (tx, rx) = mpsc::channel();

    let spawned = std::thread::Builder::new()
        .name("releasegate-rewrite".to_string())
        .spawn(move || {
            let result = suggester.suggest(&RewriteRequest {
                text: &text,
                violations: &violations,
                required_disclosures: &disclosures,
            });
            // The receiver is gone after a timeout.
            let _ = tx.send(result);
        });
    if let Err(err) = spawned {
        warn!(error = %err, "could not start rewrite worker");
        return Vec::new();
    }

    match rx.recv_timeout(deadline) {
        Ok(Ok(suggestions)) => suggestions,
        Ok(Err(err)) => {
            warn!(error = %err, "rewrite suggestions unavailable");
            Vec::new()
        }
        Err(_) => {
            let err = RewriteError::Timeout(deadline.as_millis() as u64);
            warn!(error = %err, "rewrite suggestions unavailable");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use releasegate_types::Citation;

    struct Fixed(Vec<RewriteSuggestion>);

    impl RewriteSuggester for Fixed {
        fn suggest(&self, _: &RewriteRequest<'_>) -> Result<Vec<RewriteSuggestion>, RewriteError> {
            Ok(self.0.clone())
        }
    }

    struct Failing;

    impl RewriteSuggester for Failing {
        fn suggest(&self, _: &RewriteRequest<'_>) -> Result<Vec<RewriteSuggestion>, RewriteError> {
            Err(RewriteError::NoJsonObject)
        }
    }

    struct Slow;

    impl RewriteSuggester for Slow {
        fn suggest(&self, _: &RewriteRequest<'_>) -> Result<Vec<RewriteSuggestion>, RewriteError> {
            std::thread::sleep(Duration::from_secs(2));
            Ok(vec![suggestion()])
        }
    }

    fn suggestion() -> RewriteSuggestion {
        RewriteSuggestion {
            citation: Citation {
                sentence_index: 0,
                start: 0,
                end: 7,
                snippet: "No risk".to_string(),
            },
            suggested_text: "Investing involves risk.".to_string(),
            rationale: "Absolute claim".to_string(),
        }
    }

    fn request() -> RewriteRequest<'static> {
        RewriteRequest {
            text: "No risk.",
            violations: &[],
            required_disclosures: &[],
        }
    }

    #[test]
    fn successful_suggestions_pass_through() {
        let out = suggest_or_empty(
            Arc::new(Fixed(vec![suggestion()])),
            request(),
            Duration::from_secs(5),
        );
        assert_eq!(out, vec![suggestion()]);
    }

    #[test]
    fn failures_degrade_to_empty() {
        let out = suggest_or_empty(Arc::new(Failing), request(), Duration::from_secs(5));
        assert!(out.is_empty());
    }

    #[test]
    fn timeouts_degrade_to_empty() {
        let started = std::time::Instant::now();
        let out = suggest_or_empty(Arc::new(Slow), request(), Duration::from_millis(50));
        assert!(out.is_empty());
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
