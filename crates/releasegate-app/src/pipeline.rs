//! Policy loading and the evaluation pipeline.

use crate::AppError;
use releasegate_domain::{
    CompiledPack, PackCache, RoutingConfig, assemble, route, with_rewrite_suggestions,
};
use releasegate_rewrite::{
    HttpSuggester, HttpSuggesterConfig, RewriteRequest, RewriteSuggester, suggest_or_empty,
};
use releasegate_settings::{PolicySource, RewriteSettings};
use releasegate_types::{DraftSubmission, Evaluation, PolicyPack};
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;
use tracing::{debug, warn};

/// Read and parse the pack named by `source`. Patterns are not compiled here.
pub fn load_policy_pack(source: &PolicySource) -> Result<PolicyPack, AppError> {
    match source {
        PolicySource::Builtin(name) => releasegate_settings::builtin_pack(name)
            .map_err(|e| AppError::Policy(format!("{e:#}"))),
        PolicySource::File(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| AppError::Policy(format!("read policy pack {path}: {e}")))?;
            releasegate_settings::parse_policy_pack_json(&text)
                .map_err(|e| AppError::Policy(format!("{path}: {e:#}")))
        }
    }
}

/// Optional rewrite collaborator with its deadline.
#[derive(Clone)]
pub struct RewriteHook {
    pub suggester: Arc<dyn RewriteSuggester>,
    pub deadline: Duration,
}

impl std::fmt::Debug for RewriteHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RewriteHook")
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

impl RewriteHook {
    /// Build the HTTP hook when rewriting is enabled and an API key is set.
    ///
    /// A missing key or client setup failure disables suggestions with a warning.
    pub fn from_settings(settings: &RewriteSettings) -> Option<Self> {
        if !settings.enabled {
            return None;
        }
        let api_key = match std::env::var(&settings.api_key_env) {
            Ok(key) if !key.trim().is_empty() => key,
            _ => {
                warn!(
                    env = %settings.api_key_env,
                    "rewrite suggestions enabled but no API key set; continuing without them"
                );
                return None;
            }
        };
        let deadline = Duration::from_millis(settings.timeout_ms);
        match HttpSuggester::new(HttpSuggesterConfig {
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            api_key,
            timeout: deadline,
        }) {
            Ok(suggester) => Some(Self {
                suggester: Arc::new(suggester),
                deadline,
            }),
            Err(err) => {
                warn!(error = %err, "rewrite client unavailable; continuing without suggestions");
                None
            }
        }
    }
}

/// Segment, match, route and assemble, with best-effort suggestions.
#[derive(Clone, Debug)]
pub struct Pipeline {
    pack: Arc<CompiledPack>,
    routing: RoutingConfig,
    rewrite: Option<RewriteHook>,
}

impl Pipeline {
    /// Compile `pack` through `cache`. Invalid patterns fail here, never per draft.
    pub fn new(
        pack: &PolicyPack,
        routing: RoutingConfig,
        cache: &PackCache,
    ) -> Result<Self, AppError> {
        if cache.get(&pack.policy_version).is_some() {
            debug!(policy_version = %pack.policy_version, "policy pack cache hit");
        }
        let compiled = cache
            .get_or_compile(pack)
            .map_err(|e| AppError::Policy(e.to_string()))?;
        Ok(Self {
            pack: compiled,
            routing,
            rewrite: None,
        })
    }

    pub fn with_rewrite(mut self, hook: Option<RewriteHook>) -> Self {
        self.rewrite = hook;
        self
    }

    pub fn pack(&self) -> &CompiledPack {
        &self.pack
    }

    pub fn evaluate(&self, submission: &DraftSubmission, now: OffsetDateTime) -> Evaluation {
        let result = releasegate_domain::evaluate(submission, &self.pack);
        debug!(
            policy_version = %result.policy_version,
            fired = ?result.fired_rule_ids,
            severity = ?result.severity,
            "rules evaluated"
        );
        let routing = route(&result, &self.routing);
        let evaluation = assemble(result, now, routing);

        match &self.rewrite {
            Some(hook) if !evaluation.violations.is_empty() => {
                let suggestions = suggest_or_empty(
                    Arc::clone(&hook.suggester),
                    RewriteRequest {
                        text: &submission.text,
                        violations: &evaluation.violations,
                        required_disclosures: &evaluation.required_disclosures,
                    },
                    hook.deadline,
                );
                with_rewrite_suggestions(evaluation, suggestions)
            }
            _ => evaluation,
        }
    }
}
