use crate::{model::ReleasegateConfigV1, presets};
use anyhow::Context;
use releasegate_domain::RoutingConfig;

pub const DEFAULT_STORE_DIR: &str = ".releasegate";
pub const DEFAULT_REWRITE_ENDPOINT: &str = "https://api.openai.com/v1/responses";
pub const DEFAULT_REWRITE_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_REWRITE_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_REWRITE_TIMEOUT_MS: u64 = 12_000;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub policy_pack: Option<String>,
    pub store_dir: Option<String>,
    pub rewrite_enabled: Option<bool>,
}

/// Where the active policy pack comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PolicySource {
    Builtin(String),
    File(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewriteSettings {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    pub api_key_env: String,
    pub timeout_ms: u64,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub profile: String,
    pub routing: RoutingConfig,
    pub policy: PolicySource,
    pub store_dir: String,
    pub rewrite: RewriteSettings,
}

pub fn resolve_config(
    cfg: ReleasegateConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let requested = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| presets::DEFAULT_PROFILE.to_string());

    let (profile, mut routing) = presets::preset(&requested);

    if let Some(v) = cfg.routing.auto_pass_confidence {
        routing.auto_pass_confidence =
            validate_confidence(v).context("invalid routing.auto_pass_confidence")?;
    }
    if let Some(v) = cfg.routing.prefer_needs_changes_on_uncertainty {
        routing.prefer_needs_changes_on_uncertainty = v;
    }

    let policy_s = overrides
        .policy_pack
        .clone()
        .or(cfg.policy_pack.clone())
        .unwrap_or_else(|| format!("builtin:{}", presets::DEFAULT_BUILTIN_PACK));
    let policy = parse_policy_source(&policy_s)?;

    let store_dir = overrides
        .store_dir
        .clone()
        .or(cfg.store_dir.clone())
        .unwrap_or_else(|| DEFAULT_STORE_DIR.to_string());
    if store_dir.trim().is_empty() {
        anyhow::bail!("store_dir must not be empty");
    }

    let rewrite = RewriteSettings {
        enabled: overrides
            .rewrite_enabled
            .or(cfg.rewrite.enabled)
            .unwrap_or(false),
        endpoint: cfg
            .rewrite
            .endpoint
            .unwrap_or_else(|| DEFAULT_REWRITE_ENDPOINT.to_string()),
        model: cfg
            .rewrite
            .model
            .unwrap_or_else(|| DEFAULT_REWRITE_MODEL.to_string()),
        api_key_env: cfg
            .rewrite
            .api_key_env
            .unwrap_or_else(|| DEFAULT_REWRITE_API_KEY_ENV.to_string()),
        timeout_ms: match cfg.rewrite.timeout_ms {
            Some(0) => anyhow::bail!("rewrite.timeout_ms must be greater than 0"),
            Some(ms) => ms,
            None => DEFAULT_REWRITE_TIMEOUT_MS,
        },
    };

    Ok(ResolvedConfig {
        profile,
        routing,
        policy,
        store_dir,
        rewrite,
    })
}

fn validate_confidence(v: f64) -> anyhow::Result<f64> {
    if !(0.0..=1.0).contains(&v) {
        anyhow::bail!("confidence must be within [0, 1], got {v}");
    }
    Ok(v)
}

fn parse_policy_source(v: &str) -> anyhow::Result<PolicySource> {
    let v = v.trim();
    if v.is_empty() {
        anyhow::bail!("policy_pack must not be empty");
    }
    match v.strip_prefix("builtin:") {
        Some(name) if presets::builtin_pack_json(name).is_some() => {
            Ok(PolicySource::Builtin(name.to_string()))
        }
        Some(name) => anyhow::bail!(
            "unknown built-in policy pack: {name} (expected one of: {})",
            presets::builtin_pack_names().join(", ")
        ),
        None => Ok(PolicySource::File(v.to_string())),
    }
}
