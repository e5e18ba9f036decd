use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `releasegate.toml` schema v1.
///
/// This is a *user-facing* config model: every key is optional and defaults come
/// from the selected profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReleasegateConfigV1 {
    /// Optional schema string for tooling (`releasegate.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Routing profile: `default` or `strict`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// `builtin:<name>` or a path to a policy pack JSON file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_pack: Option<String>,

    /// Directory holding the case store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_dir: Option<String>,

    #[serde(default)]
    pub routing: RoutingConfigToml,

    #[serde(default)]
    pub rewrite: RewriteConfigToml,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RoutingConfigToml {
    /// Minimum confidence for a clean draft to auto-pass, within `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_pass_confidence: Option<f64>,

    /// Route abstentions to `needs_changes` (true) or `escalate` (false).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefer_needs_changes_on_uncertainty: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RewriteConfigToml {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Responses-style endpoint URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Name of the environment variable holding the API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}
