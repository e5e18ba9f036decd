//! Config parsing, routing profiles and policy pack loading.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{ReleasegateConfigV1, RewriteConfigToml, RoutingConfigToml};
pub use presets::{builtin_pack, builtin_pack_json, builtin_pack_names};
pub use resolve::{Overrides, PolicySource, ResolvedConfig, RewriteSettings};

use anyhow::Context;
use releasegate_types::PolicyPack;

/// Parse `releasegate.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<ReleasegateConfigV1> {
    let cfg: ReleasegateConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config (profile + config file + overrides).
pub fn resolve_config(
    cfg: ReleasegateConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}

/// Parse a policy pack document. Pattern validation happens at compile time.
pub fn parse_policy_pack_json(input: &str) -> anyhow::Result<PolicyPack> {
    let pack: PolicyPack = serde_json::from_str(input).context("parse policy pack json")?;
    Ok(pack)
}

#[cfg(test)]
mod tests {
    use super::*;
    use releasegate_domain::CompiledPack;
    use releasegate_types::{Severity, ids};

    #[test]
    fn empty_config_uses_default_profile() {
        let cfg = parse_config_toml("").unwrap();
        let resolved = resolve_config(cfg, Overrides::default()).unwrap();
        assert_eq!(resolved.profile, "default");
        assert_eq!(resolved.routing.auto_pass_confidence, 0.90);
        assert!(resolved.routing.prefer_needs_changes_on_uncertainty);
        assert_eq!(
            resolved.policy,
            PolicySource::Builtin("generic.v0.1".to_string())
        );
        assert_eq!(resolved.store_dir, ".releasegate");
        assert!(!resolved.rewrite.enabled);
        assert_eq!(resolved.rewrite.model, "gpt-4o-mini");
        assert_eq!(resolved.rewrite.timeout_ms, 12_000);
    }

    #[test]
    fn strict_profile_escalates_on_uncertainty() {
        let cfg = parse_config_toml("profile = \"strict\"").unwrap();
        let resolved = resolve_config(cfg, Overrides::default()).unwrap();
        assert_eq!(resolved.profile, "strict");
        assert_eq!(resolved.routing.auto_pass_confidence, 0.95);
        assert!(!resolved.routing.prefer_needs_changes_on_uncertainty);
    }

    #[test]
    fn unknown_profile_falls_back_to_default() {
        let resolved = resolve_config(
            ReleasegateConfigV1::default(),
            Overrides {
                profile: Some("relaxed".to_string()),
                ..Overrides::default()
            },
        )
        .unwrap();
        assert_eq!(resolved.profile, "default");
    }

    #[test]
    fn overrides_win_over_config() {
        let cfg = parse_config_toml(
            r#"
profile = "strict"
policy_pack = "packs/custom.json"
store_dir = "from-config"

[routing]
auto_pass_confidence = 0.8

[rewrite]
enabled = true
timeout_ms = 500
"#,
        )
        .unwrap();
        let resolved = resolve_config(
            cfg,
            Overrides {
                profile: Some("default".to_string()),
                store_dir: Some("from-cli".to_string()),
                rewrite_enabled: Some(false),
                ..Overrides::default()
            },
        )
        .unwrap();
        assert_eq!(resolved.profile, "default");
        assert_eq!(resolved.routing.auto_pass_confidence, 0.8);
        assert_eq!(
            resolved.policy,
            PolicySource::File("packs/custom.json".to_string())
        );
        assert_eq!(resolved.store_dir, "from-cli");
        assert!(!resolved.rewrite.enabled);
        assert_eq!(resolved.rewrite.timeout_ms, 500);
    }

    #[test]
    fn out_of_range_confidence_is_rejected() {
        let cfg = parse_config_toml("[routing]\nauto_pass_confidence = 1.5").unwrap();
        let err = resolve_config(cfg, Overrides::default()).unwrap_err();
        assert!(format!("{err:#}").contains("auto_pass_confidence"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let cfg = parse_config_toml("[rewrite]\ntimeout_ms = 0").unwrap();
        assert!(resolve_config(cfg, Overrides::default()).is_err());
    }

    #[test]
    fn unknown_builtin_pack_is_rejected() {
        let err = resolve_config(
            ReleasegateConfigV1::default(),
            Overrides {
                policy_pack: Some("builtin:nope".to_string()),
                ..Overrides::default()
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown built-in policy pack: nope"));
    }

    #[test]
    fn unknown_config_keys_are_tolerated() {
        assert!(parse_config_toml("future_key = 1").is_ok());
    }

    #[test]
    fn builtin_pack_compiles() {
        let pack = builtin_pack("generic.v0.1").unwrap();
        assert_eq!(pack.policy_version, "POLICY_GENERIC_v0.1");
        let compiled = CompiledPack::compile(&pack).unwrap();
        assert_eq!(compiled.rules.len(), pack.rules.len());

        let risk = pack.rule(ids::RULE_RISK_NO_RISK).unwrap();
        assert_eq!(risk.severity, Severity::High);
        let fees = pack.rule(ids::RULE_FEES_ABSOLUTE).unwrap();
        assert_eq!(
            fees.required_disclosures,
            vec![ids::DISCLOSURE_FEE_SCHEDULE.to_string()]
        );
    }

    #[test]
    fn malformed_pack_json_reports_context() {
        let err = parse_policy_pack_json("{\"rules\": []}").unwrap_err();
        assert!(format!("{err:#}").contains("parse policy pack json"));
    }
}
