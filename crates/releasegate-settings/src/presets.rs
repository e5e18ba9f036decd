use releasegate_domain::RoutingConfig;
use releasegate_types::PolicyPack;

pub const DEFAULT_PROFILE: &str = "default";
pub const DEFAULT_BUILTIN_PACK: &str = "generic.v0.1";

const GENERIC_V0_1: &str = include_str!("../packs/generic.v0.1.json");

/// Preset routing profiles.
///
/// Keep these small and readable. Anything complex should go into repo config.
pub fn preset(profile: &str) -> (String, RoutingConfig) {
    match profile {
        "strict" => ("strict".to_string(), strict_profile()),
        // default
        _ => (DEFAULT_PROFILE.to_string(), RoutingConfig::default()),
    }
}

fn strict_profile() -> RoutingConfig {
    // Strict never auto-passes below 0.95 and escalates when unsure.
    RoutingConfig {
        auto_pass_confidence: 0.95,
        prefer_needs_changes_on_uncertainty: false,
    }
}

pub fn builtin_pack_names() -> &'static [&'static str] {
    &[DEFAULT_BUILTIN_PACK]
}

/// Raw JSON of a built-in pack.
pub fn builtin_pack_json(name: &str) -> Option<&'static str> {
    match name {
        "generic.v0.1" => Some(GENERIC_V0_1),
        _ => None,
    }
}

pub fn builtin_pack(name: &str) -> anyhow::Result<PolicyPack> {
    let Some(json) = builtin_pack_json(name) else {
        anyhow::bail!(
            "unknown built-in policy pack: {name} (expected one of: {})",
            builtin_pack_names().join(", ")
        );
    };
    crate::parse_policy_pack_json(json)
}
