use regex::{Regex, RegexBuilder};
use releasegate_types::{PolicyPack, PolicyRule};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

/// A policy pack that cannot be compiled. Raised at load time, never per draft.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error("policy pack has an empty policyVersion")]
    EmptyVersion,
    #[error("policy rule has an empty id")]
    EmptyRuleId,
    #[error("duplicate rule id: {0}")]
    DuplicateRuleId(String),
    #[error("rule {0} has no patterns")]
    NoPatterns(String),
    #[error("rule {rule_id}: invalid pattern {pattern:?}")]
    InvalidPattern {
        rule_id: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Clone, Debug)]
pub struct CompiledRule {
    pub rule: PolicyRule,
    /// Same order as `rule.patterns`, all case-insensitive.
    pub matchers: Vec<Regex>,
}

/// A validated pack with every pattern compiled.
#[derive(Clone, Debug)]
pub struct CompiledPack {
    pub policy_version: String,
    pub rules: Vec<CompiledRule>,
    source: PolicyPack,
}

impl CompiledPack {
    pub fn compile(pack: &PolicyPack) -> Result<Self, PolicyError> {
        if pack.policy_version.trim().is_empty() {
            return Err(PolicyError::EmptyVersion);
        }

        let mut seen = BTreeSet::new();
        let mut rules = Vec::with_capacity(pack.rules.len());
        for rule in &pack.rules {
            if rule.id.trim().is_empty() {
                return Err(PolicyError::EmptyRuleId);
            }
            if !seen.insert(rule.id.as_str()) {
                return Err(PolicyError::DuplicateRuleId(rule.id.clone()));
            }
            if rule.patterns.is_empty() {
                return Err(PolicyError::NoPatterns(rule.id.clone()));
            }

            let matchers = rule
                .patterns
                .iter()
                .map(|p| {
                    RegexBuilder::new(p)
                        .case_insensitive(true)
                        .build()
                        .map_err(|source| PolicyError::InvalidPattern {
                            rule_id: rule.id.clone(),
                            pattern: p.clone(),
                            source,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            rules.push(CompiledRule {
                rule: rule.clone(),
                matchers,
            });
        }

        Ok(Self {
            policy_version: pack.policy_version.clone(),
            rules,
            source: pack.clone(),
        })
    }

    /// The declarative pack this was compiled from.
    pub fn pack(&self) -> &PolicyPack {
        &self.source
    }
}

/// Compiled packs keyed by `policyVersion`.
///
/// A version names one rule set, so a hit skips recompilation even if the caller
/// passes a freshly parsed copy of the same pack.
#[derive(Debug, Default)]
pub struct PackCache {
    packs: RwLock<HashMap<String, Arc<CompiledPack>>>,
}

impl PackCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compile(&self, pack: &PolicyPack) -> Result<Arc<CompiledPack>, PolicyError> {
        if let Some(hit) = self.get(&pack.policy_version) {
            return Ok(hit);
        }

        let compiled = Arc::new(CompiledPack::compile(pack)?);
        let mut packs = self.packs.write().unwrap_or_else(|e| e.into_inner());
        let entry = packs
            .entry(pack.policy_version.clone())
            .or_insert_with(|| Arc::clone(&compiled));
        Ok(Arc::clone(entry))
    }

    pub fn get(&self, policy_version: &str) -> Option<Arc<CompiledPack>> {
        let packs = self.packs.read().unwrap_or_else(|e| e.into_inner());
        packs.get(policy_version).cloned()
    }

    pub fn len(&self) -> usize {
        self.packs.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
