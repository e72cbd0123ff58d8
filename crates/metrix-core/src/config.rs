//! Registry behaviour switches. Loaded as the `registry:` section of the
//! gateway config, or built directly by embedders.

use serde::Deserialize;

use crate::stats::MedianRule;

/// How metric names are treated on create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamePolicy {
    /// Names are informational; the id is the only key.
    #[default]
    AllowDuplicates,
    /// A second create with a taken name fails with `AlreadyExists`.
    Unique,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    #[serde(default)]
    pub name_policy: NamePolicy,

    #[serde(default)]
    pub median_rule: MedianRule,
}

impl RegistryConfig {
    pub fn unique_names(mut self) -> Self {
        self.name_policy = NamePolicy::Unique;
        self
    }

    pub fn with_median_rule(mut self, rule: MedianRule) -> Self {
        self.median_rule = rule;
        self
    }
}
