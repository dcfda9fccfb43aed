//! Serde types for catalog YAML documents.

use rulesets_core::RuleMapping;
use serde::{Deserialize, Serialize};

/// Top-level catalog document.
///
/// ```yaml
/// rule_sets:
///   - id: credentials
///     rules:
///       email: "required|email"
///   - id: registration
///     override_rules: true
///     combine_with:
///       - credentials
///       - name: "required|string"
///     rules:
///       password: "required|min:8|confirmed"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CatalogDocument {
    #[serde(default)]
    pub rule_sets: Vec<RuleSetDefinition>,
}

/// One rule set declaration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RuleSetDefinition {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Own rules of the rule set.
    #[serde(default)]
    pub rules: RuleMapping,
    /// Rule set ids (strings) or inline mappings, merged in order.
    /// Kept raw so each entry can be validated with its index.
    #[serde(default)]
    pub combine_with: Vec<serde_yaml::Value>,
    #[serde(default)]
    pub override_rules: bool,
}
