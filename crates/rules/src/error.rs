//! Error types for rule-set composition and catalog loading.

/// Errors that can occur while composing, resolving or loading rule sets.
#[derive(Debug, thiserror::Error)]
pub enum RuleSetError {
    /// A composition entry is neither a rule set nor a rule mapping.
    #[error(
        "composition source at index {index} of rule set '{rule_set}' must be a rule set or a rule mapping, found {found}"
    )]
    InvalidCompositionSource {
        rule_set: String,
        index: usize,
        found: String,
    },

    /// A rule set transitively composes with itself.
    #[error("cyclic composition detected: {}", .path.join(" -> "))]
    CyclicComposition { path: Vec<String> },

    /// A composition entry references a rule set id the catalog does not define.
    #[error(
        "composition source at index {index} of rule set '{rule_set}' references unknown rule set '{reference}'"
    )]
    UnknownReference {
        rule_set: String,
        index: usize,
        reference: String,
    },

    /// Lookup of a rule set id that does not exist.
    #[error("unknown rule set '{0}'")]
    UnknownRuleSet(String),

    /// The declaration of a rule set was changed after it was resolved.
    #[error("rule set '{0}' is already resolved; its declaration can no longer change")]
    AlreadyResolved(String),

    /// Two catalog entries share the same id.
    #[error("duplicate rule set id '{0}'")]
    DuplicateRuleSet(String),

    /// Catalog validation error (e.g. empty ids).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse/deserialization error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Result alias for rule-set operations.
pub type Result<T> = std::result::Result<T, RuleSetError>;
