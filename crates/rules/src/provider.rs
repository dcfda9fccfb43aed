//! Variant-specific sources of a rule set's own rules.

use rulesets_core::RuleMapping;

/// Produces the own rules of a concrete rule set variant.
///
/// Called on every resolution that is not short-circuited by an injected
/// mapping, so implementations may compute rules dynamically.
///
/// ```
/// use rulesets::{rule_mapping, RuleMapping, RuleProvider};
///
/// struct LoginRules;
///
/// impl RuleProvider for LoginRules {
///     fn rules(&self) -> RuleMapping {
///         rule_mapping([("email", "required|email"), ("password", "required")])
///     }
/// }
///
/// assert_eq!(LoginRules.rules().len(), 2);
/// ```
pub trait RuleProvider: Send + Sync {
    fn rules(&self) -> RuleMapping;
}

/// Static rules.
impl RuleProvider for RuleMapping {
    fn rules(&self) -> RuleMapping {
        self.clone()
    }
}

/// Adapter for closures registered through [`RuleSetBuilder::rules_with`].
///
/// [`RuleSetBuilder::rules_with`]: crate::RuleSetBuilder::rules_with
pub(crate) struct FnProvider<F>(pub(crate) F);

impl<F> RuleProvider for FnProvider<F>
where
    F: Fn() -> RuleMapping + Send + Sync,
{
    fn rules(&self) -> RuleMapping {
        (self.0)()
    }
}
