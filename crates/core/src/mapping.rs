//! Field → rule-expression mappings shared by every rule set.

use indexmap::IndexMap;

/// Identifier of a validated input field (e.g. `"email"`).
pub type FieldId = String;

/// Opaque validation expression handed to the external validation engine
/// (e.g. `"required|min:8"`). Never interpreted here.
pub type RuleExpression = String;

/// Mapping from field to rule expression.
///
/// Insertion order is preserved for stable output, but equality is
/// order-independent.
pub type RuleMapping = IndexMap<FieldId, RuleExpression>;

/// Build a [`RuleMapping`] from `(field, expression)` pairs.
///
/// Later pairs overwrite earlier ones on duplicate fields.
pub fn rule_mapping<I, K, V>(pairs: I) -> RuleMapping
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<FieldId>,
    V: Into<RuleExpression>,
{
    pairs
        .into_iter()
        .map(|(field, rule)| (field.into(), rule.into()))
        .collect()
}

/// Copy every entry of `top` into `base`; `top` wins on conflicts.
pub fn overlay(base: &mut RuleMapping, top: &RuleMapping) {
    for (field, rule) in top {
        base.insert(field.clone(), rule.clone());
    }
}
