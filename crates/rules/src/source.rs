//! Composition sources: the entries a rule set merges with.

use std::fmt;

use rulesets_core::RuleMapping;
use serde_yaml::Value;

use crate::error::{Result, RuleSetError};
use crate::ruleset::{ResolutionPath, RuleSetRef};

/// Something a rule set can be combined with.
#[derive(Clone)]
pub enum CompositionSource {
    /// An inline field → rule mapping, used as-is.
    Mapping(RuleMapping),
    /// Another rule set, resolved through its own `get_rules()`.
    RuleSet(RuleSetRef),
}

impl CompositionSource {
    /// Validate a weakly-typed source (e.g. from host configuration).
    ///
    /// A string is a reference to another rule set, looked up via `lookup`.
    /// A mapping whose fields and rules are all strings is an inline
    /// [`RuleMapping`]. Everything else is rejected with
    /// [`RuleSetError::InvalidCompositionSource`] naming `index`.
    pub fn from_value<F>(rule_set: &str, index: usize, value: &Value, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<RuleSetRef>,
    {
        let invalid = |found: String| RuleSetError::InvalidCompositionSource {
            rule_set: rule_set.to_string(),
            index,
            found,
        };

        match value {
            Value::String(reference) => {
                lookup(reference)
                    .map(Self::RuleSet)
                    .ok_or_else(|| RuleSetError::UnknownReference {
                        rule_set: rule_set.to_string(),
                        index,
                        reference: reference.clone(),
                    })
            }
            Value::Mapping(entries) => {
                let mut mapping = RuleMapping::with_capacity(entries.len());
                for (field, rule) in entries {
                    match (field.as_str(), rule.as_str()) {
                        (Some(field), Some(rule)) => {
                            mapping.insert(field.to_string(), rule.to_string());
                        }
                        (Some(field), None) => {
                            return Err(invalid(format!(
                                "a mapping with {} as the rule for field '{}'",
                                value_kind(rule),
                                field
                            )));
                        }
                        (None, _) => {
                            return Err(invalid(format!(
                                "a mapping with {} as a field name",
                                value_kind(field)
                            )));
                        }
                    }
                }
                Ok(Self::Mapping(mapping))
            }
            other => Err(invalid(value_kind(other).to_string())),
        }
    }

    /// Resolve this source to a mapping within an ongoing resolution.
    pub(crate) fn resolve(&self, path: &mut ResolutionPath) -> Result<RuleMapping> {
        match self {
            Self::Mapping(mapping) => Ok(mapping.clone()),
            Self::RuleSet(rule_set) => rule_set.resolve(path),
        }
    }
}

impl fmt::Debug for CompositionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mapping(mapping) => f.debug_tuple("Mapping").field(mapping).finish(),
            Self::RuleSet(rule_set) => f.debug_tuple("RuleSet").field(&rule_set.name()).finish(),
        }
    }
}

impl From<RuleMapping> for CompositionSource {
    fn from(mapping: RuleMapping) -> Self {
        Self::Mapping(mapping)
    }
}

impl From<RuleSetRef> for CompositionSource {
    fn from(rule_set: RuleSetRef) -> Self {
        Self::RuleSet(rule_set)
    }
}

impl From<&RuleSetRef> for CompositionSource {
    fn from(rule_set: &RuleSetRef) -> Self {
        Self::RuleSet(RuleSetRef::clone(rule_set))
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ruleset::RuleSet;
    use rulesets_core::rule_mapping;

    fn yaml(src: &str) -> Value {
        serde_yaml::from_str(src).unwrap()
    }

    fn no_lookup(_: &str) -> Option<RuleSetRef> {
        None
    }

    #[test]
    fn string_resolves_reference() {
        let parent = RuleSet::from_rules("credentials", rule_mapping([("email", "required")]));
        let source = CompositionSource::from_value("child", 0, &yaml("credentials"), |id| {
            (id == "credentials").then(|| parent.clone())
        })
        .unwrap();

        assert!(matches!(source, CompositionSource::RuleSet(ref rs) if rs.name() == "credentials"));
    }

    #[test]
    fn unknown_reference_is_reported_with_index() {
        let err = CompositionSource::from_value("child", 3, &yaml("missing"), no_lookup).unwrap_err();
        match err {
            RuleSetError::UnknownReference { rule_set, index, reference } => {
                assert_eq!(rule_set, "child");
                assert_eq!(index, 3);
                assert_eq!(reference, "missing");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn string_mapping_becomes_inline_mapping() {
        let value = yaml("{name: 'required|string', age: 'integer'}");
        let source = CompositionSource::from_value("child", 0, &value, no_lookup).unwrap();
        match source {
            CompositionSource::Mapping(m) => {
                assert_eq!(m, rule_mapping([("name", "required|string"), ("age", "integer")]));
            }
            other => panic!("expected mapping, got {other:?}"),
        }
    }

    #[test]
    fn scalars_and_sequences_are_invalid() {
        for (src, kind) in [("42", "a number"), ("true", "a boolean"), ("~", "null"), ("[a, b]", "a sequence")] {
            let err = CompositionSource::from_value("child", 1, &yaml(src), no_lookup).unwrap_err();
            match err {
                RuleSetError::InvalidCompositionSource { index, found, .. } => {
                    assert_eq!(index, 1);
                    assert_eq!(found, kind);
                }
                other => panic!("unexpected error for {src}: {other}"),
            }
        }
    }

    #[test]
    fn mapping_with_non_string_rule_is_invalid() {
        let err = CompositionSource::from_value("child", 0, &yaml("{min: 8}"), no_lookup).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("index 0"), "{msg}");
        assert!(msg.contains("field 'min'"), "{msg}");
    }

    #[test]
    fn mapping_with_non_string_field_is_invalid() {
        let err = CompositionSource::from_value("child", 2, &yaml("{1: required}"), no_lookup).unwrap_err();
        assert!(matches!(err, RuleSetError::InvalidCompositionSource { index: 2, .. }));
    }
}
