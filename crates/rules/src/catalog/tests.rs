//! Tests for the rule-set catalog.

use std::fs;

use rulesets_core::rule_mapping;
use tempfile::TempDir;

use super::*;
use crate::error::RuleSetError;

const CATALOG_YAML: &str = r#"
rule_sets:
  - id: registration
    description: Sign-up form
    override_rules: true
    combine_with:
      - credentials
      - name: "required|string"
    rules:
      password: "required|min:8|confirmed"
  - id: credentials
    rules:
      email: "required|email"
      password: "required|min:8"
  - id: profile
    combine_with:
      - registration
    rules:
      password: "nullable"
      bio: "max:500"
"#;

fn yaml(src: &str) -> serde_yaml::Value {
    serde_yaml::from_str(src).unwrap()
}

#[test]
fn builds_rule_sets_in_declaration_order() {
    let catalog = Catalog::from_yaml_str(CATALOG_YAML).unwrap();

    assert_eq!(catalog.len(), 3);
    assert!(!catalog.is_empty());
    assert_eq!(
        catalog.ids().collect::<Vec<_>>(),
        vec!["registration", "credentials", "profile"]
    );
    assert_eq!(catalog.description("registration"), Some("Sign-up form"));
    assert_eq!(catalog.description("credentials"), None);
}

#[test]
fn forward_references_resolve() {
    let catalog = Catalog::from_yaml_str(CATALOG_YAML).unwrap();

    assert_eq!(
        catalog.resolve("registration").unwrap(),
        rule_mapping([
            ("email", "required|email"),
            ("password", "required|min:8|confirmed"),
            ("name", "required|string"),
        ])
    );
}

#[test]
fn override_disabled_keeps_inherited_field() {
    let catalog = Catalog::from_yaml_str(CATALOG_YAML).unwrap();
    let rules = catalog.resolve("profile").unwrap();

    assert_eq!(rules["password"], "required|min:8|confirmed");
    assert_eq!(rules["bio"], "max:500");
    assert_eq!(rules.len(), 4);
}

#[test]
fn invalid_entry_reports_index() {
    let yaml = r#"
rule_sets:
  - id: broken
    combine_with:
      - email: "required"
      - 42
"#;
    match Catalog::from_yaml_str(yaml) {
        Err(RuleSetError::InvalidCompositionSource { rule_set, index, found }) => {
            assert_eq!(rule_set, "broken");
            assert_eq!(index, 1);
            assert_eq!(found, "a number");
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected an error"),
    }
}

#[test]
fn unknown_reference_fails_to_build() {
    let yaml = r#"
rule_sets:
  - id: child
    combine_with: [ghost]
"#;
    let err = Catalog::from_yaml_str(yaml).err().unwrap();
    assert!(matches!(
        err,
        RuleSetError::UnknownReference { ref reference, index: 0, .. } if reference == "ghost"
    ));
}

#[test]
fn duplicate_and_empty_ids_are_rejected() {
    let duplicate = r#"
rule_sets:
  - id: same
  - id: same
"#;
    assert!(matches!(
        Catalog::from_yaml_str(duplicate),
        Err(RuleSetError::DuplicateRuleSet(ref id)) if id == "same"
    ));

    let empty = r#"
rule_sets:
  - id: "  "
"#;
    assert!(matches!(
        Catalog::from_yaml_str(empty),
        Err(RuleSetError::Validation(_))
    ));
}

#[test]
fn unknown_fields_are_parse_errors() {
    let yaml = r#"
rule_sets:
  - id: typo
    combine: [other]
"#;
    assert!(matches!(Catalog::from_yaml_str(yaml), Err(RuleSetError::Parse(_))));
}

#[test]
fn cycles_surface_on_resolution() {
    let yaml = r#"
rule_sets:
  - id: a
    combine_with: [b]
  - id: b
    combine_with: [a]
  - id: standalone
    rules:
      x: "required"
"#;
    let catalog = Catalog::from_yaml_str(yaml).unwrap();

    match catalog.resolve("a") {
        Err(RuleSetError::CyclicComposition { path }) => assert_eq!(path, vec!["a", "b", "a"]),
        other => panic!("expected cycle, got {other:?}"),
    }

    let all = catalog.resolve_all();
    assert!(all["a"].is_err());
    assert!(all["b"].is_err());
    assert_eq!(all["standalone"].as_ref().unwrap()["x"], "required");
}

#[test]
fn resolve_unknown_id() {
    let catalog = Catalog::from_yaml_str(CATALOG_YAML).unwrap();
    assert!(catalog.get("nope").is_none());
    assert!(matches!(
        catalog.resolve("nope"),
        Err(RuleSetError::UnknownRuleSet(ref id)) if id == "nope"
    ));
}

#[test]
fn combine_injects_weakly_typed_sources() {
    let catalog = Catalog::from_yaml_str(CATALOG_YAML).unwrap();

    let rules = catalog
        .combine("credentials", &[yaml("{name: 'required|string'}"), yaml("profile")])
        .unwrap();

    assert_eq!(rules["email"], "required|email");
    assert_eq!(rules["name"], "required|string");
    assert_eq!(rules["bio"], "max:500");
    // profile resolves password from registration, and is merged last.
    assert_eq!(rules["password"], "required|min:8|confirmed");

    let rule_set = catalog.get("credentials").unwrap();
    assert!(rule_set.is_resolved());
    assert_eq!(catalog.resolve("credentials").unwrap(), rules);
}

#[test]
fn combine_with_invalid_source_changes_nothing() {
    let catalog = Catalog::from_yaml_str(CATALOG_YAML).unwrap();

    let err = catalog
        .combine("credentials", &[yaml("{name: 'string'}"), yaml("[1, 2]")])
        .unwrap_err();

    assert!(matches!(err, RuleSetError::InvalidCompositionSource { index: 1, .. }));
    assert!(!catalog.get("credentials").unwrap().is_resolved());
    assert_eq!(catalog.resolve("credentials").unwrap().len(), 2);
}

#[test]
fn loads_from_file() {
    let dir = TempDir::new().expect("create tempdir");
    let path = dir.path().join("catalog.yml");
    fs::write(&path, CATALOG_YAML).unwrap();

    let catalog = Catalog::from_file(&path).unwrap();
    assert_eq!(catalog.len(), 3);

    let missing = Catalog::from_file(&dir.path().join("missing.yml"));
    assert!(matches!(missing, Err(RuleSetError::Io(_))));
}

#[test]
fn empty_document_is_empty_catalog() {
    let catalog = Catalog::from_document(&CatalogDocument::default()).unwrap();
    assert!(catalog.is_empty());
}
