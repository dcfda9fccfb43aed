//! Core [`Catalog`] struct: builds and resolves rule sets declared in YAML.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use rulesets_core::RuleMapping;
use serde_yaml::Value;
use tracing::{info, warn};

use crate::error::{Result, RuleSetError};
use crate::ruleset::{RuleSet, RuleSetRef};
use crate::source::CompositionSource;

use super::document::CatalogDocument;

struct CatalogEntry {
    rule_set: RuleSetRef,
    description: Option<String>,
}

/// Named rule sets built from a [`CatalogDocument`].
///
/// Entries keep their declaration order. Composition references may point
/// to any entry, before or after the referencing one.
pub struct Catalog {
    entries: IndexMap<String, CatalogEntry>,
}

impl Catalog {
    /// Read and build a catalog from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let catalog = Self::from_yaml_str(&contents)?;
        info!(path = %path.display(), rule_sets = catalog.len(), "loaded rule-set catalog");
        Ok(catalog)
    }

    /// Parse and build a catalog from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let document: CatalogDocument = serde_yaml::from_str(yaml)?;
        Self::from_document(&document)
    }

    /// Build every rule set of `document`.
    ///
    /// First pass: create each rule set with its own rules and override flag,
    /// rejecting empty or duplicate ids. Second pass: validate each
    /// `combine_with` entry and attach it, so references resolve regardless
    /// of declaration order.
    pub fn from_document(document: &CatalogDocument) -> Result<Self> {
        let mut catalog = Self {
            entries: IndexMap::with_capacity(document.rule_sets.len()),
        };

        for def in &document.rule_sets {
            if def.id.trim().is_empty() {
                return Err(RuleSetError::Validation(
                    "rule set id must not be empty".to_string(),
                ));
            }
            if catalog.entries.contains_key(&def.id) {
                return Err(RuleSetError::DuplicateRuleSet(def.id.clone()));
            }

            let rule_set = RuleSet::builder(def.id.clone())
                .rules(def.rules.clone())
                .override_rules(def.override_rules)
                .build();
            catalog.entries.insert(
                def.id.clone(),
                CatalogEntry {
                    rule_set,
                    description: def.description.clone(),
                },
            );
        }

        for def in &document.rule_sets {
            let sources = catalog.sources_for(&def.id, &def.combine_with)?;
            let rule_set = catalog.require(&def.id)?;
            for source in sources {
                rule_set.push_source(source)?;
            }
        }

        Ok(catalog)
    }

    /// Look up a rule set by id.
    pub fn get(&self, id: &str) -> Option<RuleSetRef> {
        self.entries.get(id).map(|entry| RuleSetRef::clone(&entry.rule_set))
    }

    pub fn description(&self, id: &str) -> Option<&str> {
        self.entries.get(id).and_then(|entry| entry.description.as_deref())
    }

    /// Rule set ids in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolved rules of the rule set `id`.
    pub fn resolve(&self, id: &str) -> Result<RuleMapping> {
        self.require(id)?.get_rules()
    }

    /// Resolve every rule set, collecting failures per id instead of
    /// stopping at the first one.
    pub fn resolve_all(&self) -> IndexMap<String, Result<RuleMapping>> {
        self.entries
            .iter()
            .map(|(id, entry)| {
                let result = entry.rule_set.get_rules();
                if let Err(ref e) = result {
                    warn!(rule_set = %id, error = %e, "failed to resolve rule set");
                }
                (id.clone(), result)
            })
            .collect()
    }

    /// Inject weakly-typed `extra` sources into the rule set `id` and return
    /// its new resolved rules.
    ///
    /// Every entry is validated before anything is merged; an invalid entry
    /// leaves the rule set unchanged.
    pub fn combine(&self, id: &str, extra: &[Value]) -> Result<RuleMapping> {
        let rule_set = self.require(id)?;
        let sources = self.sources_for(id, extra)?;
        rule_set.combine_with_rules(sources)?.get_rules()
    }

    fn require(&self, id: &str) -> Result<RuleSetRef> {
        self.get(id)
            .ok_or_else(|| RuleSetError::UnknownRuleSet(id.to_string()))
    }

    fn sources_for(&self, id: &str, values: &[Value]) -> Result<Vec<CompositionSource>> {
        values
            .iter()
            .enumerate()
            .map(|(index, value)| {
                CompositionSource::from_value(id, index, value, |reference| self.get(reference))
            })
            .collect()
    }
}
