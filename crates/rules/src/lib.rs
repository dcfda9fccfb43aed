//! Composable validation rule sets.
//!
//! This crate provides:
//! - [`RuleSet`]: a named field → rule-expression mapping that composes with
//!   parent rule sets and inline mappings, with opt-in override precedence
//! - Runtime injection via [`RuleSet::combine_with_rules`], which freezes a
//!   rule set's resolved output permanently
//! - Cycle detection across composition graphs
//! - A YAML [`Catalog`] that builds rule sets from host configuration

pub mod catalog;
pub mod error;
pub mod provider;
pub mod ruleset;
pub mod source;

pub use catalog::{Catalog, CatalogDocument, RuleSetDefinition};
pub use error::{Result, RuleSetError};
pub use provider::RuleProvider;
pub use ruleset::{RuleSet, RuleSetBuilder, RuleSetRef};
pub use rulesets_core::{overlay, rule_mapping, FieldId, RuleExpression, RuleMapping};
pub use source::CompositionSource;
