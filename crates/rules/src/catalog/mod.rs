//! YAML catalog of rule sets declared in host configuration.
//!
//! Composition entries arrive weakly typed here, so this is where
//! [`RuleSetError::InvalidCompositionSource`] is raised.
//!
//! [`RuleSetError::InvalidCompositionSource`]: crate::RuleSetError::InvalidCompositionSource

mod core;
mod document;

#[cfg(test)]
mod tests;

pub use self::core::Catalog;
pub use self::document::{CatalogDocument, RuleSetDefinition};
