//! Rule sets and the rule-combination algorithm.
//!
//! A rule set is either *declarative* (own rules from a [`RuleProvider`],
//! ordered composition sources, an override flag) or *resolved* (a frozen
//! mapping installed by [`RuleSet::combine_with_rules`]). The transition is
//! one-way.
//!
//! [`RuleProvider`]: crate::RuleProvider

mod core;
mod resolve;


pub use self::core::{RuleSet, RuleSetBuilder, RuleSetRef};
pub(crate) use self::resolve::ResolutionPath;
