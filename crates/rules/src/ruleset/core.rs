//! Core [`RuleSet`] struct: declarative composition with one-way injection.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rulesets_core::RuleMapping;
use tracing::{debug, info, warn};

use crate::error::{Result, RuleSetError};
use crate::provider::{FnProvider, RuleProvider};
use crate::source::CompositionSource;

use super::resolve::{fold_sources, merge_declaration, ResolutionPath};

/// Shared handle to a rule set. Composition sources hold these.
pub type RuleSetRef = Arc<RuleSet>;

/// A named, composable set of validation rules.
///
/// Built with [`RuleSet::builder`] and shared as a [`RuleSetRef`].
pub struct RuleSet {
    name: String,
    state: RwLock<RuleSetState>,
}

#[derive(Clone)]
enum RuleSetState {
    /// Resolved from scratch on every `get_rules()`.
    Declarative(Declaration),
    /// Frozen by `combine_with_rules`; returned verbatim from then on.
    Resolved(RuleMapping),
}

#[derive(Clone)]
pub(super) struct Declaration {
    pub(super) provider: Arc<dyn RuleProvider>,
    pub(super) combine_with: Vec<CompositionSource>,
    pub(super) override_rules: bool,
}

impl RuleSet {
    /// Start building a rule set named `name`.
    pub fn builder(name: impl Into<String>) -> RuleSetBuilder {
        RuleSetBuilder {
            name: name.into(),
            provider: Arc::new(RuleMapping::new()),
            combine_with: Vec::new(),
            override_rules: false,
        }
    }

    /// A rule set with static own rules and no composition.
    pub fn from_rules(name: impl Into<String>, rules: RuleMapping) -> RuleSetRef {
        Self::builder(name).rules(rules).build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether `combine_with_rules` has frozen this rule set.
    pub fn is_resolved(&self) -> bool {
        matches!(*self.read_state(), RuleSetState::Resolved(_))
    }

    /// Return the fully resolved rules of this rule set.
    ///
    /// A frozen rule set returns its injected mapping as-is. Otherwise the
    /// own rules are re-derived, every composition source is resolved in
    /// declared order (later sources win), and own rules are written on top:
    /// only for fields no source defines, unless override is enabled.
    /// Nothing is cached.
    ///
    /// Fails with [`RuleSetError::CyclicComposition`] if this rule set
    /// transitively composes with itself.
    pub fn get_rules(&self) -> Result<RuleMapping> {
        self.resolve(&mut ResolutionPath::default())
    }

    pub(crate) fn resolve(&self, path: &mut ResolutionPath) -> Result<RuleMapping> {
        // Snapshot so no lock is held while parents resolve.
        let state = self.read_state().clone();
        let declaration = match state {
            RuleSetState::Resolved(mapping) => return Ok(mapping),
            RuleSetState::Declarative(declaration) => declaration,
        };

        path.enter(self)?;
        let result = merge_declaration(&declaration, path);
        path.leave();

        let rules = result?;
        debug!(
            rule_set = %self.name,
            sources = declaration.combine_with.len(),
            fields = rules.len(),
            "resolved rule set"
        );
        Ok(rules)
    }

    /// Permanently fix this rule set's output to its current rules overlaid
    /// by `sources`, left to right (later sources win).
    ///
    /// The baseline is the previously injected mapping if there is one, so
    /// chained calls keep layering. After this call the own rules,
    /// composition and override flag no longer affect [`get_rules`].
    ///
    /// On error nothing is stored and the rule set is left unchanged.
    ///
    /// [`get_rules`]: RuleSet::get_rules
    pub fn combine_with_rules<I>(&self, sources: I) -> Result<&Self>
    where
        I: IntoIterator,
        I::Item: Into<CompositionSource>,
    {
        let sources: Vec<CompositionSource> = sources.into_iter().map(Into::into).collect();

        let baseline = self.get_rules()?;
        let merged = fold_sources(baseline, &sources, &mut ResolutionPath::default())?;

        info!(
            rule_set = %self.name,
            sources = sources.len(),
            fields = merged.len(),
            "injected combined rules"
        );
        *self.write_state() = RuleSetState::Resolved(merged);
        Ok(self)
    }

    /// Append a composition source to the declaration.
    ///
    /// Fails with [`RuleSetError::AlreadyResolved`] once the rule set is frozen.
    pub fn push_source(&self, source: impl Into<CompositionSource>) -> Result<()> {
        let source = source.into();
        self.modify_declaration(|declaration| declaration.combine_with.push(source))
    }

    /// Change whether own rules override inherited ones.
    ///
    /// Fails with [`RuleSetError::AlreadyResolved`] once the rule set is frozen.
    pub fn set_override_rules(&self, enabled: bool) -> Result<()> {
        self.modify_declaration(|declaration| declaration.override_rules = enabled)
    }

    fn modify_declaration(&self, apply: impl FnOnce(&mut Declaration)) -> Result<()> {
        match &mut *self.write_state() {
            RuleSetState::Declarative(declaration) => {
                apply(declaration);
                Ok(())
            }
            RuleSetState::Resolved(_) => {
                warn!(rule_set = %self.name, "ignoring declaration change on resolved rule set");
                Err(RuleSetError::AlreadyResolved(self.name.clone()))
            }
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, RuleSetState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, RuleSetState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("name", &self.name)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

/// Builder for a declarative [`RuleSet`].
pub struct RuleSetBuilder {
    name: String,
    provider: Arc<dyn RuleProvider>,
    combine_with: Vec<CompositionSource>,
    override_rules: bool,
}

impl RuleSetBuilder {
    /// Static own rules.
    pub fn rules(self, rules: RuleMapping) -> Self {
        self.provider(rules)
    }

    /// Own rules computed by `rules` on every resolution.
    pub fn rules_with<F>(self, rules: F) -> Self
    where
        F: Fn() -> RuleMapping + Send + Sync + 'static,
    {
        self.provider(FnProvider(rules))
    }

    /// Own rules from a concrete [`RuleProvider`] variant.
    pub fn provider<P: RuleProvider + 'static>(mut self, provider: P) -> Self {
        self.provider = Arc::new(provider);
        self
    }

    /// Append a composition source. Sources are merged in the order added.
    pub fn combine_with(mut self, source: impl Into<CompositionSource>) -> Self {
        self.combine_with.push(source.into());
        self
    }

    /// Let own rules override fields inherited from composition sources.
    pub fn override_rules(mut self, enabled: bool) -> Self {
        self.override_rules = enabled;
        self
    }

    pub fn build(self) -> RuleSetRef {
        Arc::new(RuleSet {
            name: self.name,
            state: RwLock::new(RuleSetState::Declarative(Declaration {
                provider: self.provider,
                combine_with: self.combine_with,
                override_rules: self.override_rules,
            })),
        })
    }
}
