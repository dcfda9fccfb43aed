//! Merge algorithm and cycle tracking for rule-set resolution.

use rulesets_core::{overlay, RuleMapping};

use crate::error::{Result, RuleSetError};
use crate::source::CompositionSource;

use super::core::{Declaration, RuleSet};

/// Rule sets currently being resolved, outermost first.
///
/// Entries are pushed on entry and popped on exit, so shared parents in a
/// diamond-shaped composition are not mistaken for cycles.
#[derive(Debug, Default)]
pub(crate) struct ResolutionPath {
    frames: Vec<(usize, String)>,
}

impl ResolutionPath {
    pub(crate) fn enter(&mut self, rule_set: &RuleSet) -> Result<()> {
        let key = rule_set as *const RuleSet as usize;
        if let Some(start) = self.frames.iter().position(|(k, _)| *k == key) {
            let mut path: Vec<String> = self.frames[start..]
                .iter()
                .map(|(_, name)| name.clone())
                .collect();
            path.push(rule_set.name().to_string());
            return Err(RuleSetError::CyclicComposition { path });
        }
        self.frames.push((key, rule_set.name().to_string()));
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.frames.pop();
    }
}

/// Resolve a declarative rule set.
///
/// Parents are folded in declared order (later wins), then own rules are
/// written on top: only for absent fields unless `override_rules` is set.
pub(super) fn merge_declaration(
    declaration: &Declaration,
    path: &mut ResolutionPath,
) -> Result<RuleMapping> {
    let own = declaration.provider.rules();

    let mut merged = fold_sources(RuleMapping::new(), &declaration.combine_with, path)?;

    for (field, rule) in own {
        if declaration.override_rules || !merged.contains_key(&field) {
            merged.insert(field, rule);
        }
    }

    Ok(merged)
}

/// Overlay each source onto `base`, left to right; later sources win.
///
/// Every source is resolved before the first overlay, so a failing source
/// never leaves a partially merged mapping behind.
pub(super) fn fold_sources(
    mut base: RuleMapping,
    sources: &[CompositionSource],
    path: &mut ResolutionPath,
) -> Result<RuleMapping> {
    let resolved = sources
        .iter()
        .map(|source| source.resolve(path))
        .collect::<Result<Vec<_>>>()?;

    for mapping in &resolved {
        overlay(&mut base, mapping);
    }
    Ok(base)
}
