//! Generator → (well, stack) resolution.

use crate::{CustomGrouping, GenerAliases, GenerId, WellStackSpec};
use ahash::AHashMap;
use serde::Serialize;

/// The well and stack a generator belongs to. Empty strings mean unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WellMatch {
    pub well: String,
    pub stack: String,
}

impl WellMatch {
    pub fn new(well: impl Into<String>, stack: impl Into<String>) -> Self {
        Self {
            well: well.into(),
            stack: stack.into(),
        }
    }

    /// Neither the specification nor the fallback mappings knew the generator.
    pub fn is_miss(&self) -> bool {
        self.well.is_empty() && self.stack.is_empty()
    }
}

/// Read-only lookup built once per scenario.
///
/// Lookups give the same answer as scanning stacks, then wells, then each
/// well's generator list in declaration order and taking the first hit.
#[derive(Debug, Clone, Default)]
pub struct WellStackIndex {
    by_gener: AHashMap<GenerId, WellMatch>,
    aliases: GenerAliases,
    grouping: CustomGrouping,
}

impl WellStackIndex {
    pub fn new(spec: &WellStackSpec) -> Self {
        let mut by_gener = AHashMap::new();
        for (stack_name, stack) in spec {
            for (well_name, geners) in &stack.geners {
                for gener in geners {
                    by_gener
                        .entry(gener.clone())
                        .or_insert_with(|| WellMatch::new(well_name.as_str(), stack_name.as_str()));
                }
            }
        }
        Self {
            by_gener,
            aliases: GenerAliases::new(),
            grouping: CustomGrouping::new(),
        }
    }

    /// Adds the alias and grouping mappings consulted when the spec has no entry.
    #[must_use]
    pub fn with_fallback(mut self, aliases: GenerAliases, grouping: CustomGrouping) -> Self {
        self.aliases = aliases;
        self.grouping = grouping;
        self
    }

    pub fn len(&self) -> usize {
        self.by_gener.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_gener.is_empty()
    }

    pub fn aliases(&self) -> &GenerAliases {
        &self.aliases
    }

    /// Resolves a generator, falling back to alias + custom grouping.
    pub fn lookup(&self, gener: &GenerId) -> WellMatch {
        if let Some(found) = self.by_gener.get(gener) {
            return found.clone();
        }
        self.fallback(gener)
    }

    fn fallback(&self, gener: &GenerId) -> WellMatch {
        let well = self.aliases.get(&gener.name).cloned().unwrap_or_default();
        let stack = self
            .grouping
            .iter()
            .find(|(_, members)| {
                members
                    .iter()
                    .any(|m| (!well.is_empty() && *m == well) || *m == gener.name)
            })
            .map(|(label, _)| label.clone())
            .unwrap_or_default();
        WellMatch { well, stack }
    }
}
