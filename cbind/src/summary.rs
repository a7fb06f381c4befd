use std::collections::BTreeMap;
use std::fmt::Display;

use cbind_translate::registry::SkipCategory;

/// Counts of what happened to each declaration in a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    /// Declarations that produced output, hand-written replacements included
    pub generated: usize,
    pub overridden: usize,
    pub skipped: BTreeMap<SkipCategory, usize>,
}

impl Summary {
    pub fn skip(&mut self, category: SkipCategory) {
        *self.skipped.entry(category).or_default() += 1;
    }

    pub fn skipped(&self, category: SkipCategory) -> usize {
        self.skipped.get(&category).copied().unwrap_or(0)
    }

    pub fn intentional(&self) -> usize {
        self.skipped
            .iter()
            .filter(|(c, _)| c.is_intentional())
            .map(|(_, n)| n)
            .sum()
    }

    pub fn todo(&self) -> usize {
        self.skipped
            .iter()
            .filter(|(c, _)| !c.is_intentional())
            .map(|(_, n)| n)
            .sum()
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} decls total, {} generated, {} skipped intentionally / {} TODO",
            self.total,
            self.generated,
            self.intentional(),
            self.todo()
        )
    }
}
