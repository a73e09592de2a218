//! Completion counts per category and overall.

use serde::Serialize;

use crate::checklist::ChecklistDefinition;
use crate::flags::FlagVector;

/// Checked / total for some group of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Progress {
    pub checked: usize,
    pub total: usize,
}

impl Progress {
    /// Whole-number percentage, rounding halves up; 0 for an empty group.
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        (200 * self.checked + self.total) / (2 * self.total)
    }
}

/// Progress for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryProgress {
    pub name: String,
    pub tab_id: String,
    pub progress: Progress,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressReport {
    pub categories: Vec<CategoryProgress>,
    pub overall: Progress,
}

impl ProgressReport {
    /// Count `flags` against `definition`. Flags past the end of a short
    /// vector count as unchecked.
    pub fn compute(definition: &ChecklistDefinition, flags: &FlagVector) -> Self {
        let mut categories = Vec::with_capacity(definition.categories.len());
        let mut overall = Progress::default();
        let mut offset = 0;

        for category in &definition.categories {
            let total = category.cards.len();
            let checked = (offset..offset + total)
                .filter(|i| flags.get(*i).unwrap_or(false))
                .count();
            offset += total;

            overall.checked += checked;
            overall.total += total;
            categories.push(CategoryProgress {
                name: category.name.clone(),
                tab_id: category.tab_id.clone(),
                progress: Progress { checked, total },
            });
        }

        Self {
            categories,
            overall,
        }
    }
}
