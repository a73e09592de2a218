//! Checklist definitions.
//!
//! A definition is the JSON data file describing a set: a title and an ordered
//! list of categories, each with an ordered list of card names. The flattened
//! card order (category order, then card order) is the Flag Vector order.
//!
//! ```json
//! {
//!   "title": "New Series",
//!   "categories": [
//!     { "name": "Base", "tabId": "tab-base", "prefix": "base",
//!       "showPrefix": false, "odds": null, "cards": ["Alpha", "Beta"] }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{io_err, DefinitionError};
use crate::flags::FlagVector;

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

/// One tab of a checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: String,
    pub tab_id: String,
    pub prefix: String,
    #[serde(default = "default_show_prefix")]
    pub show_prefix: bool,
    /// Free-form qualifier shown after the heading, e.g. pull odds.
    #[serde(default)]
    pub odds: Option<String>,
    #[serde(default)]
    pub cards: Vec<String>,
}

fn default_show_prefix() -> bool {
    true
}

impl Category {
    /// Item id for the 1-based card `number`, e.g. `C-10`.
    pub fn item_id(&self, number: usize) -> String {
        format!("{}-{}", self.prefix, number)
    }

    /// Display label for the 1-based card `number`.
    pub fn item_label(&self, number: usize, name: &str) -> String {
        if self.show_prefix {
            format!("{}-{} {}", self.prefix, number, name)
        } else {
            format!("{number} - {name}")
        }
    }

    /// Section heading, e.g. `Inserts Cards (IN-1–IN-12) 1:10`.
    pub fn heading(&self) -> String {
        let end = self.cards.len();
        let range = if self.show_prefix {
            format!("{p}-1\u{2013}{p}-{end}", p = self.prefix)
        } else {
            format!("1\u{2013}{end}")
        };
        match self.odds.as_deref().filter(|odds| !odds.is_empty()) {
            Some(odds) => format!("{} Cards ({range}) {odds}", self.name),
            None => format!("{} Cards ({range})", self.name),
        }
    }
}

/// A complete checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistDefinition {
    pub title: String,
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// A single trackable item, positioned in Flag Vector order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRef<'a> {
    /// Flag Vector index.
    pub index: usize,
    pub category: &'a Category,
    /// 1-based position within the category.
    pub number: usize,
    pub name: &'a str,
}

impl ItemRef<'_> {
    pub fn id(&self) -> String {
        self.category.item_id(self.number)
    }

    pub fn label(&self) -> String {
        self.category.item_label(self.number, self.name)
    }
}

impl ChecklistDefinition {
    /// N — the number of trackable items.
    pub fn len(&self) -> usize {
        self.categories.iter().map(|c| c.cards.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A fresh, all-false Flag Vector sized for this definition.
    pub fn blank_flags(&self) -> FlagVector {
        FlagVector::new(self.len())
    }

    /// Every item in Flag Vector order.
    pub fn items(&self) -> impl Iterator<Item = ItemRef<'_>> + '_ {
        self.categories
            .iter()
            .flat_map(|category| {
                category
                    .cards
                    .iter()
                    .enumerate()
                    .map(move |(i, name)| (category, i + 1, name.as_str()))
            })
            .enumerate()
            .map(|(index, (category, number, name))| ItemRef {
                index,
                category,
                number,
                name,
            })
    }

    /// Resolve an item id such as `C-10` to its Flag Vector index.
    ///
    /// Ids are matched case-insensitively on the prefix.
    pub fn find(&self, id: &str) -> Option<usize> {
        let (prefix, number) = id.rsplit_once('-')?;
        let number: usize = number.parse().ok()?;
        self.items()
            .find(|item| item.number == number && item.category.prefix.eq_ignore_ascii_case(prefix))
            .map(|item| item.index)
    }
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

/// Load a definition from a JSON file.
///
/// Returns `DefinitionError::NotFound` if absent, `DefinitionError::Parse`
/// if the JSON does not match the model.
pub fn load_definition(path: &Path) -> Result<ChecklistDefinition, DefinitionError> {
    if !path.exists() {
        return Err(DefinitionError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    serde_json::from_str(&contents).map_err(|source| DefinitionError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Atomically write a definition as pretty JSON with a trailing newline.
///
/// Write flow: serialize → `.json.tmp` sibling → `rename`.
pub fn save_definition(path: &Path, definition: &ChecklistDefinition) -> Result<(), DefinitionError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
    }
    let mut json = serde_json::to_string_pretty(definition)?;
    json.push('\n');
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).map_err(|e| io_err(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| io_err(path, e))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
