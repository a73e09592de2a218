//! Scaffolding for new, empty checklist definitions.
//!
//! The result has every category in place with an empty `cards` list, ready
//! for the card names to be filled in by hand.

use std::path::{Path, PathBuf};

use crate::checklist::{save_definition, Category, ChecklistDefinition};
use crate::error::DefinitionError;

/// Request for one category of a new definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategorySpec {
    /// The fixed, unprefixed base set. At most one per definition.
    Base,
    Named {
        name: String,
        /// Defaults to [`default_tab_id`] of `name`.
        tab_id: Option<String>,
        prefix: String,
        show_prefix: bool,
        odds: Option<String>,
    },
}

impl CategorySpec {
    /// A prefixed category with the usual defaults.
    pub fn named(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        CategorySpec::Named {
            name: name.into(),
            tab_id: None,
            prefix: prefix.into(),
            show_prefix: true,
            odds: None,
        }
    }
}

/// `"New Series"` → `"new_series"`.
pub fn default_slug(title: &str) -> String {
    title.trim().to_lowercase().replace(' ', "_")
}

/// `"Gold Foil"` → `"tab-gold-foil"`.
pub fn default_tab_id(name: &str) -> String {
    format!("tab-{}", name.trim().to_lowercase().replace(' ', "-"))
}

/// Build an empty definition from `title` and category requests.
pub fn scaffold(title: &str, specs: &[CategorySpec]) -> Result<ChecklistDefinition, DefinitionError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DefinitionError::Invalid("series name is required".to_string()));
    }
    if specs.is_empty() {
        return Err(DefinitionError::Invalid(
            "at least one category is required".to_string(),
        ));
    }

    let mut base_used = false;
    let mut categories = Vec::with_capacity(specs.len());
    for spec in specs {
        let category = match spec {
            CategorySpec::Base => {
                if base_used {
                    return Err(DefinitionError::Invalid(
                        "only one base category is allowed".to_string(),
                    ));
                }
                base_used = true;
                Category {
                    name: "Base".to_string(),
                    tab_id: "tab-base".to_string(),
                    prefix: "base".to_string(),
                    show_prefix: false,
                    odds: None,
                    cards: vec![],
                }
            }
            CategorySpec::Named {
                name,
                tab_id,
                prefix,
                show_prefix,
                odds,
            } => {
                let name = name.trim();
                let prefix = prefix.trim();
                if name.is_empty() {
                    return Err(DefinitionError::Invalid("category name is required".to_string()));
                }
                if prefix.is_empty() {
                    return Err(DefinitionError::Invalid(format!(
                        "category '{name}' needs a prefix"
                    )));
                }
                Category {
                    name: name.to_string(),
                    tab_id: tab_id
                        .as_deref()
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .map(str::to_string)
                        .unwrap_or_else(|| default_tab_id(name)),
                    prefix: prefix.to_string(),
                    show_prefix: *show_prefix,
                    odds: odds
                        .as_deref()
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(str::to_string),
                    cards: vec![],
                }
            }
        };
        categories.push(category);
    }

    Ok(ChecklistDefinition {
        title: title.to_string(),
        categories,
    })
}

/// Write `definition` to `<data_dir>/<slug>.json`.
///
/// Returns `DefinitionError::AlreadyExists` unless `force` is set.
pub fn write_new_at(
    data_dir: &Path,
    slug: &str,
    definition: &ChecklistDefinition,
    force: bool,
) -> Result<PathBuf, DefinitionError> {
    let path = data_dir.join(format!("{slug}.json"));
    if path.exists() && !force {
        return Err(DefinitionError::AlreadyExists { path });
    }
    save_definition(&path, definition)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::load_definition;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_derived_from_names() {
        assert_eq!(default_slug("New Series"), "new_series");
        assert_eq!(default_tab_id("Gold Foil"), "tab-gold-foil");
    }

    #[test]
    fn base_category_has_fixed_shape() {
        let def = scaffold("Set", &[CategorySpec::Base]).expect("scaffold");
        let base = &def.categories[0];
        assert_eq!(base.name, "Base");
        assert_eq!(base.tab_id, "tab-base");
        assert_eq!(base.prefix, "base");
        assert!(!base.show_prefix);
        assert!(base.cards.is_empty());
    }

    #[test]
    fn named_category_fills_defaults_and_drops_blank_odds() {
        let spec = CategorySpec::Named {
            name: "Gold Foil".to_string(),
            tab_id: None,
            prefix: "GF".to_string(),
            show_prefix: true,
            odds: Some("  ".to_string()),
        };
        let def = scaffold("Set", &[spec]).expect("scaffold");
        assert_eq!(def.categories[0].tab_id, "tab-gold-foil");
        assert!(def.categories[0].odds.is_none());
    }

    #[test]
    fn rejects_second_base_and_missing_prefix() {
        let err = scaffold("Set", &[CategorySpec::Base, CategorySpec::Base]).unwrap_err();
        assert!(err.to_string().contains("only one base"));
        let err = scaffold("Set", &[CategorySpec::named("Inserts", " ")]).unwrap_err();
        assert!(err.to_string().contains("needs a prefix"));
        assert!(scaffold(" ", &[CategorySpec::Base]).is_err());
        assert!(scaffold("Set", &[]).is_err());
    }

    #[test]
    fn write_refuses_overwrite_without_force() {
        let dir = TempDir::new().expect("tempdir");
        let def = scaffold("New Series", &[CategorySpec::Base]).expect("scaffold");
        let path = write_new_at(dir.path(), "new_series", &def, false).expect("write");
        assert_eq!(load_definition(&path).expect("load"), def);

        let err = write_new_at(dir.path(), "new_series", &def, false).unwrap_err();
        assert!(matches!(err, DefinitionError::AlreadyExists { .. }));
        write_new_at(dir.path(), "new_series", &def, true).expect("forced write");
    }
}
