//! `binder new <title> [--base] [--category NAME=PREFIX[;ODDS[;TAB[;noprefix]]]]...`

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Args;

use binder_core::scaffold::{self, CategorySpec};

/// Scaffold a new, empty checklist definition.
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Series name, used as the definition title.
    pub title: String,

    /// File name without `.json`; defaults to the lowercased title with
    /// spaces replaced by `_`.
    #[arg(long)]
    pub slug: Option<String>,

    /// Directory the definition is written to.
    #[arg(long, default_value = "docs/data")]
    pub data_dir: PathBuf,

    /// Start with the unprefixed base category.
    #[arg(long)]
    pub base: bool,

    /// Extra category, e.g. `Gold Foil=GF;1:10` or `Autos=AU;;tab-autos;noprefix`.
    /// Empty segments keep the default. Repeatable, kept in order.
    #[arg(long = "category", value_name = "NAME=PREFIX[;ODDS[;TAB[;noprefix]]]")]
    pub categories: Vec<CategoryArg>,

    /// Overwrite an existing file.
    #[arg(long)]
    pub force: bool,
}

/// Thin wrapper so clap can parse a [`CategorySpec`] from one argument.
#[derive(Debug, Clone)]
pub struct CategoryArg(pub CategorySpec);

impl FromStr for CategoryArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let Some((name, rest)) = s.split_once('=') else {
            return Err(format!("expected NAME=PREFIX[;ODDS[;TAB[;noprefix]]], got '{s}'"));
        };
        let mut segments = rest.split(';').map(str::trim);
        let prefix = segments.next().unwrap_or_default();
        let odds = optional(segments.next());
        let tab_id = optional(segments.next());
        let show_prefix = match segments.next() {
            None | Some("") | Some("prefix") => true,
            Some("noprefix") => false,
            Some(other) => return Err(format!("expected 'prefix' or 'noprefix', got '{other}'")),
        };
        if segments.next().is_some() {
            return Err(format!("too many ';' segments in '{s}'"));
        }
        if name.trim().is_empty() || prefix.is_empty() {
            return Err(format!("category '{s}' needs both a name and a prefix"));
        }
        Ok(Self(CategorySpec::Named {
            name: name.trim().to_string(),
            tab_id,
            prefix: prefix.to_string(),
            show_prefix,
            odds,
        }))
    }
}

fn optional(segment: Option<&str>) -> Option<String> {
    segment.filter(|s| !s.is_empty()).map(str::to_string)
}

impl NewArgs {
    pub fn run(self) -> Result<()> {
        let mut specs = Vec::with_capacity(self.categories.len() + 1);
        if self.base {
            specs.push(CategorySpec::Base);
        }
        specs.extend(self.categories.into_iter().map(|c| c.0));

        let definition = scaffold::scaffold(&self.title, &specs)
            .with_context(|| format!("cannot scaffold '{}'", self.title))?;
        let slug = self
            .slug
            .unwrap_or_else(|| scaffold::default_slug(&definition.title));
        let path = scaffold::write_new_at(&self.data_dir, &slug, &definition, self.force)
            .with_context(|| format!("failed to write '{slug}.json'"))?;

        println!(
            "✓ Created {} with {} categories",
            path.display(),
            definition.categories.len()
        );
        println!("  Fill in each category's \"cards\" list, then run 'binder status {}'", path.display());
        Ok(())
    }
}
