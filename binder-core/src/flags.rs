//! The tracked state: a dense, index-addressed vector of booleans, and its
//! printable [`Token`] form.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// FlagVector
// ---------------------------------------------------------------------------

/// Completion flags for every item of a checklist, in enumeration order.
///
/// The length is fixed when the vector is created; mutators never grow or
/// shrink it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlagVector(Vec<bool>);

impl FlagVector {
    /// An all-false vector of `len` flags.
    pub fn new(len: usize) -> Self {
        Self(vec![false; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.0.get(index).copied()
    }

    /// Set flag `index`, returning its previous value, or `None` when out of range.
    pub fn set(&mut self, index: usize, value: bool) -> Option<bool> {
        let slot = self.0.get_mut(index)?;
        Some(std::mem::replace(slot, value))
    }

    /// Flip flag `index`, returning the new value, or `None` when out of range.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let slot = self.0.get_mut(index)?;
        *slot = !*slot;
        Some(*slot)
    }

    pub fn clear_all(&mut self) {
        self.0.iter_mut().for_each(|flag| *flag = false);
    }

    pub fn count_checked(&self) -> usize {
        self.0.iter().filter(|flag| **flag).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}

impl From<Vec<bool>> for FlagVector {
    fn from(flags: Vec<bool>) -> Self {
        Self(flags)
    }
}

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// URL- and JSON-safe encoding of a [`FlagVector`], alphabet `[A-Za-z0-9_-]`.
///
/// Produced by [`crate::codec::encode`]. Tokens read back from fragments or
/// remote records are wrapped unchecked; decoding is tolerant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Token {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
