//! Remote addressing and payload types.

use std::fmt;
use std::str::FromStr;

use binder_core::Token;
use serde::{Deserialize, Serialize};

/// The secret that authorises writes: an API key or an account id.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials(String);

impl Credentials {
    /// Trims surrounding whitespace; `None` when nothing is left.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credentials(***)")
    }
}

/// Where a Sync Record lives, in whatever form the backend issued.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RemoteLocator {
    /// A self-describing record URI handed out on create.
    Uri(String),
    /// Account id plus a fixed, per-checklist basket name.
    Basket { account_id: String, basket: String },
}

const BASKET_PREFIX: &str = "basket:";

/// Persisted form: the bare URI, or `basket:<account_id>/<basket>`.
impl fmt::Display for RemoteLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteLocator::Uri(uri) => f.write_str(uri),
            RemoteLocator::Basket { account_id, basket } => {
                write!(f, "{BASKET_PREFIX}{account_id}/{basket}")
            }
        }
    }
}

impl FromStr for RemoteLocator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("empty locator".to_string());
        }
        match s.strip_prefix(BASKET_PREFIX) {
            Some(rest) => match rest.split_once('/') {
                Some((account_id, basket)) if !account_id.is_empty() && !basket.is_empty() => {
                    Ok(RemoteLocator::Basket {
                        account_id: account_id.to_string(),
                        basket: basket.to_string(),
                    })
                }
                _ => Err(format!("malformed basket locator '{s}'")),
            },
            None => Ok(RemoteLocator::Uri(s.to_string())),
        }
    }
}

/// The remote payload, `{"state": "<token>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRecord {
    pub state: Token,
}
