//! Page addresses and the fragment that carries the shareable token.
//!
//! Writing a fragment *replaces* the current address; only
//! [`FragmentChannel::navigate`] adds a history entry, and only where the
//! channel keeps one.

use std::fmt;
use std::str::FromStr;

use binder_core::Token;

use crate::error::StoreError;
use crate::local_store::LocalStore;

// ---------------------------------------------------------------------------
// PageAddress
// ---------------------------------------------------------------------------

/// `scheme://host/path?query#fragment`, with every part but the host optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageAddress {
    pub scheme: Option<String>,
    pub host: String,
    /// Always starts with `/`.
    pub path: String,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

impl PageAddress {
    /// The same address with its fragment replaced (or removed when empty).
    pub fn with_fragment(&self, fragment: &str) -> Self {
        Self {
            fragment: (!fragment.is_empty()).then(|| fragment.to_string()),
            ..self.clone()
        }
    }

    /// The fragment as a token, if one is present.
    pub fn token(&self) -> Option<Token> {
        self.fragment
            .as_deref()
            .filter(|f| !f.is_empty())
            .map(Token::from)
    }
}

impl FromStr for PageAddress {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (rest, fragment) = match s.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment.to_string())),
            None => (s, None),
        };
        let (rest, query) = match rest.split_once('?') {
            Some((rest, query)) => (rest, Some(query.to_string())),
            None => (rest, None),
        };
        let (scheme, rest) = match rest.split_once("://") {
            Some((scheme, rest)) => (Some(scheme.to_string()), rest),
            None => (None, rest),
        };
        let (host, path) = match rest.find('/') {
            Some(i) => (&rest[..i], rest[i..].to_string()),
            None => (rest, "/".to_string()),
        };
        if host.is_empty() {
            return Err(StoreError::InvalidAddress(s.to_string()));
        }
        Ok(Self {
            scheme,
            host: host.to_string(),
            path,
            query,
            fragment: fragment.filter(|f| !f.is_empty()),
        })
    }
}

impl fmt::Display for PageAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{scheme}://")?;
        }
        write!(f, "{}{}", self.host, self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FragmentChannel
// ---------------------------------------------------------------------------

/// Wherever the current page address lives.
pub trait FragmentChannel {
    fn address(&self) -> Result<PageAddress, StoreError>;

    /// Replace the current address's fragment. Never adds a history entry.
    fn replace_address(&mut self, address: PageAddress) -> Result<(), StoreError>;

    fn read_fragment(&self) -> Result<Option<Token>, StoreError> {
        Ok(self.address()?.token())
    }

    fn write_fragment(&mut self, token: &Token) -> Result<(), StoreError> {
        let next = self.address()?.with_fragment(token.as_str());
        self.replace_address(next)
    }

    /// Go to a new address. Channels without history just replace.
    fn navigate(&mut self, address: PageAddress) -> Result<(), StoreError> {
        self.replace_address(address)
    }
}

// ---------------------------------------------------------------------------
// AddressBar
// ---------------------------------------------------------------------------

/// In-memory address with browser-style history.
#[derive(Debug, Clone)]
pub struct AddressBar {
    history: Vec<PageAddress>,
    current: usize,
}

impl AddressBar {
    pub fn new(address: PageAddress) -> Self {
        Self {
            history: vec![address],
            current: 0,
        }
    }

    pub fn current(&self) -> &PageAddress {
        &self.history[self.current]
    }

    #[cfg(test)]
    fn history_len(&self) -> usize {
        self.history.len()
    }
}

impl FragmentChannel for AddressBar {
    fn address(&self) -> Result<PageAddress, StoreError> {
        Ok(self.current().clone())
    }

    fn replace_address(&mut self, address: PageAddress) -> Result<(), StoreError> {
        self.history[self.current] = address;
        Ok(())
    }

    /// Push a new entry, dropping any forward history.
    fn navigate(&mut self, address: PageAddress) -> Result<(), StoreError> {
        self.history.truncate(self.current + 1);
        self.history.push(address);
        self.current = self.history.len() - 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// StoredAddress
// ---------------------------------------------------------------------------

/// Address persisted in a [`LocalStore`] under one key, so a terminal session
/// keeps its shareable link between runs.
#[derive(Debug, Clone)]
pub struct StoredAddress<S> {
    store: S,
    key: String,
    default: PageAddress,
}

impl<S: LocalStore> StoredAddress<S> {
    /// `default` is used until an address has been written under `key`.
    pub fn new(store: S, key: impl Into<String>, default: PageAddress) -> Self {
        Self {
            store,
            key: key.into(),
            default,
        }
    }
}

impl<S: LocalStore> FragmentChannel for StoredAddress<S> {
    fn address(&self) -> Result<PageAddress, StoreError> {
        match self.store.get(&self.key)? {
            Some(raw) => raw.parse(),
            None => Ok(self.default.clone()),
        }
    }

    fn replace_address(&mut self, address: PageAddress) -> Result<(), StoreError> {
        self.store.set(&self.key, &address.to_string())
    }
}
