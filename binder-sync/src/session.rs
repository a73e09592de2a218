//! Snapshot of the coordinator's in-memory state between terminal runs.

use binder_core::Token;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    pub token: Token,
    #[serde(default)]
    pub last_synced_token: Option<Token>,
    #[serde(default)]
    pub pending_undo: Option<Token>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn older_snapshots_without_optional_fields_load() {
        let session: Session = serde_json::from_str(r#"{"token":"gEA"}"#).unwrap();
        assert_eq!(session.token, Token::from("gEA"));
        assert_eq!(session.last_synced_token, None);
        assert_eq!(session.pending_undo, None);
    }
}
