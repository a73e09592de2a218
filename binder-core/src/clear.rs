//! "Clear Selections" / "Undo" toggle.

use crate::codec;
use crate::flags::{FlagVector, Token};

/// Two-state clear control.
///
/// In `Normal`, pressing remembers the current token and clears every flag.
/// In `PendingUndo`, pressing restores the remembered token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ClearToggle {
    #[default]
    Normal,
    PendingUndo(Token),
}

/// What a press of the toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearAction {
    Cleared,
    Restored,
}

impl ClearToggle {
    pub fn press(&mut self, flags: &mut FlagVector) -> ClearAction {
        match std::mem::take(self) {
            ClearToggle::Normal => {
                *self = ClearToggle::PendingUndo(codec::encode(flags));
                flags.clear_all();
                ClearAction::Cleared
            }
            ClearToggle::PendingUndo(previous) => {
                *flags = codec::decode(previous.as_str(), flags.len());
                ClearAction::Restored
            }
        }
    }

    /// Button caption for the current state.
    pub fn label(&self) -> &'static str {
        match self {
            ClearToggle::Normal => "Clear Selections",
            ClearToggle::PendingUndo(_) => "Undo",
        }
    }

    pub fn pending(&self) -> Option<&Token> {
        match self {
            ClearToggle::Normal => None,
            ClearToggle::PendingUndo(token) => Some(token),
        }
    }
}
