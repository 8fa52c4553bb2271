//! Key binding definitions.
//!
//! Only keys that drive mode transitions are bound here. Everything else is
//! forwarded to the focused widget.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// A mode-level action a key can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Focus the query field.
    Search,
    /// Confirm: run the query, toggle detail focus or submit a comment.
    Submit,
    /// Leave the query field or discard the comment draft.
    Cancel,
    /// Start writing a comment on the selected issue.
    Comment,
    /// Quit unless the query bar has focus.
    Quit,
    /// Quit from any mode.
    ForceQuit,
}

/// Key binding configuration.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub search: KeyCode,
    pub comment: KeyCode,
    pub quit: KeyCode,
}

impl KeyBindings {
    /// Resolve `key` to an action, if it is bound.
    ///
    /// Enter with Alt held is left unbound so text editors can use it for
    /// newlines.
    pub fn action(&self, key: &KeyEvent) -> Option<KeyAction> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(KeyAction::ForceQuit),
                _ => None,
            };
        }

        match key.code {
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => None,
            KeyCode::Enter => Some(KeyAction::Submit),
            KeyCode::Esc => Some(KeyAction::Cancel),
            code if code == self.search => Some(KeyAction::Search),
            code if code == self.comment => Some(KeyAction::Comment),
            code if code == self.quit => Some(KeyAction::Quit),
            _ => None,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            search: KeyCode::Char('/'),
            comment: KeyCode::Char('m'),
            quit: KeyCode::Char('q'),
        }
    }
}
