//! Reusable UI components.
//!
//! Each widget owns its own state and reacts to the keys forwarded to it by
//! the state machine. None of them know about modes or tasks.

mod input;
mod loading;
mod notification;
mod text_editor;

pub use input::TextInput;
pub use loading::LoadingIndicator;
pub use notification::NotificationManager;
pub use text_editor::TextEditor;

use crossterm::event::KeyEvent;

/// What a component did with a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// The text content changed.
    Edited,
    /// The text cursor moved without editing.
    CursorMoved,
    /// The highlighted row changed.
    SelectionChanged,
    /// The visible window scrolled.
    Scrolled,
}

/// A widget that accepts forwarded input.
pub trait Component {
    /// Handle a key. Returns `None` when the key had no effect.
    fn handle_input(&mut self, key: KeyEvent) -> Option<Action>;

    /// React to a new size for the area the component is drawn in.
    fn resize(&mut self, _width: u16, _height: u16) {}
}
