//! Event handling for the application.
//!
//! Terminal input, resizes, timer ticks and background task completions all
//! arrive at the state machine as a single [`Event`] type.

mod handler;
mod keys;

pub use handler::EventHandler;
pub use keys::{KeyAction, KeyBindings};

use crossterm::event::KeyEvent;

use crate::tasks::TaskMessage;

/// Everything the state machine reacts to.
#[derive(Debug)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// The terminal was resized to `(width, height)`.
    Resize(u16, u16),
    /// The tick interval elapsed without input.
    Tick,
    /// A background task finished.
    Task(TaskMessage),
}

impl From<TaskMessage> for Event {
    fn from(message: TaskMessage) -> Self {
        Event::Task(message)
    }
}
