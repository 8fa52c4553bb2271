//! User interface components and views.
//!
//! Widgets hold only presentation state (cursors, scroll offsets, drafts).
//! Which widget receives input is decided by the state machine in `app`.

mod components;
pub mod layout;
pub mod theme;
mod views;

pub use components::{Component, NotificationManager, TextEditor, TextInput};
pub use layout::PaneLayout;
pub use views::{DetailView, ListView};
