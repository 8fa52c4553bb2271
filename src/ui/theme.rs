//! Theme and styling configuration.

use ratatui::style::{Color, Modifier, Style};

/// Border color of the pane that has focus.
pub const FOCUSED_BORDER: Color = Color::Yellow;

/// Border color of every other pane.
pub const UNFOCUSED_BORDER: Color = Color::Blue;

/// Style for a pane border.
pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(FOCUSED_BORDER)
    } else {
        Style::default().fg(UNFOCUSED_BORDER)
    }
}

/// Style for the row under the list cursor.
pub fn selected_row() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Style for field labels in the detail card.
pub fn label() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Style for de-emphasized text such as placeholders and hints.
pub fn muted() -> Style {
    Style::default().fg(Color::DarkGray)
}
