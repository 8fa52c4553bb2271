//! Single-line text input used for the JQL query bar.
//!
//! The cursor counts characters, not bytes, so multi-byte input such as
//! accented project names or emoji is edited safely.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Position, Rect},
    style::{Color, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{Action, Component};
use crate::ui::theme;

/// A text input widget.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: String,
    /// Cursor position in characters.
    cursor: usize,
    placeholder: String,
}

impl TextInput {
    /// Create a new empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new input with an initial value and the cursor at the end.
    #[cfg(test)]
    pub fn with_value(value: impl Into<String>) -> Self {
        let mut input = Self::new();
        input.set_value(value);
        input
    }

    /// Set the placeholder text.
    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
    }

    /// The placeholder text.
    #[cfg(test)]
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// The current value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Set the value and move the cursor to the end.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.char_count();
    }

    /// Clear the input.
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Whether the input is empty.
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Cursor position in characters.
    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    /// Byte offset of the character at `index`, or the end of the string.
    fn byte_index(&self, index: usize) -> usize {
        self.value
            .char_indices()
            .nth(index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Remove the characters in `start..end` and put the cursor at `start`.
    fn remove_range(&mut self, start: usize, end: usize) {
        let from = self.byte_index(start);
        let to = self.byte_index(end);
        self.value.replace_range(from..to, "");
        self.cursor = start;
    }

    /// Character index where the word before the cursor starts.
    fn word_start(&self) -> usize {
        let chars: Vec<char> = self.value.chars().take(self.cursor).collect();
        let mut index = chars.len();
        while index > 0 && chars[index - 1].is_whitespace() {
            index -= 1;
        }
        while index > 0 && chars[index - 1].is_alphanumeric() {
            index -= 1;
        }
        index
    }

    /// First character shown when the field is `width` cells wide.
    fn scroll_offset(&self, width: usize) -> usize {
        if width == 0 {
            return self.cursor;
        }
        self.cursor.saturating_sub(width - 1)
    }

    /// Render the input field.
    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let inner_width = area.width.saturating_sub(2) as usize;
        let offset = self.scroll_offset(inner_width);

        let content = if self.is_empty() {
            Span::styled(
                self.placeholder.as_str(),
                Style::default().fg(Color::DarkGray),
            )
        } else {
            let visible: String = self.value.chars().skip(offset).take(inner_width).collect();
            Span::raw(visible)
        };

        let block = Block::default()
            .title(" Query ")
            .borders(Borders::ALL)
            .border_style(theme::border_style(focused));
        frame.render_widget(Paragraph::new(content).block(block), area);

        if focused && inner_width > 0 {
            let cursor_x = area.x + 1 + (self.cursor - offset) as u16;
            frame.set_cursor_position(Position::new(cursor_x, area.y + 1));
        }
    }
}

impl Component for TextInput {
    fn handle_input(&mut self, key: KeyEvent) -> Option<Action> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('a'), KeyModifiers::CONTROL) | (KeyCode::Home, _) => {
                self.cursor = 0;
                Some(Action::CursorMoved)
            }
            (KeyCode::Char('e'), KeyModifiers::CONTROL) | (KeyCode::End, _) => {
                self.cursor = self.char_count();
                Some(Action::CursorMoved)
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                if self.is_empty() {
                    return None;
                }
                self.clear();
                Some(Action::Edited)
            }
            (KeyCode::Char('w'), KeyModifiers::CONTROL) => {
                if self.cursor == 0 {
                    return None;
                }
                let start = self.word_start();
                self.remove_range(start, self.cursor);
                Some(Action::Edited)
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.insert_char(c);
                Some(Action::Edited)
            }
            (KeyCode::Backspace, _) if self.cursor > 0 => {
                self.remove_range(self.cursor - 1, self.cursor);
                Some(Action::Edited)
            }
            (KeyCode::Delete, _) if self.cursor < self.char_count() => {
                self.remove_range(self.cursor, self.cursor + 1);
                Some(Action::Edited)
            }
            (KeyCode::Left, _) if self.cursor > 0 => {
                self.cursor -= 1;
                Some(Action::CursorMoved)
            }
            (KeyCode::Right, _) if self.cursor < self.char_count() => {
                self.cursor += 1;
                Some(Action::CursorMoved)
            }
            _ => None,
        }
    }
}
