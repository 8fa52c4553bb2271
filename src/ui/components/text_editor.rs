//! Multi-line text editor used for the comment draft.
//!
//! Columns are character indices. Enter inserts a newline here; the state
//! machine intercepts a plain Enter to submit before it reaches the editor,
//! so in practice newlines come from Alt+Enter.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Position, Rect},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{Action, Component};
use crate::ui::theme;

/// A multi-line text editor component.
#[derive(Debug, Clone)]
pub struct TextEditor {
    lines: Vec<String>,
    cursor_line: usize,
    cursor_col: usize,
    /// First visible line.
    scroll: usize,
    /// Rows available for text, set on resize.
    visible_height: usize,
}

impl TextEditor {
    /// Create an empty editor.
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor_line: 0,
            cursor_col: 0,
            scroll: 0,
            visible_height: 0,
        }
    }

    /// The text, lines joined with `\n`.
    pub fn content(&self) -> String {
        self.lines.join("\n")
    }

    /// Whether there is nothing but whitespace to submit.
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }

    /// Drop all text and reset the cursor.
    pub fn clear(&mut self) {
        self.lines = vec![String::new()];
        self.cursor_line = 0;
        self.cursor_col = 0;
        self.scroll = 0;
    }

    #[cfg(test)]
    pub fn cursor_line(&self) -> usize {
        self.cursor_line
    }

    #[cfg(test)]
    pub fn cursor_col(&self) -> usize {
        self.cursor_col
    }

    #[cfg(test)]
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    #[cfg(test)]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_len(&self, index: usize) -> usize {
        self.lines[index].chars().count()
    }

    fn current_len(&self) -> usize {
        self.line_len(self.cursor_line)
    }

    /// Byte offset of column `col` on line `line`.
    fn byte_index(&self, line: usize, col: usize) -> usize {
        let text = &self.lines[line];
        text.char_indices()
            .nth(col)
            .map(|(i, _)| i)
            .unwrap_or(text.len())
    }

    fn clamp_cursor_col(&mut self) {
        self.cursor_col = self.cursor_col.min(self.current_len());
    }

    fn ensure_cursor_visible(&mut self) {
        if self.visible_height == 0 {
            return;
        }
        if self.cursor_line < self.scroll {
            self.scroll = self.cursor_line;
        }
        if self.cursor_line >= self.scroll + self.visible_height {
            self.scroll = self.cursor_line + 1 - self.visible_height;
        }
    }

    fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor_line, self.cursor_col);
        self.lines[self.cursor_line].insert(at, c);
        self.cursor_col += 1;
    }

    fn insert_newline(&mut self) {
        let at = self.byte_index(self.cursor_line, self.cursor_col);
        let rest = self.lines[self.cursor_line].split_off(at);
        self.lines.insert(self.cursor_line + 1, rest);
        self.cursor_line += 1;
        self.cursor_col = 0;
    }

    fn delete_backward(&mut self) -> bool {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
            let at = self.byte_index(self.cursor_line, self.cursor_col);
            self.lines[self.cursor_line].remove(at);
            true
        } else if self.cursor_line > 0 {
            let current = self.lines.remove(self.cursor_line);
            self.cursor_line -= 1;
            self.cursor_col = self.current_len();
            self.lines[self.cursor_line].push_str(&current);
            true
        } else {
            false
        }
    }

    fn delete_forward(&mut self) -> bool {
        if self.cursor_col < self.current_len() {
            let at = self.byte_index(self.cursor_line, self.cursor_col);
            self.lines[self.cursor_line].remove(at);
            true
        } else if self.cursor_line + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor_line + 1);
            self.lines[self.cursor_line].push_str(&next);
            true
        } else {
            false
        }
    }

    fn move_left(&mut self) -> bool {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.current_len();
        } else {
            return false;
        }
        true
    }

    fn move_right(&mut self) -> bool {
        if self.cursor_col < self.current_len() {
            self.cursor_col += 1;
        } else if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.cursor_col = 0;
        } else {
            return false;
        }
        true
    }

    fn move_vertical(&mut self, down: bool) -> bool {
        if down && self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
        } else if !down && self.cursor_line > 0 {
            self.cursor_line -= 1;
        } else {
            return false;
        }
        self.clamp_cursor_col();
        true
    }

    /// Render the editor with `title` on its border.
    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool, title: &str) {
        let visible_height = area.height.saturating_sub(2) as usize;
        let lines: Vec<Line> = self
            .lines
            .iter()
            .skip(self.scroll)
            .take(visible_height)
            .map(|line| Line::from(line.as_str()))
            .collect();

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(theme::border_style(focused));
        frame.render_widget(Paragraph::new(lines).block(block), area);

        if focused && self.cursor_line >= self.scroll {
            let row = (self.cursor_line - self.scroll) as u16;
            let cursor_x = area.x + 1 + self.cursor_col as u16;
            let cursor_y = area.y + 1 + row;
            if cursor_y + 1 < area.bottom() && cursor_x + 1 < area.right() {
                frame.set_cursor_position(Position::new(cursor_x, cursor_y));
            }
        }
    }
}

impl Default for TextEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for TextEditor {
    fn handle_input(&mut self, key: KeyEvent) -> Option<Action> {
        let action = match (key.code, key.modifiers) {
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                if self.cursor_col == 0 {
                    return None;
                }
                let at = self.byte_index(self.cursor_line, self.cursor_col);
                self.lines[self.cursor_line].replace_range(..at, "");
                self.cursor_col = 0;
                Action::Edited
            }
            (KeyCode::Char('a'), KeyModifiers::CONTROL) | (KeyCode::Home, _) => {
                self.cursor_col = 0;
                Action::CursorMoved
            }
            (KeyCode::Char('e'), KeyModifiers::CONTROL) | (KeyCode::End, _) => {
                self.cursor_col = self.current_len();
                Action::CursorMoved
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.insert_char(c);
                Action::Edited
            }
            (KeyCode::Enter, _) => {
                self.insert_newline();
                Action::Edited
            }
            (KeyCode::Backspace, _) => self.delete_backward().then_some(Action::Edited)?,
            (KeyCode::Delete, _) => self.delete_forward().then_some(Action::Edited)?,
            (KeyCode::Left, _) => self.move_left().then_some(Action::CursorMoved)?,
            (KeyCode::Right, _) => self.move_right().then_some(Action::CursorMoved)?,
            (KeyCode::Up, _) => self.move_vertical(false).then_some(Action::CursorMoved)?,
            (KeyCode::Down, _) => self.move_vertical(true).then_some(Action::CursorMoved)?,
            _ => return None,
        };
        self.ensure_cursor_visible();
        Some(action)
    }

    fn resize(&mut self, _width: u16, height: u16) {
        self.visible_height = height.saturating_sub(2) as usize;
        self.ensure_cursor_visible();
    }
}
