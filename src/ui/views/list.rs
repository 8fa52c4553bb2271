//! Issue list view.
//!
//! The view only tracks a cursor over however many issues the store holds;
//! it never owns the issues themselves.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::api::Issue;
use crate::ui::components::{Action, Component, LoadingIndicator};
use crate::ui::theme;

/// Marker drawn in front of the row under the cursor.
const CURSOR_MARKER: &str = "> ";

/// The issue list view.
#[derive(Debug, Default)]
pub struct ListView {
    /// Index under the cursor, `None` while the list is empty.
    cursor: Option<usize>,
    len: usize,
    /// First visible row.
    offset: usize,
    visible_height: usize,
    spinner: LoadingIndicator,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cursor position, if any row exists.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// First visible row.
    #[cfg(test)]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Point the view at a freshly replaced collection of `len` issues.
    ///
    /// The cursor goes back to the first row.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.offset = 0;
        self.cursor = if len > 0 { Some(0) } else { None };
    }

    #[cfg(test)]
    pub fn spinner(&self) -> &LoadingIndicator {
        &self.spinner
    }

    pub fn start_loading(&mut self) {
        self.spinner.start();
    }

    pub fn stop_loading(&mut self) {
        self.spinner.stop();
    }

    /// Advance the spinner animation.
    pub fn tick(&mut self) {
        self.spinner.tick();
    }

    fn page_size(&self) -> usize {
        self.visible_height.max(1)
    }

    /// Move the cursor to `target`, clamped to the last row.
    fn move_to(&mut self, target: usize) -> Option<Action> {
        let current = self.cursor?;
        let target = target.min(self.len - 1);
        if target == current {
            return None;
        }
        self.cursor = Some(target);
        self.ensure_cursor_visible();
        Some(Action::SelectionChanged)
    }

    fn ensure_cursor_visible(&mut self) {
        let Some(cursor) = self.cursor else {
            self.offset = 0;
            return;
        };
        if self.visible_height == 0 {
            return;
        }
        if cursor < self.offset {
            self.offset = cursor;
        } else if cursor >= self.offset + self.visible_height {
            self.offset = cursor + 1 - self.visible_height;
        }
    }

    /// Render `issues` with the cursor row highlighted.
    pub fn render(&self, frame: &mut Frame, area: Rect, issues: &[Issue], focused: bool) {
        let mut title = format!(" Issues ({}) ", issues.len());
        if self.spinner.is_active() {
            title.push_str(&self.spinner.text());
            title.push(' ');
        }

        let rows = area.height.saturating_sub(2) as usize;
        let lines: Vec<Line> = if issues.is_empty() && !self.spinner.is_active() {
            vec![Line::styled("  No issues", theme::muted())]
        } else {
            issues
                .iter()
                .enumerate()
                .skip(self.offset)
                .take(rows)
                .map(|(index, issue)| issue_row(issue, Some(index) == self.cursor))
                .collect()
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(theme::border_style(focused));
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

fn issue_row(issue: &Issue, selected: bool) -> Line<'_> {
    let marker = if selected { CURSOR_MARKER } else { "  " };
    let line = Line::from(vec![
        Span::raw(marker),
        Span::styled(issue.key.as_str(), theme::label()),
        Span::raw(" "),
        Span::raw(issue.summary()),
    ]);
    if selected {
        line.style(theme::selected_row())
    } else {
        line
    }
}

impl Component for ListView {
    fn handle_input(&mut self, key: KeyEvent) -> Option<Action> {
        let current = self.cursor?;
        match (key.code, key.modifiers) {
            (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => {
                self.move_to(current + 1)
            }
            (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => {
                self.move_to(current.saturating_sub(1))
            }
            (KeyCode::Char('d'), KeyModifiers::CONTROL) | (KeyCode::PageDown, _) => {
                self.move_to(current + self.page_size())
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) | (KeyCode::PageUp, _) => {
                self.move_to(current.saturating_sub(self.page_size()))
            }
            (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, _) => self.move_to(0),
            (KeyCode::Char('G'), _) | (KeyCode::End, _) => self.move_to(usize::MAX),
            _ => None,
        }
    }

    fn resize(&mut self, _width: u16, height: u16) {
        self.visible_height = height.saturating_sub(2) as usize;
        self.ensure_cursor_visible();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::fixtures;
    use ratatui::{backend::TestBackend, Terminal};

    fn press(view: &mut ListView, code: KeyCode) -> Option<Action> {
        view.handle_input(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn view_with(len: usize, height: u16) -> ListView {
        let mut view = ListView::new();
        view.resize(40, height);
        view.set_len(len);
        view
    }

    #[test]
    fn test_empty_list_has_no_cursor() {
        let mut view = ListView::new();
        assert_eq!(view.cursor(), None);
        assert_eq!(press(&mut view, KeyCode::Char('j')), None);
        assert_eq!(view.cursor(), None);
    }

    #[test]
    fn test_set_len_resets_cursor() {
        let mut view = view_with(5, 10);
        press(&mut view, KeyCode::Char('G'));
        assert_eq!(view.cursor(), Some(4));

        view.set_len(2);
        assert_eq!(view.cursor(), Some(0));
        view.set_len(0);
        assert_eq!(view.cursor(), None);
    }

    #[test]
    fn test_navigation() {
        let mut view = view_with(3, 10);

        assert_eq!(press(&mut view, KeyCode::Char('j')), Some(Action::SelectionChanged));
        assert_eq!(view.cursor(), Some(1));
        press(&mut view, KeyCode::Down);
        assert_eq!(view.cursor(), Some(2));
        assert_eq!(press(&mut view, KeyCode::Char('j')), None);
        assert_eq!(view.cursor(), Some(2));

        press(&mut view, KeyCode::Char('k'));
        assert_eq!(view.cursor(), Some(1));
        press(&mut view, KeyCode::Char('g'));
        assert_eq!(view.cursor(), Some(0));
        assert_eq!(press(&mut view, KeyCode::Up), None);
    }

    #[test]
    fn test_shift_g_goes_to_bottom() {
        let mut view = view_with(7, 10);
        view.handle_input(KeyEvent::new(KeyCode::Char('G'), KeyModifiers::SHIFT));
        assert_eq!(view.cursor(), Some(6));
    }

    #[test]
    fn test_paging_scrolls_offset() {
        // 6 rows tall -> 4 visible rows
        let mut view = view_with(20, 6);

        press(&mut view, KeyCode::PageDown);
        assert_eq!(view.cursor(), Some(4));
        assert_eq!(view.offset(), 1);

        press(&mut view, KeyCode::End);
        assert_eq!(view.cursor(), Some(19));
        assert_eq!(view.offset(), 16);

        press(&mut view, KeyCode::PageUp);
        assert_eq!(view.cursor(), Some(15));
        assert_eq!(view.offset(), 15);
    }

    #[test]
    fn test_shrinking_keeps_cursor_visible() {
        let mut view = view_with(20, 22);
        press(&mut view, KeyCode::End);
        assert_eq!(view.offset(), 0);

        view.resize(40, 7);
        assert_eq!(view.offset(), 15);
    }

    #[test]
    fn test_spinner() {
        let mut view = ListView::new();
        view.start_loading();
        assert!(view.spinner().is_active());
        view.tick();
        view.stop_loading();
        assert!(!view.spinner().is_active());
    }

    #[test]
    fn test_render_marks_cursor_row() {
        let issues = fixtures::issues(3);
        let mut view = view_with(3, 8);
        press(&mut view, KeyCode::Char('j'));

        let mut terminal = Terminal::new(TestBackend::new(40, 8)).unwrap();
        terminal
            .draw(|frame| view.render(frame, frame.area(), &issues, true))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let row = |y: u16| -> String {
            (0..40).map(|x| buffer[(x, y)].symbol().to_string()).collect()
        };
        assert!(row(0).contains("Issues (3)"));
        assert!(row(1).contains("  PROJ-1"));
        assert!(row(2).contains("> PROJ-2"));
    }
}
