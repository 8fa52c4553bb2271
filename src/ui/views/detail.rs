//! Issue detail view.
//!
//! A scrollable card for the selected issue. The card text is wrapped here
//! rather than by ratatui so the scroll range is known exactly.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::api::Issue;
use crate::ui::components::{Action, Component};
use crate::ui::theme;

/// The issue detail view.
#[derive(Debug, Default)]
pub struct DetailView {
    /// Key of the issue the scroll position belongs to.
    issue_key: Option<String>,
    scroll: usize,
    /// Wrapped rows of the current card.
    content_rows: usize,
    /// Width `content_rows` was measured at, `None` when out of date.
    measured_width: Option<usize>,
    inner_width: usize,
    visible_height: usize,
}

impl DetailView {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn issue_key(&self) -> Option<&str> {
        self.issue_key.as_deref()
    }

    /// Track the issue about to be shown.
    ///
    /// Scrolling restarts at the top whenever the selection changes. The card
    /// is only re-measured when the issue or the pane width changed.
    pub fn follow(&mut self, issue: Option<&Issue>) {
        let key = issue.map(|i| i.key.as_str());
        if key != self.issue_key() {
            self.issue_key = key.map(str::to_string);
            self.scroll = 0;
            self.measured_width = None;
        }
        if self.measured_width != Some(self.inner_width) {
            self.content_rows = issue.map_or(0, |i| card_lines(i, self.inner_width).len());
            self.measured_width = Some(self.inner_width);
        }
        self.scroll = self.scroll.min(self.max_scroll());
    }

    /// Forget the measured card, e.g. after the issues were reloaded.
    pub fn invalidate(&mut self) {
        self.measured_width = None;
    }

    fn max_scroll(&self) -> usize {
        self.content_rows.saturating_sub(self.visible_height)
    }

    fn scroll_to(&mut self, target: usize) -> Option<Action> {
        let target = target.min(self.max_scroll());
        if target == self.scroll {
            return None;
        }
        self.scroll = target;
        Some(Action::Scrolled)
    }

    /// Render `issue`, or a hint when nothing is selected.
    pub fn render(&self, frame: &mut Frame, area: Rect, issue: Option<&Issue>, focused: bool) {
        let block = Block::default()
            .title(" Details ")
            .borders(Borders::ALL)
            .border_style(theme::border_style(focused));

        let lines: Vec<Line> = match issue {
            Some(issue) => {
                let width = area.width.saturating_sub(2) as usize;
                card_lines(issue, width)
                    .into_iter()
                    .skip(self.scroll)
                    .take(area.height.saturating_sub(2) as usize)
                    .collect()
            }
            None => vec![Line::styled("No issue selected", theme::muted())],
        };

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

impl Component for DetailView {
    fn handle_input(&mut self, key: KeyEvent) -> Option<Action> {
        let page = self.visible_height.max(1);
        match (key.code, key.modifiers) {
            (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => {
                self.scroll_to(self.scroll + 1)
            }
            (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => {
                self.scroll_to(self.scroll.saturating_sub(1))
            }
            (KeyCode::Char('d'), KeyModifiers::CONTROL) | (KeyCode::PageDown, _) => {
                self.scroll_to(self.scroll + page)
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) | (KeyCode::PageUp, _) => {
                self.scroll_to(self.scroll.saturating_sub(page))
            }
            (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, _) => self.scroll_to(0),
            (KeyCode::Char('G'), _) | (KeyCode::End, _) => self.scroll_to(usize::MAX),
            _ => None,
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.inner_width = width.saturating_sub(2) as usize;
        self.visible_height = height.saturating_sub(2) as usize;
    }
}

/// Build the wrapped card for `issue` at `width` columns.
fn card_lines(issue: &Issue, width: usize) -> Vec<Line<'static>> {
    let title_style = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = Vec::new();

    for row in wrap_text(&format!("{} {}", issue.key, issue.summary()), width) {
        lines.push(Line::styled(row, title_style));
    }
    lines.push(Line::from(""));

    for (label, value) in [
        ("Status", issue.status()),
        ("Assignee", issue.assignee_name()),
        ("Reporter", issue.reporter_name()),
    ] {
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", label), theme::label()),
            Span::raw(value.to_string()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::styled("Description", theme::label()));
    for row in wrap_text(&issue.description_text(), width) {
        lines.push(Line::from(row));
    }
    lines
}

/// Greedy word wrap counting characters. Words longer than `width` are split.
///
/// A `width` of zero leaves lines unwrapped.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut rows = Vec::new();
    for paragraph in text.split('\n') {
        if width == 0 {
            rows.push(paragraph.to_string());
            continue;
        }

        let mut row = String::new();
        let mut row_len = 0;
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            let needed = if row_len == 0 { word.len() } else { row_len + 1 + word.len() };
            if needed <= width {
                if row_len > 0 {
                    row.push(' ');
                    row_len += 1;
                }
                row.extend(word.iter());
                row_len += word.len();
                continue;
            }

            if row_len > 0 {
                rows.push(std::mem::take(&mut row));
            }
            while word.len() > width {
                let rest = word.split_off(width);
                rows.push(word.into_iter().collect());
                word = rest;
            }
            row = word.iter().collect();
            row_len = word.len();
        }
        rows.push(row);
    }
    rows
}
