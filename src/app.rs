//! Main application state and update logic.
//!
//! This module implements The Elm Architecture (TEA): every input, resize,
//! tick and task completion goes through [`App::update`], which mutates the
//! model and returns the remote work to perform as [`Task`] values. The
//! model never performs I/O and never blocks.

use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};
use tracing::{debug, info, trace, warn};

use crate::api::Issue;
use crate::config::Settings;
use crate::error::AppError;
use crate::events::{Event, KeyAction, KeyBindings};
use crate::store::{selected_issue, IssueStore};
use crate::tasks::{Task, TaskMessage};
use crate::ui::{
    theme, Component, DetailView, ListView, NotificationManager, PaneLayout, TextEditor,
    TextInput,
};

/// Placeholder shown in the empty query bar.
const QUERY_PLACEHOLDER: &str = "Search for issues...";

/// Smallest comment box, borders included.
const MIN_COMMENT_HEIGHT: u16 = 5;

/// The active top-level mode, which decides where input goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Browsing the issue list.
    #[default]
    Default,
    /// Editing the query.
    Search,
    /// Reading the selected issue.
    Detail,
    /// Writing a comment on the selected issue.
    Comment,
}

impl ViewMode {
    /// Name shown in the status bar.
    pub fn name(&self) -> &'static str {
        match self {
            ViewMode::Default => "ISSUES",
            ViewMode::Search => "SEARCH",
            ViewMode::Detail => "DETAIL",
            ViewMode::Comment => "COMMENT",
        }
    }

    /// Whether printable keys are text rather than commands.
    pub fn is_text_entry(&self) -> bool {
        matches!(self, ViewMode::Search | ViewMode::Comment)
    }

    fn hints(&self) -> &'static str {
        match self {
            ViewMode::Default => "/ search  enter details  j/k move  q quit",
            ViewMode::Search => "enter run query  esc back",
            ViewMode::Detail => "m comment  enter back  / search  j/k scroll  q quit",
            ViewMode::Comment => "enter submit  alt+enter newline  esc cancel  q quit",
        }
    }
}

/// The main application struct that holds all state.
///
/// This implements the Model part of The Elm Architecture (TEA).
pub struct App {
    mode: ViewMode,
    should_quit: bool,
    layout: PaneLayout,
    store: IssueStore,
    list_view: ListView,
    detail_view: DetailView,
    query: TextInput,
    comment: TextEditor,
    notifications: NotificationManager,
    bindings: KeyBindings,
    /// Generation of the most recently dispatched search.
    search_generation: u64,
}

impl App {
    /// Create the application and any tasks to run at startup.
    ///
    /// A configured default query is placed in the query bar and searched
    /// for immediately; the mode stays `Default`.
    pub fn new(settings: &Settings) -> (Self, Vec<Task>) {
        let mut query = TextInput::new();
        query.set_placeholder(QUERY_PLACEHOLDER);

        let mut app = Self {
            mode: ViewMode::Default,
            should_quit: false,
            layout: PaneLayout::Initializing,
            store: IssueStore::new(),
            list_view: ListView::new(),
            detail_view: DetailView::new(),
            query,
            comment: TextEditor::new(),
            notifications: NotificationManager::new(),
            bindings: KeyBindings::default(),
            search_generation: 0,
        };

        let mut tasks = Vec::new();
        if let Some(default_query) = settings.startup_query() {
            debug!(query = default_query, "Running startup query");
            app.query.set_value(default_query);
            tasks.push(app.start_search());
        }
        (app, tasks)
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// The issue under the list cursor, if any.
    pub fn selected_issue(&self) -> Option<&Issue> {
        selected_issue(self.store.issues(), self.list_view.cursor())
    }

    /// Update the application state based on an event.
    ///
    /// This implements the Update part of The Elm Architecture (TEA).
    /// Returns the tasks the caller must dispatch.
    pub fn update(&mut self, event: Event) -> Vec<Task> {
        let tasks = match event {
            Event::Key(key_event) => {
                trace!(key = ?key_event.code, modifiers = ?key_event.modifiers, "Key event");
                self.handle_key_event(key_event)
            }
            Event::Resize(width, height) => {
                trace!(width, height, "Terminal resize event");
                self.handle_resize(width, height);
                Vec::new()
            }
            Event::Tick => {
                self.list_view.tick();
                self.notifications.tick();
                Vec::new()
            }
            Event::Task(message) => {
                self.handle_task_message(message);
                Vec::new()
            }
        };
        self.sync_selection();
        tasks
    }

    fn set_mode(&mut self, mode: ViewMode) {
        if self.mode != mode {
            debug!(from = ?self.mode, to = ?mode, "Mode transition");
            self.mode = mode;
        }
    }

    fn quit(&mut self) {
        info!("Quit requested");
        self.should_quit = true;
    }

    /// Handle keyboard input events.
    fn handle_key_event(&mut self, key: KeyEvent) -> Vec<Task> {
        let action = self.bindings.action(&key);

        match (self.mode, action) {
            (_, Some(KeyAction::ForceQuit)) => self.quit(),
            (mode, Some(KeyAction::Quit)) if mode != ViewMode::Search => self.quit(),

            (ViewMode::Default | ViewMode::Detail, Some(KeyAction::Search)) => {
                self.set_mode(ViewMode::Search);
            }
            (ViewMode::Search, Some(KeyAction::Submit)) => {
                self.set_mode(ViewMode::Default);
                return vec![self.start_search()];
            }
            (ViewMode::Search, Some(KeyAction::Cancel)) => self.set_mode(ViewMode::Default),

            (ViewMode::Default, Some(KeyAction::Submit)) => self.set_mode(ViewMode::Detail),
            (ViewMode::Detail, Some(KeyAction::Submit)) => self.set_mode(ViewMode::Default),
            (ViewMode::Detail, Some(KeyAction::Comment)) => {
                self.comment.clear();
                self.set_mode(ViewMode::Comment);
            }

            (ViewMode::Comment, Some(KeyAction::Submit)) => {
                return self.submit_comment().into_iter().collect();
            }
            (ViewMode::Comment, Some(KeyAction::Cancel)) => {
                self.comment.clear();
                self.set_mode(ViewMode::Detail);
            }

            (mode, _) if mode.is_text_entry() => self.forward_key(key),
            // Bound keys that mean nothing in this mode.
            (_, Some(_)) => {}
            (_, None) => self.forward_key(key),
        }
        Vec::new()
    }

    /// Pass `key` to the widget that owns focus.
    fn forward_key(&mut self, key: KeyEvent) {
        let action = match self.mode {
            ViewMode::Default => self.list_view.handle_input(key),
            ViewMode::Search => self.query.handle_input(key),
            ViewMode::Detail => self.detail_view.handle_input(key),
            ViewMode::Comment => self.comment.handle_input(key),
        };
        if let Some(action) = action {
            trace!(mode = ?self.mode, ?action, "Widget handled key");
        }
    }

    /// Bump the generation and describe a search for the current query.
    fn start_search(&mut self) -> Task {
        self.search_generation += 1;
        self.list_view.start_loading();
        Task::Search {
            generation: self.search_generation,
            query: self.query.value().trim().to_string(),
        }
    }

    /// Build the comment task, or `None` if there is nothing to send.
    fn submit_comment(&mut self) -> Option<Task> {
        if self.comment.is_blank() {
            debug!("Ignoring empty comment");
            return None;
        }
        let Some(issue_key) = self.selected_issue().map(|issue| issue.key.clone()) else {
            debug!("Ignoring comment with no selected issue");
            return None;
        };

        let text = self.comment.content();
        self.comment.clear();
        self.set_mode(ViewMode::Detail);
        Some(Task::AddComment { issue_key, text })
    }

    fn handle_task_message(&mut self, message: TaskMessage) {
        match message {
            TaskMessage::SearchCompleted { generation, issues } => {
                if self.is_stale(generation) {
                    return;
                }
                info!(generation, count = issues.len(), "Search results received");
                self.replace_issues(Some(issues));
            }
            TaskMessage::SearchFailed { generation, error } => {
                if self.is_stale(generation) {
                    return;
                }
                warn!(generation, error = %error, "Search failed, clearing issue list");
                self.replace_issues(None);
                self.notifications
                    .warning(AppError::from(error).user_message());
            }
            TaskMessage::CommentCompleted { issue_key } => {
                info!(issue_key = %issue_key, "Comment added");
                self.notifications
                    .success(format!("Comment added to {}", issue_key));
            }
            TaskMessage::CommentFailed { issue_key, error } => {
                warn!(issue_key = %issue_key, error = %error, "Comment failed");
                self.notifications.error(format!(
                    "Comment on {} failed: {}",
                    issue_key,
                    AppError::from(error).user_message()
                ));
            }
        }
    }

    /// Whether a search completion was overtaken by a newer search.
    fn is_stale(&self, generation: u64) -> bool {
        let stale = generation != self.search_generation;
        if stale {
            debug!(
                generation,
                latest = self.search_generation,
                "Discarding stale search result"
            );
        }
        stale
    }

    fn replace_issues(&mut self, issues: Option<Vec<Issue>>) {
        self.store.set_issues(issues);
        self.detail_view.invalidate();
        self.list_view.set_len(self.store.len());
        self.list_view.stop_loading();
        if self.store.is_empty() {
            debug!("List is empty");
        }
    }

    fn handle_resize(&mut self, width: u16, height: u16) {
        self.layout = PaneLayout::compute(width, height);
        debug!(width, height, stacked = self.layout.is_stacked(), "Layout computed");
        match self.layout.panes() {
            Some(panes) => {
                let comment = comment_area(panes.detail);
                self.query.resize(panes.query.width, panes.query.height);
                self.list_view.resize(panes.list.width, panes.list.height);
                self.detail_view
                    .resize(panes.detail.width, panes.detail.height);
                self.comment.resize(comment.width, comment.height);
            }
            None => {
                self.query.resize(0, 0);
                self.list_view.resize(0, 0);
                self.detail_view.resize(0, 0);
                self.comment.resize(0, 0);
            }
        }
    }

    /// Point the detail pane at the current selection.
    fn sync_selection(&mut self) {
        let selected = selected_issue(self.store.issues(), self.list_view.cursor());
        self.detail_view.follow(selected);
    }

    /// Render the application UI.
    ///
    /// This implements the View part of The Elm Architecture (TEA).
    pub fn view(&self, frame: &mut Frame) {
        let Some(panes) = self.layout.panes() else {
            let placeholder = Paragraph::new("Initializing...").alignment(Alignment::Center);
            frame.render_widget(placeholder, frame.area());
            return;
        };

        let selected = self.selected_issue();
        self.query
            .render(frame, panes.query, self.mode == ViewMode::Search);
        self.list_view.render(
            frame,
            panes.list,
            self.store.issues(),
            self.mode == ViewMode::Default,
        );
        self.detail_view
            .render(frame, panes.detail, selected, self.mode == ViewMode::Detail);

        if self.mode == ViewMode::Comment {
            let area = comment_area(panes.detail);
            let title = match selected {
                Some(issue) => format!(" Comment on {} ", issue.key),
                None => " Comment ".to_string(),
            };
            frame.render_widget(Clear, area);
            self.comment.render(frame, area, true, &title);
        }

        self.render_status_bar(frame, panes.status);

        let body = Rect::new(
            0,
            panes.list.y,
            panes.query.width,
            panes.status.y - panes.list.y,
        );
        self.notifications.render(frame, body);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let status = Line::from(vec![
            Span::styled(
                format!(" {} ", self.mode.name()),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(self.mode.hints(), theme::muted()),
        ]);
        frame.render_widget(Paragraph::new(status), area);
    }
}

#[cfg(test)]
impl App {
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn layout(&self) -> &PaneLayout {
        &self.layout
    }

    pub fn issues(&self) -> &[Issue] {
        self.store.issues()
    }

    pub fn query(&self) -> &str {
        self.query.value()
    }

    pub fn comment_draft(&self) -> String {
        self.comment.content()
    }

    pub fn is_loading(&self) -> bool {
        self.list_view.spinner().is_active()
    }

    pub fn notifications(&self) -> &NotificationManager {
        &self.notifications
    }

    pub fn search_generation(&self) -> u64 {
        self.search_generation
    }
}

/// Consume `app`, apply `event` and hand back the new state with its tasks.
pub fn reduce(mut app: App, event: Event) -> (App, Vec<Task>) {
    let tasks = app.update(event);
    (app, tasks)
}

/// Where the comment box overlays the detail pane.
fn comment_area(detail: Rect) -> Rect {
    let height = (detail.height / 2).max(MIN_COMMENT_HEIGHT).min(detail.height);
    Rect::new(detail.x, detail.bottom() - height, detail.width, height)
}
