//! Toast notifications for task outcomes.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// How long a toast stays on screen.
pub const NOTIFICATION_DURATION: Duration = Duration::from_secs(3);

/// Most toasts shown at once; older ones are dropped.
const MAX_VISIBLE: usize = 3;

/// Widest a toast is drawn.
const MAX_WIDTH: u16 = 50;

/// The kind of notification, which determines its appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    Success,
    Warning,
    Error,
}

impl NotificationType {
    pub fn icon(&self) -> &'static str {
        match self {
            NotificationType::Success => "✓",
            NotificationType::Warning => "⚠",
            NotificationType::Error => "✗",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            NotificationType::Success => Color::Green,
            NotificationType::Warning => Color::Yellow,
            NotificationType::Error => Color::Red,
        }
    }
}

/// A single notification message.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub notification_type: NotificationType,
    pub created_at: Instant,
}

impl Notification {
    pub fn new(message: impl Into<String>, notification_type: NotificationType) -> Self {
        Self {
            message: message.into(),
            notification_type,
            created_at: Instant::now(),
        }
    }

    /// Whether the toast should be gone at `now`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= NOTIFICATION_DURATION
    }
}

/// Queue of visible toasts, newest last.
#[derive(Debug, Default)]
pub struct NotificationManager {
    notifications: VecDeque<Notification>,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a notification, dropping the oldest beyond the visible limit.
    pub fn push(&mut self, notification: Notification) {
        self.notifications.push_back(notification);
        while self.notifications.len() > MAX_VISIBLE {
            self.notifications.pop_front();
        }
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Notification::new(message, NotificationType::Success));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Notification::new(message, NotificationType::Warning));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Notification::new(message, NotificationType::Error));
    }

    /// Remove expired notifications. Called on every tick.
    pub fn tick(&mut self) {
        self.expire(Instant::now());
    }

    fn expire(&mut self, now: Instant) {
        self.notifications.retain(|n| !n.is_expired_at(now));
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, Notification> {
        self.notifications.iter()
    }

    /// Draw the toasts stacked upward from the bottom-right of `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let width = MAX_WIDTH.min(area.width.saturating_sub(2));
        if self.is_empty() || width < 5 {
            return;
        }
        let inner_width = (width - 4) as usize;
        let x = area.right().saturating_sub(width + 1);
        let mut bottom = area.bottom().saturating_sub(1);

        for notification in self.iter().rev() {
            let text_len = notification.message.chars().count() + 2;
            let height = text_len.div_ceil(inner_width) as u16 + 2;
            if bottom < area.y + height {
                break;
            }
            bottom -= height;
            render_notification(notification, frame, Rect::new(x, bottom, width, height));
        }
    }
}

fn render_notification(notification: &Notification, frame: &mut Frame, area: Rect) {
    frame.render_widget(Clear, area);

    let style = Style::default().fg(notification.notification_type.color());
    let text = Line::from(vec![
        Span::styled(
            format!("{} ", notification.notification_type.icon()),
            style.add_modifier(Modifier::BOLD),
        ),
        Span::styled(notification.message.as_str(), style),
    ]);
    let block = Block::default().borders(Borders::ALL).border_style(style);

    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        area,
    );
}
