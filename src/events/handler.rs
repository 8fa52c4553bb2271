//! Event handler implementation.
//!
//! Polls crossterm for terminal events and converts them to application events.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEventKind};

use super::Event;

/// Default tick rate in milliseconds.
pub const DEFAULT_TICK_RATE_MS: u64 = 100;

/// Polls the terminal for input.
#[derive(Debug, Clone, Copy)]
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    /// Create a handler with the default tick rate.
    pub fn new() -> Self {
        Self::with_tick_rate(DEFAULT_TICK_RATE_MS)
    }

    /// Create a handler with a custom tick rate.
    pub fn with_tick_rate(tick_rate_ms: u64) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms.max(1)),
        }
    }

    /// The poll interval.
    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    /// Wait up to one tick for the next terminal event.
    ///
    /// Returns `Event::Tick` when nothing arrives in time.
    pub fn next(&self) -> std::io::Result<Event> {
        if !event::poll(self.tick_rate)? {
            return Ok(Event::Tick);
        }
        Ok(convert(event::read()?))
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a crossterm event onto an application event.
fn convert(event: CrosstermEvent) -> Event {
    match event {
        // Windows reports releases as well; only presses drive the UI.
        CrosstermEvent::Key(key_event) if key_event.kind != KeyEventKind::Release => {
            Event::Key(key_event)
        }
        CrosstermEvent::Resize(width, height) => Event::Resize(width, height),
        _ => Event::Tick,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};

    #[test]
    fn test_event_handler_new() {
        let handler = EventHandler::new();
        assert_eq!(handler.tick_rate(), Duration::from_millis(DEFAULT_TICK_RATE_MS));
    }

    #[test]
    fn test_event_handler_with_tick_rate() {
        let handler = EventHandler::with_tick_rate(50);
        assert_eq!(handler.tick_rate(), Duration::from_millis(50));
    }

    #[test]
    fn test_zero_tick_rate_is_clamped() {
        let handler = EventHandler::with_tick_rate(0);
        assert_eq!(handler.tick_rate(), Duration::from_millis(1));
    }

    #[test]
    fn test_convert_key_press() {
        let key = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        assert!(matches!(convert(CrosstermEvent::Key(key)), Event::Key(k) if k == key));
    }

    #[test]
    fn test_convert_key_release_is_tick() {
        let key = KeyEvent {
            code: KeyCode::Char('j'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert!(matches!(convert(CrosstermEvent::Key(key)), Event::Tick));
    }

    #[test]
    fn test_convert_resize() {
        assert!(matches!(
            convert(CrosstermEvent::Resize(120, 40)),
            Event::Resize(120, 40)
        ));
    }

    #[test]
    fn test_convert_ignored_events() {
        assert!(matches!(convert(CrosstermEvent::FocusGained), Event::Tick));
        assert!(matches!(
            convert(CrosstermEvent::Paste("x".to_string())),
            Event::Tick
        ));
    }
}
