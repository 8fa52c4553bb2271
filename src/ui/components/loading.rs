//! Spinner shown in the issue list title while a search is in flight.

/// Spinner animation frames.
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// An animated loading indicator advanced by ticks.
#[derive(Debug, Clone, Default)]
pub struct LoadingIndicator {
    frame: usize,
    active: bool,
}

impl LoadingIndicator {
    /// Start spinning from the first frame.
    pub fn start(&mut self) {
        self.active = true;
        self.frame = 0;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Advance one frame. Does nothing while stopped.
    pub fn tick(&mut self) {
        if self.active {
            self.frame = (self.frame + 1) % SPINNER_FRAMES.len();
        }
    }

    /// The current frame glyph.
    pub fn spinner_frame(&self) -> &'static str {
        SPINNER_FRAMES[self.frame]
    }

    /// Text to embed in another widget, empty while stopped.
    pub fn text(&self) -> String {
        if self.active {
            format!("{} Loading...", self.spinner_frame())
        } else {
            String::new()
        }
    }
}
