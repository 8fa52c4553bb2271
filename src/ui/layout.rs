//! Pane geometry as a pure function of the terminal size.

use ratatui::layout::Rect;

/// Terminals this wide or narrower stack the list above the detail pane.
pub const STACK_THRESHOLD: u16 = 80;

/// Rows used by the query bar at the top.
pub const QUERY_BAR_HEIGHT: u16 = 3;

/// Rows used by the status bar at the bottom.
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Narrowest list pane in side-by-side mode.
pub const MIN_LIST_WIDTH: u16 = 20;

/// Once this many rows are available the list gets two thirds instead of half.
const ROOMY_HEIGHT: u16 = 10;

/// Whether a terminal of `width` columns uses the stacked arrangement.
pub fn is_stacked(width: u16) -> bool {
    width <= STACK_THRESHOLD
}

/// Areas for each part of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panes {
    pub stacked: bool,
    pub query: Rect,
    pub list: Rect,
    pub detail: Rect,
    pub status: Rect,
}

/// The computed screen layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneLayout {
    /// No size known yet; render a placeholder only.
    Initializing,
    /// Normal layout.
    Ready(Panes),
}

impl PaneLayout {
    /// Compute the layout for a `width` x `height` terminal.
    pub fn compute(width: u16, height: u16) -> Self {
        if width == 0 || height == 0 {
            return PaneLayout::Initializing;
        }

        let stacked = is_stacked(width);
        let query = Rect::new(0, 0, width, QUERY_BAR_HEIGHT.min(height));
        let body_top = query.bottom();
        let status_y = height.saturating_sub(STATUS_BAR_HEIGHT).max(body_top);
        let status = Rect::new(0, status_y, width, height - status_y);
        let available = status_y - body_top;

        let (list, detail) = if stacked {
            let list_height = list_height(available);
            (
                Rect::new(0, body_top, width, list_height),
                Rect::new(0, body_top + list_height, width, available - list_height),
            )
        } else {
            let list_width = (width / 3).max(MIN_LIST_WIDTH).min(width);
            (
                Rect::new(0, body_top, list_width, available),
                Rect::new(list_width, body_top, width - list_width, available),
            )
        };

        PaneLayout::Ready(Panes {
            stacked,
            query,
            list,
            detail,
            status,
        })
    }

    /// The panes, unless still initializing.
    pub fn panes(&self) -> Option<&Panes> {
        match self {
            PaneLayout::Initializing => None,
            PaneLayout::Ready(panes) => Some(panes),
        }
    }

    /// Whether the stacked arrangement is in use.
    pub fn is_stacked(&self) -> bool {
        self.panes().is_some_and(|p| p.stacked)
    }
}

impl Default for PaneLayout {
    fn default() -> Self {
        PaneLayout::Initializing
    }
}

/// Rows given to the list in stacked mode.
fn list_height(available: u16) -> u16 {
    if available > ROOMY_HEIGHT {
        available * 2 / 3
    } else {
        available / 2
    }
}
