//! The terminal viewport the scroll list renders into.

use crate::windowed::{Spacer, SpacerKind, ViewportHost};

/// Scroll position and size of the list's area on screen.
///
/// `width` and `height` are the content area, i.e. the terminal size minus
/// the frame of the list style. The offset is measured in rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalViewport {
    /// First visible row of the virtual document.
    pub y_offset: usize,
    /// Visible columns.
    pub width: usize,
    /// Visible rows.
    pub height: usize,
    subscribed: bool,
    top: Spacer,
    bottom: Spacer,
}

impl TerminalViewport {
    /// A viewport of the given content size, scrolled to the top.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            y_offset: 0,
            width,
            height,
            subscribed: false,
            top: Spacer {
                kind: SpacerKind::Blank,
                height: 0,
            },
            bottom: Spacer {
                kind: SpacerKind::Blank,
                height: 0,
            },
        }
    }

    /// Whether scroll and resize signals are being delivered.
    pub fn subscribed(&self) -> bool {
        self.subscribed
    }

    /// Spacer above the rendered rows, as of the last draw.
    pub fn top_spacer(&self) -> &Spacer {
        &self.top
    }

    /// Spacer below the rendered rows, as of the last draw.
    pub fn bottom_spacer(&self) -> &Spacer {
        &self.bottom
    }
}

impl ViewportHost for TerminalViewport {
    fn scroll_offset(&self) -> usize {
        self.y_offset
    }

    fn viewport_height(&self) -> usize {
        self.height
    }

    fn subscribe(&mut self) {
        self.subscribed = true;
    }

    fn unsubscribe(&mut self) {
        self.subscribed = false;
    }

    fn layout_spacers(&mut self, top: &Spacer, bottom: &Spacer) {
        self.top = *top;
        self.bottom = *bottom;
    }
}
