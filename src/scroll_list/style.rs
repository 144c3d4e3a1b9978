//! Styles of the scroll list.

use lipgloss_extras::prelude::*;

/// Visual configuration of a scroll list.
///
/// `frame` wraps the whole list; its borders, padding and margins are taken
/// out of the space available to rows. `item` is applied to every rendered
/// item line. `spacer` is applied to rows rendered for a spacer with
/// [`SpacerKind::Fill`](crate::windowed::SpacerKind::Fill).
#[derive(Debug, Clone)]
pub struct Styles {
    /// Style of the list frame.
    pub frame: Style,
    /// Style of item lines.
    pub item: Style,
    /// Style of filled spacer rows.
    pub spacer: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            frame: Style::new(),
            item: Style::new(),
            spacer: Style::new().foreground(AdaptiveColor {
                Light: "#DDDADA",
                Dark: "#3C3C3C",
            }),
        }
    }
}
