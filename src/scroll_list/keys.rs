//! Key bindings for scrolling the list.
//!
//! | Binding | Keys |
//! |---------|------|
//! | `up` / `down` | `↑`/`k`, `↓`/`j` |
//! | `page_up` / `page_down` | `pgup`/`b`, `pgdn`/`space`/`f` |
//! | `half_page_up` / `half_page_down` | `u`/`ctrl+u`, `d`/`ctrl+d` |
//! | `goto_top` / `goto_bottom` | `home`/`g`, `end`/`G` |

use crate::key::{self, KeyMap};
use crossterm::event::KeyCode;

/// Key bindings of the scroll list.
#[derive(Debug, Clone)]
pub struct ScrollListKeyMap {
    /// Scroll up one row.
    pub up: key::Binding,
    /// Scroll down one row.
    pub down: key::Binding,
    /// Scroll up one page.
    pub page_up: key::Binding,
    /// Scroll down one page.
    pub page_down: key::Binding,
    /// Scroll up half a page.
    pub half_page_up: key::Binding,
    /// Scroll down half a page.
    pub half_page_down: key::Binding,
    /// Jump to the first row.
    pub goto_top: key::Binding,
    /// Jump to the last page.
    pub goto_bottom: key::Binding,
}

impl Default for ScrollListKeyMap {
    fn default() -> Self {
        Self {
            up: key::Binding::new(vec![KeyCode::Up, KeyCode::Char('k')]).with_help("↑/k", "up"),
            down: key::Binding::new(vec![KeyCode::Down, KeyCode::Char('j')])
                .with_help("↓/j", "down"),
            page_up: key::Binding::new(vec![KeyCode::PageUp, KeyCode::Char('b')])
                .with_help("b/pgup", "page up"),
            page_down: key::Binding::new(vec![
                KeyCode::PageDown,
                KeyCode::Char(' '),
                KeyCode::Char('f'),
            ])
            .with_help("f/pgdn", "page down"),
            half_page_up: key::Binding::new(vec!["u", "ctrl+u"]).with_help("u/ctrl+u", "½ page up"),
            half_page_down: key::Binding::new(vec!["d", "ctrl+d"])
                .with_help("d/ctrl+d", "½ page down"),
            goto_top: key::Binding::new(vec![KeyCode::Home, KeyCode::Char('g')])
                .with_help("g/home", "go to start"),
            goto_bottom: key::Binding::new(vec![KeyCode::End, KeyCode::Char('G')])
                .with_help("G/end", "go to end"),
        }
    }
}

impl KeyMap for ScrollListKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![&self.up, &self.down, &self.page_up, &self.page_down]
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        vec![
            vec![&self.up, &self.down],
            vec![&self.page_up, &self.page_down],
            vec![&self.half_page_up, &self.half_page_down],
            vec![&self.goto_top, &self.goto_bottom],
        ]
    }
}
