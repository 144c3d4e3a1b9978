#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/bubbletea-virtual-scroll/")]

//! # bubbletea-virtual-scroll
//!
//! Windowed ("virtual scroll") list rendering for
//! [bubbletea-rs](https://github.com/joshka/bubbletea-rs) applications.
//!
//! A list with tens of thousands of entries only ever renders the handful of
//! items that intersect the visible area. Items get rendered when they scroll
//! into view, their real height is measured at that point, and they are
//! discarded once they leave the view. Two spacers stand in for everything
//! that is not rendered, so the scroll extent stays that of the full list.
//!
//! ## Layers
//!
//! - [`windowed`]: the host-agnostic controller. [`WindowedList`] owns the
//!   ordered record table, decides which records are materialized on every
//!   scroll, resize or mutation, and sizes both spacers. Rendering and the
//!   scroll container are abstracted behind the [`ItemHandle`] and
//!   [`ViewportHost`] traits.
//! - [`scroll_list`]: a ready-made bubbletea-rs component built on the
//!   controller. It renders any `Display` item into terminal lines and
//!   handles key presses and window resizes.
//! - [`debounce`]: the single-slot timer used to collapse bursts of resize
//!   signals into one recomputation.
//!
//! ## Quick Start
//!
//! ```rust
//! use bubbletea_virtual_scroll::prelude::*;
//!
//! let lines: Vec<String> = (0..50_000).map(|i| format!("row {i}")).collect();
//! let mut list = ScrollList::new(lines, 80, 20).unwrap();
//!
//! list.goto_bottom().unwrap();
//! assert!(list.at_bottom());
//! assert_eq!(list.visible_range(), Some(49_979..=49_999));
//!
//! list.remove_item(&"row 49999".to_string()).unwrap();
//! assert_eq!(list.len(), 49_999);
//! ```
//!
//! ## Focus Management
//!
//! The scroll list implements [`Component`]. While blurred it ignores key
//! presses but still follows resizes:
//!
//! ```rust
//! use bubbletea_virtual_scroll::prelude::*;
//!
//! let mut list = ScrollList::new(vec!["a".to_string()], 10, 3).unwrap();
//! list.blur();
//! assert!(!list.focused());
//! let _ = list.focus();
//! assert!(list.focused());
//! ```
//!
//! ## Logging
//!
//! Draw passes, resizes and teardown are reported through the
//! [`log`](https://docs.rs/log) facade at `debug` level, skipped refreshes
//! and handle disposal at `trace`. Failed draws from inside `update` are
//! logged at `warn`, since bubbletea-rs updates cannot return errors.

pub mod debounce;
pub mod error;
pub mod key;
pub mod scroll_list;
pub mod windowed;

use bubbletea_rs::Cmd;

/// Components that can take and release keyboard focus.
///
/// `focus()` may return a command to run when the component becomes active.
pub trait Component {
    /// Gives the component keyboard focus.
    fn focus(&mut self) -> Option<Cmd>;

    /// Takes keyboard focus away from the component.
    fn blur(&mut self);

    /// Whether the component currently has keyboard focus.
    fn focused(&self) -> bool;
}

pub use debounce::{DebounceMsg, Debouncer};
pub use error::{BoxError, Error, Result};
pub use key::{matches, Binding, Help as KeyHelp, KeyMap, KeyPress};
pub use scroll_list::Model as ScrollList;
pub use scroll_list::{Item, ScrollListKeyMap, Styles as ScrollListStyles, TerminalViewport, TextHandle};
pub use windowed::{Config, ItemHandle, Keyed, Spacer, SpacerKind, ViewportHost, WindowedList};

/// Prelude module for convenient imports.
///
/// ```rust
/// use bubbletea_virtual_scroll::prelude::*;
///
/// let config = Config::default().with_spacer_kind(SpacerKind::Fill('·'));
/// let list = ScrollList::with_config(vec![1u32, 2, 3], config, 20, 5).unwrap();
/// assert_eq!(list.len(), 3);
/// ```
pub mod prelude {
    pub use crate::debounce::{DebounceMsg, Debouncer};
    pub use crate::error::{Error, Result};
    pub use crate::key::{Binding, KeyMap};
    pub use crate::scroll_list::{
        Item, Model as ScrollList, ScrollListKeyMap, Styles as ScrollListStyles, TextHandle,
    };
    pub use crate::windowed::{
        Config, ItemHandle, Keyed, Spacer, SpacerKind, ViewportHost, WindowedList,
    };
    pub use crate::Component;
}
