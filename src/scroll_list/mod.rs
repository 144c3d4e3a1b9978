//! Virtualized scroll list component.
//!
//! A [`Model`] shows a long list of items in a fixed-height terminal area
//! while rendering only the items that intersect the visible rows. Items are
//! rendered lazily when they scroll into view, their real height (in lines)
//! is measured at that moment, and they are dropped again as soon as they
//! leave the view. Two spacers account for every item that is not rendered,
//! so scroll limits and the scroll percentage behave as if the whole list
//! were laid out.
//!
//! # Basic Usage
//!
//! ```rust
//! use bubbletea_virtual_scroll::scroll_list::Model;
//!
//! let items: Vec<String> = (0..10_000).map(|i| format!("line {i}")).collect();
//! let mut list = Model::new(items, 40, 10).unwrap();
//!
//! assert_eq!(list.visible_range(), Some(0..=10));
//! list.scroll_down(5000).unwrap();
//! assert_eq!(list.y_offset(), 5000);
//! assert_eq!(list.visible_range(), Some(4999..=5010));
//! ```
//!
//! # bubbletea-rs Integration
//!
//! ```rust
//! use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
//! use bubbletea_virtual_scroll::scroll_list::Model as ScrollList;
//!
//! struct App {
//!     log: ScrollList<String>,
//! }
//!
//! impl BubbleTeaModel for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let lines = (0..500).map(|i| format!("entry {i}")).collect();
//!         let log = ScrollList::new(lines, 0, 0).expect("empty viewport never renders");
//!         (Self { log }, None)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         // Key presses scroll, window sizes are debounced.
//!         self.log.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.log.view()
//!     }
//! }
//! ```
//!
//! Resizes arrive as `WindowSizeMsg`. The first one is applied at once; the
//! following ones update the visible area immediately but only recompute the
//! rendered window after [`Config::resize_debounce`] without further resizes.

mod host;
mod item;
mod keys;
mod rendering;
mod style;


pub use host::TerminalViewport;
pub use item::{Item, TextHandle};
pub use keys::ScrollListKeyMap;
pub use style::Styles;

use crate::debounce::DebounceMsg;
use crate::error::Result;
use crate::windowed::{Config, WindowedList};
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Model as BubbleTeaModel, Msg, WindowSizeMsg};
use item::{text_factory, RenderSettings, SharedSettings};
use lipgloss_extras::prelude::*;
use std::ops::RangeInclusive;
use std::sync::{Arc, Mutex};

// goto_bottom re-measures the items it scrolls into view; a few passes are
// enough for the scroll extent to settle.
const MAX_SETTLE_PASSES: usize = 8;

/// Virtualized scroll list over items of type `I`.
pub struct Model<I: Item> {
    list: WindowedList<I, TextHandle, TerminalViewport>,
    settings: SharedSettings,
    // Content width the current handles were rendered at.
    built_width: usize,
    styles: Styles,
    /// Key bindings used while focused.
    pub keymap: ScrollListKeyMap,
    focus: bool,
    width: usize,
    height: usize,
}

impl<I: Item> Model<I> {
    /// Creates a list of `width` × `height` cells with default settings.
    pub fn new(items: Vec<I>, width: usize, height: usize) -> Result<Self> {
        Self::with_config(items, Config::default(), width, height)
    }

    /// Creates a list with explicit windowing settings.
    pub fn with_config(items: Vec<I>, config: Config, width: usize, height: usize) -> Result<Self> {
        let mut model = Self::empty(config, width, height);
        model.list.init(items)?;
        Ok(model)
    }

    fn empty(config: Config, width: usize, height: usize) -> Self {
        let styles = Styles::default();
        let (content_width, content_height) = content_size(&styles.frame, width, height);
        let settings = Arc::new(Mutex::new(RenderSettings {
            width: content_width,
            item_style: styles.item.clone(),
        }));
        let list = WindowedList::new(
            config,
            TerminalViewport::new(content_width, content_height),
            text_factory::<I>(settings.clone()),
        );
        Self {
            list,
            settings,
            built_width: content_width,
            styles,
            keymap: ScrollListKeyMap::default(),
            focus: true,
            width,
            height,
        }
    }

    /// Replaces the key bindings.
    pub fn with_keymap(mut self, keymap: ScrollListKeyMap) -> Self {
        self.keymap = keymap;
        self
    }

    /// Current styles.
    pub fn styles(&self) -> &Styles {
        &self.styles
    }

    /// Replaces the styles and re-renders the visible items.
    pub fn set_styles(&mut self, styles: Styles) -> Result<()> {
        self.styles = styles;
        self.apply_size();
        self.list.calculate_size()?;
        self.rebuild()
    }

    /// Outer width in cells, frame included.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Outer height in rows, frame included.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Resizes the list immediately, without debouncing.
    pub fn set_size(&mut self, width: usize, height: usize) -> Result<()> {
        self.width = width;
        self.height = height;
        self.apply_size();
        self.list.calculate_size()?;
        if self.built_width != self.list.host().width {
            self.rebuild()?;
        }
        self.clamp_offset()
    }

    /// Pushes the outer size down to the viewport and the render settings.
    fn apply_size(&mut self) {
        let (content_width, content_height) = content_size(&self.styles.frame, self.width, self.height);
        let host = self.list.host_mut();
        host.width = content_width;
        host.height = content_height;
        if let Ok(mut settings) = self.settings.lock() {
            settings.width = content_width;
            settings.item_style = self.styles.item.clone();
        }
    }

    /// Re-renders the visible items at the current width and style.
    fn rebuild(&mut self) -> Result<()> {
        self.built_width = self.list.host().width;
        log::debug!("re-rendering visible items at width {}", self.built_width);
        self.list.rerender()?;
        self.clamp_offset()
    }

    /// Replaces all items.
    pub fn set_items(&mut self, items: Vec<I>) -> Result<()> {
        self.list.init(items)?;
        self.clamp_offset()
    }

    /// Inserts an item at `index`, or appends it when `index` is `None` or
    /// past the end.
    pub fn insert_item(&mut self, item: I, index: Option<usize>) -> Result<()> {
        self.list.add(item, index)
    }

    /// Removes the first item with `key`. Returns whether one was found.
    pub fn remove_item(&mut self, key: &I::Key) -> Result<bool> {
        let removed = self.list.remove(key)?;
        if removed {
            self.clamp_offset()?;
        }
        Ok(removed)
    }

    /// Moves the first item with `key` before position `to`. Returns whether
    /// one was found.
    pub fn move_item(&mut self, key: &I::Key, to: usize) -> Result<bool> {
        self.list.move_item(key, to)
    }

    /// Position of the first item with `key`.
    pub fn index_of(&self, key: &I::Key) -> Option<usize> {
        self.list.find_index(key)
    }

    /// Items in display order.
    pub fn items(&self) -> impl Iterator<Item = &I> + '_ {
        self.list.iter()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Whether the list has no items.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Indices of the items currently rendered.
    pub fn visible_range(&self) -> Option<RangeInclusive<usize>> {
        self.list.visible_range()
    }

    /// The windowing controller backing this list.
    pub fn windowed(&self) -> &WindowedList<I, TextHandle, TerminalViewport> {
        &self.list
    }

    /// First visible row.
    pub fn y_offset(&self) -> usize {
        self.list.host().y_offset
    }

    /// Height of the whole virtual document, in rows.
    pub fn total_height(&self) -> usize {
        self.list.total_height()
    }

    fn max_y_offset(&self) -> usize {
        self.list
            .total_height()
            .saturating_sub(self.list.host().height)
    }

    /// Whether the first row is visible.
    pub fn at_top(&self) -> bool {
        self.y_offset() == 0
    }

    /// Whether the last row is visible.
    pub fn at_bottom(&self) -> bool {
        self.y_offset() >= self.max_y_offset()
    }

    /// Scroll position as a fraction in `0.0..=1.0`.
    pub fn scroll_percent(&self) -> f64 {
        let max = self.max_y_offset();
        if max == 0 {
            return 1.0;
        }
        (self.y_offset() as f64 / max as f64).clamp(0.0, 1.0)
    }

    /// Scrolls to row `n`, clamped to the scroll range, and redraws if the
    /// window changed. Returns whether a draw pass ran.
    pub fn set_y_offset(&mut self, n: usize) -> Result<bool> {
        let n = n.min(self.max_y_offset());
        self.list.host_mut().y_offset = n;
        self.list.on_scroll()
    }

    /// Scrolls down `n` rows.
    pub fn scroll_down(&mut self, n: usize) -> Result<bool> {
        self.set_y_offset(self.y_offset().saturating_add(n))
    }

    /// Scrolls up `n` rows.
    pub fn scroll_up(&mut self, n: usize) -> Result<bool> {
        self.set_y_offset(self.y_offset().saturating_sub(n))
    }

    /// Scrolls down one page.
    pub fn page_down(&mut self) -> Result<bool> {
        self.scroll_down(self.list.host().height.max(1))
    }

    /// Scrolls up one page.
    pub fn page_up(&mut self) -> Result<bool> {
        self.scroll_up(self.list.host().height.max(1))
    }

    /// Scrolls down half a page.
    pub fn half_page_down(&mut self) -> Result<bool> {
        self.scroll_down((self.list.host().height / 2).max(1))
    }

    /// Scrolls up half a page.
    pub fn half_page_up(&mut self) -> Result<bool> {
        self.scroll_up((self.list.host().height / 2).max(1))
    }

    /// Scrolls to the first row.
    pub fn goto_top(&mut self) -> Result<bool> {
        self.set_y_offset(0)
    }

    /// Scrolls to the last page.
    ///
    /// Items scrolled into view are measured on the way, which can grow the
    /// document; the jump is repeated until the bottom stays put.
    pub fn goto_bottom(&mut self) -> Result<bool> {
        let mut drew = false;
        for _ in 0..MAX_SETTLE_PASSES {
            let max = self.max_y_offset();
            drew |= self.set_y_offset(max)?;
            if self.max_y_offset() == max {
                break;
            }
        }
        Ok(drew)
    }

    fn clamp_offset(&mut self) -> Result<()> {
        if self.y_offset() > self.max_y_offset() {
            self.set_y_offset(self.max_y_offset())?;
        }
        Ok(())
    }

    /// Handles key presses, window resizes and debounce ticks.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(size) = msg.downcast_ref::<WindowSizeMsg>() {
            return self.on_window_size(size.width as usize, size.height as usize);
        }

        if let Some(tick) = msg.downcast_ref::<DebounceMsg>() {
            if tick.id == self.list.debounce_id() {
                self.on_debounce(tick);
            }
            return None;
        }

        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            if !self.focus {
                return None;
            }
            let result = if self.keymap.down.matches(key_msg) {
                self.scroll_down(1)
            } else if self.keymap.up.matches(key_msg) {
                self.scroll_up(1)
            } else if self.keymap.page_down.matches(key_msg) {
                self.page_down()
            } else if self.keymap.page_up.matches(key_msg) {
                self.page_up()
            } else if self.keymap.half_page_down.matches(key_msg) {
                self.half_page_down()
            } else if self.keymap.half_page_up.matches(key_msg) {
                self.half_page_up()
            } else if self.keymap.goto_top.matches(key_msg) {
                self.goto_top()
            } else if self.keymap.goto_bottom.matches(key_msg) {
                self.goto_bottom()
            } else {
                Ok(false)
            };
            if let Err(err) = result {
                log::warn!("scroll failed: {}", err);
            }
        }
        None
    }

    fn on_window_size(&mut self, width: usize, height: usize) -> Option<Cmd> {
        let first = self.list.viewport_height() == 0;
        self.width = width;
        self.height = height;
        self.apply_size();

        if first {
            // The list just became visible; there is nothing to debounce.
            if let Err(err) = self.settle_resize() {
                log::warn!("initial size failed: {}", err);
            }
            return None;
        }
        Some(self.list.on_resize())
    }

    fn on_debounce(&mut self, tick: &DebounceMsg) {
        let result = self.list.handle_debounce(tick).and_then(|_| {
            if self.list.resize_pending() {
                // Stale tick; a newer resize is still waiting.
                return Ok(());
            }
            self.settle_resize()
        });
        if let Err(err) = result {
            log::warn!("resize failed: {}", err);
        }
    }

    fn settle_resize(&mut self) -> Result<()> {
        self.list.calculate_size()?;
        if self.built_width != self.list.host().width {
            self.rebuild()?;
        }
        self.clamp_offset()
    }

    /// Renders the visible rows inside the frame style.
    pub fn view(&self) -> String {
        self.styles.frame.render(&self.visible_lines().join("\n"))
    }
}

/// Content area left inside `frame` for an outer size.
fn content_size(frame: &Style, width: usize, height: usize) -> (usize, usize) {
    let (frame_width, frame_height) = frame_size(frame);
    (
        width.saturating_sub(frame_width),
        height.saturating_sub(frame_height),
    )
}

/// Columns and rows taken by the padding, margins and border of `frame`.
///
/// Border sides report as enabled on a style without a border, so they only
/// count once a visible border has been set.
fn frame_size(frame: &Style) -> (usize, usize) {
    let (border, top, right, bottom, left) = frame.get_border();
    let (border_width, border_height) = if border == hidden_border() {
        (0, 0)
    } else {
        (
            i32::from(left) + i32::from(right),
            i32::from(top) + i32::from(bottom),
        )
    };
    let width = frame.get_horizontal_padding() + frame.get_horizontal_margins() + border_width;
    let height = frame.get_vertical_padding() + frame.get_vertical_margins() + border_height;
    (width.max(0) as usize, height.max(0) as usize)
}

impl<I: Item> Component for Model<I> {
    fn focus(&mut self) -> Option<Cmd> {
        self.focus = true;
        None
    }

    fn blur(&mut self) {
        self.focus = false;
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

impl<I: Item> BubbleTeaModel for Model<I> {
    /// An empty list waiting for its first `WindowSizeMsg`.
    fn init() -> (Self, Option<Cmd>) {
        let mut model = Self::empty(Config::default(), 0, 0);
        if let Err(err) = model.list.init(Vec::new()) {
            log::error!("empty list failed to initialize: {}", err);
        }
        (model, None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}
