//! Collaborator traits and plain data types of the windowed list.
//!
//! The controller never looks inside the things it manages. It talks to:
//! - a [`ViewportHost`] for the scroll offset, the visible extent, the
//!   scroll/resize subscription and spacer placement;
//! - an item factory (a closure) that builds an [`ItemHandle`] for one item;
//! - the [`ItemHandle`]s themselves, which can only be measured, attached
//!   and destroyed.

use std::fmt::Debug;
use std::time::Duration;

/// Identity of a list item.
///
/// Lookups by `remove`, `move_item` and `find_index` compare keys, never the
/// items themselves.
pub trait Keyed {
    /// Opaque identity type.
    type Key: PartialEq + Debug + Clone;

    /// Returns the identity of this item.
    fn key(&self) -> Self::Key;
}

macro_rules! keyed_by_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl Keyed for $t {
                type Key = $t;

                fn key(&self) -> Self::Key {
                    self.clone()
                }
            }
        )*
    };
}

keyed_by_value!(String, &'static str, u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

/// A renderable unit produced on demand for one item.
pub trait ItemHandle {
    /// Extent along the scroll axis once attached. `None` if it cannot be
    /// measured, which the controller treats as a factory failure.
    fn measured_extent(&self) -> Option<usize>;

    /// Places the handle in its container at record position `index`.
    ///
    /// Called on creation and again on every draw pass that keeps the handle,
    /// so implementations must be idempotent.
    fn attach(&mut self, index: usize);

    /// Releases the handle. Called exactly once, when the item leaves the
    /// band or its record is removed.
    fn destroy(self);
}

/// The scrollable surface the controller renders into.
pub trait ViewportHost {
    /// Current scroll position along the vertical axis.
    fn scroll_offset(&self) -> usize;

    /// Current visible extent. Zero means the size is not known yet.
    fn viewport_height(&self) -> usize;

    /// Starts delivering scroll and resize signals to the controller.
    fn subscribe(&mut self);

    /// Stops delivering scroll and resize signals.
    fn unsubscribe(&mut self);

    /// Sizes the two spacers. `bottom` must trail every attached handle.
    fn layout_spacers(&mut self, top: &Spacer, bottom: &Spacer);
}

/// Structural element used for the padding spacers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpacerKind {
    /// Empty space.
    #[default]
    Blank,
    /// Space filled with a repeated character, such as `~`.
    Fill(char),
}

/// One of the two padding elements framing the materialized band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spacer {
    /// What the spacer is made of.
    pub kind: SpacerKind,
    /// Cumulative height of the records it stands in for.
    pub height: usize,
}

impl Spacer {
    pub(crate) fn new(kind: SpacerKind) -> Self {
        Self { kind, height: 0 }
    }
}

/// Construction-time settings of a windowed list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Element kind of both spacers.
    pub spacer_kind: SpacerKind,
    /// Height assumed for a record before its first measurement.
    pub base_item_height: usize,
    /// Quiet period after the last resize signal before recomputing.
    pub resize_debounce: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spacer_kind: SpacerKind::Blank,
            base_item_height: 1,
            resize_debounce: Duration::from_millis(100),
        }
    }
}

impl Config {
    /// Sets the spacer element kind.
    pub fn with_spacer_kind(mut self, kind: SpacerKind) -> Self {
        self.spacer_kind = kind;
        self
    }

    /// Sets the estimated height of unmeasured records.
    pub fn with_base_item_height(mut self, height: usize) -> Self {
        self.base_item_height = height;
        self
    }

    /// Sets the resize debounce delay.
    pub fn with_resize_debounce(mut self, delay: Duration) -> Self {
        self.resize_debounce = delay;
        self
    }
}

/// One entry of the item table.
#[derive(Debug)]
pub(crate) struct Record<D, H> {
    pub data: D,
    pub height: usize,
    pub handle: Option<H>,
}

impl<D, H: ItemHandle> Record<D, H> {
    pub fn new(data: D, height: usize) -> Self {
        Self {
            data,
            height,
            handle: None,
        }
    }

    /// Destroys the handle if one is attached. Returns whether it was.
    pub fn release(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.destroy();
                true
            }
            None => false,
        }
    }
}

/// What the refresh gate remembers about a draw pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DrawStamp {
    pub offset: usize,
    pub len: usize,
    pub revision: u64,
}
