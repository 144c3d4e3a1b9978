//! Windowed ("virtual scroll") list controller.
//!
//! [`WindowedList`] keeps an ordered table of records, one per item, and on
//! every scroll, resize or mutation decides which records must have a live
//! [`ItemHandle`] and how tall the two spacers around them must be so the
//! scroll range looks as if every item were present.
//!
//! Only records whose cumulative `[top, top + height]` range intersects
//! `[scroll_offset, scroll_offset + viewport_height]` are materialized.
//! Heights start at [`Config::base_item_height`] and are replaced by the
//! measured extent when a handle is first created.
//!
//! # Example
//!
//! ```rust
//! use bubbletea_virtual_scroll::windowed::{
//!     Config, ItemHandle, Spacer, ViewportHost, WindowedList,
//! };
//!
//! struct Row(usize);
//!
//! impl ItemHandle for Row {
//!     fn measured_extent(&self) -> Option<usize> { Some(20) }
//!     fn attach(&mut self, _index: usize) {}
//!     fn destroy(self) {}
//! }
//!
//! #[derive(Default)]
//! struct Host { offset: usize, height: usize }
//!
//! impl ViewportHost for Host {
//!     fn scroll_offset(&self) -> usize { self.offset }
//!     fn viewport_height(&self) -> usize { self.height }
//!     fn subscribe(&mut self) {}
//!     fn unsubscribe(&mut self) {}
//!     fn layout_spacers(&mut self, _top: &Spacer, _bottom: &Spacer) {}
//! }
//!
//! let host = Host { offset: 500, height: 100 };
//! let config = Config::default().with_base_item_height(20);
//! let mut list = WindowedList::new(config, host, |_: &u32, index| Ok(Row(index)));
//! list.init(0..1000u32).unwrap();
//!
//! assert_eq!(list.visible_range(), Some(24..=30));
//! assert_eq!(list.top_spacer().height, 480);
//! assert_eq!(list.materialized().count(), 7);
//! ```

mod api;
mod types;

#[cfg(test)]
mod tests;

pub use types::{Config, ItemHandle, Keyed, Spacer, SpacerKind, ViewportHost};

use crate::debounce::{DebounceMsg, Debouncer};
use crate::error::{BoxError, Error, Result};
use bubbletea_rs::Cmd;
use std::collections::VecDeque;
use std::ops::RangeInclusive;
use types::{DrawStamp, Record};

type Factory<D, H> = Box<dyn FnMut(&D, usize) -> std::result::Result<H, BoxError> + Send>;

/// Virtual scroll controller over items of type `D`.
///
/// `H` is the handle type produced by the item factory and `V` the viewport
/// host. The controller owns the record table, every live handle and both
/// spacers for its whole lifetime; [`delete`](Self::delete) (or dropping the
/// controller) unsubscribes from the host and destroys every handle.
pub struct WindowedList<D, H: ItemHandle, V: ViewportHost> {
    config: Config,
    host: V,
    factory: Factory<D, H>,
    records: Vec<Record<D, H>>,
    initialized: bool,
    viewport_height: usize,
    // Bumped by every mutation and viewport height change.
    revision: u64,
    stamps: VecDeque<DrawStamp>,
    band: Option<(usize, usize)>,
    top_spacer: Spacer,
    bottom_spacer: Spacer,
    debouncer: Debouncer,
    draws: u64,
    torn_down: bool,
}

impl<D, H: ItemHandle, V: ViewportHost> WindowedList<D, H, V> {
    /// Creates a controller and subscribes it to the host's signals.
    ///
    /// The list is empty and uninitialized until [`init`](Self::init) is
    /// called; mutations before that fail with [`Error::NotInitialized`].
    pub fn new<F>(config: Config, mut host: V, factory: F) -> Self
    where
        F: FnMut(&D, usize) -> std::result::Result<H, BoxError> + Send + 'static,
    {
        host.subscribe();
        let debouncer = Debouncer::new(config.resize_debounce);
        Self {
            top_spacer: Spacer::new(config.spacer_kind),
            bottom_spacer: Spacer::new(config.spacer_kind),
            config,
            host,
            factory: Box::new(factory),
            records: Vec::new(),
            initialized: false,
            viewport_height: 0,
            revision: 0,
            stamps: VecDeque::with_capacity(2),
            band: None,
            debouncer,
            draws: 0,
            torn_down: false,
        }
    }

    /// Replaces the whole table with `items` and draws immediately.
    ///
    /// Every live handle is destroyed first, even when the new items share
    /// keys with the old ones.
    pub fn init<I>(&mut self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = D>,
    {
        let released = self.release_all();
        let base = self.config.base_item_height;
        self.records = items
            .into_iter()
            .map(|data| Record::new(data, base))
            .collect();
        self.initialized = true;
        self.revision += 1;
        self.viewport_height = self.host.viewport_height();
        log::debug!(
            "init: {} records, {} handles released, viewport height {}",
            self.records.len(),
            released,
            self.viewport_height
        );
        let offset = self.host.scroll_offset();
        self.draw(offset)
    }

    /// Destroys every live handle and draws again, so the visible records
    /// are re-created through the factory.
    ///
    /// Heights already measured are kept; each record is measured again the
    /// next time it is materialized. Does nothing before [`init`](Self::init).
    pub fn rerender(&mut self) -> Result<()> {
        if !self.initialized {
            return Ok(());
        }
        let released = self.release_all();
        self.revision += 1;
        log::debug!("rerender: {} handles released", released);
        let offset = self.host.scroll_offset();
        self.draw(offset)
    }

    /// Recomputes the band unless nothing relevant changed.
    ///
    /// Skips when the viewport height is unknown, or when the last two draws
    /// were at the current scroll offset and the latest one saw the current
    /// item count and table revision. Returns whether a draw pass ran.
    pub fn refresh(&mut self) -> Result<bool> {
        if !self.initialized {
            return Ok(false);
        }
        let offset = self.host.scroll_offset();
        if self.viewport_height == 0 || self.unchanged_since_last_draws(offset) {
            log::trace!("refresh skipped at offset {}", offset);
            return Ok(false);
        }
        self.draw(offset)?;
        Ok(true)
    }

    /// Scroll signal entry point.
    pub fn on_scroll(&mut self) -> Result<bool> {
        self.refresh()
    }

    /// Resize signal entry point.
    ///
    /// Returns the debounce tick; route the resulting [`DebounceMsg`] to
    /// [`handle_debounce`](Self::handle_debounce). Signals arriving before
    /// the tick supersede it.
    pub fn on_resize(&mut self) -> Cmd {
        self.debouncer.schedule()
    }

    /// Completes a debounced resize. Stale or foreign ticks are ignored.
    pub fn handle_debounce(&mut self, msg: &DebounceMsg) -> Result<bool> {
        if !self.debouncer.fire(msg) {
            return Ok(false);
        }
        self.calculate_size()
    }

    /// Re-reads the viewport height from the host and refreshes.
    pub fn calculate_size(&mut self) -> Result<bool> {
        let height = self.host.viewport_height();
        if height != self.viewport_height {
            log::debug!("viewport height {} -> {}", self.viewport_height, height);
            self.viewport_height = height;
            self.revision += 1;
        }
        self.refresh()
    }

    /// Unsubscribes from the host and destroys every live handle.
    pub fn delete(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.debouncer.cancel();
        self.host.unsubscribe();
        let released = self.release_all();
        log::debug!("teardown: {} handles released", released);
    }

    fn release_all(&mut self) -> usize {
        let mut released = 0;
        for record in &mut self.records {
            if record.release() {
                released += 1;
            }
        }
        self.band = None;
        released
    }

    fn unchanged_since_last_draws(&self, offset: usize) -> bool {
        match self.stamps.back() {
            Some(last) if self.stamps.len() == 2 => {
                self.stamps.iter().all(|stamp| stamp.offset == offset)
                    && last.len == self.records.len()
                    && last.revision == self.revision
            }
            _ => false,
        }
    }

    fn push_stamp(&mut self, offset: usize) {
        self.stamps.push_back(DrawStamp {
            offset,
            len: self.records.len(),
            revision: self.revision,
        });
        while self.stamps.len() > 2 {
            self.stamps.pop_front();
        }
    }

    /// One band computation at `offset`.
    ///
    /// When a handle cannot be created the pass still settles the table on
    /// the records materialized before the failing one, so live handles,
    /// band and spacers always agree, and the error is returned.
    fn draw(&mut self, offset: usize) -> Result<()> {
        self.push_stamp(offset);

        let start_top = offset;
        let end_top = offset.saturating_add(self.viewport_height);

        let mut top_padding = 0;
        let mut band: Option<(usize, usize)> = None;
        let mut created = 0;
        let mut failure = None;

        let mut top = 0usize;
        for index in 0..self.records.len() {
            let height = self.records[index].height;
            if top + height < start_top {
                top_padding += height;
            } else if top > end_top {
                break;
            } else {
                if self.records[index].handle.is_none() {
                    if let Err(err) = self.materialize(index) {
                        failure = Some(err);
                        break;
                    }
                    created += 1;
                }
                band = Some(match band {
                    Some((start, _)) => (start, index),
                    None => (index, index),
                });
            }
            // A fresh measurement only shifts the records after this one.
            top += self.records[index].height;
        }

        let destroyed = self.settle(band, top_padding);

        if let Some(err) = failure {
            log::warn!(
                "draw at offset {} aborted with band {:?}: {}",
                offset,
                band,
                err
            );
            // Force the next refresh to retry.
            self.stamps.clear();
            return Err(err);
        }

        self.draws += 1;
        log::debug!(
            "draw at offset {}: band {:?}, top {}, bottom {}, +{} -{}",
            offset,
            band,
            self.top_spacer.height,
            self.bottom_spacer.height,
            created,
            destroyed
        );
        Ok(())
    }

    /// Releases every handle outside `band`, re-attaches the ones inside and
    /// lays out both spacers. Returns the number of handles destroyed.
    fn settle(&mut self, band: Option<(usize, usize)>, top_padding: usize) -> usize {
        let mut destroyed = 0;
        let mut inside_height = 0;
        for (index, record) in self.records.iter_mut().enumerate() {
            let inside = band.is_some_and(|(start, end)| start <= index && index <= end);
            if inside {
                inside_height += record.height;
                if let Some(handle) = record.handle.as_mut() {
                    handle.attach(index);
                }
            } else if record.release() {
                destroyed += 1;
            }
        }

        self.band = band;
        self.top_spacer.height = top_padding;
        self.bottom_spacer.height = self
            .total_height()
            .saturating_sub(top_padding + inside_height);
        self.host
            .layout_spacers(&self.top_spacer, &self.bottom_spacer);
        destroyed
    }

    /// Creates, attaches and measures the handle of record `index`.
    ///
    /// A handle that cannot be measured is destroyed before returning, so a
    /// failed materialization never leaves a handle behind in the table.
    fn materialize(&mut self, index: usize) -> Result<()> {
        let record = &mut self.records[index];
        let mut handle =
            (self.factory)(&record.data, index).map_err(|source| Error::Factory { index, source })?;
        handle.attach(index);
        match handle.measured_extent() {
            Some(extent) => {
                record.height = extent;
                record.handle = Some(handle);
                Ok(())
            }
            None => {
                handle.destroy();
                Err(Error::Unmeasurable { index })
            }
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether [`init`](Self::init) has been called.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Item at `index`.
    pub fn get(&self, index: usize) -> Option<&D> {
        self.records.get(index).map(|record| &record.data)
    }

    /// Items in presentation order.
    pub fn iter(&self) -> impl Iterator<Item = &D> + '_ {
        self.records.iter().map(|record| &record.data)
    }

    /// Last known height of the record at `index`.
    pub fn height_of(&self, index: usize) -> Option<usize> {
        self.records.get(index).map(|record| record.height)
    }

    /// Sum of all last known record heights: the full scroll extent.
    pub fn total_height(&self) -> usize {
        self.records.iter().map(|record| record.height).sum()
    }

    /// Indices materialized by the last draw pass.
    pub fn visible_range(&self) -> Option<RangeInclusive<usize>> {
        self.band.map(|(start, end)| start..=end)
    }

    /// Live handles with their record index, in presentation order.
    pub fn materialized(&self) -> impl Iterator<Item = (usize, &H)> + '_ {
        self.records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| record.handle.as_ref().map(|handle| (index, handle)))
    }

    /// Spacer standing in for the records above the band.
    pub fn top_spacer(&self) -> &Spacer {
        &self.top_spacer
    }

    /// Spacer standing in for the records below the band.
    pub fn bottom_spacer(&self) -> &Spacer {
        &self.bottom_spacer
    }

    /// Viewport height captured by the last `init` or `calculate_size`.
    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    /// The viewport host.
    pub fn host(&self) -> &V {
        &self.host
    }

    /// Mutable access to the viewport host, e.g. to move its scroll offset.
    pub fn host_mut(&mut self) -> &mut V {
        &mut self.host
    }

    /// Construction-time settings.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of completed draw passes.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Id of the resize debouncer, to route [`DebounceMsg`]s.
    pub fn debounce_id(&self) -> i64 {
        self.debouncer.id()
    }

    /// Whether a resize is waiting for its debounce tick.
    pub fn resize_pending(&self) -> bool {
        self.debouncer.pending()
    }
}

impl<D, H: ItemHandle, V: ViewportHost> Drop for WindowedList<D, H, V> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<D, H: ItemHandle, V: ViewportHost> std::fmt::Debug for WindowedList<D, H, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowedList")
            .field("len", &self.records.len())
            .field("initialized", &self.initialized)
            .field("viewport_height", &self.viewport_height)
            .field("band", &self.band)
            .field("top_spacer", &self.top_spacer)
            .field("bottom_spacer", &self.bottom_spacer)
            .field("draws", &self.draws)
            .finish()
    }
}
