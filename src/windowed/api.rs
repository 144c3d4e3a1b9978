//! Incremental mutations of the record table.
//!
//! Every mutation bumps the table revision and runs the refresh gate, so a
//! change is drawn right away unless the viewport size is still unknown.
//! None of them create handles directly; a newly inserted record is
//! materialized by the draw pass if it lands inside the band.

use super::types::{ItemHandle, Keyed, Record, ViewportHost};
use super::WindowedList;
use crate::error::{Error, Result};

impl<D: Keyed, H: ItemHandle, V: ViewportHost> WindowedList<D, H, V> {
    /// Position of the first record whose key equals `key`.
    pub fn find_index(&self, key: &D::Key) -> Option<usize> {
        self.records
            .iter()
            .position(|record| &record.data.key() == key)
    }

    /// Whether a record with `key` exists.
    pub fn contains(&self, key: &D::Key) -> bool {
        self.find_index(key).is_some()
    }

    /// Inserts `data` at `index`, or appends when `index` is `None` or past
    /// the end.
    pub fn add(&mut self, data: D, index: Option<usize>) -> Result<()> {
        self.ensure_initialized()?;
        let record = Record::new(data, self.config.base_item_height);
        match index {
            Some(index) if index < self.records.len() => self.records.insert(index, record),
            _ => self.records.push(record),
        }
        self.revision += 1;
        self.refresh()?;
        Ok(())
    }

    /// Removes the first record with `key`, destroying its handle.
    ///
    /// Returns `Ok(false)` without touching anything when the key is absent.
    pub fn remove(&mut self, key: &D::Key) -> Result<bool> {
        self.ensure_initialized()?;
        let Some(index) = self.find_index(key) else {
            log::trace!("remove: {:?} not in list", key);
            return Ok(false);
        };
        let mut record = self.records.remove(index);
        record.release();
        self.revision += 1;
        self.refresh()?;
        Ok(true)
    }

    /// Moves the first record with `key` so it is inserted before position
    /// `to` of the sequence before the move.
    ///
    /// When the record came from before `to`, `to` is decremented to account
    /// for the removal: on `[A, B, C, D]`, moving `A` to 2 gives
    /// `[B, A, C, D]` and moving `D` to 0 gives `[D, A, B, C]`. Targets past
    /// the end append. The moved record loses its handle and falls back to
    /// the base height until it is measured again. Returns `Ok(false)` when
    /// the key is absent.
    pub fn move_item(&mut self, key: &D::Key, to: usize) -> Result<bool> {
        self.ensure_initialized()?;
        let Some(from) = self.find_index(key) else {
            log::trace!("move: {:?} not in list", key);
            return Ok(false);
        };
        let mut record = self.records.remove(from);
        record.release();
        let to = if from < to { to - 1 } else { to };

        let record = Record::new(record.data, self.config.base_item_height);
        if to < self.records.len() {
            self.records.insert(to, record);
        } else {
            self.records.push(record);
        }
        self.revision += 1;
        self.refresh()?;
        Ok(true)
    }

    fn ensure_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }
}
