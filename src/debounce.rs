//! Single-slot debounce timer for bubbletea-rs programs.
//!
//! Scheduling returns a tick command; the tick comes back as a
//! [`DebounceMsg`]. Every call to [`Debouncer::schedule`] bumps the
//! debouncer's tag, so only the tick from the latest schedule is accepted by
//! [`Debouncer::fire`] and every earlier one is dropped as stale. A burst of
//! signals therefore collapses into one trailing action, `delay` after the
//! last signal.
//!
//! ```rust
//! use bubbletea_virtual_scroll::debounce::{DebounceMsg, Debouncer};
//! use std::time::Duration;
//!
//! let mut debouncer = Debouncer::new(Duration::from_millis(100));
//! let _first = debouncer.schedule();
//! let _second = debouncer.schedule();
//!
//! // Only the tick belonging to the second schedule fires.
//! assert!(!debouncer.fire(&DebounceMsg::new(debouncer.id(), 1)));
//! assert!(debouncer.fire(&DebounceMsg::new(debouncer.id(), 2)));
//! assert!(!debouncer.pending());
//! ```

use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Tick delivered when a debounce delay elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceMsg {
    /// Identifier of the debouncer that scheduled the tick.
    pub id: i64,
    tag: u64,
}

impl DebounceMsg {
    /// Builds a tick message by hand, mostly useful in tests.
    pub fn new(id: i64, tag: u64) -> Self {
        Self { id, tag }
    }

    /// The schedule generation this tick belongs to.
    pub fn tag(&self) -> u64 {
        self.tag
    }
}

/// Cancellable single-slot timer.
#[derive(Debug, Clone)]
pub struct Debouncer {
    id: i64,
    tag: u64,
    delay: Duration,
    pending: bool,
}

impl Debouncer {
    /// Creates a debouncer with its own unique id.
    pub fn new(delay: Duration) -> Self {
        Self {
            id: next_id(),
            tag: 0,
            delay,
            pending: false,
        }
    }

    /// Unique id used to route [`DebounceMsg`]s back to this debouncer.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Delay between the last signal and the trailing action.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether a scheduled tick is still waiting to fire.
    pub fn pending(&self) -> bool {
        self.pending
    }

    /// Schedules a tick, superseding any tick that is still pending.
    pub fn schedule(&mut self) -> Cmd {
        if self.pending {
            log::trace!("debouncer {} superseded tag {}", self.id, self.tag);
        }
        self.tag = self.tag.wrapping_add(1);
        self.pending = true;

        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(self.delay, move |_| Box::new(DebounceMsg { id, tag }) as Msg)
    }

    /// Drops the pending tick, if any. Its message will be ignored on arrival.
    pub fn cancel(&mut self) {
        self.tag = self.tag.wrapping_add(1);
        self.pending = false;
    }

    /// Accepts `msg` if it is the latest tick of this debouncer.
    ///
    /// Returns `true` exactly once per schedule; stale, foreign and repeated
    /// ticks return `false`.
    pub fn fire(&mut self, msg: &DebounceMsg) -> bool {
        if msg.id != self.id || msg.tag != self.tag || !self.pending {
            return false;
        }
        self.pending = false;
        true
    }
}
