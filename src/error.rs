//! Error type shared by the windowed list controller and its adapters.
//!
//! Only precondition violations surface as errors. Removing or moving a key
//! that is not in the list is not an error: list membership routinely races
//! against asynchronous data updates in interactive programs, so those calls
//! simply report that nothing changed.

use thiserror::Error;

/// Boxed error produced by an item factory.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures reported by [`WindowedList`](crate::windowed::WindowedList).
#[derive(Debug, Error)]
pub enum Error {
    /// A mutation was requested before the first call to `init`.
    #[error("windowed list used before init")]
    NotInitialized,

    /// The item factory could not build a handle for the item at `index`.
    #[error("item factory failed for index {index}")]
    Factory {
        /// Position of the record being materialized.
        index: usize,
        /// Error returned by the factory.
        #[source]
        source: BoxError,
    },

    /// The factory returned a handle that reported no extent once attached.
    #[error("handle for index {index} has no measurable extent")]
    Unmeasurable {
        /// Position of the record being materialized.
        index: usize,
    },
}

impl Error {
    /// Index of the record whose materialization failed, if any.
    pub fn index(&self) -> Option<usize> {
        match self {
            Error::NotInitialized => None,
            Error::Factory { index, .. } | Error::Unmeasurable { index } => Some(*index),
        }
    }
}
