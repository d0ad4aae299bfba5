#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

use std::{future::Future, time::Duration};

mod memory;
pub use memory::*;

mod deferred;
pub use deferred::*;

/// A single entry of a navigation history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryState<R> {
    /// The position of the entry. The entry a history starts with has the id `0`.
    pub id: usize,

    /// The route stored at this position, if any. The initial entry has none.
    pub route: Option<R>,
}

impl<R> HistoryState<R> {
    pub(crate) fn initial() -> Self {
        Self { id: 0, route: None }
    }
}

/// An error that can occur while moving through a history.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    /// The host did not acknowledge the move in time.
    #[error("the history host did not acknowledge the move to entry {id} within {timeout:?}")]
    Timeout {
        /// The id of the entry the move targeted.
        id: usize,
        /// How long the storage waited.
        timeout: Duration,
    },

    /// The host dropped the pending move without acknowledging it.
    #[error("the history host dropped the move to entry {id}")]
    Disconnected {
        /// The id of the entry the move targeted.
        id: usize,
    },
}

/// An ordered store of navigation history entries.
///
/// Implementations must keep ids equal to positions: pushing after moving back discards the
/// entries in front of the current one, and moves are clamped to the stored range.
pub trait HistoryStorage<R> {
    /// Add a new entry after the current one and make it current.
    fn push(&mut self, route: R) -> HistoryState<R>;

    /// Overwrite the current entry.
    fn replace(&mut self, route: R) -> HistoryState<R>;

    /// Move by `delta` entries relative to the current one.
    ///
    /// The returned future resolves with the entry that became current. Hosts that move
    /// asynchronously may fail with [`HistoryError`].
    fn go(&mut self, delta: isize) -> impl Future<Output = Result<HistoryState<R>, HistoryError>>;

    /// The current entry.
    fn state(&self) -> HistoryState<R>;
}

/// Clamp `current + delta` into `0..len`.
pub(crate) fn clamp_position(current: usize, delta: isize, len: usize) -> usize {
    current
        .saturating_add_signed(delta)
        .min(len.saturating_sub(1))
}
