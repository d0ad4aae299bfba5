use tracing::trace;

use crate::{clamp_position, HistoryError, HistoryState, HistoryStorage};

/// A [`HistoryStorage`] that stores all entries in memory.
///
/// Moves complete immediately.
#[derive(Debug, Clone)]
pub struct MemoryHistoryStorage<R> {
    entries: Vec<HistoryState<R>>,
    current: usize,
}

impl<R> Default for MemoryHistoryStorage<R> {
    fn default() -> Self {
        Self {
            entries: vec![HistoryState::initial()],
            current: 0,
        }
    }
}

impl<R> MemoryHistoryStorage<R> {
    /// Check whether there is an entry before the current one.
    pub fn can_go_back(&self) -> bool {
        self.current > 0
    }

    /// Check whether there is an entry after the current one.
    pub fn can_go_forward(&self) -> bool {
        self.current + 1 < self.entries.len()
    }

    /// The number of stored entries, including the initial one.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// A history always holds its initial entry.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl<R: Clone> HistoryStorage<R> for MemoryHistoryStorage<R> {
    fn push(&mut self, route: R) -> HistoryState<R> {
        self.current += 1;
        // drop the future before appending
        self.entries.truncate(self.current);
        self.entries.push(HistoryState {
            id: self.current,
            route: Some(route),
        });
        self.state()
    }

    fn replace(&mut self, route: R) -> HistoryState<R> {
        self.entries[self.current] = HistoryState {
            id: self.current,
            route: Some(route),
        };
        self.state()
    }

    async fn go(&mut self, delta: isize) -> Result<HistoryState<R>, HistoryError> {
        let target = clamp_position(self.current, delta, self.entries.len());
        trace!(from = self.current, to = target, delta, "moving through memory history");
        self.current = target;
        Ok(self.state())
    }

    fn state(&self) -> HistoryState<R> {
        self.entries[self.current].clone()
    }
}
