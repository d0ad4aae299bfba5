use std::{collections::VecDeque, sync::Arc, time::Duration};

use futures_channel::oneshot;
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::{clamp_position, HistoryError, HistoryState, HistoryStorage};

/// How long [`DeferredHistoryStorage::go`] waits for the host by default.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(100);

struct Waiter<R> {
    id: usize,
    tx: oneshot::Sender<HistoryState<R>>,
}

struct Shared<R> {
    entries: Vec<HistoryState<R>>,
    current: usize,
    waiters: VecDeque<Waiter<R>>,
    moves: VecDeque<isize>,
}

impl<R: Clone> Shared<R> {
    fn current_state(&self) -> HistoryState<R> {
        self.entries[self.current].clone()
    }

    /// Announce the current entry to the oldest live waiter.
    fn pop_state(&mut self) {
        let state = self.current_state();
        while let Some(front) = self.waiters.front() {
            if front.tx.is_canceled() {
                trace!(id = front.id, "dropping abandoned history waiter");
                self.waiters.pop_front();
                continue;
            }
            if front.id == state.id {
                if let Some(waiter) = self.waiters.pop_front() {
                    _ = waiter.tx.send(state);
                }
            }
            break;
        }
    }
}

/// The external side of a [`DeferredHistoryStorage`].
///
/// A host owns the stored entries. Moves requested by a storage are only queued; they are
/// applied once the host calls [`HistoryHost::settle`], which then announces the new current
/// entry to the waiting storage. Moves that originate outside the storage (a user pressing a
/// back button, for instance) go through [`HistoryHost::navigate`].
pub struct HistoryHost<R> {
    shared: Arc<Mutex<Shared<R>>>,
}

impl<R> Clone for HistoryHost<R> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<R: Clone> Default for HistoryHost<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Clone> HistoryHost<R> {
    /// Create a host holding only the initial entry.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                entries: vec![HistoryState::initial()],
                current: 0,
                waiters: VecDeque::new(),
                moves: VecDeque::new(),
            })),
        }
    }

    /// The entry the host currently shows.
    pub fn state(&self) -> HistoryState<R> {
        self.shared.lock().current_state()
    }

    /// The number of requested moves that were not applied yet.
    pub fn pending_moves(&self) -> usize {
        self.shared.lock().moves.len()
    }

    /// Apply every queued move, announcing the current entry after each one.
    ///
    /// Returns how many moves were applied.
    pub fn settle(&self) -> usize {
        let mut shared = self.shared.lock();
        let mut applied = 0;
        while let Some(delta) = shared.moves.pop_front() {
            shared.current = clamp_position(shared.current, delta, shared.entries.len());
            shared.pop_state();
            applied += 1;
        }
        debug!(applied, current = shared.current, "settled history moves");
        applied
    }

    /// Move by `delta` entries without a storage asking for it.
    pub fn navigate(&self, delta: isize) -> HistoryState<R> {
        let mut shared = self.shared.lock();
        shared.current = clamp_position(shared.current, delta, shared.entries.len());
        shared.pop_state();
        shared.current_state()
    }
}

/// A [`HistoryStorage`] that writes through to a [`HistoryHost`].
///
/// Pushing and replacing take effect at once. Moving resolves only after the host
/// acknowledges the target entry, and fails with [`HistoryError::Timeout`] if that does not
/// happen within the configured timeout.
pub struct DeferredHistoryStorage<R> {
    host: HistoryHost<R>,
    timeout: Duration,
}

impl<R: Clone> DeferredHistoryStorage<R> {
    /// Create a storage backed by `host`.
    pub fn attach(host: &HistoryHost<R>) -> Self {
        Self {
            host: host.clone(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set how long [`HistoryStorage::go`] waits for the host.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The host this storage writes to.
    pub fn host(&self) -> &HistoryHost<R> {
        &self.host
    }
}

impl<R: Clone> HistoryStorage<R> for DeferredHistoryStorage<R> {
    fn push(&mut self, route: R) -> HistoryState<R> {
        let mut shared = self.host.shared.lock();
        shared.current += 1;
        let id = shared.current;
        shared.entries.truncate(id);
        shared.entries.push(HistoryState {
            id,
            route: Some(route),
        });
        shared.current_state()
    }

    fn replace(&mut self, route: R) -> HistoryState<R> {
        let mut shared = self.host.shared.lock();
        let id = shared.current;
        shared.entries[id] = HistoryState {
            id,
            route: Some(route),
        };
        shared.current_state()
    }

    async fn go(&mut self, delta: isize) -> Result<HistoryState<R>, HistoryError> {
        let (id, rx) = {
            let mut shared = self.host.shared.lock();
            let current = shared.current;
            let id = clamp_position(current, delta, shared.entries.len());

            // a move that clamps to nothing never reaches the host
            if delta != 0 && id == current {
                return Ok(shared.current_state());
            }

            let (tx, rx) = oneshot::channel();
            shared.waiters.push_back(Waiter { id, tx });
            shared.moves.push_back(id as isize - current as isize);
            (id, rx)
        };

        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(state)) => Ok(state),
            Ok(Err(_)) => Err(HistoryError::Disconnected { id }),
            Err(_) => {
                warn!(id, timeout = ?self.timeout, "history host did not acknowledge move");
                Err(HistoryError::Timeout {
                    id,
                    timeout: self.timeout,
                })
            }
        }
    }

    fn state(&self) -> HistoryState<R> {
        self.host.state()
    }
}
