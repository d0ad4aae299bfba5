//! Binding a [`Navigator`] to a navigation history.

use std::mem;

use tracing::debug;
use wayfinder_history::{HistoryState, HistoryStorage};

use crate::{navigation::Navigator, route::RouteRequest, trace::TraceRoute, Result};

/// How the current entry of a [`RouteHistory`] changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionKind {
    /// A new entry was pushed.
    Push,
    /// The current entry was replaced.
    Replace,
    /// The history moved to another entry.
    Go {
        /// The requested offset.
        delta: isize,
        /// The offset the history actually moved by.
        real_delta: isize,
    },
}

/// A change of the current route.
#[derive(Debug)]
pub struct Transition<'n, T> {
    /// What caused the change.
    pub kind: TransitionKind,
    /// The previous trace. `None` before the first navigation or at the initial entry.
    pub from: Option<TraceRoute<'n, T>>,
    /// The new trace. `None` when the history moved to its initial entry.
    pub to: Option<TraceRoute<'n, T>>,
}

/// Keeps a [`HistoryStorage`] and the routes resolved for its entries in step.
pub struct RouteHistory<'n, T, S> {
    navigator: &'n Navigator<T>,
    storage: S,
    state: HistoryState<RouteRequest>,
    current: Option<TraceRoute<'n, T>>,
}

impl<'n, T, S> RouteHistory<'n, T, S>
where
    S: HistoryStorage<RouteRequest>,
{
    /// Bind `storage` to `navigator`, starting at the storage's current entry.
    ///
    /// The current entry is not resolved until the history changes.
    pub fn new(navigator: &'n Navigator<T>, storage: S) -> Self {
        let state = storage.state();
        Self {
            navigator,
            storage,
            state,
            current: None,
        }
    }

    /// Resolve `request` and push it as a new entry.
    ///
    /// Nothing is written to the storage when the request fails to resolve.
    pub fn push(&mut self, request: impl Into<RouteRequest>) -> Result<Transition<'n, T>> {
        let request = request.into();
        let to = self.navigator.route_to(request.clone())?;
        self.state = self.storage.push(request);
        debug!(id = self.state.id, path = to.path(), "pushed history entry");
        Ok(self.transition(TransitionKind::Push, Some(to)))
    }

    /// Resolve `request` and replace the current entry with it.
    pub fn replace(&mut self, request: impl Into<RouteRequest>) -> Result<Transition<'n, T>> {
        let request = request.into();
        let to = self.navigator.route_to(request.clone())?;
        self.state = self.storage.replace(request);
        debug!(id = self.state.id, path = to.path(), "replaced history entry");
        Ok(self.transition(TransitionKind::Replace, Some(to)))
    }

    /// Move by `delta` entries and resolve the entry the storage lands on.
    pub async fn go(&mut self, delta: isize) -> Result<Transition<'n, T>> {
        let state = self.storage.go(delta).await?;
        self.arrive(state, delta)
    }

    /// Move to the previous entry.
    pub async fn back(&mut self) -> Result<Transition<'n, T>> {
        self.go(-1).await
    }

    /// Move to the next entry.
    pub async fn forward(&mut self) -> Result<Transition<'n, T>> {
        self.go(1).await
    }

    /// Pick up a move of the storage that happened outside this history.
    ///
    /// Returns `None` when the storage is still at the entry this history knows about.
    /// Pushes and replacements made behind its back are not detected.
    pub fn notify(&mut self) -> Result<Option<Transition<'n, T>>> {
        let state = self.storage.state();
        let delta = offset(&self.state, &state);
        if delta == 0 {
            return Ok(None);
        }
        self.arrive(state, delta).map(Some)
    }

    /// The trace of the current entry.
    pub fn current(&self) -> Option<&TraceRoute<'n, T>> {
        self.current.as_ref()
    }

    /// The current entry as last seen by this history.
    pub fn state(&self) -> &HistoryState<RouteRequest> {
        &self.state
    }

    /// The underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The navigator requests are resolved with.
    pub fn navigator(&self) -> &'n Navigator<T> {
        self.navigator
    }

    fn arrive(
        &mut self,
        state: HistoryState<RouteRequest>,
        delta: isize,
    ) -> Result<Transition<'n, T>> {
        let real_delta = offset(&self.state, &state);
        let request = state.route.clone();
        self.state = state;
        debug!(id = self.state.id, delta, real_delta, "moved through history");

        let to = match request {
            Some(request) => Some(self.navigator.route_to(request)?),
            None => None,
        };
        Ok(self.transition(TransitionKind::Go { delta, real_delta }, to))
    }

    fn transition(
        &mut self,
        kind: TransitionKind,
        to: Option<TraceRoute<'n, T>>,
    ) -> Transition<'n, T> {
        let from = mem::replace(&mut self.current, to.clone());
        Transition { kind, from, to }
    }
}

fn offset<R>(from: &HistoryState<R>, to: &HistoryState<R>) -> isize {
    to.id as isize - from.id as isize
}
