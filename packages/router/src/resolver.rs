//! Composable resolvers.
//!
//! A [`Resolver`] wraps one [`RouteRegistry`]. Any route may own a nested resolver; when such
//! a route matches a path as a prefix, the remainder is handed to the nested resolver and
//! both matches end up in the same [`TraceRoute`].

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use tracing::{debug, trace};

use crate::{
    navigation::Navigate,
    path::RoutePath,
    registry::{RouteEntryMut, RouteId, RouteRegistry},
    route::{ResolvedRoute, Route, RouteKey, RouteRequest},
    trace::{TraceElement, TraceRoute},
    Result, RouteError,
};

/// Identifies a [`Resolver`] within a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResolverId(u64);

impl ResolverId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// The body a [`Resolver`] stores for each route.
pub struct Binding<T> {
    /// The user data of the route.
    pub body: T,
    pub(crate) nexthop: Option<Box<Resolver<T>>>,
    pub(crate) navigate: Option<Navigate>,
}

impl<T> Binding<T> {
    /// Wrap user data without a nested resolver or navigation directive.
    pub fn new(body: T) -> Self {
        Self {
            body,
            nexthop: None,
            navigate: None,
        }
    }

    /// The nested resolver the route hands its remainder to.
    pub fn nexthop(&self) -> Option<&Resolver<T>> {
        self.nexthop.as_deref()
    }

    /// The redirect or forward attached to the route.
    pub fn navigate(&self) -> Option<&Navigate> {
        self.navigate.as_ref()
    }
}

impl<T: fmt::Debug> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("body", &self.body)
            .field("nexthop", &self.nexthop.as_ref().map(|next| next.id))
            .field("navigate", &self.navigate)
            .finish()
    }
}

/// What a [`Resolver`] does with a match after consulting its hook.
pub enum HookOutcome<'a, T> {
    /// Keep the match.
    Continue,
    /// Keep the match but report a different resolved path.
    OverridePath(String),
    /// Use this trace instead. Nested resolvers are not consulted.
    Replace(TraceRoute<'a, T>),
}

type ResolveHook<T> =
    dyn for<'a> Fn(&ResolvedRoute<'a, Binding<T>>, &TraceRoute<'a, T>) -> HookOutcome<'a, T>;

/// A route registry that can hand unmatched path remainders to nested resolvers.
pub struct Resolver<T> {
    id: ResolverId,
    registry: RouteRegistry<Binding<T>>,
    hook: Option<Box<ResolveHook<T>>>,
}

impl<T> Default for Resolver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Resolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("id", &self.id)
            .field("routes", &self.registry.len())
            .field("hook", &self.hook.is_some())
            .finish()
    }
}

impl<T> Resolver<T> {
    /// Create a resolver with an empty registry.
    pub fn new() -> Self {
        Self {
            id: ResolverId::next(),
            registry: RouteRegistry::new(),
            hook: None,
        }
    }

    /// The identity of this resolver.
    pub fn id(&self) -> ResolverId {
        self.id
    }

    /// The registry of this resolver.
    pub fn registry(&self) -> &RouteRegistry<Binding<T>> {
        &self.registry
    }

    /// The registry of this resolver, mutably.
    pub fn registry_mut(&mut self) -> &mut RouteRegistry<Binding<T>> {
        &mut self.registry
    }

    /// Store a route. See [`RouteRegistry::add`].
    ///
    /// A route stored over an existing one starts without a nested resolver or directive.
    pub fn add(&mut self, route: Route<T>) -> Result<RouteId> {
        self.registry.add(route.map_body(Binding::new))
    }

    /// Remove a route together with its nested resolver.
    pub fn remove(&mut self, key: impl Into<RouteKey>) -> Result<Route<T>> {
        let route = self.registry.remove(key)?;
        Ok(route.map_body(|binding| binding.body))
    }

    /// Look up a route in this resolver only.
    pub fn get(&self, key: impl Into<RouteKey>) -> Option<ResolvedRoute<'_, Binding<T>>> {
        self.registry.get(key)
    }

    /// Hand the remainder of paths matching the route at `key` to `nested`.
    ///
    /// The route becomes a segment route. A route owns at most one nested resolver.
    pub fn mount(&mut self, key: impl Into<RouteKey>, nested: Resolver<T>) -> Result<()> {
        let key = key.into();
        let mut entry = self.entry(&key)?;
        if entry.body().nexthop.is_some() {
            return Err(RouteError::DuplicateBinding(key));
        }
        entry.body_mut().nexthop = Some(Box::new(nested));
        entry.set_segment(true);
        debug!(resolver = ?self.id, %key, "mounted nested resolver");
        Ok(())
    }

    /// The nested resolver of the route at `key`.
    pub fn nexthop(&self, key: impl Into<RouteKey>) -> Option<&Resolver<T>> {
        let id = self.registry.find(key).ok()?;
        self.registry.route(id)?.body.nexthop()
    }

    /// The nested resolver of the route at `key`, mutably.
    pub fn nexthop_mut(&mut self, key: impl Into<RouteKey>) -> Option<&mut Resolver<T>> {
        let id = self.registry.find(key).ok()?;
        let entry = self.registry.entry_mut(id)?;
        entry.into_body_mut().nexthop.as_deref_mut()
    }

    /// Attach a redirect or forward to the route at `key`, replacing any previous one.
    pub fn set_navigate(&mut self, key: impl Into<RouteKey>, navigate: Navigate) -> Result<()> {
        let key = key.into();
        self.entry(&key)?.body_mut().navigate = Some(navigate);
        Ok(())
    }

    /// Redirect the route at `key` to `target`.
    pub fn redirect(
        &mut self,
        key: impl Into<RouteKey>,
        target: impl Into<RoutePath>,
    ) -> Result<()> {
        self.set_navigate(key, Navigate::redirect(target))
    }

    /// Forward the route at `key` to `target`.
    pub fn forward(&mut self, key: impl Into<RouteKey>, target: impl Into<RoutePath>) -> Result<()> {
        self.set_navigate(key, Navigate::forward(target))
    }

    /// Inspect every match of this resolver before it is accepted.
    ///
    /// The hook receives the match and the trace that already contains it.
    pub fn set_hook<F>(&mut self, hook: F)
    where
        F: for<'a> Fn(&ResolvedRoute<'a, Binding<T>>, &TraceRoute<'a, T>) -> HookOutcome<'a, T>
            + 'static,
    {
        self.hook = Some(Box::new(hook));
    }

    /// Remove the hook.
    pub fn clear_hook(&mut self) {
        self.hook = None;
    }

    /// Resolve a request starting at this resolver with an empty trace.
    pub fn trace_route(&self, request: impl Into<RouteRequest>) -> TraceRoute<'_, T> {
        self.resolve(request, TraceRoute::new(self))
    }

    /// Resolve a request, appending what this resolver and its nested resolvers matched to
    /// `trace`.
    ///
    /// A request nothing matches appends a dead end.
    pub fn resolve<'a>(
        &'a self,
        request: impl Into<RouteRequest>,
        mut trace: TraceRoute<'a, T>,
    ) -> TraceRoute<'a, T> {
        let request = request.into();
        let Some(resolved) = self.registry.get(request.key()) else {
            trace!(resolver = ?self.id, %request, "dead end");
            trace.routes.push(TraceElement {
                resolver: self,
                route: None,
            });
            return trace;
        };

        if trace.path.is_none() {
            trace.path = match &request {
                RouteRequest::ByPath(path) => Some(path.clone()),
                RouteRequest::ByName(_) if trace.routes.is_empty() => resolved
                    .path()
                    .filter(|path| !RoutePath::new(*path).has_params())
                    .map(str::to_string),
                _ => None,
            };
        }

        let nexthop = resolved.body().nexthop();
        let rest = resolved.rest.clone();
        trace.routes.push(TraceElement {
            resolver: self,
            route: Some(resolved.clone()),
        });

        if let Some(hook) = &self.hook {
            match hook(&resolved, &trace) {
                HookOutcome::Continue => {}
                HookOutcome::OverridePath(path) => trace.path = Some(path),
                HookOutcome::Replace(replacement) => {
                    debug!(resolver = ?self.id, "hook replaced the trace");
                    return replacement;
                }
            }
        }

        match (nexthop, rest) {
            (Some(next), Some(rest)) if !rest.is_empty() || next.registry.get("").is_some() => {
                next.resolve(RouteRequest::BySegmentRest(rest), trace)
            }
            _ => trace,
        }
    }

    /// The path of a route anywhere below this resolver, prefixed by the paths of every
    /// route leading to its resolver.
    pub fn path_of(&self, resolver: ResolverId, route: RouteId) -> Option<RoutePath> {
        self.path_below(RoutePath::default(), resolver, route)
    }

    fn path_below(
        &self,
        prefix: RoutePath,
        resolver: ResolverId,
        target: RouteId,
    ) -> Option<RoutePath> {
        for (id, route) in self.registry.iter() {
            let Some(path) = route.path.as_deref() else {
                continue;
            };
            let full = prefix.concat(path);
            if self.id == resolver && id == target {
                return Some(full);
            }
            if let Some(found) = route
                .body
                .nexthop()
                .and_then(|next| next.path_below(full, resolver, target))
            {
                return Some(found);
            }
        }
        None
    }

    fn entry(&mut self, key: &RouteKey) -> Result<RouteEntryMut<'_, Binding<T>>> {
        let id = self.registry.find(key.clone())?;
        self.registry
            .entry_mut(id)
            .ok_or_else(|| RouteError::NotFound(key.clone()))
    }
}
