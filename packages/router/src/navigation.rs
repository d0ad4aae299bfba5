//! Types relating to navigation.

use std::{fmt, sync::Arc};

use tracing::{debug, warn};

use crate::{
    params::Params,
    path::{tokenize, RoutePath},
    registry::RouteId,
    resolver::{Resolver, ResolverId},
    route::RouteRequest,
    router_cfg::NavigatorConfig,
    trace::TraceRoute,
    Result, RouteError,
};

/// Whether a [`Navigate`] directive changes the visible path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigateKind {
    /// Resolve the target instead, and report the target's path.
    Redirect,
    /// Resolve the target instead, but keep reporting the requested path.
    Forward,
}

/// A function remapping directory parameters before a target is dispatched.
pub type ParamsMap = Arc<dyn Fn(Params) -> Params>;

/// A redirect or forward attached to a route.
#[derive(Clone)]
pub struct Navigate {
    /// Whether the visible path changes.
    pub kind: NavigateKind,
    /// The path template to resolve instead.
    pub target: RoutePath,
    pub(crate) map: Option<ParamsMap>,
}

impl Navigate {
    /// Redirect to `target`.
    pub fn redirect(target: impl Into<RoutePath>) -> Self {
        Self {
            kind: NavigateKind::Redirect,
            target: target.into(),
            map: None,
        }
    }

    /// Forward to `target`.
    pub fn forward(target: impl Into<RoutePath>) -> Self {
        Self {
            kind: NavigateKind::Forward,
            target: target.into(),
            map: None,
        }
    }

    /// Remap the captured directory parameters before the target is dispatched.
    pub fn map_params(self, map: impl Fn(Params) -> Params + 'static) -> Self {
        Self {
            map: Some(Arc::new(map)),
            ..self
        }
    }
}

impl fmt::Debug for Navigate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigate")
            .field("kind", &self.kind)
            .field("target", &self.target)
            .field("map", &self.map.is_some())
            .finish()
    }
}

/// Resolves requests through a tree of resolvers, following redirects and forwards.
pub struct Navigator<T> {
    root: Resolver<T>,
    config: NavigatorConfig,
}

impl<T> Navigator<T> {
    /// Create a navigator with the default configuration.
    pub fn new(root: Resolver<T>) -> Self {
        Self::with_config(root, NavigatorConfig::default())
    }

    /// Create a navigator.
    pub fn with_config(root: Resolver<T>, config: NavigatorConfig) -> Self {
        Self { root, config }
    }

    /// The root resolver.
    pub fn root(&self) -> &Resolver<T> {
        &self.root
    }

    /// The root resolver, mutably.
    pub fn root_mut(&mut self) -> &mut Resolver<T> {
        &mut self.root
    }

    /// The configuration.
    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// The full path template of a route anywhere in the tree.
    pub fn full_path(&self, resolver: ResolverId, route: RouteId) -> Option<RoutePath> {
        self.root.path_of(resolver, route)
    }

    /// Resolve a request, following the directives of the routes it ends at.
    ///
    /// A redirect reports the target's path. A forward keeps reporting the path that was
    /// requested before the first forward. A redirect whose match still lies within a path
    /// introduced by an earlier forward is treated as a forward, so internal paths never
    /// become visible.
    pub fn route_to(&self, request: impl Into<RouteRequest>) -> Result<TraceRoute<'_, T>> {
        let mut request = request.into();
        let mut hops = 0;
        // tokens of the current request that an earlier forward introduced
        let mut forwarded: Vec<String> = Vec::new();
        // set by the first forward; the inner `None` keeps a path-less request path-less
        let mut visible: Option<Option<String>> = None;

        loop {
            let requested = match &request {
                RouteRequest::ByPath(path) | RouteRequest::BySegmentRest(path) => {
                    Some(tokenize(path).len())
                }
                RouteRequest::ByName(_) => None,
            };
            let mut trace = self.root.trace_route(request);
            let Some(last) = trace.last() else {
                return Ok(Self::finish(trace, visible));
            };
            let route = last.route;
            let rest = last.rest.clone().unwrap_or_default();
            let Some(navigate) = route.body.navigate() else {
                return Ok(Self::finish(trace, visible));
            };

            hops += 1;
            let limit = self.config.redirection_limit;
            if hops > limit {
                warn!(path = trace.path(), limit, "too many redirections");
                return Err(RouteError::TooManyRedirections { limit });
            }

            let mut params = trace.params();
            if let Some(map) = &navigate.map {
                params = map(params);
            }

            let resolved = requested
                .or_else(|| route.path.as_deref().map(|path| tokenize(path).len()))
                .unwrap_or_default();
            let consumed = resolved.saturating_sub(tokenize(&rest).len());
            let target = navigate.target.dispatch(&params)?;
            let next = target.concat(&rest);

            if navigate.kind == NavigateKind::Redirect && forwarded.len() <= consumed {
                debug!(from = trace.path(), to = %next, "redirecting");
                forwarded.clear();
                visible = None;
            } else {
                debug!(from = trace.path(), to = %next, kind = ?navigate.kind, "forwarding");
                visible.get_or_insert_with(|| trace.path.take());
                let mut tokens: Vec<String> = target.tokens().map(str::to_string).collect();
                tokens.extend(forwarded.into_iter().skip(consumed));
                forwarded = tokens;
            }

            request = RouteRequest::ByPath(next.into_string());
        }
    }

    fn finish<'a>(
        mut trace: TraceRoute<'a, T>,
        visible: Option<Option<String>>,
    ) -> TraceRoute<'a, T> {
        if let Some(path) = visible {
            trace.path = path;
        }
        trace
    }
}
