//! The record of one resolution.

use std::fmt;

use crate::{
    params::Params,
    registry::RouteId,
    resolver::{Binding, Resolver, ResolverId},
    route::{ResolvedRoute, Route},
};

/// What one resolver contributed to a [`TraceRoute`].
pub struct TraceElement<'a, T> {
    /// The resolver that was consulted.
    pub resolver: &'a Resolver<T>,
    /// What it matched. `None` marks a dead end.
    pub route: Option<ResolvedRoute<'a, Binding<T>>>,
}

impl<T> Clone for TraceElement<'_, T> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver,
            route: self.route.clone(),
        }
    }
}

/// The resolvers and routes that took part in one resolution, in traversal order.
pub struct TraceRoute<'a, T> {
    /// The resolver the resolution started at.
    pub base: &'a Resolver<T>,
    /// The resolved path, if the request was a path or one could be derived from the route.
    pub path: Option<String>,
    /// One element per consulted resolver.
    pub routes: Vec<TraceElement<'a, T>>,
}

impl<'a, T> TraceRoute<'a, T> {
    /// An empty trace starting at `base`.
    pub fn new(base: &'a Resolver<T>) -> Self {
        Self {
            base,
            path: None,
            routes: Vec::new(),
        }
    }

    /// The resolved path.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Override the resolved path.
    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = Some(path.into());
    }

    /// The match of the last consulted resolver. `None` if it was a dead end.
    pub fn last(&self) -> Option<&ResolvedRoute<'a, Binding<T>>> {
        self.routes.last()?.route.as_ref()
    }

    /// The route the resolution ended at.
    pub fn route(&self) -> Option<&'a Route<Binding<T>>> {
        self.last().map(|resolved| resolved.route)
    }

    /// The body of the route the resolution ended at.
    pub fn body(&self) -> Option<&'a T> {
        self.route().map(|route| &route.body.body)
    }

    /// Check whether the resolution ended without a match.
    pub fn is_dead_end(&self) -> bool {
        self.last().is_none()
    }

    /// Every captured directory parameter, in the order the resolvers were consulted.
    pub fn params(&self) -> Params {
        let mut params = Params::new();
        for resolved in self.routes.iter().filter_map(|element| element.route.as_ref()) {
            params.merge(resolved.params.clone());
        }
        params
    }

    /// The resolver and route identity of every element. Dead ends have no route.
    pub fn identities(&self) -> Vec<(ResolverId, Option<RouteId>)> {
        self.routes
            .iter()
            .map(|element| {
                (
                    element.resolver.id(),
                    element.route.as_ref().map(|resolved| resolved.id),
                )
            })
            .collect()
    }
}

impl<T> Clone for TraceRoute<'_, T> {
    fn clone(&self) -> Self {
        Self {
            base: self.base,
            path: self.path.clone(),
            routes: self.routes.clone(),
        }
    }
}

impl<T> fmt::Debug for TraceRoute<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceRoute")
            .field("base", &self.base.id())
            .field("path", &self.path)
            .field("routes", &self.identities())
            .finish()
    }
}
