//! Route records and the keys and requests used to look them up.

use std::fmt;

use crate::{params::Params, path::RoutePath, registry::RouteId};

/// A route stored in a [`RouteRegistry`](crate::registry::RouteRegistry).
///
/// A route is addressed by its path, its name, or both. Segment routes also match any path
/// that starts with their own, leaving the remainder for a nested resolver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route<B> {
    /// The path of the route. Tokens starting with `:` capture directory parameters.
    pub path: Option<String>,
    /// The name of the route.
    pub name: Option<String>,
    /// Data attached to the route.
    pub body: B,
    /// Whether the route also matches as a prefix.
    pub segment: bool,
}

impl<B> Route<B> {
    /// Create a route addressed by a path.
    pub fn new(path: impl Into<String>, body: B) -> Self {
        Self {
            path: Some(path.into()),
            name: None,
            body,
            segment: false,
        }
    }

    /// Create a route addressed only by a name.
    pub fn named(name: impl Into<String>, body: B) -> Self {
        Self {
            path: None,
            name: Some(name.into()),
            body,
            segment: false,
        }
    }

    /// Set the name of the route.
    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..self
        }
    }

    /// Set the path of the route.
    pub fn with_path(self, path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..self
        }
    }

    /// Mark the route as a segment route.
    pub fn as_segment(self) -> Self {
        Self {
            segment: true,
            ..self
        }
    }

    /// Replace the body of the route.
    pub fn map_body<C>(self, f: impl FnOnce(B) -> C) -> Route<C> {
        Route {
            path: self.path,
            name: self.name,
            body: f(self.body),
            segment: self.segment,
        }
    }

    /// The key addressing this route.
    pub fn key(&self) -> RouteKey {
        RouteKey {
            path: self.path.clone(),
            name: self.name.clone(),
        }
    }

    pub(crate) fn is_addressable(&self) -> bool {
        self.path.is_some() || self.name.is_some()
    }
}

/// Identifies a stored route by its exact path, its name, or both.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RouteKey {
    /// The exact stored path.
    pub path: Option<String>,
    /// The name.
    pub name: Option<String>,
}

impl RouteKey {
    /// A key addressing a route by path.
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            name: None,
        }
    }

    /// A key addressing a route by name.
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            path: None,
            name: Some(name.into()),
        }
    }

    /// A key addressing a route by both path and name.
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            name: Some(name.into()),
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.path, &self.name) {
            (Some(path), Some(name)) => write!(f, "path '{path}' and name '{name}'"),
            (Some(path), None) => write!(f, "path '{path}'"),
            (None, Some(name)) => write!(f, "name '{name}'"),
            (None, None) => f.write_str("no path or name"),
        }
    }
}

impl From<&str> for RouteKey {
    fn from(path: &str) -> Self {
        Self::path(path)
    }
}

impl From<String> for RouteKey {
    fn from(path: String) -> Self {
        Self::path(path)
    }
}

impl From<&RoutePath> for RouteKey {
    fn from(path: &RoutePath) -> Self {
        Self::path(path.as_str())
    }
}

/// The replacement given to [`RouteRegistry::replace`](crate::registry::RouteRegistry::replace).
#[derive(Clone, Debug)]
pub enum RouteUpdate<B> {
    /// Only move the replaced route to a new path.
    Path(String),
    /// Overwrite the replaced route entirely.
    Route(Route<B>),
}

impl<B> From<Route<B>> for RouteUpdate<B> {
    fn from(route: Route<B>) -> Self {
        Self::Route(route)
    }
}

/// A request to resolve.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RouteRequest {
    /// Match a path against the registry.
    ByPath(String),
    /// Look up a route by name.
    ByName(String),
    /// Match the remainder of a segment route in a nested resolver.
    BySegmentRest(String),
}

impl RouteRequest {
    /// A request for a named route.
    pub fn name(name: impl Into<String>) -> Self {
        Self::ByName(name.into())
    }

    pub(crate) fn key(&self) -> RouteKey {
        match self {
            Self::ByPath(path) | Self::BySegmentRest(path) => RouteKey::path(path.as_str()),
            Self::ByName(name) => RouteKey::name(name.as_str()),
        }
    }
}

impl fmt::Display for RouteRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByPath(path) => f.write_str(path),
            Self::ByName(name) => write!(f, "name '{name}'"),
            Self::BySegmentRest(rest) => write!(f, "rest '{rest}'"),
        }
    }
}

impl From<&str> for RouteRequest {
    fn from(path: &str) -> Self {
        Self::ByPath(path.to_string())
    }
}

impl From<String> for RouteRequest {
    fn from(path: String) -> Self {
        Self::ByPath(path)
    }
}

impl From<RoutePath> for RouteRequest {
    fn from(path: RoutePath) -> Self {
        Self::ByPath(path.into_string())
    }
}

/// How a route was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Search {
    /// By matching a path.
    Path,
    /// By name.
    Name,
}

/// A route found by a lookup.
#[derive(Debug)]
pub struct ResolvedRoute<'a, B> {
    /// The handle of the stored route.
    pub id: RouteId,
    /// The stored route.
    pub route: &'a Route<B>,
    /// The directory parameters captured while matching.
    pub params: Params,
    /// How the route was found.
    pub search: Search,
    /// The unconsumed part of the path. Only set for segment matches.
    pub rest: Option<String>,
}

impl<'a, B> ResolvedRoute<'a, B> {
    /// The body of the stored route.
    pub fn body(&self) -> &'a B {
        &self.route.body
    }

    /// The stored path of the route.
    pub fn path(&self) -> Option<&'a str> {
        self.route.path.as_deref()
    }

    /// The name of the route.
    pub fn name(&self) -> Option<&'a str> {
        self.route.name.as_deref()
    }
}

impl<B> Clone for ResolvedRoute<'_, B> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            route: self.route,
            params: self.params.clone(),
            search: self.search,
            rest: self.rest.clone(),
        }
    }
}
