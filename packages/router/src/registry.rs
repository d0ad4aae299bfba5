//! The route registry: a trie of path tokens plus a name index.
//!
//! Paths are split into tokens and stored along a tree of nodes. Literal tokens and
//! parameter tokens (`:name`) live in separate child lists, so a lookup can try the literal
//! child first and fall back to parameter children or an enclosing segment route when the
//! literal branch dead-ends.

use std::collections::BTreeMap;

use slab::Slab;
use slotmap::SlotMap;
use tracing::{debug, trace, warn};

use crate::{
    params::Params,
    path::{param_name, tokenize},
    route::{ResolvedRoute, Route, RouteKey, RouteUpdate, Search},
    Result, RouteError,
};

slotmap::new_key_type! {
    /// A handle to a route stored in a [`RouteRegistry`].
    ///
    /// Handles stay valid while the route is edited in place and never resolve again once it
    /// is removed.
    pub struct RouteId;
}

/// One token of a stored path.
#[derive(Debug)]
struct Node {
    token: String,
    route: Option<RouteId>,
    parent: Option<usize>,
    children: BTreeMap<String, usize>,
    // keyed by the declared token, in insertion order
    params: Vec<(String, usize)>,
}

impl Node {
    fn new(token: &str, parent: Option<usize>) -> Self {
        Self {
            token: token.to_string(),
            route: None,
            parent,
            children: BTreeMap::new(),
            params: Vec::new(),
        }
    }

    fn child(&self, token: &str) -> Option<usize> {
        if param_name(token).is_some() {
            self.params
                .iter()
                .find(|(declared, _)| declared == token)
                .map(|(_, node)| *node)
        } else {
            self.children.get(token).copied()
        }
    }

    fn is_vacant(&self) -> bool {
        self.route.is_none() && self.children.is_empty() && self.params.is_empty()
    }
}

/// A pending alternative while matching a path.
struct Candidate<'p> {
    node: usize,
    // `None` commits to the segment route at `node`
    capture: Option<&'p str>,
    depth: usize,
}

/// The outcome of [`RouteRegistry::replace`].
#[derive(Debug)]
pub enum Replaced<B> {
    /// Neither a route to replace nor a replacement was given.
    Nothing,
    /// The replaced route was removed without a replacement.
    Removed(Route<B>),
    /// The replacement is stored under this handle.
    Stored(RouteId),
}

/// A trie of route paths plus an index of route names.
///
/// At most one route owns a given path and at most one owns a given name. Storing a route
/// that claims a path or name owned by another route removes that other route.
pub struct RouteRegistry<B> {
    nodes: Slab<Node>,
    root: usize,
    records: SlotMap<RouteId, Route<B>>,
    names: BTreeMap<String, RouteId>,
}

impl<B> Default for RouteRegistry<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> RouteRegistry<B> {
    /// Create an empty registry.
    pub fn new() -> Self {
        let mut nodes = Slab::new();
        let root = nodes.insert(Node::new("", None));
        Self {
            nodes,
            root,
            records: SlotMap::with_key(),
            names: BTreeMap::new(),
        }
    }

    /// Store a route.
    ///
    /// If a route already owns the path (or, failing that, the name) it keeps its [`RouteId`]
    /// and takes over every field of `route`.
    pub fn add(&mut self, route: Route<B>) -> Result<RouteId> {
        if !route.is_addressable() {
            return Err(RouteError::Unaddressable);
        }
        let existing = route
            .path
            .as_deref()
            .and_then(|path| self.path_owner(path))
            .or_else(|| {
                route
                    .name
                    .as_deref()
                    .and_then(|name| self.names.get(name).copied())
            });
        Ok(self.store(existing, route))
    }

    /// Remove the route with the given key.
    ///
    /// When the path and the name of the key belong to different routes both are removed and
    /// the route owning the name is returned.
    pub fn remove(&mut self, key: impl Into<RouteKey>) -> Result<Route<B>> {
        let key = key.into();
        match self.replace(Some(key.clone()), None)? {
            Replaced::Removed(route) => Ok(route),
            _ => Err(RouteError::NotFound(key)),
        }
    }

    /// Remove the route at `dest` and store `src` in its place.
    ///
    /// When both are given the removed route keeps its [`RouteId`]. A bare
    /// [`RouteUpdate::Path`] only moves the route and keeps its name. A full route keeps the
    /// old path or name wherever its own is `None`.
    pub fn replace(
        &mut self,
        dest: Option<RouteKey>,
        src: Option<RouteUpdate<B>>,
    ) -> Result<Replaced<B>> {
        match (&dest, &src) {
            (None, Some(RouteUpdate::Path(path))) => {
                return Err(RouteError::InvalidReplacement { path: path.clone() })
            }
            (_, Some(RouteUpdate::Route(route))) if !route.is_addressable() => {
                return Err(RouteError::Unaddressable)
            }
            _ => {}
        }

        let kept = match dest {
            Some(dest) => {
                let (by_path, by_name) = self.locate(&dest)?;
                for id in [by_path, by_name].into_iter().flatten() {
                    self.unindex(id);
                }
                if let (Some(path_owner), Some(name_owner)) = (by_path, by_name) {
                    if path_owner != name_owner {
                        self.records.remove(path_owner);
                    }
                }
                by_name.or(by_path)
            }
            None => None,
        };

        Ok(match (kept, src) {
            (None, None) => Replaced::Nothing,
            (Some(id), None) => {
                debug!(?id, "removed route");
                self.records
                    .remove(id)
                    .map_or(Replaced::Nothing, Replaced::Removed)
            }
            (None, Some(RouteUpdate::Route(route))) => Replaced::Stored(self.add(route)?),
            (None, Some(RouteUpdate::Path(_))) => Replaced::Nothing,
            (Some(id), Some(RouteUpdate::Path(path))) => {
                if let Some(record) = self.records.get_mut(id) {
                    record.path = Some(path);
                }
                self.index(id);
                Replaced::Stored(id)
            }
            (Some(id), Some(RouteUpdate::Route(mut route))) => {
                if let Some(record) = self.records.get(id) {
                    if route.path.is_none() {
                        route.path = record.path.clone();
                    }
                    if route.name.is_none() {
                        route.name = record.name.clone();
                    }
                }
                Replaced::Stored(self.store(Some(id), route))
            }
        })
    }

    /// Look up a route.
    ///
    /// A key with a path is matched against the trie, capturing directory parameters and
    /// falling back to segment routes. A key with only a name is looked up in the name index.
    pub fn get(&self, key: impl Into<RouteKey>) -> Option<ResolvedRoute<'_, B>> {
        let key = key.into();
        if let Some(path) = key.path.as_deref() {
            return self.match_path(path);
        }
        let id = *self.names.get(key.name.as_deref()?)?;
        Some(ResolvedRoute {
            id,
            route: self.records.get(id)?,
            params: Params::new(),
            search: Search::Name,
            rest: None,
        })
    }

    /// Find the handle of the route stored exactly under the key.
    ///
    /// The path wins when both parts of the key are set.
    pub fn find(&self, key: impl Into<RouteKey>) -> Result<RouteId> {
        let key = key.into();
        let id = match (&key.path, &key.name) {
            (Some(path), _) => self.path_owner(path),
            (None, Some(name)) => self.names.get(name).copied(),
            (None, None) => None,
        };
        id.ok_or(RouteError::NotFound(key))
    }

    /// The stored route with the given handle.
    pub fn route(&self, id: RouteId) -> Option<&Route<B>> {
        self.records.get(id)
    }

    /// A view of the stored route that keeps the indices in sync with edits.
    pub fn entry_mut(&mut self, id: RouteId) -> Option<RouteEntryMut<'_, B>> {
        if !self.records.contains_key(id) {
            return None;
        }
        Some(RouteEntryMut { registry: self, id })
    }

    /// Iterate over every stored route.
    ///
    /// Routes with a path come first, depth first with literal tokens in order before
    /// parameter tokens. Routes that only have a name follow in name order.
    pub fn iter(&self) -> impl Iterator<Item = (RouteId, &Route<B>)> + '_ {
        let mut ids = Vec::with_capacity(self.records.len());
        let mut stack = vec![self.root];
        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            if let Some(id) = node.route {
                ids.push(id);
            }
            stack.extend(node.params.iter().rev().map(|(_, child)| *child));
            stack.extend(node.children.values().rev().copied());
        }
        ids.extend(
            self.names
                .values()
                .copied()
                .filter(|id| self.records.get(*id).is_some_and(|r| r.path.is_none())),
        );
        ids.into_iter()
            .filter_map(move |id| self.records.get(id).map(|route| (id, route)))
    }

    /// Call `f` for every stored route, in the order of [`RouteRegistry::iter`].
    pub fn for_each(&self, mut f: impl FnMut(RouteId, &Route<B>)) {
        for (id, route) in self.iter() {
            f(id, route);
        }
    }

    /// The number of stored routes.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check whether no route is stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn store(&mut self, reuse: Option<RouteId>, route: Route<B>) -> RouteId {
        let id = match reuse {
            Some(id) => {
                self.unindex(id);
                match self.records.get_mut(id) {
                    Some(record) => {
                        *record = route;
                        id
                    }
                    None => self.records.insert(route),
                }
            }
            None => self.records.insert(route),
        };
        self.index(id);
        trace!(?id, "stored route");
        id
    }

    /// Point the record at new keys, destroying it if it loses both.
    fn rekey(&mut self, id: RouteId, path: Option<String>, name: Option<String>) -> bool {
        self.unindex(id);
        if path.is_none() && name.is_none() {
            self.records.remove(id);
            debug!(?id, "removed route without path or name");
            return false;
        }
        if let Some(record) = self.records.get_mut(id) {
            record.path = path;
            record.name = name;
        }
        self.index(id);
        true
    }

    /// Validate a key, returning the owners of its path and its name.
    fn locate(&self, key: &RouteKey) -> Result<(Option<RouteId>, Option<RouteId>)> {
        let by_path = match &key.path {
            Some(path) => Some(
                self.path_owner(path)
                    .ok_or_else(|| RouteError::NotFound(RouteKey::path(path.as_str())))?,
            ),
            None => None,
        };
        let by_name = match &key.name {
            Some(name) => Some(
                self.names
                    .get(name)
                    .copied()
                    .ok_or_else(|| RouteError::NotFound(RouteKey::name(name.as_str())))?,
            ),
            None => None,
        };
        Ok((by_path, by_name))
    }

    /// Add the record to the trie and the name index, evicting routes it displaces.
    fn index(&mut self, id: RouteId) {
        let Some(record) = self.records.get(id) else {
            return;
        };
        let (path, name) = (record.path.clone(), record.name.clone());

        if let Some(path) = path {
            let node = self.insert_path(&path);
            if let Some(previous) = self.nodes[node].route.replace(id) {
                if previous != id {
                    self.evict(previous);
                }
            }
        }
        if let Some(name) = name {
            if let Some(previous) = self.names.insert(name, id) {
                if previous != id {
                    self.evict(previous);
                }
            }
        }
    }

    /// Remove the record from the trie and the name index without destroying it.
    fn unindex(&mut self, id: RouteId) {
        let Some(record) = self.records.get(id) else {
            return;
        };
        let (path, name) = (record.path.clone(), record.name.clone());

        if let Some(node) = path.as_deref().and_then(|path| self.find_node(path)) {
            if self.nodes[node].route == Some(id) {
                self.nodes[node].route = None;
                self.prune(node);
            }
        }
        if let Some(name) = name {
            if self.names.get(&name) == Some(&id) {
                self.names.remove(&name);
            }
        }
    }

    /// Destroy a record that lost one of its keys to another route.
    fn evict(&mut self, id: RouteId) {
        self.unindex(id);
        if let Some(route) = self.records.remove(id) {
            warn!(
                path = route.path.as_deref(),
                name = route.name.as_deref(),
                "evicted route that conflicted with a new route"
            );
        }
    }

    fn path_owner(&self, path: &str) -> Option<RouteId> {
        self.nodes[self.find_node(path)?].route
    }

    /// Walk the trie without backtracking, matching parameter tokens literally.
    fn find_node(&self, path: &str) -> Option<usize> {
        tokenize(path)
            .into_iter()
            .try_fold(self.root, |node, token| self.nodes[node].child(token))
    }

    fn insert_path(&mut self, path: &str) -> usize {
        let mut node = self.root;
        for token in tokenize(path) {
            node = match self.nodes[node].child(token) {
                Some(child) => child,
                None => {
                    let child = self.nodes.insert(Node::new(token, Some(node)));
                    let parent = &mut self.nodes[node];
                    if param_name(token).is_some() {
                        parent.params.push((token.to_string(), child));
                    } else {
                        parent.children.insert(token.to_string(), child);
                    }
                    child
                }
            };
        }
        node
    }

    /// Remove empty nodes from `node` up towards the root.
    fn prune(&mut self, mut node: usize) {
        while node != self.root && self.nodes[node].is_vacant() {
            let removed = self.nodes.remove(node);
            let Some(parent) = removed.parent else {
                break;
            };
            let parent_node = &mut self.nodes[parent];
            if param_name(&removed.token).is_some() {
                parent_node.params.retain(|(_, child)| *child != node);
            } else {
                parent_node.children.remove(&removed.token);
            }
            node = parent;
        }
    }

    /// Match a path, backtracking into parameter children and segment routes.
    fn match_path(&self, path: &str) -> Option<ResolvedRoute<'_, B>> {
        let tokens = tokenize(path);
        let mut candidates: Vec<Candidate> = Vec::new();
        let mut captures: Vec<Candidate> = Vec::new();
        let mut node = self.root;
        let mut depth = 0;

        let (node, rest) = loop {
            let current = &self.nodes[node];
            if let Some(&token) = tokens.get(depth) {
                if current
                    .route
                    .and_then(|id| self.records.get(id))
                    .is_some_and(|route| route.segment)
                {
                    candidates.push(Candidate {
                        node,
                        capture: None,
                        depth,
                    });
                }
                candidates.extend(current.params.iter().map(|(_, child)| Candidate {
                    node: *child,
                    capture: Some(token),
                    depth,
                }));
                if let Some(&child) = current.children.get(token) {
                    node = child;
                    depth += 1;
                    continue;
                }
            } else if current.route.is_some() {
                break (node, None);
            }

            let candidate = candidates.pop()?;
            captures.retain(|capture| capture.depth < candidate.depth);
            match candidate.capture {
                None => break (candidate.node, Some(tokens[candidate.depth..].join("/"))),
                Some(_) => {
                    node = candidate.node;
                    depth = candidate.depth + 1;
                    captures.push(candidate);
                }
            }
        };

        let id = self.nodes[node].route?;
        let route = self.records.get(id)?;
        let rest = match rest {
            None if route.segment => Some(String::new()),
            rest => rest,
        };

        let mut params = Params::new();
        for capture in &captures {
            let name = param_name(&self.nodes[capture.node].token).unwrap_or_default();
            if let Some(text) = capture.capture {
                params.append(name, text);
            }
        }

        trace!(path, ?id, ?rest, "matched route");
        Some(ResolvedRoute {
            id,
            route,
            params,
            search: Search::Path,
            rest,
        })
    }
}

/// A mutable view of a stored route.
///
/// Writes to the path or the name go through the registry so both indices stay consistent.
/// Clearing both destroys the route.
pub struct RouteEntryMut<'r, B> {
    registry: &'r mut RouteRegistry<B>,
    id: RouteId,
}

impl<'r, B> RouteEntryMut<'r, B> {
    fn record(&self) -> &Route<B> {
        &self.registry.records[self.id]
    }

    fn record_mut(&mut self) -> &mut Route<B> {
        &mut self.registry.records[self.id]
    }

    /// The handle of the route.
    pub fn id(&self) -> RouteId {
        self.id
    }

    /// The stored route.
    pub fn route(&self) -> &Route<B> {
        self.record()
    }

    /// The path of the route.
    pub fn path(&self) -> Option<&str> {
        self.record().path.as_deref()
    }

    /// The name of the route.
    pub fn name(&self) -> Option<&str> {
        self.record().name.as_deref()
    }

    /// Whether the route is a segment route.
    pub fn segment(&self) -> bool {
        self.record().segment
    }

    /// The body of the route.
    pub fn body(&self) -> &B {
        &self.record().body
    }

    /// The body of the route, mutably.
    pub fn body_mut(&mut self) -> &mut B {
        &mut self.record_mut().body
    }

    /// Turn the view into a mutable borrow of the body.
    pub fn into_body_mut(self) -> &'r mut B {
        let RouteEntryMut { registry, id } = self;
        &mut registry.records[id].body
    }

    /// Mark or unmark the route as a segment route.
    pub fn set_segment(&mut self, segment: bool) {
        self.record_mut().segment = segment;
    }

    /// Move the route to a new path, evicting any other route stored there.
    pub fn set_path(&mut self, path: impl Into<String>) {
        let name = self.record().name.clone();
        self.registry.rekey(self.id, Some(path.into()), name);
    }

    /// Rename the route, evicting any other route with that name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        let path = self.record().path.clone();
        self.registry.rekey(self.id, path, Some(name.into()));
    }

    /// Remove the path of the route.
    ///
    /// Returns `None` when the route had no name and was destroyed.
    pub fn clear_path(self) -> Option<Self> {
        let name = self.record().name.clone();
        self.registry.rekey(self.id, None, name).then_some(self)
    }

    /// Remove the name of the route.
    ///
    /// Returns `None` when the route had no path and was destroyed.
    pub fn clear_name(self) -> Option<Self> {
        let path = self.record().path.clone();
        self.registry.rekey(self.id, path, None).then_some(self)
    }
}
