//! Route table: kind → key → ordered handler list.

use interhook_core::{BoxHandler, RouteError, RouteKind};
use std::collections::HashMap;
use std::fmt;

/// Handlers registered per route kind and key.
///
/// Registration order is execution order. Registering a key that already
/// exists appends to its list; nothing is ever replaced.
pub struct RouteTable<C> {
    routes: HashMap<RouteKind, HashMap<String, Vec<BoxHandler<C>>>>,
}

impl<C> Default for RouteTable<C> {
    fn default() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }
}

impl<C: Send + Sync + 'static> RouteTable<C> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append handlers to the route `(kind, key)`, creating it if needed.
    ///
    /// Fails if `handlers` is empty.
    pub fn register(
        &mut self,
        kind: RouteKind,
        key: impl Into<String>,
        handlers: Vec<BoxHandler<C>>,
    ) -> Result<(), RouteError> {
        let key = key.into();
        if handlers.is_empty() {
            return Err(RouteError::EmptyHandlerList {
                kind: kind.as_str(),
                key,
            });
        }

        tracing::debug!(%kind, %key, count = handlers.len(), "registering route");
        self.routes
            .entry(kind)
            .or_default()
            .entry(key)
            .or_default()
            .extend(handlers);
        Ok(())
    }

    /// Move every route of `other` into this table.
    ///
    /// Each merged route receives `scoped` first, then `other`'s handlers,
    /// appended after whatever this table already holds for the key.
    pub fn merge(&mut self, other: RouteTable<C>, scoped: &[BoxHandler<C>]) {
        for (kind, buckets) in other.routes {
            let target = self.routes.entry(kind).or_default();
            for (key, handlers) in buckets {
                tracing::debug!(%kind, %key, scoped = scoped.len(), "merging route");
                let bucket = target.entry(key).or_default();
                bucket.extend(scoped.iter().cloned());
                bucket.extend(handlers);
            }
        }
    }

    /// Handlers for `(kind, key)`, if any were registered.
    pub fn lookup(&self, kind: RouteKind, key: &str) -> Option<&[BoxHandler<C>]> {
        self.routes
            .get(&kind)
            .and_then(|buckets| buckets.get(key))
            .map(Vec::as_slice)
    }

    /// Registered keys of one kind, in no particular order.
    pub fn keys(&self, kind: RouteKind) -> impl Iterator<Item = &str> {
        self.routes
            .get(&kind)
            .into_iter()
            .flat_map(|buckets| buckets.keys().map(String::as_str))
    }

    /// Number of distinct `(kind, key)` routes.
    pub fn len(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }

    /// Whether no route is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<C> fmt::Debug for RouteTable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (kind, buckets) in &self.routes {
            for (key, handlers) in buckets {
                map.entry(&format_args!("{kind}:{key}"), &handlers.len());
            }
        }
        map.finish()
    }
}
