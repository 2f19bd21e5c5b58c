//! Response cache with tag-based invalidation.
//!
//! Every cached GET response records the tags it provides. Mutations name
//! the tags they invalidate; any entry providing a matching tag is dropped so
//! the next read goes back to the API.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Product,
    Customer,
    Order,
    Dashboard,
}

impl std::fmt::Display for TagKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TagKind::Product => write!(f, "Product"),
            TagKind::Customer => write!(f, "Customer"),
            TagKind::Order => write!(f, "Order"),
            TagKind::Dashboard => write!(f, "Dashboard"),
        }
    }
}

/// A cache tag: a resource kind, optionally narrowed to one record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    pub kind: TagKind,
    pub id: Option<String>,
}

impl Tag {
    /// A tag covering every record of `kind`.
    #[must_use]
    pub fn all(kind: TagKind) -> Self {
        Self { kind, id: None }
    }

    #[must_use]
    pub fn id(kind: TagKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: Some(id.into()),
        }
    }

    /// Whether invalidating `self` drops an entry that provides `provided`.
    ///
    /// A bare tag matches every tag of its kind. An id tag only matches the
    /// same id; it does not reach list entries that provide the bare tag.
    #[must_use]
    pub fn invalidates(&self, provided: &Tag) -> bool {
        self.kind == provided.kind && (self.id.is_none() || self.id == provided.id)
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{}:{id}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

struct CacheEntry {
    body: serde_json::Value,
    tags: Vec<Tag>,
    stored_at: Instant,
}

/// Thread-safe map from request URL to decoded JSON body.
///
/// A zero TTL disables caching entirely.
pub struct QueryCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl QueryCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached body for `key` if present and still fresh.
    /// Expired entries are evicted on lookup.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let mut entries = self.lock();
        let fresh = entries
            .get(key)
            .map(|entry| entry.stored_at.elapsed() < self.ttl)?;
        if fresh {
            entries.get(key).map(|entry| entry.body.clone())
        } else {
            entries.remove(key);
            None
        }
    }

    pub fn insert(&self, key: String, body: serde_json::Value, tags: Vec<Tag>) {
        if self.ttl.is_zero() {
            return;
        }
        self.lock().insert(
            key,
            CacheEntry {
                body,
                tags,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drops every entry providing a tag matched by any of `tags`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate(&self, tags: &[Tag]) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| {
            !entry
                .tags
                .iter()
                .any(|provided| tags.iter().any(|t| t.invalidates(provided)))
        });
        before - entries.len()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
