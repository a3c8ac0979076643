//! Result Cache
//!
//! In-memory store of geocode and boundary lookups, shared by every
//! resolution run for the lifetime of the process.

use crate::domain::entities::ResolvedLocation;
use crate::domain::geometry::BoundaryGeometry;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Which resolver owns an entry.
///
/// Keeps a place name and an ISO code from colliding when they happen to be
/// the same string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheNamespace {
    /// Geocode results, keyed by address
    Location,
    /// Boundary geometries, keyed by country identifier
    Boundary,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    namespace: CacheNamespace,
    key: String,
}

impl CacheKey {
    fn new(namespace: CacheNamespace, key: &str) -> Self {
        Self {
            namespace,
            key: key.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
enum CachedValue {
    Location(ResolvedLocation),
    Boundary(Arc<BoundaryGeometry>),
}

/// DashMap-backed lookup cache.
///
/// Entries live until swept by [`ResultCache::retain_keys`] or cleared.
/// Read-modify-write sequences on one key are serialized through
/// [`ResultCache::lock_key`], so concurrent lookups of the same key issue
/// a single fetch.
pub struct ResultCache {
    entries: DashMap<CacheKey, CachedValue>,
    key_locks: DashMap<CacheKey, Arc<Mutex<()>>>,
}

impl ResultCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            key_locks: DashMap::new(),
        }
    }

    pub fn get_location(&self, address: &str) -> Option<ResolvedLocation> {
        match self
            .entries
            .get(&CacheKey::new(CacheNamespace::Location, address))?
            .value()
        {
            CachedValue::Location(location) => Some(location.clone()),
            CachedValue::Boundary(_) => None,
        }
    }

    pub fn insert_location(&self, address: &str, location: ResolvedLocation) {
        self.entries.insert(
            CacheKey::new(CacheNamespace::Location, address),
            CachedValue::Location(location),
        );
    }

    pub fn get_boundary(&self, identifier: &str) -> Option<Arc<BoundaryGeometry>> {
        match self
            .entries
            .get(&CacheKey::new(CacheNamespace::Boundary, identifier))?
            .value()
        {
            CachedValue::Boundary(geometry) => Some(geometry.clone()),
            CachedValue::Location(_) => None,
        }
    }

    pub fn insert_boundary(&self, identifier: &str, geometry: Arc<BoundaryGeometry>) {
        self.entries.insert(
            CacheKey::new(CacheNamespace::Boundary, identifier),
            CachedValue::Boundary(geometry),
        );
    }

    pub fn contains(&self, namespace: CacheNamespace, key: &str) -> bool {
        self.entries.contains_key(&CacheKey::new(namespace, key))
    }

    /// Acquire the per-key guard for a read-modify-write sequence.
    ///
    /// Callers re-check the cache after acquiring it: another task may have
    /// filled the entry while this one waited.
    pub async fn lock_key(&self, namespace: CacheNamespace, key: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .key_locks
            .entry(CacheKey::new(namespace, key))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }

    /// Remove every entry whose key is not in `keep`, in both namespaces.
    ///
    /// Returns the number of entries removed.
    pub fn retain_keys<S: AsRef<str>>(&self, keep: &[S]) -> usize {
        let kept = |key: &CacheKey| keep.iter().any(|k| k.as_ref() == key.key);

        let before = self.entries.len();
        self.entries.retain(|key, _| kept(key));
        // Guards still held by an in-flight lookup are left alone.
        self.key_locks
            .retain(|key, lock| kept(key) || Arc::strong_count(lock) > 1);

        before.saturating_sub(self.entries.len())
    }

    /// Get the number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.clear();
        self.key_locks.clear();
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}
