//! Hash-keyed cache for computed plug values.
//!
//! Results are keyed by content hash alone, so any two computations whose
//! hashes collide by construction (same node type, same output name, same
//! input content) share one cached value, even across distinct nodes.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::hash::ContentHash;
use crate::value::Value;

/// Concurrent value cache with an approximate memory budget.
///
/// Reads and writes take a shard lock only; eviction is oldest-insertion
/// first. The default budget is `usize::MAX`, which never evicts. All sizes
/// are approximations from [`Value::approx_size`], good enough to keep the
/// budget honest but not byte-exact.
#[derive(Debug)]
pub struct ValueCache {
    entries: DashMap<ContentHash, Arc<Value>>,
    order: Mutex<VecDeque<ContentHash>>,
    used: AtomicUsize,
    limit: AtomicUsize,
}

impl Default for ValueCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueCache {
    /// Creates an empty cache with an unlimited memory budget.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            order: Mutex::new(VecDeque::new()),
            used: AtomicUsize::new(0),
            limit: AtomicUsize::new(usize::MAX),
        }
    }

    /// Looks up a cached value.
    pub fn get(&self, hash: &ContentHash) -> Option<Arc<Value>> {
        self.entries.get(hash).map(|e| e.value().clone())
    }

    /// Stores a value, returning the instance the cache now holds.
    ///
    /// If another thread has already stored a value under this hash, that
    /// earlier value wins and is returned; the caller should adopt it so
    /// every reader of the hash shares one instance.
    pub fn insert(&self, hash: ContentHash, value: Arc<Value>) -> Arc<Value> {
        let size = Self::entry_size(&value);
        let (stored, inserted) = match self.entries.entry(hash) {
            Entry::Occupied(e) => (e.get().clone(), false),
            Entry::Vacant(e) => {
                e.insert(value.clone());
                (value, true)
            }
        };
        if inserted {
            self.order.lock().unwrap().push_back(hash);
            self.used.fetch_add(size, Ordering::Relaxed);
            self.enforce_limit();
        }
        stored
    }

    /// Sets the memory budget in bytes, evicting down to it if needed.
    ///
    /// A budget of zero disables retention entirely.
    pub fn set_memory_limit(&self, bytes: usize) {
        self.limit.store(bytes, Ordering::Relaxed);
        self.enforce_limit();
    }

    /// Returns the memory budget in bytes.
    pub fn memory_limit(&self) -> usize {
        self.limit.load(Ordering::Relaxed)
    }

    /// Returns the approximate bytes currently held.
    pub fn memory_usage(&self) -> usize {
        self.used.load(Ordering::Relaxed)
    }

    /// Number of cached values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every cached value.
    pub fn clear(&self) {
        let mut order = self.order.lock().unwrap();
        self.entries.clear();
        order.clear();
        self.used.store(0, Ordering::Relaxed);
    }

    fn enforce_limit(&self) {
        let limit = self.limit.load(Ordering::Relaxed);
        while self.used.load(Ordering::Relaxed) > limit {
            let oldest = self.order.lock().unwrap().pop_front();
            let Some(hash) = oldest else { break };
            if let Some((_, value)) = self.entries.remove(&hash) {
                let size = Self::entry_size(&value);
                let _ = self.used.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |u| {
                    Some(u.saturating_sub(size))
                });
            }
        }
    }

    fn entry_size(value: &Value) -> usize {
        std::mem::size_of::<ContentHash>() + std::mem::size_of::<Arc<Value>>() + value.approx_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::ContentHasher;

    fn hash_of(tag: &str) -> ContentHash {
        let mut h = ContentHasher::new();
        h.append_str(tag);
        h.finish()
    }

    #[test]
    fn test_insert_and_get() {
        let cache = ValueCache::new();
        let h = hash_of("a");
        assert!(cache.get(&h).is_none());
        cache.insert(h, Arc::new(Value::F64(1.5)));
        assert_eq!(*cache.get(&h).unwrap(), Value::F64(1.5));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_first_insert_wins() {
        let cache = ValueCache::new();
        let h = hash_of("a");
        let first = Arc::new(Value::I32(1));
        let second = Arc::new(Value::I32(1));
        let stored_first = cache.insert(h, first.clone());
        let stored_second = cache.insert(h, second.clone());
        assert!(Arc::ptr_eq(&stored_first, &first));
        assert!(Arc::ptr_eq(&stored_second, &first));
        assert!(!Arc::ptr_eq(&stored_second, &second));
    }

    #[test]
    fn test_usage_tracks_inserts() {
        let cache = ValueCache::new();
        assert_eq!(cache.memory_usage(), 0);
        cache.insert(hash_of("a"), Arc::new(Value::Str("hello".into())));
        assert!(cache.memory_usage() > 0);
    }

    #[test]
    fn test_eviction_is_oldest_first() {
        let cache = ValueCache::new();
        let big = |tag: &str| (hash_of(tag), Arc::new(Value::Str("x".repeat(400))));
        let (h1, v1) = big("a");
        let (h2, v2) = big("b");
        cache.insert(h1, v1);
        cache.insert(h2, v2);
        // Budget fits one entry; the older one goes.
        cache.set_memory_limit(600);
        assert!(cache.get(&h1).is_none());
        assert!(cache.get(&h2).is_some());
    }

    #[test]
    fn test_zero_limit_disables_retention() {
        let cache = ValueCache::new();
        cache.set_memory_limit(0);
        cache.insert(hash_of("a"), Arc::new(Value::F64(1.0)));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let cache = ValueCache::new();
        cache.insert(hash_of("a"), Arc::new(Value::F64(1.0)));
        cache.insert(hash_of("b"), Arc::new(Value::F64(2.0)));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.memory_usage(), 0);
    }

    #[test]
    fn test_concurrent_inserts_converge() {
        let cache = ValueCache::new();
        let h = hash_of("shared");
        let winners: Vec<Arc<Value>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let cache = &cache;
                    s.spawn(move || cache.insert(h, Arc::new(Value::I32(i))))
                })
                .collect();
            handles.into_iter().map(|j| j.join().unwrap()).collect()
        });
        for w in &winners[1..] {
            assert!(Arc::ptr_eq(&winners[0], w));
        }
        assert_eq!(cache.len(), 1);
    }
}
