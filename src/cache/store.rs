//! Cache Store Module
//!
//! Main cache engine: a HashMap behind a reader/writer lock with fixed-TTL
//! expiry, prefix invalidation and hit/miss/eviction counters.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::debug;

use crate::cache::{CacheEntry, CacheStats};

// == TTL Cache ==
/// Concurrent key/value cache with a single TTL applied to every entry.
///
/// Reads (`get`, `len`, `stats`) share the map lock; every mutation takes it
/// exclusively. Counters sit behind their own mutex so that `get` can count
/// while holding only the shared lock. The engine never calls out to other
/// code while a lock is held, and none of its operations can fail.
#[derive(Debug)]
pub struct TtlCache<V> {
    /// Key-value storage
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    /// Performance statistics
    stats: Mutex<CacheStats>,
    /// Lifetime given to every entry on `set`
    ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    // == Constructor ==
    /// Creates an empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            stats: Mutex::new(CacheStats::new()),
            ttl,
        }
    }

    // == Get ==
    /// Returns a clone of the live value stored under `key`.
    ///
    /// Expired entries are reported as misses but left in place; the sweep or
    /// an explicit delete removes them.
    pub fn get(&self, key: &str) -> Option<V> {
        let entries = self.entries.read();
        let found = entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(Instant::now()))
            .map(|entry| entry.value.clone());

        let mut stats = self.stats.lock();
        match found {
            Some(_) => stats.record_hit(),
            None => stats.record_miss(),
        }
        found
    }

    // == Set ==
    /// Inserts or overwrites `key`, restarting its TTL.
    pub fn set(&self, key: impl Into<String>, value: V) {
        let entry = CacheEntry::new(value, self.ttl);
        self.entries.write().insert(key.into(), entry);
    }

    // == Delete ==
    /// Removes `key` if present. Not counted as an eviction.
    pub fn delete(&self, key: &str) {
        self.entries.write().remove(key);
    }

    // == Invalidate Pattern ==
    /// Removes every entry whose key starts with `prefix`.
    ///
    /// Matching is a literal, case-sensitive prefix test, so `"notes:1"` also
    /// matches `"notes:10"`. Returns the number of entries removed, which is
    /// added to the eviction counter.
    pub fn invalidate_pattern(&self, prefix: &str) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - entries.len();

        if removed > 0 {
            self.stats.lock().record_evictions(removed);
        }
        debug!(prefix, removed, "invalidated cache prefix");
        removed
    }

    // == Clear ==
    /// Drops every entry. Counters are left untouched.
    pub fn clear(&self) {
        *self.entries.write() = HashMap::new();
    }

    // == Sweep Expired ==
    /// Removes all entries expired at the time of the call.
    ///
    /// Returns the number of entries removed, which is added to the eviction
    /// counter.
    pub fn sweep_expired(&self) -> usize {
        let mut entries = self.entries.write();
        let now = Instant::now();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - entries.len();

        if removed > 0 {
            self.stats.lock().record_evictions(removed);
        }
        removed
    }

    // == Stats ==
    /// Returns a snapshot of all three counters taken in one critical section.
    pub fn stats(&self) -> CacheStats {
        *self.stats.lock()
    }

    // == Length ==
    /// Returns the number of stored entries, including expired ones that
    /// have not been swept yet.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
