//! Per-key fetch serialization.
//!
//! When enabled on the caching decorator, concurrent misses on one key queue
//! behind a single store fetch instead of each calling the store.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockMap = Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>;

/// Tracks keys that currently have a store fetch in progress.
#[derive(Debug, Default, Clone)]
pub struct InFlightFetches {
    locks: LockMap,
}

impl InFlightFetches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other caller holds `key`, then holds it until the
    /// returned guard is dropped.
    pub async fn acquire(&self, key: &str) -> FetchGuard {
        let lock = {
            let mut locks = self.locks.lock();
            Arc::clone(locks.entry(key.to_string()).or_default())
        };

        FetchGuard {
            key: key.to_string(),
            locks: Arc::clone(&self.locks),
            guard: lock.lock_owned().await,
        }
    }

    /// Number of keys with a fetch in progress or queued.
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.lock().is_empty()
    }
}

/// Exclusive claim on one key's fetch.
#[derive(Debug)]
pub struct FetchGuard {
    key: String,
    locks: LockMap,
    guard: OwnedMutexGuard<()>,
}

impl Drop for FetchGuard {
    fn drop(&mut self) {
        let mut locks = self.locks.lock();
        // Only the map and this guard still reference the lock: nobody queued
        if Arc::strong_count(OwnedMutexGuard::mutex(&self.guard)) == 2 {
            locks.remove(&self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_guard_releases_entry() {
        let inflight = InFlightFetches::new();

        let guard = inflight.acquire("notes:1").await;
        assert_eq!(inflight.len(), 1);

        drop(guard);
        assert!(inflight.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_key_is_serialized() {
        let inflight = InFlightFetches::new();
        let first = inflight.acquire("notes:1").await;

        let waiter = {
            let inflight = inflight.clone();
            tokio::spawn(async move {
                let _guard = inflight.acquire("notes:1").await;
            })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished(), "second caller should wait");

        drop(first);
        waiter.await.unwrap();
        assert!(inflight.is_empty());
    }

    #[tokio::test]
    async fn test_different_keys_do_not_block() {
        let inflight = InFlightFetches::new();

        let _a = inflight.acquire("notes:1").await;
        let _b = inflight.acquire("sources:1").await;

        assert_eq!(inflight.len(), 2);
    }
}
