//! Cache Module
//!
//! Provides the in-memory TTL cache engine: entries, counters and the
//! concurrent store with prefix invalidation.

mod entry;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::TtlCache;

// == Public Constants ==
/// Interval between background sweeps of expired entries
pub const DEFAULT_SWEEP_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);
