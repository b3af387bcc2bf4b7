//! Notebook Cache - a TTL read-through cache in front of a notebook store
//!
//! Provides a concurrent TTL cache engine with prefix invalidation and a
//! background sweep, and a caching decorator for notebook stores.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheStats, TtlCache};
pub use config::Config;
pub use error::StoreError;
pub use store::{CacheOptions, CachedStore, MemoryStore, NotebookStore};
pub use tasks::spawn_sweep_task;
