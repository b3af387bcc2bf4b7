//! Notebook Store Module
//!
//! The store contract, its in-memory implementation, and the caching
//! decorator that sits in front of any implementation.

pub mod backend;
pub mod cached;
pub mod inflight;
pub mod keys;
pub mod memory;
pub mod models;

pub use backend::NotebookStore;
pub use cached::{CacheOptions, CachedStore, CachedValue};
pub use memory::MemoryStore;
pub use models::{
    ChatSession, Metadata, NewNote, NewNotebook, NewSource, Note, Notebook, NotebookUpdate, Source,
};
