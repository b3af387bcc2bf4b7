//! Caching decorator over a [`NotebookStore`].
//!
//! Reads go through the TTL cache; writes go to the store first and, only
//! once the store has accepted them, drop the cache entries they made stale.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::{CacheStats, TtlCache, DEFAULT_SWEEP_INTERVAL};
use crate::error::Result;
use crate::store::backend::NotebookStore;
use crate::store::inflight::InFlightFetches;
use crate::store::keys::{
    chat_sessions_key, notebook_key, notebook_list_key, notes_list_key, sources_list_key,
};
use crate::store::models::{
    ChatSession, NewNote, NewNotebook, NewSource, Note, Notebook, NotebookUpdate, Source,
};
use crate::tasks::spawn_sweep_task;

// == Cached Value ==
/// A cached store result, tagged with the shape it was stored as.
#[derive(Debug, Clone)]
pub enum CachedValue {
    Notebooks(Arc<Vec<Notebook>>),
    Notebook(Arc<Notebook>),
    Notes(Arc<Vec<Note>>),
    Sources(Arc<Vec<Source>>),
    ChatSessions(Arc<Vec<ChatSession>>),
}

impl CachedValue {
    pub fn kind(&self) -> &'static str {
        match self {
            CachedValue::Notebooks(_) => "notebooks",
            CachedValue::Notebook(_) => "notebook",
            CachedValue::Notes(_) => "notes",
            CachedValue::Sources(_) => "sources",
            CachedValue::ChatSessions(_) => "chat_sessions",
        }
    }
}

// == Cache Options ==
#[derive(Debug, Clone)]
pub struct CacheOptions {
    /// Lifetime of every cached entry
    pub ttl: Duration,
    /// Period of the background expiry sweep
    pub sweep_interval: Duration,
    /// Collapse concurrent misses on one key into a single store fetch
    pub single_flight: bool,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            single_flight: false,
        }
    }
}

// == Cached Store ==
/// A notebook store whose reads are served from a per-instance TTL cache.
///
/// Store errors are returned exactly as the wrapped store produced them and
/// are never cached. A failed write leaves the cache untouched.
#[derive(Debug)]
pub struct CachedStore<S> {
    store: S,
    cache: Arc<TtlCache<CachedValue>>,
    inflight: Option<InFlightFetches>,
    shutdown: watch::Sender<bool>,
    sweep: Mutex<Option<JoinHandle<()>>>,
}

impl<S: NotebookStore> CachedStore<S> {
    /// Wraps `store` and starts the cache's sweep task.
    ///
    /// Must be called from within a Tokio runtime. The sweep task stops on
    /// [`CachedStore::shutdown`] or when the `CachedStore` is dropped.
    pub fn new(store: S, options: CacheOptions) -> Self {
        let cache = Arc::new(TtlCache::new(options.ttl));
        let (shutdown, shutdown_rx) = watch::channel(false);
        let sweep = spawn_sweep_task(Arc::clone(&cache), options.sweep_interval, shutdown_rx);

        Self {
            store,
            cache,
            inflight: options.single_flight.then(InFlightFetches::new),
            shutdown,
            sweep: Mutex::new(Some(sweep)),
        }
    }

    /// The wrapped store, bypassing the cache.
    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Stops the sweep task and waits for it to finish.
    pub async fn shutdown(&self) {
        let _ = self.shutdown.send(true);
        let handle = self.sweep.lock().take();
        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                warn!(error = %err, "cache sweep task ended abnormally");
            }
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drops every cached entry; the store is not touched.
    pub fn clear_cache(&self) {
        self.cache.clear();
        debug!("cache cleared");
    }

    /// Stored entries, counting expired ones not yet swept.
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }

    // == Read Path ==
    fn lookup<T>(&self, key: &str, extract: fn(CachedValue) -> Option<Arc<T>>) -> Option<Arc<T>> {
        let cached = self.cache.get(key)?;
        let kind = cached.kind();
        match extract(cached) {
            Some(value) => {
                debug!(key, "cache hit");
                Some(value)
            }
            None => {
                warn!(key, found = kind, "cached value has unexpected type, refetching");
                None
            }
        }
    }

    async fn read_through<T, F, Fut>(
        &self,
        key: &str,
        extract: fn(CachedValue) -> Option<Arc<T>>,
        wrap: fn(Arc<T>) -> CachedValue,
        fetch: F,
    ) -> Result<T>
    where
        T: Clone,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(hit) = self.lookup(key, extract) {
            return Ok(Arc::unwrap_or_clone(hit));
        }

        let _claim = match &self.inflight {
            Some(inflight) => {
                let claim = inflight.acquire(key).await;
                // Filled by the caller we queued behind
                if let Some(hit) = self.lookup(key, extract) {
                    return Ok(Arc::unwrap_or_clone(hit));
                }
                Some(claim)
            }
            None => None,
        };

        debug!(key, "cache miss, fetching from store");
        let value = Arc::new(fetch().await?);
        self.cache.set(key, wrap(Arc::clone(&value)));
        Ok(Arc::unwrap_or_clone(value))
    }

    fn invalidate(&self, key: &str) {
        self.cache.delete(key);
        debug!(key, "cache key invalidated");
    }

    // == Notebooks ==
    pub async fn list_notebooks(&self) -> Result<Vec<Notebook>> {
        self.read_through(
            notebook_list_key(),
            |cached| match cached {
                CachedValue::Notebooks(notebooks) => Some(notebooks),
                _ => None,
            },
            CachedValue::Notebooks,
            || self.store.list_notebooks(),
        )
        .await
    }

    pub async fn get_notebook(&self, id: &str) -> Result<Notebook> {
        self.read_through(
            &notebook_key(id),
            |cached| match cached {
                CachedValue::Notebook(notebook) => Some(notebook),
                _ => None,
            },
            CachedValue::Notebook,
            || self.store.get_notebook(id),
        )
        .await
    }

    pub async fn create_notebook(&self, input: NewNotebook) -> Result<Notebook> {
        let notebook = self.store.create_notebook(input).await?;
        self.invalidate(notebook_list_key());
        Ok(notebook)
    }

    pub async fn update_notebook(&self, id: &str, update: NotebookUpdate) -> Result<Notebook> {
        let notebook = self.store.update_notebook(id, update).await?;
        self.invalidate(&notebook_key(id));
        self.invalidate(notebook_list_key());
        Ok(notebook)
    }

    /// Deletes a notebook and drops every cached list under it.
    pub async fn delete_notebook(&self, id: &str) -> Result<()> {
        self.store.delete_notebook(id).await?;
        self.invalidate(&notebook_key(id));
        self.invalidate(notebook_list_key());
        self.cache.invalidate_pattern(&notes_list_key(id));
        self.cache.invalidate_pattern(&sources_list_key(id));
        self.cache.invalidate_pattern(&chat_sessions_key(id));
        Ok(())
    }

    // == Notes ==
    pub async fn list_notes(&self, notebook_id: &str) -> Result<Vec<Note>> {
        self.read_through(
            &notes_list_key(notebook_id),
            |cached| match cached {
                CachedValue::Notes(notes) => Some(notes),
                _ => None,
            },
            CachedValue::Notes,
            || self.store.list_notes(notebook_id),
        )
        .await
    }

    pub async fn get_note(&self, id: &str) -> Result<Note> {
        self.store.get_note(id).await
    }

    pub async fn create_note(&self, input: NewNote) -> Result<Note> {
        let note = self.store.create_note(input).await?;
        self.invalidate(&notes_list_key(&note.notebook_id));
        Ok(note)
    }

    /// Looks the note up first: its parent id names the list to invalidate.
    pub async fn delete_note(&self, id: &str) -> Result<()> {
        let note = self.store.get_note(id).await?;
        self.store.delete_note(id).await?;
        self.invalidate(&notes_list_key(&note.notebook_id));
        Ok(())
    }

    // == Sources ==
    pub async fn list_sources(&self, notebook_id: &str) -> Result<Vec<Source>> {
        self.read_through(
            &sources_list_key(notebook_id),
            |cached| match cached {
                CachedValue::Sources(sources) => Some(sources),
                _ => None,
            },
            CachedValue::Sources,
            || self.store.list_sources(notebook_id),
        )
        .await
    }

    pub async fn get_source(&self, id: &str) -> Result<Source> {
        self.store.get_source(id).await
    }

    pub async fn create_source(&self, input: NewSource) -> Result<Source> {
        let source = self.store.create_source(input).await?;
        self.invalidate(&sources_list_key(&source.notebook_id));
        Ok(source)
    }

    pub async fn delete_source(&self, id: &str) -> Result<()> {
        let source = self.store.get_source(id).await?;
        self.store.delete_source(id).await?;
        self.invalidate(&sources_list_key(&source.notebook_id));
        Ok(())
    }

    // == Chat Sessions ==
    pub async fn list_chat_sessions(&self, notebook_id: &str) -> Result<Vec<ChatSession>> {
        self.read_through(
            &chat_sessions_key(notebook_id),
            |cached| match cached {
                CachedValue::ChatSessions(sessions) => Some(sessions),
                _ => None,
            },
            CachedValue::ChatSessions,
            || self.store.list_chat_sessions(notebook_id),
        )
        .await
    }

    pub async fn get_chat_session(&self, id: &str) -> Result<ChatSession> {
        self.store.get_chat_session(id).await
    }

    pub async fn create_chat_session(&self, notebook_id: &str, title: &str) -> Result<ChatSession> {
        let session = self.store.create_chat_session(notebook_id, title).await?;
        self.invalidate(&chat_sessions_key(notebook_id));
        Ok(session)
    }

    pub async fn delete_chat_session(&self, id: &str) -> Result<()> {
        let session = self.store.get_chat_session(id).await?;
        self.store.delete_chat_session(id).await?;
        self.invalidate(&chat_sessions_key(&session.notebook_id));
        Ok(())
    }
}
