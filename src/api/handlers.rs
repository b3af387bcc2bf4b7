//! API Handlers
//!
//! HTTP request handlers over the cached notebook store.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::error::Result;
use crate::models::{
    ClearResponse, CreateChatSessionRequest, CreateNoteRequest, CreateSourceRequest,
    DeleteResponse, HealthResponse, StatsResponse,
};
use crate::store::{
    CacheOptions, CachedStore, ChatSession, MemoryStore, NewNotebook, Note, Notebook,
    NotebookUpdate, Source,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Cached store shared by every request
    pub store: Arc<CachedStore<MemoryStore>>,
}

impl AppState {
    pub fn new(store: CachedStore<MemoryStore>) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Must run inside a Tokio runtime: the cache starts its sweep task here.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::with_options(config.cache_options())
    }

    pub fn with_options(options: CacheOptions) -> Self {
        Self::new(CachedStore::new(MemoryStore::new(), options))
    }
}

// == Notebooks ==
pub async fn list_notebooks(State(state): State<AppState>) -> Result<Json<Vec<Notebook>>> {
    Ok(Json(state.store.list_notebooks().await?))
}

pub async fn get_notebook(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Notebook>> {
    Ok(Json(state.store.get_notebook(&id).await?))
}

pub async fn create_notebook(
    State(state): State<AppState>,
    Json(req): Json<NewNotebook>,
) -> Result<(StatusCode, Json<Notebook>)> {
    let notebook = state.store.create_notebook(req).await?;
    Ok((StatusCode::CREATED, Json(notebook)))
}

pub async fn update_notebook(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<NotebookUpdate>,
) -> Result<Json<Notebook>> {
    Ok(Json(state.store.update_notebook(&id, req).await?))
}

pub async fn delete_notebook(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.store.delete_notebook(&id).await?;
    Ok(Json(DeleteResponse::new("notebook", id)))
}

// == Notes ==
pub async fn list_notes(
    State(state): State<AppState>,
    Path(notebook_id): Path<String>,
) -> Result<Json<Vec<Note>>> {
    Ok(Json(state.store.list_notes(&notebook_id).await?))
}

pub async fn create_note(
    State(state): State<AppState>,
    Path(notebook_id): Path<String>,
    Json(req): Json<CreateNoteRequest>,
) -> Result<(StatusCode, Json<Note>)> {
    let note = state.store.create_note(req.into_input(notebook_id)).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.store.delete_note(&id).await?;
    Ok(Json(DeleteResponse::new("note", id)))
}

// == Sources ==
pub async fn list_sources(
    State(state): State<AppState>,
    Path(notebook_id): Path<String>,
) -> Result<Json<Vec<Source>>> {
    Ok(Json(state.store.list_sources(&notebook_id).await?))
}

pub async fn create_source(
    State(state): State<AppState>,
    Path(notebook_id): Path<String>,
    Json(req): Json<CreateSourceRequest>,
) -> Result<(StatusCode, Json<Source>)> {
    let source = state.store.create_source(req.into_input(notebook_id)).await?;
    Ok((StatusCode::CREATED, Json(source)))
}

pub async fn delete_source(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.store.delete_source(&id).await?;
    Ok(Json(DeleteResponse::new("source", id)))
}

// == Chat Sessions ==
pub async fn list_chat_sessions(
    State(state): State<AppState>,
    Path(notebook_id): Path<String>,
) -> Result<Json<Vec<ChatSession>>> {
    Ok(Json(state.store.list_chat_sessions(&notebook_id).await?))
}

pub async fn create_chat_session(
    State(state): State<AppState>,
    Path(notebook_id): Path<String>,
    Json(req): Json<CreateChatSessionRequest>,
) -> Result<(StatusCode, Json<ChatSession>)> {
    let session = state
        .store
        .create_chat_session(&notebook_id, &req.title)
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn delete_chat_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    state.store.delete_chat_session(&id).await?;
    Ok(Json(DeleteResponse::new("chat session", id)))
}

// == Cache Management ==
/// Handler for GET /cache/stats
pub async fn cache_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::new(
        state.store.cache_stats(),
        state.store.cache_size(),
    ))
}

/// Handler for DELETE /cache
pub async fn clear_cache(State(state): State<AppState>) -> Json<ClearResponse> {
    let cleared = state.store.cache_size();
    state.store.clear_cache();
    Json(ClearResponse::new(cleared))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;

    fn test_state() -> AppState {
        AppState::with_options(CacheOptions::default())
    }

    #[tokio::test]
    async fn test_create_and_get_notebook_handlers() {
        let state = test_state();

        let req = NewNotebook {
            name: "Handlers".to_string(),
            ..Default::default()
        };
        let (status, Json(created)) = create_notebook(State(state.clone()), Json(req))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);

        let Json(fetched) = get_notebook(State(state.clone()), Path(created.id.clone()))
            .await
            .unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_get_missing_notebook() {
        let state = test_state();

        let result = get_notebook(State(state), Path("missing".to_string())).await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_cache_stats_handler() {
        let state = test_state();
        list_notebooks(State(state.clone())).await.unwrap();
        list_notebooks(State(state.clone())).await.unwrap();

        let Json(stats) = cache_stats(State(state)).await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[tokio::test]
    async fn test_clear_cache_handler() {
        let state = test_state();
        list_notebooks(State(state.clone())).await.unwrap();

        let Json(resp) = clear_cache(State(state.clone())).await;
        assert_eq!(resp.cleared, 1);
        assert_eq!(state.store.cache_size(), 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
