//! API Routes
//!
//! Configures the Axum router with all notebook and cache endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_stats, clear_cache, create_chat_session, create_note, create_notebook, create_source,
    delete_chat_session, delete_note, delete_notebook, delete_source, get_notebook,
    health_handler, list_chat_sessions, list_notebooks, list_notes, list_sources,
    update_notebook, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/notebooks", get(list_notebooks).post(create_notebook))
        .route(
            "/notebooks/:id",
            get(get_notebook).put(update_notebook).delete(delete_notebook),
        )
        .route("/notebooks/:id/notes", get(list_notes).post(create_note))
        .route("/notes/:id", delete(delete_note))
        .route("/notebooks/:id/sources", get(list_sources).post(create_source))
        .route("/sources/:id", delete(delete_source))
        .route(
            "/notebooks/:id/chat_sessions",
            get(list_chat_sessions).post(create_chat_session),
        )
        .route("/chat_sessions/:id", delete(delete_chat_session))
        .route("/cache/stats", get(cache_stats))
        .route("/cache", delete(clear_cache))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
