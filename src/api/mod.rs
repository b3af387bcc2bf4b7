//! API Module
//!
//! HTTP handlers and routing over the cached notebook store.
//!
//! # Endpoints
//! - `GET/POST /notebooks` - List or create notebooks
//! - `GET/PUT/DELETE /notebooks/:id` - Read, update or delete a notebook
//! - `GET/POST /notebooks/:id/{notes,sources,chat_sessions}` - List or create children
//! - `DELETE /{notes,sources,chat_sessions}/:id` - Delete a child
//! - `GET /cache/stats` - Cache counters
//! - `DELETE /cache` - Drop all cached entries
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
