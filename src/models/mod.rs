//! Request and Response models for the HTTP API
//!
//! Entity bodies reuse the store's own types; this module holds the DTOs
//! that exist only on the wire.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{CreateChatSessionRequest, CreateNoteRequest, CreateSourceRequest};
pub use responses::{ClearResponse, DeleteResponse, ErrorResponse, HealthResponse, StatsResponse};
