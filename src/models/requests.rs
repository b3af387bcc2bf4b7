//! Request DTOs for the HTTP API
//!
//! Child entities take their notebook id from the URL path, so their bodies
//! carry only the remaining fields.

use serde::Deserialize;

use crate::store::{NewNote, NewSource};

/// Request body for `POST /notebooks/:id/notes`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNoteRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub source_ids: Vec<String>,
}

impl CreateNoteRequest {
    pub fn into_input(self, notebook_id: String) -> NewNote {
        NewNote {
            notebook_id,
            title: self.title,
            content: self.content,
            source_ids: self.source_ids,
        }
    }
}

/// Request body for `POST /notebooks/:id/sources`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSourceRequest {
    pub name: String,
    #[serde(default = "default_source_type")]
    pub source_type: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub content: String,
}

fn default_source_type() -> String {
    "text".to_string()
}

impl CreateSourceRequest {
    pub fn into_input(self, notebook_id: String) -> NewSource {
        NewSource {
            notebook_id,
            name: self.name,
            source_type: self.source_type,
            url: self.url,
            content: self.content,
        }
    }
}

/// Request body for `POST /notebooks/:id/chat_sessions`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateChatSessionRequest {
    #[serde(default = "default_chat_title")]
    pub title: String,
}

fn default_chat_title() -> String {
    "New chat".to_string()
}
