//! The contract a persistent notebook store offers to the caching layer.

use async_trait::async_trait;

use crate::error::Result;
use crate::store::models::{
    ChatSession, NewNote, NewNotebook, NewSource, Note, Notebook, NotebookUpdate, Source,
};

/// CRUD and list operations over notebooks and their children.
///
/// Any `Err` is a definitive failure; callers do not retry. Dropping a
/// returned future cancels the operation.
#[async_trait]
pub trait NotebookStore: Send + Sync + 'static {
    async fn list_notebooks(&self) -> Result<Vec<Notebook>>;
    async fn get_notebook(&self, id: &str) -> Result<Notebook>;
    async fn create_notebook(&self, input: NewNotebook) -> Result<Notebook>;
    async fn update_notebook(&self, id: &str, update: NotebookUpdate) -> Result<Notebook>;
    /// Deletes the notebook together with its notes, sources and chat sessions.
    async fn delete_notebook(&self, id: &str) -> Result<()>;

    async fn list_notes(&self, notebook_id: &str) -> Result<Vec<Note>>;
    async fn get_note(&self, id: &str) -> Result<Note>;
    async fn create_note(&self, input: NewNote) -> Result<Note>;
    async fn delete_note(&self, id: &str) -> Result<()>;

    async fn list_sources(&self, notebook_id: &str) -> Result<Vec<Source>>;
    async fn get_source(&self, id: &str) -> Result<Source>;
    async fn create_source(&self, input: NewSource) -> Result<Source>;
    async fn delete_source(&self, id: &str) -> Result<()>;

    async fn list_chat_sessions(&self, notebook_id: &str) -> Result<Vec<ChatSession>>;
    async fn get_chat_session(&self, id: &str) -> Result<ChatSession>;
    async fn create_chat_session(&self, notebook_id: &str, title: &str) -> Result<ChatSession>;
    async fn delete_chat_session(&self, id: &str) -> Result<()>;
}
