//! In-process notebook store.
//!
//! Keeps every table in memory behind one async lock. Used by the server
//! binary and as the backing store in tests.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::store::backend::NotebookStore;
use crate::store::models::{
    ChatSession, NewNote, NewNotebook, NewSource, Note, Notebook, NotebookUpdate, Source,
};

/// Rows kept in insertion order so listings are stable.
#[derive(Debug, Default)]
struct Tables {
    notebooks: Vec<Notebook>,
    notes: Vec<Note>,
    sources: Vec<Source>,
    chat_sessions: Vec<ChatSession>,
}

impl Tables {
    fn require_notebook(&self, id: &str) -> Result<()> {
        if self.notebooks.iter().any(|nb| nb.id == id) {
            Ok(())
        } else {
            Err(StoreError::not_found("notebook", id))
        }
    }
}

// == Memory Store ==
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a notebook under a caller-chosen id.
    ///
    /// Fails with `InvalidInput` if the id is already taken.
    pub async fn create_notebook_with_id(&self, id: &str, input: NewNotebook) -> Result<Notebook> {
        validate_name("notebook name", &input.name)?;
        let mut tables = self.tables.write().await;
        if tables.notebooks.iter().any(|nb| nb.id == id) {
            return Err(StoreError::InvalidInput(format!(
                "notebook id already exists: {}",
                id
            )));
        }

        let now = Utc::now();
        let notebook = Notebook {
            id: id.to_string(),
            name: input.name,
            description: input.description,
            metadata: input.metadata,
            created_at: now,
            updated_at: now,
        };
        tables.notebooks.push(notebook.clone());
        Ok(notebook)
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn validate_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(StoreError::InvalidInput(format!("{} cannot be empty", field)));
    }
    Ok(())
}

#[async_trait]
impl NotebookStore for MemoryStore {
    async fn list_notebooks(&self) -> Result<Vec<Notebook>> {
        Ok(self.tables.read().await.notebooks.clone())
    }

    async fn get_notebook(&self, id: &str) -> Result<Notebook> {
        let tables = self.tables.read().await;
        tables
            .notebooks
            .iter()
            .find(|nb| nb.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("notebook", id))
    }

    async fn create_notebook(&self, input: NewNotebook) -> Result<Notebook> {
        self.create_notebook_with_id(&new_id(), input).await
    }

    async fn update_notebook(&self, id: &str, update: NotebookUpdate) -> Result<Notebook> {
        validate_name("notebook name", &update.name)?;
        let mut tables = self.tables.write().await;
        let notebook = tables
            .notebooks
            .iter_mut()
            .find(|nb| nb.id == id)
            .ok_or_else(|| StoreError::not_found("notebook", id))?;

        notebook.name = update.name;
        notebook.description = update.description;
        notebook.metadata = update.metadata;
        notebook.updated_at = Utc::now();
        Ok(notebook.clone())
    }

    async fn delete_notebook(&self, id: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.require_notebook(id)?;

        tables.notebooks.retain(|nb| nb.id != id);
        tables.notes.retain(|note| note.notebook_id != id);
        tables.sources.retain(|source| source.notebook_id != id);
        tables.chat_sessions.retain(|session| session.notebook_id != id);
        Ok(())
    }

    async fn list_notes(&self, notebook_id: &str) -> Result<Vec<Note>> {
        let tables = self.tables.read().await;
        Ok(tables
            .notes
            .iter()
            .filter(|note| note.notebook_id == notebook_id)
            .cloned()
            .collect())
    }

    async fn get_note(&self, id: &str) -> Result<Note> {
        let tables = self.tables.read().await;
        tables
            .notes
            .iter()
            .find(|note| note.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("note", id))
    }

    async fn create_note(&self, input: NewNote) -> Result<Note> {
        let mut tables = self.tables.write().await;
        tables.require_notebook(&input.notebook_id)?;

        let now = Utc::now();
        let note = Note {
            id: new_id(),
            notebook_id: input.notebook_id,
            title: input.title,
            content: input.content,
            source_ids: input.source_ids,
            created_at: now,
            updated_at: now,
        };
        tables.notes.push(note.clone());
        Ok(note)
    }

    async fn delete_note(&self, id: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        let before = tables.notes.len();
        tables.notes.retain(|note| note.id != id);
        if tables.notes.len() == before {
            return Err(StoreError::not_found("note", id));
        }
        Ok(())
    }

    async fn list_sources(&self, notebook_id: &str) -> Result<Vec<Source>> {
        let tables = self.tables.read().await;
        Ok(tables
            .sources
            .iter()
            .filter(|source| source.notebook_id == notebook_id)
            .cloned()
            .collect())
    }

    async fn get_source(&self, id: &str) -> Result<Source> {
        let tables = self.tables.read().await;
        tables
            .sources
            .iter()
            .find(|source| source.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("source", id))
    }

    async fn create_source(&self, input: NewSource) -> Result<Source> {
        validate_name("source name", &input.name)?;
        let mut tables = self.tables.write().await;
        tables.require_notebook(&input.notebook_id)?;

        let source = Source {
            id: new_id(),
            notebook_id: input.notebook_id,
            name: input.name,
            source_type: input.source_type,
            url: input.url,
            content: input.content,
            created_at: Utc::now(),
        };
        tables.sources.push(source.clone());
        Ok(source)
    }

    async fn delete_source(&self, id: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        let before = tables.sources.len();
        tables.sources.retain(|source| source.id != id);
        if tables.sources.len() == before {
            return Err(StoreError::not_found("source", id));
        }
        Ok(())
    }

    async fn list_chat_sessions(&self, notebook_id: &str) -> Result<Vec<ChatSession>> {
        let tables = self.tables.read().await;
        Ok(tables
            .chat_sessions
            .iter()
            .filter(|session| session.notebook_id == notebook_id)
            .cloned()
            .collect())
    }

    async fn get_chat_session(&self, id: &str) -> Result<ChatSession> {
        let tables = self.tables.read().await;
        tables
            .chat_sessions
            .iter()
            .find(|session| session.id == id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("chat session", id))
    }

    async fn create_chat_session(&self, notebook_id: &str, title: &str) -> Result<ChatSession> {
        let mut tables = self.tables.write().await;
        tables.require_notebook(notebook_id)?;

        let now = Utc::now();
        let session = ChatSession {
            id: new_id(),
            notebook_id: notebook_id.to_string(),
            title: title.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.chat_sessions.push(session.clone());
        Ok(session)
    }

    async fn delete_chat_session(&self, id: &str) -> Result<()> {
        let mut tables = self.tables.write().await;
        let before = tables.chat_sessions.len();
        tables.chat_sessions.retain(|session| session.id != id);
        if tables.chat_sessions.len() == before {
            return Err(StoreError::not_found("chat session", id));
        }
        Ok(())
    }
}
