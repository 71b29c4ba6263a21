//! The restaurant document and the writes allowed on it.

use crate::domain::restaurant::{Comment, Restaurant};
use crate::domain::submission;
use crate::error::BoardError;
use crate::storage::document::{DocumentStore, LoadOutcome};
use chrono::Local;
use serde_json::{Map, Value as JsonValue};
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{debug, info};

pub const EMPTY_COMMENT_MESSAGE: &str = "留言內容不可為空";

/// Restaurant records backed by one JSON document.
///
/// Reads go straight to the document. Writes hold `write_lock` across the
/// whole load-modify-save so two concurrent writers cannot drop each other's
/// changes.
pub struct RestaurantStore {
    documents: DocumentStore<Restaurant>,
    write_lock: Mutex<()>,
}

impl RestaurantStore {
    pub fn new(documents: DocumentStore<Restaurant>) -> Self {
        Self {
            documents,
            write_lock: Mutex::new(()),
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(DocumentStore::file(path))
    }

    pub fn memory() -> Self {
        Self::new(DocumentStore::memory())
    }

    pub fn documents(&self) -> &DocumentStore<Restaurant> {
        &self.documents
    }

    pub async fn load(&self) -> Vec<Restaurant> {
        self.documents.load().await
    }

    pub async fn load_with_outcome(&self) -> (Vec<Restaurant>, LoadOutcome) {
        self.documents.load_with_outcome().await
    }

    pub async fn save(&self, all: &[Restaurant]) -> Result<(), BoardError> {
        let _guard = self.write_lock.lock().await;
        self.documents.save(all).await?;
        Ok(())
    }

    pub async fn find(&self, id: &str) -> Option<Restaurant> {
        self.load().await.into_iter().find(|r| r.id == id)
    }

    /// Runs a submission against the current records and persists it when accepted.
    pub async fn insert(
        &self,
        candidate: Map<String, JsonValue>,
    ) -> Result<Restaurant, BoardError> {
        let _guard = self.write_lock.lock().await;
        let created = self
            .documents
            .update(|all| {
                let created = submission::submit(candidate, all).map_err(|e| {
                    debug!(error = %e, "submission rejected");
                    e
                })?;
                all.push(created.clone());
                Ok::<_, BoardError>(created)
            })
            .await?;
        info!(id = %created.id, name = %created.name, "restaurant submitted");
        Ok(created)
    }

    /// Appends a comment to the record with `id`.
    ///
    /// An unknown id is [`BoardError::NotFound`] and nothing is written.
    pub async fn append_comment(&self, id: &str, text: &str) -> Result<Comment, BoardError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(BoardError::Validation(EMPTY_COMMENT_MESSAGE.to_string()));
        }

        let _guard = self.write_lock.lock().await;
        let comment = self
            .documents
            .update(|all| {
                let Some(record) = all.iter_mut().find(|r| r.id == id) else {
                    debug!(id, "comment for unknown restaurant");
                    return Err(BoardError::NotFound(id.to_string()));
                };
                let comment = Comment::new(text, Local::now());
                record.comments.push(comment.clone());
                Ok(comment)
            })
            .await?;
        info!(id, "comment added");
        Ok(comment)
    }
}
