//! Free-standing guestbook messages, kept in their own document.

use crate::domain::restaurant::{display_timestamp, next_id, scalar_text};
use crate::storage::document::{DocumentStore, LoadOutcome};
use chrono::{Local, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::info;

/// One guestbook message. New entries get a numeric id; older documents may
/// hold any scalar there, which is kept as written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestbookEntry {
    #[serde(default)]
    pub id: JsonValue,
    #[serde(default, deserialize_with = "time_text")]
    pub time: String,
    #[serde(flatten)]
    pub fields: Map<String, JsonValue>,
}

impl GuestbookEntry {
    pub fn numeric_id(&self) -> Option<i64> {
        match &self.id {
            JsonValue::Number(n) => n.as_i64(),
            JsonValue::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

fn time_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(scalar_text(JsonValue::deserialize(deserializer)?).unwrap_or_default())
}

pub struct GuestbookStore {
    documents: DocumentStore<GuestbookEntry>,
    write_lock: Mutex<()>,
}

impl GuestbookStore {
    pub fn new(documents: DocumentStore<GuestbookEntry>) -> Self {
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

    pub fn documents(&self) -> &DocumentStore<GuestbookEntry> {
        &self.documents
    }

    pub async fn list(&self) -> Vec<GuestbookEntry> {
        self.documents.load().await
    }

    pub async fn load_with_outcome(&self) -> (Vec<GuestbookEntry>, LoadOutcome) {
        self.documents.load_with_outcome().await
    }

    /// Stores `fields` as a new entry. Submitted `id`/`time` are replaced.
    pub async fn post(&self, mut fields: Map<String, JsonValue>) -> anyhow::Result<GuestbookEntry> {
        fields.remove("id");
        fields.remove("time");

        let _guard = self.write_lock.lock().await;
        let entry = self
            .documents
            .update(|all| {
                let id = next_id(all.iter().filter_map(GuestbookEntry::numeric_id), Utc::now());
                let entry = GuestbookEntry {
                    id: id.into(),
                    time: display_timestamp(&Local::now()),
                    fields,
                };
                all.push(entry.clone());
                Ok::<_, anyhow::Error>(entry)
            })
            .await?;
        info!(id = %entry.id, "guestbook entry added");
        Ok(entry)
    }
}
