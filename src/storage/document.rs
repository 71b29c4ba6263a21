//! Whole-document JSON persistence.
//!
//! A document is one JSON array on some backing location. Every load reads and
//! parses the full document; every save replaces it.
//!
//! Loading is fail-open: a missing, unreadable or malformed document loads as
//! an empty list. [`DocumentStore::load_with_outcome`] reports which of those
//! happened so callers (and tests) can tell them apart.
//!
//! Records are read one by one. A record that does not fit `T` is skipped on
//! read, and [`DocumentStore::update`] writes it back untouched at its old
//! position, so one odd entry never costs the rest of the document.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fmt;
use std::io;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Where a document's bytes live.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Returns `Ok(None)` when the document does not exist yet.
    async fn read(&self) -> io::Result<Option<String>>;

    /// Replaces the whole document.
    async fn write(&self, contents: &str) -> io::Result<()>;

    /// Human-readable location for logs.
    fn describe(&self) -> String;
}

/// A JSON file on local disk.
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl DocumentBackend for FileBackend {
    async fn read(&self) -> io::Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn write(&self, contents: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        // Write beside the target and rename so readers never see half a document.
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, contents).await?;
        tokio::fs::rename(&tmp, &self.path).await
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory document, for tests and throwaway instances.
#[derive(Default)]
pub struct MemoryBackend {
    contents: Mutex<Option<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(Some(contents.into())),
        }
    }

    pub async fn contents(&self) -> Option<String> {
        self.contents.lock().await.clone()
    }
}

#[async_trait]
impl DocumentBackend for MemoryBackend {
    async fn read(&self) -> io::Result<Option<String>> {
        Ok(self.contents.lock().await.clone())
    }

    async fn write(&self, contents: &str) -> io::Result<()> {
        *self.contents.lock().await = Some(contents.to_string());
        Ok(())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

/// What [`DocumentStore::load_with_outcome`] found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadOutcome {
    Loaded { count: usize },
    /// Readable array, but `skipped` records did not fit the record type.
    Partial { count: usize, skipped: usize },
    Missing,
    /// Unreadable or not a JSON array. Loaded as empty.
    Corrupt { reason: String },
}

impl LoadOutcome {
    pub fn is_corrupt(&self) -> bool {
        matches!(self, LoadOutcome::Corrupt { .. })
    }
}

impl fmt::Display for LoadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadOutcome::Loaded { count } => write!(f, "{count} records"),
            LoadOutcome::Partial { count, skipped } => {
                write!(f, "{count} records, {skipped} unreadable (kept on write)")
            }
            LoadOutcome::Missing => f.write_str("missing"),
            LoadOutcome::Corrupt { reason } => write!(f, "corrupt: {reason}"),
        }
    }
}

/// Everything one read produced, including the raw records that did not fit.
struct Snapshot<T> {
    records: Vec<T>,
    unreadable: Vec<(usize, JsonValue)>,
    outcome: LoadOutcome,
}

impl<T> Snapshot<T> {
    fn empty(outcome: LoadOutcome) -> Self {
        Self {
            records: Vec::new(),
            unreadable: Vec::new(),
            outcome,
        }
    }
}

/// Typed view over a [`DocumentBackend`] holding a JSON array of `T`.
pub struct DocumentStore<T> {
    backend: Arc<dyn DocumentBackend>,
    _records: PhantomData<fn() -> T>,
}

impl<T> Clone for DocumentStore<T> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            _records: PhantomData,
        }
    }
}

impl<T> DocumentStore<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(backend: Arc<dyn DocumentBackend>) -> Self {
        Self {
            backend,
            _records: PhantomData,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileBackend::new(path)))
    }

    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    pub fn describe(&self) -> String {
        self.backend.describe()
    }

    /// All records, or an empty list when the document is missing or corrupt.
    pub async fn load(&self) -> Vec<T> {
        self.load_with_outcome().await.0
    }

    pub async fn load_with_outcome(&self) -> (Vec<T>, LoadOutcome) {
        let snapshot = self.read_snapshot().await;
        (snapshot.records, snapshot.outcome)
    }

    async fn read_snapshot(&self) -> Snapshot<T> {
        let raw = match self.backend.read().await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Snapshot::empty(LoadOutcome::Missing),
            Err(e) => {
                warn!(
                    document = %self.describe(),
                    error = %e,
                    "document unreadable, treating as empty"
                );
                return Snapshot::empty(LoadOutcome::Corrupt {
                    reason: e.to_string(),
                });
            }
        };

        if raw.trim().is_empty() {
            return Snapshot::empty(LoadOutcome::Loaded { count: 0 });
        }

        let values = match serde_json::from_str::<Vec<JsonValue>>(&raw) {
            Ok(values) => values,
            Err(e) => {
                warn!(
                    document = %self.describe(),
                    error = %e,
                    "document is not a JSON array, treating as empty"
                );
                return Snapshot::empty(LoadOutcome::Corrupt {
                    reason: e.to_string(),
                });
            }
        };

        let mut records = Vec::with_capacity(values.len());
        let mut unreadable = Vec::new();
        for (index, value) in values.into_iter().enumerate() {
            match <T as serde::Deserialize>::deserialize(&value) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(
                        document = %self.describe(),
                        index,
                        error = %e,
                        "skipping unreadable record"
                    );
                    unreadable.push((index, value));
                }
            }
        }

        let count = records.len();
        let outcome = if unreadable.is_empty() {
            LoadOutcome::Loaded { count }
        } else {
            LoadOutcome::Partial {
                count,
                skipped: unreadable.len(),
            }
        };
        Snapshot {
            records,
            unreadable,
            outcome,
        }
    }

    /// Overwrites the document with all of `records`, pretty-printed.
    pub async fn save(&self, records: &[T]) -> anyhow::Result<()> {
        let body = serde_json::to_string_pretty(records)?;
        self.backend.write(&body).await?;
        Ok(())
    }

    /// Load, let `apply` change the records, save.
    ///
    /// Nothing is written when `apply` fails. Records that were skipped on
    /// read go back into the document at their original positions.
    pub async fn update<R, E, F>(&self, apply: F) -> Result<R, E>
    where
        F: FnOnce(&mut Vec<T>) -> Result<R, E>,
        E: From<anyhow::Error>,
    {
        let Snapshot {
            mut records,
            unreadable,
            ..
        } = self.read_snapshot().await;
        let result = apply(&mut records)?;
        self.save_with(&records, unreadable).await?;
        Ok(result)
    }

    async fn save_with(
        &self,
        records: &[T],
        unreadable: Vec<(usize, JsonValue)>,
    ) -> anyhow::Result<()> {
        if unreadable.is_empty() {
            return self.save(records).await;
        }
        let mut values = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        for (index, value) in unreadable {
            values.insert(index.min(values.len()), value);
        }
        let body = serde_json::to_string_pretty(&values)?;
        self.backend.write(&body).await?;
        Ok(())
    }

    /// Writes an empty array when the document does not exist. Returns whether
    /// it created one.
    pub async fn ensure_exists(&self) -> anyhow::Result<bool> {
        if self.backend.read().await?.is_some() {
            return Ok(false);
        }
        self.backend.write("[]").await?;
        info!(document = %self.describe(), "created empty document");
        Ok(true)
    }
}
