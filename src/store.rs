// --------------------------------------------------
// Persistence adapter for the task collection.
//
// The whole collection is one JSON array stored under one key
// (a file on disk, or a string in memory for tests).
// --------------------------------------------------

use std::{fs, io, path::{Path, PathBuf}, sync::Arc};

use parking_lot::Mutex;

use crate::models::Task;

pub const DEFAULT_DATA_PATH: &str = "data/tasks.json";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error("stored task data is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Load-all / save-all contract the task store persists through.
pub trait TaskRepository: Send + Sync {
    /// The stored blob exactly as written, or `None` if nothing is stored.
    fn read_raw(&self) -> Result<Option<String>, StoreError>;

    fn write_raw(&self, blob: &str) -> Result<(), StoreError>;

    /// Removes the stored blob. Removing a missing blob is not an error.
    fn clear(&self) -> Result<(), StoreError>;

    fn load(&self) -> Result<Vec<Task>, StoreError> {
        match self.read_raw()? {
            Some(text) => Ok(serde_json::from_str(&text)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StoreError> {
        let text = serde_json::to_string(tasks)?;
        self.write_raw(&text)
    }
}

// -----------------------------
// JSON file on disk
// -----------------------------

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl Default for JsonFileStore {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_PATH)
    }
}

impl TaskRepository for JsonFileStore {
    fn read_raw(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_raw(&self, blob: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // write-then-rename so a crash never leaves a half-written file
        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, blob)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// -----------------------------
// In-memory blob
// -----------------------------

/// Keeps the serialized blob in memory. Clones share the same blob, so a
/// test can hand one clone to the store and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blob: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Arc::new(Mutex::new(Some(blob.into()))),
        }
    }

    pub fn blob(&self) -> Option<String> {
        self.blob.lock().clone()
    }
}

impl TaskRepository for MemoryStore {
    fn read_raw(&self) -> Result<Option<String>, StoreError> {
        Ok(self.blob.lock().clone())
    }

    fn write_raw(&self, blob: &str) -> Result<(), StoreError> {
        *self.blob.lock() = Some(blob.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.blob.lock() = None;
        Ok(())
    }
}
