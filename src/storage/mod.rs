pub mod backup;
pub mod json_backend;

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use crate::{
    domain::Dataset,
    errors::{Result, TrackerError},
};

/// Blob store holding the whole dataset.
///
/// `load` returns `Ok(None)` when nothing has been stored yet. `save` always
/// receives the complete dataset.
pub trait StorageBackend: Send + Sync {
    fn load(&self) -> Result<Option<Dataset>>;
    fn save(&self, dataset: &Dataset) -> Result<()>;
}

/// In-process store keeping the serialized blob in memory.
#[derive(Default)]
pub struct MemoryStorage {
    blob: Mutex<Option<String>>,
    saves: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with raw stored content, parseable or not.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            blob: Mutex::new(Some(blob.into())),
            saves: AtomicUsize::new(0),
        }
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn blob(&self) -> Option<String> {
        self.blob.lock().ok().and_then(|guard| guard.clone())
    }
}

impl StorageBackend for MemoryStorage {
    fn load(&self) -> Result<Option<Dataset>> {
        let guard = self
            .blob
            .lock()
            .map_err(|_| TrackerError::Storage("memory store poisoned".into()))?;
        match guard.as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, dataset: &Dataset) -> Result<()> {
        let json = serde_json::to_string(dataset)?;
        let mut guard = self
            .blob
            .lock()
            .map_err(|_| TrackerError::Storage("memory store poisoned".into()))?;
        *guard = Some(json);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl<T: StorageBackend + ?Sized> StorageBackend for std::sync::Arc<T> {
    fn load(&self) -> Result<Option<Dataset>> {
        (**self).load()
    }

    fn save(&self, dataset: &Dataset) -> Result<()> {
        (**self).save(dataset)
    }
}

pub use backup::{BackupCodec, ImportSummary};
pub use json_backend::JsonStorage;
