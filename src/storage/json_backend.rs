use chrono::Utc;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

use crate::{
    core::utils::{ensure_dir, write_atomic, PathResolver},
    domain::Dataset,
    errors::Result,
};

use super::StorageBackend;

const STORE_KEY: &str = "assetTracker";
const EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const DEFAULT_RETENTION: usize = 5;

/// File-backed blob store: one JSON document per key under the data directory.
///
/// Each save rotates the previous document into `backups/`, keeping the newest
/// `retention` copies.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let root = PathResolver::resolve_base(root);
        ensure_dir(&root)?;
        let backups_dir = PathResolver::backup_dir_in(&root);
        ensure_dir(&backups_dir)?;
        Ok(Self {
            root,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn data_path(&self) -> PathBuf {
        self.root.join(format!("{STORE_KEY}.{EXTENSION}"))
    }

    /// Rotated copies, newest first.
    pub fn list_backups(&self) -> Result<Vec<PathBuf>> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            entries.push(path);
        }
        entries.sort_by(|a, b| b.file_name().cmp(&a.file_name()));
        Ok(entries)
    }

    fn rotate_existing(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT);
        let backup = self
            .backups_dir
            .join(format!("{STORE_KEY}_{timestamp}.{EXTENSION}"));
        fs::copy(path, backup)?;
        self.prune_backups()
    }

    fn prune_backups(&self) -> Result<()> {
        for stale in self.list_backups()?.iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(stale) {
                warn!(path = %stale.display(), %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn load(&self) -> Result<Option<Dataset>> {
        let path = self.data_path();
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    fn save(&self, dataset: &Dataset) -> Result<()> {
        let path = self.data_path();
        self.rotate_existing(&path)?;
        let json = serde_json::to_string_pretty(dataset)?;
        write_atomic(&path, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_without_file_reports_nothing_stored() {
        let temp = tempdir().unwrap();
        let storage = JsonStorage::new(Some(temp.path().to_path_buf()), None).unwrap();
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load_returns_same_dataset() {
        let temp = tempdir().unwrap();
        let storage = JsonStorage::new(Some(temp.path().to_path_buf()), None).unwrap();
        let dataset = Dataset::seeded();
        storage.save(&dataset).unwrap();
        assert_eq!(storage.load().unwrap(), Some(dataset));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let temp = tempdir().unwrap();
        let storage = JsonStorage::new(Some(temp.path().to_path_buf()), None).unwrap();
        fs::write(storage.data_path(), "{ not json").unwrap();
        assert!(storage.load().is_err());
    }
}
