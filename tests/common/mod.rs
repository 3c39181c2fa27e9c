#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use asset_tracker_core::{
    config::ConfigManager,
    core::{time::FixedClock, AssetTracker},
    storage::JsonStorage,
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Opens a tracker over JSON storage in `base`, with "today" pinned.
pub fn open_tracker(base: &PathBuf, today: NaiveDate) -> AssetTracker {
    let storage = JsonStorage::new(Some(base.clone()), Some(3)).expect("create json storage");
    AssetTracker::open_with_clock(Box::new(storage), Box::new(FixedClock::on(today)))
}

/// Creates an isolated tracker and config manager backed by a unique directory.
pub fn setup_test_env(today: NaiveDate) -> (AssetTracker, ConfigManager, PathBuf) {
    let base = temp_base();
    let tracker = open_tracker(&base, today);
    let config = ConfigManager::with_base_dir(base.clone()).expect("create config manager");
    (tracker, config, base)
}
