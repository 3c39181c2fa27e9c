mod common;

use std::fs;

use asset_tracker_core::{
    config::Config,
    core::services::TimeWindow,
    domain::{AccountCategory, Dataset, RecordDraft},
    storage::{JsonStorage, StorageBackend},
};
use common::{date, open_tracker, setup_test_env};

#[test]
fn fresh_directory_starts_from_seeded_dataset() {
    let (tracker, _, _) = setup_test_env(date(2024, 6, 1));
    assert_eq!(tracker.dataset(), &Dataset::seeded());
}

#[test]
fn mutations_survive_reopen() {
    let (mut tracker, _, base) = setup_test_env(date(2024, 6, 1));
    let account = tracker
        .add_account("Brokerage", AccountCategory::Investment)
        .unwrap();
    tracker
        .save_record(
            RecordDraft::new(date(2024, 5, 1))
                .amount(account.id.clone(), 1000)
                .amount("acc_1", 250),
        )
        .unwrap();
    tracker.delete_account(&account.id);
    let expected = tracker.dataset().clone();
    drop(tracker);

    let reopened = open_tracker(&base, date(2024, 6, 1));
    assert_eq!(reopened.dataset(), &expected);
    assert!(reopened.dataset().account(&account.id).unwrap().deleted);
}

#[test]
fn corrupt_store_falls_back_to_defaults() {
    let base = common::temp_base();
    let storage = JsonStorage::new(Some(base.clone()), None).unwrap();
    fs::write(storage.data_path(), "{\"accounts\": 5").unwrap();

    let tracker = open_tracker(&base, date(2024, 6, 1));
    assert_eq!(tracker.dataset(), &Dataset::seeded());
}

#[test]
fn saves_rotate_previous_file_with_bounded_retention() {
    let base = common::temp_base();
    let storage = JsonStorage::new(Some(base.clone()), Some(2)).unwrap();
    let mut dataset = Dataset::seeded();
    storage.save(&dataset).unwrap();
    for day in 1..=4 {
        dataset.records.push(
            RecordDraft::new(date(2024, 1, day))
                .amount("acc_1", 10)
                .into_record()
                .unwrap(),
        );
        storage.save(&dataset).unwrap();
    }
    assert!(storage.list_backups().unwrap().len() <= 2);
    assert_eq!(storage.load().unwrap(), Some(dataset));
}

#[test]
fn config_round_trip_in_isolated_directory() {
    let (_, manager, _) = setup_test_env(date(2024, 6, 1));
    assert_eq!(manager.load().unwrap(), Config::default());

    let config = Config {
        default_window: TimeWindow::OneYear,
        export_prefix: "snapshots".into(),
        ..Config::default()
    };
    manager.save(&config).unwrap();
    assert_eq!(manager.load().unwrap(), config);
}
