use chrono::NaiveDate;
use tracing::{debug, info};

use crate::domain::{Account, Dataset, Record, RecordDraft};
use crate::errors::TrackerError;

use super::{AccountRegistry, ServiceResult};

/// Dated snapshots keyed uniquely by date. Writes replace whole records, never merge.
pub struct RecordStore;

impl RecordStore {
    /// Validates the draft then inserts it, replacing any record on the same date.
    pub fn upsert(dataset: &mut Dataset, draft: RecordDraft) -> ServiceResult<Record> {
        let record = draft.into_record()?;
        match dataset.records.iter_mut().find(|r| r.date == record.date) {
            Some(existing) => {
                *existing = record.clone();
                info!(date = %record.date, "record overwritten");
            }
            None => {
                dataset.records.push(record.clone());
                info!(date = %record.date, "record added");
            }
        }
        Ok(record)
    }

    /// Saves an edited record that was loaded from `original_date`.
    ///
    /// When the date moved onto another existing record, the original slot is removed
    /// and the record already at the new date is replaced. Otherwise the record at
    /// `original_date` is replaced in place, which also covers a move to a free date.
    /// Fails with `RecordNotFound` when nothing is stored at `original_date`.
    pub fn update(
        dataset: &mut Dataset,
        draft: RecordDraft,
        original_date: NaiveDate,
    ) -> ServiceResult<Record> {
        if !Self::exists(dataset, original_date) {
            debug!(date = %original_date, "update rejected, no record at original date");
            return Err(TrackerError::RecordNotFound(original_date));
        }
        let record = draft.into_record()?;
        let target = record.date;
        if target != original_date && Self::exists(dataset, target) {
            dataset.records.retain(|r| r.date != original_date);
            for slot in dataset.records.iter_mut().filter(|r| r.date == target) {
                *slot = record.clone();
            }
            info!(from = %original_date, to = %target, "record moved onto existing date");
        } else {
            for slot in dataset.records.iter_mut().filter(|r| r.date == original_date) {
                *slot = record.clone();
            }
            info!(from = %original_date, to = %target, "record updated");
        }
        Ok(record)
    }

    /// Deletes the record at `date`; returns whether one existed.
    pub fn remove(dataset: &mut Dataset, date: NaiveDate) -> bool {
        let before = dataset.records.len();
        dataset.records.retain(|r| r.date != date);
        let removed = dataset.records.len() != before;
        if removed {
            info!(%date, "record removed");
        }
        removed
    }

    /// True when saving a record on `date` would overwrite an existing one.
    pub fn exists(dataset: &Dataset, date: NaiveDate) -> bool {
        dataset.records.iter().any(|r| r.date == date)
    }

    /// Records ordered newest first.
    pub fn newest_first(dataset: &Dataset) -> Vec<&Record> {
        let mut records: Vec<&Record> = dataset.records.iter().collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        records
    }

    /// A new-record form for `today`, prefilled from the latest record for every
    /// selectable account.
    pub fn prefilled_draft(dataset: &Dataset, today: NaiveDate) -> RecordDraft {
        let latest = dataset.latest_record();
        let mut draft = RecordDraft::new(today);
        for account in AccountRegistry::selectable(dataset) {
            let raw = latest
                .and_then(|record| record.assets.get(&account.id))
                .filter(|value| **value > 0)
                .map(|value| value.to_string())
                .unwrap_or_default();
            draft.set(account.id.clone(), raw);
        }
        draft
    }

    /// Accounts shown when editing `record`: selectable ones, then inactive or deleted
    /// ones that still hold a balance in it.
    pub fn edit_accounts<'a>(dataset: &'a Dataset, record: &Record) -> Vec<&'a Account> {
        let mut accounts = AccountRegistry::selectable(dataset);
        accounts.extend(
            dataset
                .accounts
                .iter()
                .filter(|account| !account.is_selectable() && record.value_of(&account.id) > 0),
        );
        accounts
    }
}
