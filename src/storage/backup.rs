//! Portable backup documents.
//!
//! A backup is pretty-printed JSON with two top-level sequences, `accounts` and
//! `records`. The same document is written by export and accepted by import.

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    domain::{Account, Dataset, Record, MAX_AMOUNT},
    errors::{Result, TrackerError},
};

/// Counts reported after a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub accounts: usize,
    pub records: usize,
}

pub struct BackupCodec;

impl BackupCodec {
    pub fn export(dataset: &Dataset) -> Result<String> {
        Ok(serde_json::to_string_pretty(dataset)?)
    }

    /// Parses a backup document.
    ///
    /// Fails with `MalformedDocument` unless both `accounts` and `records` are
    /// sequences of well-formed entries and every balance is at most
    /// [`MAX_AMOUNT`]. Records sharing a date collapse into the last one.
    pub fn import(document: &str) -> Result<Dataset> {
        let root: Value = serde_json::from_str(document)
            .map_err(|err| TrackerError::MalformedDocument(format!("not valid JSON: {err}")))?;
        let accounts = Self::sequence(&root, "accounts")?;
        let records = Self::sequence(&root, "records")?;

        let accounts: Vec<Account> = serde_json::from_value(Value::Array(accounts.clone()))
            .map_err(|err| TrackerError::MalformedDocument(format!("invalid account: {err}")))?;
        let parsed: Vec<Record> = serde_json::from_value(Value::Array(records.clone()))
            .map_err(|err| TrackerError::MalformedDocument(format!("invalid record: {err}")))?;

        let mut records: Vec<Record> = Vec::with_capacity(parsed.len());
        for record in parsed {
            if let Some((id, value)) = record.oversized_entry() {
                return Err(TrackerError::MalformedDocument(format!(
                    "balance {value} for {id} on {} exceeds {MAX_AMOUNT}",
                    record.date
                )));
            }
            match records.iter_mut().find(|existing| existing.date == record.date) {
                Some(existing) => {
                    warn!(date = %record.date, "duplicate record date in backup, keeping last");
                    *existing = record;
                }
                None => records.push(record),
            }
        }

        let dataset = Dataset { accounts, records };
        info!(
            accounts = dataset.accounts.len(),
            records = dataset.records.len(),
            "backup document parsed"
        );
        Ok(dataset)
    }

    pub fn summary(dataset: &Dataset) -> ImportSummary {
        ImportSummary {
            accounts: dataset.accounts.len(),
            records: dataset.records.len(),
        }
    }

    /// `<prefix>-YYYYMMDD.json`, unique per day.
    pub fn export_file_name(prefix: &str, today: NaiveDate) -> String {
        format!("{}-{}.json", prefix, today.format("%Y%m%d"))
    }

    fn sequence<'a>(root: &'a Value, key: &str) -> Result<&'a Vec<Value>> {
        match root.get(key) {
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(TrackerError::MalformedDocument(format!(
                "`{key}` must be a list"
            ))),
            None => Err(TrackerError::MalformedDocument(format!("missing `{key}`"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_rejects_missing_sections() {
        let err = BackupCodec::import(r#"{"accounts": []}"#).unwrap_err();
        assert!(matches!(err, TrackerError::MalformedDocument(ref m) if m.contains("records")));
    }

    #[test]
    fn import_rejects_non_sequence_sections() {
        let err = BackupCodec::import(r#"{"accounts": {}, "records": []}"#).unwrap_err();
        assert!(matches!(err, TrackerError::MalformedDocument(ref m) if m.contains("accounts")));
    }

    #[test]
    fn import_rejects_invalid_json() {
        assert!(matches!(
            BackupCodec::import("not json"),
            Err(TrackerError::MalformedDocument(_))
        ));
    }

    #[test]
    fn duplicate_dates_collapse_to_last_entry() {
        let document = r#"{
            "accounts": [],
            "records": [
                {"date": "2024-01-01", "assets": {"a": 1}},
                {"date": "2024-01-01", "assets": {"a": 2}}
            ]
        }"#;
        let dataset = BackupCodec::import(document).unwrap();
        assert_eq!(dataset.records.len(), 1);
        assert_eq!(dataset.records[0].total(), 2);
    }

    #[test]
    fn import_rejects_balances_above_maximum() {
        let document = r#"{
            "accounts": [],
            "records": [
                {"date": "2024-01-01", "assets": {"a": 18446744073709551615, "b": 1}}
            ]
        }"#;
        let err = BackupCodec::import(document).unwrap_err();
        assert!(matches!(err, TrackerError::MalformedDocument(ref m) if m.contains("exceeds")));
    }

    #[test]
    fn deleted_accounts_import_as_inactive() {
        let document = r#"{
            "accounts": [{"id": "acc_9", "name": "Closed", "deleted": true}],
            "records": []
        }"#;
        let dataset = BackupCodec::import(document).unwrap();
        let account = &dataset.accounts[0];
        assert!(account.deleted);
        assert!(!account.active);
    }

    #[test]
    fn export_file_name_embeds_date() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(
            BackupCodec::export_file_name("asset-tracker-backup", today),
            "asset-tracker-backup-20240307.json"
        );
    }
}
