use chrono::NaiveDate;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::core::services::{
    AccountRegistry, AggregationEngine, AllocationBuilder, Delta, HistoryPoint, LegendEntry,
    RecordStore, Series, SeriesPoint, TimeWindow,
};
use crate::core::time::{Clock, SystemClock};
use crate::domain::{Account, AccountCategory, AccountId, Dataset, Record, RecordDraft};
use crate::errors::Result;
use crate::storage::{BackupCodec, ImportSummary, StorageBackend};

/// Everything the dashboard shows for one window selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub window: TimeWindow,
    pub latest_total: u64,
    pub points: Vec<SeriesPoint>,
    pub delta: Option<Delta>,
    pub legend: Vec<LegendEntry>,
}

/// Owns the dataset and writes it through to storage after every change.
///
/// Derived views are recomputed from the dataset on each call.
pub struct AssetTracker {
    dataset: Dataset,
    storage: Box<dyn StorageBackend>,
    clock: Box<dyn Clock>,
    last_save_error: Option<String>,
}

impl AssetTracker {
    /// Loads stored state, falling back to the seeded dataset when nothing is
    /// stored or the stored content cannot be parsed.
    pub fn open(storage: Box<dyn StorageBackend>) -> Self {
        Self::open_with_clock(storage, Box::new(SystemClock))
    }

    pub fn open_with_clock(storage: Box<dyn StorageBackend>, clock: Box<dyn Clock>) -> Self {
        let dataset = match storage.load() {
            Ok(Some(dataset)) => dataset,
            Ok(None) => {
                info!("no stored data, starting from defaults");
                Dataset::seeded()
            }
            Err(err) => {
                warn!(%err, "stored data unreadable, starting from defaults");
                Dataset::seeded()
            }
        };
        Self {
            dataset,
            storage,
            clock,
            last_save_error: None,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Message of the most recent failed write, cleared by the next successful one.
    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    pub fn add_account(&mut self, name: &str, category: AccountCategory) -> Result<Account> {
        let account = AccountRegistry::add(&mut self.dataset, name, category)?;
        self.persist();
        Ok(account)
    }

    pub fn toggle_account(&mut self, id: &AccountId) -> bool {
        let changed = AccountRegistry::toggle_active(&mut self.dataset, id);
        if changed {
            self.persist();
        }
        changed
    }

    pub fn delete_account(&mut self, id: &AccountId) -> bool {
        let changed = AccountRegistry::soft_delete(&mut self.dataset, id);
        if changed {
            self.persist();
        }
        changed
    }

    pub fn save_record(&mut self, draft: RecordDraft) -> Result<Record> {
        let record = RecordStore::upsert(&mut self.dataset, draft)?;
        self.persist();
        Ok(record)
    }

    pub fn update_record(
        &mut self,
        draft: RecordDraft,
        original_date: NaiveDate,
    ) -> Result<Record> {
        let record = RecordStore::update(&mut self.dataset, draft, original_date)?;
        self.persist();
        Ok(record)
    }

    pub fn delete_record(&mut self, date: NaiveDate) -> bool {
        let removed = RecordStore::remove(&mut self.dataset, date);
        if removed {
            self.persist();
        }
        removed
    }

    /// Replaces the whole dataset with the document's content. Confirmation is the
    /// caller's job; on failure nothing changes.
    pub fn import_document(&mut self, document: &str) -> Result<ImportSummary> {
        let imported = BackupCodec::import(document)?;
        let summary = BackupCodec::summary(&imported);
        self.dataset = imported;
        self.persist();
        info!(
            accounts = summary.accounts,
            records = summary.records,
            "dataset replaced from backup"
        );
        Ok(summary)
    }

    pub fn export_document(&self) -> Result<String> {
        BackupCodec::export(&self.dataset)
    }

    pub fn export_file_name(&self, prefix: &str) -> String {
        BackupCodec::export_file_name(prefix, self.today())
    }

    pub fn series(&self) -> Series<'_> {
        AggregationEngine::series(&self.dataset.records)
    }

    pub fn dashboard(&self, window: TimeWindow) -> DashboardView {
        let series = self.series();
        let points =
            AggregationEngine::filter_by_window(series.points(), window, self.today());
        let delta = AggregationEngine::delta(&points);
        let breakdown = AllocationBuilder::latest_snapshot_breakdown(&self.dataset);
        DashboardView {
            window,
            latest_total: series.latest_total(),
            points,
            delta,
            legend: AllocationBuilder::percentages_of(&breakdown),
        }
    }

    pub fn allocation(&self) -> Vec<LegendEntry> {
        let breakdown = AllocationBuilder::latest_snapshot_breakdown(&self.dataset);
        AllocationBuilder::percentages_of(&breakdown)
    }

    pub fn account_history(&self, id: &AccountId, window: TimeWindow) -> Vec<HistoryPoint> {
        AllocationBuilder::account_history(&self.dataset, id, window, self.today())
    }

    /// Draft for the add-record form, dated today.
    pub fn new_record_draft(&self) -> RecordDraft {
        RecordStore::prefilled_draft(&self.dataset, self.today())
    }

    fn persist(&mut self) {
        match self.storage.save(&self.dataset) {
            Ok(()) => self.last_save_error = None,
            Err(err) => {
                error!(%err, "failed to persist dataset");
                self.last_save_error = Some(err.to_string());
            }
        }
    }
}
