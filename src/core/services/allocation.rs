use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::{AccountCategory, AccountId, Dataset};

use super::aggregation::{AggregationEngine, Dated, TimeWindow};

/// Fixed colour cycle for allocation slices.
pub const PALETTE: [&str; 10] = [
    "#10b981", "#3b82f6", "#f59e0b", "#ef4444", "#8b5cf6", "#06b6d4", "#84cc16", "#f97316",
    "#ec4899", "#14b8a6",
];

/// One account's share of the latest snapshot, before percentages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownEntry {
    pub account_id: AccountId,
    pub name: String,
    pub value: u64,
    pub category: AccountCategory,
}

/// A legend row: breakdown entry with its percentage and a colour that does not
/// depend on the legend's sort order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub account_id: AccountId,
    pub name: String,
    pub value: u64,
    pub category: AccountCategory,
    pub percent: f64,
    pub color: &'static str,
}

/// One account's balance on a record date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub value: u64,
}

impl Dated for HistoryPoint {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

pub struct AllocationBuilder;

impl AllocationBuilder {
    /// Per-account values of the newest record, in account-list order, with ids
    /// that have no account last.
    ///
    /// Deleted and inactive accounts are included; the allocation reflects what
    /// was recorded. Ids without an account fall back to the raw id and `other`.
    pub fn latest_snapshot_breakdown(dataset: &Dataset) -> Vec<BreakdownEntry> {
        let Some(latest) = dataset.latest_record() else {
            return Vec::new();
        };
        let position = |id: &AccountId| {
            dataset
                .accounts
                .iter()
                .position(|account| &account.id == id)
                .unwrap_or(usize::MAX)
        };
        let mut entries: Vec<(&AccountId, &u64)> = latest
            .assets
            .iter()
            .filter(|(_, value)| **value > 0)
            .collect();
        entries.sort_by_key(|(id, _)| position(*id));
        entries
            .into_iter()
            .map(|(id, value)| match dataset.account(id) {
                Some(account) => BreakdownEntry {
                    account_id: id.clone(),
                    name: account.name.clone(),
                    value: *value,
                    category: account.category.clone(),
                },
                None => {
                    warn!(%id, date = %latest.date, "record references unknown account");
                    BreakdownEntry {
                        account_id: id.clone(),
                        name: id.to_string(),
                        value: *value,
                        category: AccountCategory::Other,
                    }
                }
            })
            .collect()
    }

    /// Percent shares sorted by value descending (ties keep breakdown order).
    /// Colours are picked by breakdown position before sorting.
    pub fn percentages_of(breakdown: &[BreakdownEntry]) -> Vec<LegendEntry> {
        let sum = breakdown
            .iter()
            .fold(0u64, |sum, entry| sum.saturating_add(entry.value));
        let mut legend: Vec<LegendEntry> = breakdown
            .iter()
            .enumerate()
            .map(|(index, entry)| LegendEntry {
                account_id: entry.account_id.clone(),
                name: entry.name.clone(),
                value: entry.value,
                category: entry.category.clone(),
                percent: if sum > 0 {
                    entry.value as f64 / sum as f64 * 100.0
                } else {
                    0.0
                },
                color: PALETTE[index % PALETTE.len()],
            })
            .collect();
        legend.sort_by(|a, b| b.value.cmp(&a.value));
        legend
    }

    /// The account's balance on every record date (0 where absent), filtered by window.
    pub fn account_history(
        dataset: &Dataset,
        account_id: &AccountId,
        window: TimeWindow,
        today: NaiveDate,
    ) -> Vec<HistoryPoint> {
        let history: Vec<HistoryPoint> = AggregationEngine::series(&dataset.records)
            .iter()
            .map(|point| HistoryPoint {
                date: point.date,
                value: point.assets.get(account_id).copied().unwrap_or(0),
            })
            .collect();
        debug!(%account_id, %window, points = history.len(), "account history built");
        AggregationEngine::filter_by_window(history, window, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::{AccountRegistry, RecordStore};
    use crate::domain::{Account, RecordDraft};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(id: &str, value: u64) -> BreakdownEntry {
        BreakdownEntry {
            account_id: AccountId::new(id),
            name: id.to_uppercase(),
            value,
            category: AccountCategory::Bank,
        }
    }

    #[test]
    fn breakdown_uses_newest_record_only() {
        let mut dataset = Dataset::seeded();
        RecordStore::upsert(
            &mut dataset,
            RecordDraft::new(date(2024, 2, 1)).amount("acc_2", 50),
        )
        .unwrap();
        RecordStore::upsert(
            &mut dataset,
            RecordDraft::new(date(2024, 1, 1)).amount("acc_1", 10),
        )
        .unwrap();

        let breakdown = AllocationBuilder::latest_snapshot_breakdown(&dataset);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].name, "Taishin Bank");
        assert_eq!(breakdown[0].value, 50);
    }

    #[test]
    fn breakdown_keeps_deleted_accounts_and_unknown_ids() {
        let mut dataset = Dataset::seeded();
        RecordStore::upsert(
            &mut dataset,
            RecordDraft::new(date(2024, 1, 1))
                .amount("acc_1", 10)
                .amount("ghost", 5),
        )
        .unwrap();
        AccountRegistry::soft_delete(&mut dataset, &AccountId::new("acc_1"));

        let breakdown = AllocationBuilder::latest_snapshot_breakdown(&dataset);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].name, "Post Office");
        assert_eq!(breakdown[1].name, "ghost");
        assert_eq!(breakdown[1].category, AccountCategory::Other);
    }

    #[test]
    fn breakdown_follows_account_list_order() {
        let mut dataset = Dataset::empty();
        dataset.accounts = vec![
            Account::with_id("z_first".into(), "Zeta", AccountCategory::Bank),
            Account::with_id("a_second".into(), "Alpha", AccountCategory::Cash),
        ];
        RecordStore::upsert(
            &mut dataset,
            RecordDraft::new(date(2024, 1, 1))
                .amount("a_second", 10)
                .amount("stale", 3)
                .amount("z_first", 20),
        )
        .unwrap();

        let breakdown = AllocationBuilder::latest_snapshot_breakdown(&dataset);
        let names: Vec<&str> = breakdown.iter().map(|entry| entry.name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "stale"]);

        let legend = AllocationBuilder::percentages_of(&breakdown);
        assert_eq!(legend[0].name, "Zeta");
        assert_eq!(legend[0].color, PALETTE[0]);
        assert_eq!(legend[1].color, PALETTE[1]);
    }

    #[test]
    fn oversized_values_do_not_overflow_percentages() {
        let breakdown = vec![entry("a", u64::MAX), entry("b", 1)];
        let legend = AllocationBuilder::percentages_of(&breakdown);
        assert_eq!(legend[0].name, "A");
        assert!(legend.iter().all(|row| row.percent.is_finite()));
    }

    #[test]
    fn breakdown_of_empty_dataset_is_empty() {
        assert!(AllocationBuilder::latest_snapshot_breakdown(&Dataset::seeded()).is_empty());
    }

    #[test]
    fn legend_sorts_by_value_but_colours_follow_breakdown_order() {
        let breakdown = vec![entry("a", 10), entry("b", 30), entry("c", 20)];
        let legend = AllocationBuilder::percentages_of(&breakdown);

        let names: Vec<&str> = legend.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A"]);
        assert_eq!(legend[0].color, PALETTE[1]);
        assert_eq!(legend[1].color, PALETTE[2]);
        assert_eq!(legend[2].color, PALETTE[0]);
    }

    #[test]
    fn legend_ties_keep_original_order() {
        let breakdown = vec![entry("a", 5), entry("b", 5), entry("c", 5)];
        let legend = AllocationBuilder::percentages_of(&breakdown);
        let names: Vec<&str> = legend.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn legend_percentages_sum_to_hundred() {
        let breakdown = vec![entry("a", 1), entry("b", 1), entry("c", 1), entry("d", 7)];
        let legend = AllocationBuilder::percentages_of(&breakdown);
        let sum: f64 = legend.iter().map(|row| row.percent).sum();
        assert!((sum - 100.0).abs() <= 0.1, "sum was {sum}");
    }

    #[test]
    fn colours_cycle_through_palette() {
        let breakdown: Vec<BreakdownEntry> =
            (0..12).map(|i| entry(&format!("a{i:02}"), 1)).collect();
        let legend = AllocationBuilder::percentages_of(&breakdown);
        assert_eq!(legend[10].color, PALETTE[0]);
        assert_eq!(legend[11].color, PALETTE[1]);
    }

    #[test]
    fn history_fills_missing_dates_with_zero_and_applies_window() {
        let mut dataset = Dataset::seeded();
        for (on, value) in [(date(2023, 1, 1), 5), (date(2024, 5, 1), 7)] {
            RecordStore::upsert(&mut dataset, RecordDraft::new(on).amount("acc_1", value))
                .unwrap();
        }
        RecordStore::upsert(
            &mut dataset,
            RecordDraft::new(date(2024, 6, 1)).amount("acc_2", 9),
        )
        .unwrap();

        let id = AccountId::new("acc_1");
        let today = date(2024, 6, 10);
        let all = AllocationBuilder::account_history(&dataset, &id, TimeWindow::All, today);
        let values: Vec<u64> = all.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![5, 7, 0]);

        let recent =
            AllocationBuilder::account_history(&dataset, &id, TimeWindow::SixMonths, today);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].date, date(2024, 5, 1));
    }
}
