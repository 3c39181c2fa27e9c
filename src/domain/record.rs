use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

use super::account::AccountId;

/// Balances keyed by account id, iterated in id order.
pub type AssetMap = BTreeMap<AccountId, u64>;

/// Largest balance a single entry may hold: the biggest integer a JSON number
/// carries exactly in every consumer of a backup document.
pub const MAX_AMOUNT: u64 = 9_007_199_254_740_991;

/// A dated snapshot of balances. At most one record exists per date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    pub date: NaiveDate,
    #[serde(default)]
    pub assets: AssetMap,
}

impl Record {
    pub fn new(date: NaiveDate, assets: AssetMap) -> Self {
        Self { date, assets }
    }

    /// Sum of every balance in the snapshot, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.assets
            .values()
            .fold(0u64, |sum, value| sum.saturating_add(*value))
    }

    /// First account whose balance is above [`MAX_AMOUNT`].
    pub fn oversized_entry(&self) -> Option<(&AccountId, u64)> {
        self.assets
            .iter()
            .find(|(_, value)| **value > MAX_AMOUNT)
            .map(|(id, value)| (id, *value))
    }

    /// Balance for one account, 0 when the account is absent.
    pub fn value_of(&self, id: &AccountId) -> u64 {
        self.assets.get(id).copied().unwrap_or(0)
    }
}

/// Unvalidated record input as typed into a form.
///
/// Amounts stay raw strings until [`RecordDraft::into_record`] cleans them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDraft {
    pub date: NaiveDate,
    pub amounts: Vec<(AccountId, String)>,
}

impl RecordDraft {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            amounts: Vec::new(),
        }
    }

    pub fn amount(mut self, id: impl Into<AccountId>, raw: impl ToString) -> Self {
        self.set(id, raw);
        self
    }

    /// Sets the raw input for an account, replacing an earlier entry.
    pub fn set(&mut self, id: impl Into<AccountId>, raw: impl ToString) {
        let id = id.into();
        let raw = raw.to_string();
        match self.amounts.iter_mut().find(|(existing, _)| *existing == id) {
            Some(entry) => entry.1 = raw,
            None => self.amounts.push((id, raw)),
        }
    }

    pub fn raw_for(&self, id: &AccountId) -> Option<&str> {
        self.amounts
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, raw)| raw.as_str())
    }

    /// Drops zero, negative and non-numeric entries. Fails when nothing is left or
    /// when an amount is above [`MAX_AMOUNT`].
    pub fn into_record(self) -> Result<Record, ValidationError> {
        let mut assets = AssetMap::new();
        for (id, raw) in self.amounts {
            let value = parse_amount(&raw);
            if value <= 0 {
                continue;
            }
            let value = value.unsigned_abs();
            if value > MAX_AMOUNT {
                return Err(ValidationError::AmountTooLarge {
                    account: id.to_string(),
                    max: MAX_AMOUNT,
                });
            }
            assets.insert(id, value);
        }
        if assets.is_empty() {
            return Err(ValidationError::NoPositiveAmounts);
        }
        Ok(Record::new(self.date, assets))
    }
}

impl From<Record> for RecordDraft {
    fn from(record: Record) -> Self {
        Self {
            date: record.date,
            amounts: record
                .assets
                .into_iter()
                .map(|(id, value)| (id, value.to_string()))
                .collect(),
        }
    }
}

/// Reads the leading integer of a form value.
///
/// Whitespace is trimmed and an optional sign accepted; parsing stops at the first
/// non-digit. Input without leading digits reads as 0. Overflow saturates.
pub fn parse_amount(raw: &str) -> i64 {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let mut value: i64 = 0;
    for ch in digits.chars() {
        let Some(digit) = ch.to_digit(10) else {
            break;
        };
        value = value.saturating_mul(10).saturating_add(i64::from(digit));
    }
    if negative {
        -value
    } else {
        value
    }
}
