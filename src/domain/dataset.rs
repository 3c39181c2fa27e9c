use serde::{Deserialize, Serialize};

use super::{
    account::{Account, AccountCategory, AccountId},
    record::Record,
};

/// The unit of persistence and of import/export: every account and every record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dataset {
    pub accounts: Vec<Account>,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn empty() -> Self {
        Self {
            accounts: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Starting state when nothing has been stored yet: three bank accounts, no records.
    pub fn seeded() -> Self {
        let seeds = [
            ("acc_1", "Post Office"),
            ("acc_2", "Taishin Bank"),
            ("acc_3", "CTBC Bank"),
        ];
        Self {
            accounts: seeds
                .into_iter()
                .map(|(id, name)| Account::with_id(AccountId::new(id), name, AccountCategory::Bank))
                .collect(),
            records: Vec::new(),
        }
    }

    pub fn account(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.iter().find(|account| &account.id == id)
    }

    pub fn account_mut(&mut self, id: &AccountId) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|account| &account.id == id)
    }

    pub fn record(&self, date: chrono::NaiveDate) -> Option<&Record> {
        self.records.iter().find(|record| record.date == date)
    }

    /// Record with the greatest date.
    pub fn latest_record(&self) -> Option<&Record> {
        self.records.iter().max_by_key(|record| record.date)
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::seeded()
    }
}
