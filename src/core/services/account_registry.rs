use tracing::{debug, info};

use crate::domain::{Account, AccountCategory, AccountId, Dataset};
use crate::errors::ValidationError;

use super::ServiceResult;

/// Manages the named accounts of a dataset. Accounts are never hard-removed.
pub struct AccountRegistry;

impl AccountRegistry {
    /// Adds an active account under a fresh id.
    pub fn add(
        dataset: &mut Dataset,
        name: &str,
        category: AccountCategory,
    ) -> ServiceResult<Account> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyAccountName.into());
        }
        let account = Account::new(name, category);
        dataset.accounts.push(account.clone());
        info!(id = %account.id, name = %account.name, "account added");
        Ok(account)
    }

    /// Flips `active`. Unknown and deleted accounts are left alone; returns whether
    /// anything changed.
    pub fn toggle_active(dataset: &mut Dataset, id: &AccountId) -> bool {
        match dataset.account_mut(id) {
            Some(account) if !account.deleted => {
                account.active = !account.active;
                info!(%id, active = account.active, "account toggled");
                true
            }
            Some(_) => {
                debug!(%id, "toggle ignored for deleted account");
                false
            }
            None => false,
        }
    }

    /// Hides the account from every listing while keeping it resolvable for history.
    pub fn soft_delete(dataset: &mut Dataset, id: &AccountId) -> bool {
        match dataset.account_mut(id) {
            Some(account) if !account.deleted => {
                account.deleted = true;
                account.active = false;
                info!(%id, "account soft-deleted");
                true
            }
            _ => false,
        }
    }

    pub fn visible(dataset: &Dataset) -> Vec<&Account> {
        dataset
            .accounts
            .iter()
            .filter(|account| !account.deleted)
            .collect()
    }

    /// Accounts offered in new-record forms.
    pub fn selectable(dataset: &Dataset) -> Vec<&Account> {
        dataset
            .accounts
            .iter()
            .filter(|account| account.is_selectable())
            .collect()
    }

    pub fn inactive(dataset: &Dataset) -> Vec<&Account> {
        dataset
            .accounts
            .iter()
            .filter(|account| !account.deleted && !account.active)
            .collect()
    }

    /// Display name for an id, falling back to the raw id for stale references.
    pub fn display_name(dataset: &Dataset, id: &AccountId) -> String {
        dataset
            .account(id)
            .map(|account| account.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}
