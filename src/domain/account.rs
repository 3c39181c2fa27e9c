use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, stable account identifier.
///
/// Ids generated by this crate look like `acc_<hex>`, but imported documents may
/// carry any string, so the value is never parsed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Generates a fresh identifier that cannot collide with existing ones.
    pub fn generate() -> Self {
        Self(format!("acc_{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Classification tag attached to an account.
///
/// Unrecognised tags from imported documents are kept verbatim in `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccountCategory {
    Bank,
    Investment,
    Cash,
    Other,
    Custom(String),
}

impl AccountCategory {
    pub fn as_str(&self) -> &str {
        match self {
            AccountCategory::Bank => "bank",
            AccountCategory::Investment => "investment",
            AccountCategory::Cash => "cash",
            AccountCategory::Other => "other",
            AccountCategory::Custom(tag) => tag,
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "bank" => AccountCategory::Bank,
            "investment" => AccountCategory::Investment,
            "cash" => AccountCategory::Cash,
            "other" => AccountCategory::Other,
            _ => AccountCategory::Custom(raw.to_string()),
        }
    }
}

impl Default for AccountCategory {
    fn default() -> Self {
        AccountCategory::Bank
    }
}

impl From<String> for AccountCategory {
    fn from(value: String) -> Self {
        match value.as_str() {
            "bank" => AccountCategory::Bank,
            "investment" => AccountCategory::Investment,
            "cash" => AccountCategory::Cash,
            "other" => AccountCategory::Other,
            _ => AccountCategory::Custom(value),
        }
    }
}

impl From<AccountCategory> for String {
    fn from(value: AccountCategory) -> Self {
        match value {
            AccountCategory::Custom(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for AccountCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named bucket of money tracked over time.
///
/// `active` and `deleted` are independent flags with the rule `deleted => !active`,
/// which also holds for deserialized accounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "StoredAccount")]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub category: AccountCategory,
    pub active: bool,
    pub deleted: bool,
}

#[derive(Deserialize)]
struct StoredAccount {
    id: AccountId,
    name: String,
    #[serde(default)]
    category: AccountCategory,
    #[serde(default = "default_active")]
    active: bool,
    #[serde(default)]
    deleted: bool,
}

fn default_active() -> bool {
    true
}

impl From<StoredAccount> for Account {
    fn from(stored: StoredAccount) -> Self {
        Self {
            id: stored.id,
            name: stored.name,
            category: stored.category,
            active: stored.active && !stored.deleted,
            deleted: stored.deleted,
        }
    }
}

impl Account {
    /// Creates an active account with a freshly generated id.
    pub fn new(name: impl Into<String>, category: AccountCategory) -> Self {
        Self::with_id(AccountId::generate(), name, category)
    }

    pub fn with_id(id: AccountId, name: impl Into<String>, category: AccountCategory) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            active: true,
            deleted: false,
        }
    }

    /// Usable for new records.
    pub fn is_selectable(&self) -> bool {
        self.active && !self.deleted
    }

    pub fn status(&self) -> Option<AccountStatus> {
        if self.deleted {
            Some(AccountStatus::Deleted)
        } else if !self.active {
            Some(AccountStatus::Inactive)
        } else {
            None
        }
    }
}

/// Label shown next to accounts that are no longer in active use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    Inactive,
    Deleted,
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountStatus::Inactive => f.write_str("inactive"),
            AccountStatus::Deleted => f.write_str("deleted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = AccountId::generate();
        let b = AccountId::generate();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("acc_"));
    }

    #[test]
    fn unknown_category_survives_serialization() {
        let category: AccountCategory = serde_json::from_str("\"crypto\"").unwrap();
        assert_eq!(category, AccountCategory::Custom("crypto".into()));
        assert_eq!(serde_json::to_string(&category).unwrap(), "\"crypto\"");
    }

    #[test]
    fn missing_flags_default_to_active() {
        let account: Account =
            serde_json::from_str(r#"{"id":"acc_1","name":"Post Office","category":"bank"}"#)
                .unwrap();
        assert!(account.active);
        assert!(!account.deleted);
        assert_eq!(account.status(), None);
    }

    #[test]
    fn deleted_flag_forces_inactive_on_load() {
        let account: Account = serde_json::from_str(
            r#"{"id":"acc_2","name":"Old","active":true,"deleted":true}"#,
        )
        .unwrap();
        assert!(!account.active);
        assert!(!account.is_selectable());
        assert_eq!(account.status(), Some(AccountStatus::Deleted));
    }
}
