//! Persistence-friendly data model: accounts, dated snapshots and the dataset holding both.

pub mod account;
pub mod dataset;
pub mod record;

pub use account::{Account, AccountCategory, AccountId, AccountStatus};
pub use dataset::Dataset;
pub use record::{parse_amount, AssetMap, Record, RecordDraft, MAX_AMOUNT};
