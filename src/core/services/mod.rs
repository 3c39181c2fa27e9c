pub mod account_registry;
pub mod aggregation;
pub mod allocation;
pub mod record_store;

pub use account_registry::AccountRegistry;
pub use aggregation::{AggregationEngine, Dated, Delta, Series, SeriesPoint, TimeWindow, Trend};
pub use allocation::{AllocationBuilder, BreakdownEntry, HistoryPoint, LegendEntry, PALETTE};
pub use record_store::RecordStore;

pub type ServiceResult<T> = crate::errors::Result<T>;
