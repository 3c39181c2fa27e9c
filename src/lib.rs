#![doc(test(attr(deny(warnings))))]

//! Asset Tracker Core records dated balance snapshots per account and derives
//! totals, time-filtered trends and allocation breakdowns from them.

pub mod cli;
pub mod config;
pub mod connectivity;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Asset tracker tracing initialized.");
    });
}
