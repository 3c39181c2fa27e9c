//! Online/offline signal. Purely informational: nothing in the tracker queues or
//! retries based on it.

use std::env;

const OFFLINE_ENV: &str = "ASSET_TRACKER_OFFLINE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityStatus {
    Online,
    Offline,
}

impl ConnectivityStatus {
    pub fn banner(self) -> Option<&'static str> {
        match self {
            ConnectivityStatus::Online => None,
            ConnectivityStatus::Offline => Some("Offline mode: data is saved locally"),
        }
    }
}

/// Source of connectivity reports.
pub trait ConnectivitySignal {
    fn status(&self) -> ConnectivityStatus;
}

/// Reads `ASSET_TRACKER_OFFLINE`; any non-empty value other than `0` means offline.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvConnectivity;

impl ConnectivitySignal for EnvConnectivity {
    fn status(&self) -> ConnectivityStatus {
        match env::var(OFFLINE_ENV) {
            Ok(value) if !value.is_empty() && value != "0" => ConnectivityStatus::Offline,
            _ => ConnectivityStatus::Online,
        }
    }
}
