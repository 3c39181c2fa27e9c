use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::core::{
    services::TimeWindow,
    utils::{ensure_dir, write_atomic, PathResolver},
};
use crate::errors::{Result, TrackerError};

const DEFAULT_EXPORT_PREFIX: &str = "asset-tracker-backup";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub currency_symbol: String,
    #[serde(default)]
    pub default_window: TimeWindow,
    #[serde(default = "default_export_prefix")]
    pub export_prefix: String,
}

fn default_export_prefix() -> String {
    DEFAULT_EXPORT_PREFIX.into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: "$".into(),
            default_window: TimeWindow::All,
            export_prefix: default_export_prefix(),
        }
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    /// Stored configuration, or the defaults when none was saved.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| {
            TrackerError::Config(format!("{}: {}", self.path.display(), err))
        })
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        assert_eq!(manager.load().unwrap(), Config::default());
    }

    #[test]
    fn saved_config_is_loaded_back() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let config = Config {
            currency_symbol: "NT$".into(),
            default_window: TimeWindow::SixMonths,
            ..Config::default()
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        fs::write(
            manager.path(),
            r#"{"locale": "zh-TW", "currency_symbol": "NT$", "default_window": "1y"}"#,
        )
        .unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.currency_symbol, "NT$");
        assert_eq!(config.default_window, TimeWindow::OneYear);
        assert_eq!(config.export_prefix, DEFAULT_EXPORT_PREFIX);
    }

    #[test]
    fn corrupt_config_is_reported() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        fs::write(manager.path(), "[]").unwrap();
        assert!(matches!(manager.load(), Err(TrackerError::Config(_))));
    }
}
