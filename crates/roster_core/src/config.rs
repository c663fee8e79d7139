//! Runtime configuration for roster hosts.
//!
//! Defaults match the browser roster: key `participants`, 30 s auto refresh,
//! 10 rows per page.

use crate::logging::default_log_level;
use crate::service::auto_refresh::DEFAULT_AUTO_REFRESH_INTERVAL;
use crate::service::list_view::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
use crate::store::participant_store::DEFAULT_STORAGE_KEY;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterConfig {
    pub storage_key: String,
    pub auto_refresh_interval: Duration,
    pub default_page_size: usize,
    pub page_size_options: Vec<usize>,
    pub database_path: Option<PathBuf>,
    pub log_level: String,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            auto_refresh_interval: DEFAULT_AUTO_REFRESH_INTERVAL,
            default_page_size: DEFAULT_PAGE_SIZE,
            page_size_options: PAGE_SIZE_OPTIONS.to_vec(),
            database_path: None,
            log_level: default_log_level().to_string(),
        }
    }
}

impl RosterConfig {
    /// Defaults overlaid with `ROSTER_*` environment variables.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`RosterConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let mut config = Self::default();

        if let Some(key) = lookup("ROSTER_STORAGE_KEY") {
            config.storage_key = key;
        }
        if let Some(secs) = lookup("ROSTER_AUTO_REFRESH_SECS") {
            let secs = secs
                .trim()
                .parse::<u64>()
                .map_err(|e| format!("ROSTER_AUTO_REFRESH_SECS: {e}"))?;
            config.auto_refresh_interval = Duration::from_secs(secs);
        }
        if let Some(size) = lookup("ROSTER_PAGE_SIZE") {
            config.default_page_size = size
                .trim()
                .parse::<usize>()
                .map_err(|e| format!("ROSTER_PAGE_SIZE: {e}"))?;
        }
        if let Some(options) = lookup("ROSTER_PAGE_SIZE_OPTIONS") {
            config.page_size_options = options
                .split(',')
                .map(|option| option.trim().parse::<usize>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| format!("ROSTER_PAGE_SIZE_OPTIONS: {e}"))?;
        }
        if let Some(path) = lookup("ROSTER_DB_PATH") {
            config.database_path = Some(PathBuf::from(path));
        }
        if let Some(level) = lookup("ROSTER_LOG_LEVEL") {
            config.log_level = level;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.storage_key.trim().is_empty() {
            return Err("storage_key cannot be empty".to_string());
        }
        if self.auto_refresh_interval.is_zero() {
            return Err("auto_refresh_interval must be greater than zero".to_string());
        }
        if self.default_page_size == 0 {
            return Err("default_page_size must be greater than zero".to_string());
        }
        if self.page_size_options.is_empty() || self.page_size_options.contains(&0) {
            return Err("page_size_options must be non-empty and greater than zero".to_string());
        }
        if !self.page_size_options.contains(&self.default_page_size) {
            return Err(format!(
                "default_page_size {} is not one of page_size_options {:?}",
                self.default_page_size, self.page_size_options
            ));
        }
        Ok(())
    }

    /// Accepts `page_size` only when it is one of `page_size_options`.
    pub fn check_page_size(&self, page_size: usize) -> Result<usize, String> {
        if self.page_size_options.contains(&page_size) {
            Ok(page_size)
        } else {
            Err(format!(
                "page size {page_size} is not available; choose one of {:?}",
                self.page_size_options
            ))
        }
    }
}
