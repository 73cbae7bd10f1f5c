//! Application configuration.
//!
//! Loaded from `config.toml` in the config directory; every field has a
//! default so a missing file is not an error. CLI flags are applied on top
//! through [`ConfigOverrides`].

use chrono::NaiveDate;
use custsync_core::browser::DownloadStrategy;
use custsync_core::record::{LocationPeriod, StoreContext};
use custsync_core::{CustsyncError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::paths::CustsyncPaths;
use crate::storage::AtomicTomlFile;

pub const DEFAULT_URL_TEMPLATE: &str = "https://merchants.ubereats.com/manager/home/{store_id}/analytics/customers/?dateRangePreset={period_preset}";
pub const DEFAULT_PERIOD_PRESET: &str = "last_12_weeks";

/// Root of `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Selects the cookie store to read the captured session from.
    pub cookie_store_id: String,
    /// Target merchant store.
    pub store_id: String,
    /// Label stored on every record.
    pub store_name: String,
    /// Passed to the browser driver.
    pub headless: bool,
    /// Enables screenshot/HTML capture into the debug sink.
    pub debug_mode: bool,
    pub dashboard: DashboardConfig,
    pub download: DownloadStrategy,
    pub paths: PathsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cookie_store_id: "default".to_string(),
            store_id: String::new(),
            store_name: String::new(),
            headless: true,
            debug_mode: false,
            dashboard: DashboardConfig::default(),
            download: DownloadStrategy::default(),
            paths: PathsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Customer analytics URL; `{store_id}` and `{period_preset}` are substituted.
    pub url_template: String,
    pub period_preset: String,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
    /// Lower bound of the random wait after navigation, in milliseconds.
    pub settle_min_ms: u64,
    /// Upper bound of the random wait after navigation, in milliseconds.
    pub settle_max_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            period_preset: DEFAULT_PERIOD_PRESET.to_string(),
            period_start: None,
            period_end: None,
            settle_min_ms: 2000,
            settle_max_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Overrides the platform data directory.
    pub data_dir: Option<PathBuf>,
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub cookie_store_id: Option<String>,
    pub store_id: Option<String>,
    pub store_name: Option<String>,
    pub headless: Option<bool>,
    pub debug_mode: Option<bool>,
    pub period_preset: Option<String>,
    pub data_dir: Option<PathBuf>,
}

impl ConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self.cookie_store_id.is_none()
            && self.store_id.is_none()
            && self.store_name.is_none()
            && self.headless.is_none()
            && self.debug_mode.is_none()
            && self.period_preset.is_none()
            && self.data_dir.is_none()
    }
}

impl AppConfig {
    /// Applies command-line overrides in place.
    pub fn apply(&mut self, overrides: &ConfigOverrides) {
        if let Some(v) = &overrides.cookie_store_id {
            self.cookie_store_id = v.clone();
        }
        if let Some(v) = &overrides.store_id {
            self.store_id = v.clone();
        }
        if let Some(v) = &overrides.store_name {
            self.store_name = v.clone();
        }
        if let Some(v) = overrides.headless {
            self.headless = v;
        }
        if let Some(v) = overrides.debug_mode {
            self.debug_mode = v;
        }
        if let Some(v) = &overrides.period_preset {
            self.dashboard.period_preset = v.clone();
        }
        if let Some(v) = &overrides.data_dir {
            self.paths.data_dir = Some(v.clone());
        }
    }

    /// Checks the fields a run cannot do without.
    pub fn validate(&self) -> Result<()> {
        if self.store_id.trim().is_empty() {
            return Err(CustsyncError::config(
                "store_id is not set (config.toml or --store-id)",
            ));
        }
        if self.cookie_store_id.trim().is_empty() {
            return Err(CustsyncError::config("cookie_store_id must not be empty"));
        }
        if self.dashboard.settle_min_ms > self.dashboard.settle_max_ms {
            return Err(CustsyncError::config(
                "dashboard.settle_min_ms must not exceed dashboard.settle_max_ms",
            ));
        }
        if let (Some(start), Some(end)) = (self.dashboard.period_start, self.dashboard.period_end)
            && start > end
        {
            return Err(CustsyncError::config(
                "dashboard.period_start must not be after dashboard.period_end",
            ));
        }
        Ok(())
    }

    pub fn store_context(&self) -> StoreContext {
        StoreContext {
            store_id: self.store_id.clone(),
            store_name: self.store_name.clone(),
        }
    }

    pub fn location_period(&self) -> LocationPeriod {
        LocationPeriod {
            preset: self.dashboard.period_preset.clone(),
            start: self.dashboard.period_start,
            end: self.dashboard.period_end,
        }
    }

    /// Renders the dashboard URL for this store.
    pub fn target_url(&self) -> String {
        self.dashboard
            .url_template
            .replace("{store_id}", &self.store_id)
            .replace("{period_preset}", &self.dashboard.period_preset)
    }

    /// Resolves paths, honouring `paths.data_dir`.
    pub fn resolve_paths(&self, base: CustsyncPaths) -> CustsyncPaths {
        match &self.paths.data_dir {
            Some(dir) => base.with_data_dir(dir.clone()),
            None => base,
        }
    }
}

/// Commented template written by `custsync config init`.
pub const CONFIG_TEMPLATE: &str = r#"# custsync configuration

cookie_store_id = "default"
store_id = ""
store_name = ""
headless = true
debug_mode = false

[dashboard]
url_template = "https://merchants.ubereats.com/manager/home/{store_id}/analytics/customers/?dateRangePreset={period_preset}"
period_preset = "last_12_weeks"
# period_start = "2024-01-01"
# period_end = "2024-03-24"
settle_min_ms = 2000
settle_max_ms = 5000

[download]
# "positional" triggers the first `count` export buttons,
# "section_labels" triggers the button under each heading in `labels`.
strategy = "positional"
count = 2

[paths]
# data_dir = "/var/lib/custsync"
"#;

/// Renders `config` as TOML.
pub fn render(config: &AppConfig) -> Result<String> {
    Ok(toml::to_string_pretty(config)?)
}

/// Loads and writes `config.toml`.
pub struct ConfigService {
    file: AtomicTomlFile<AppConfig>,
}

impl ConfigService {
    pub fn new(paths: &CustsyncPaths) -> Self {
        Self::at(paths.config_file())
    }

    /// Uses an explicit config file path (`--config`).
    pub fn at(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        self.file.path()
    }

    /// Loads the config, falling back to defaults when the file is absent.
    pub fn load(&self) -> Result<AppConfig> {
        let config = self.file.load()?;
        match config {
            Some(config) => {
                tracing::debug!(path = %self.file.path().display(), "Loaded configuration");
                Ok(config)
            }
            None => {
                tracing::debug!(
                    path = %self.file.path().display(),
                    "No configuration file, using defaults"
                );
                Ok(AppConfig::default())
            }
        }
    }

    /// Writes the commented template unless a config already exists.
    ///
    /// # Returns
    ///
    /// `true` if the file was written, `false` if it already existed.
    pub fn init_template(&self, force: bool) -> Result<bool> {
        if self.file.path().exists() && !force {
            return Ok(false);
        }
        self.file.save_raw(CONFIG_TEMPLATE)?;
        Ok(true)
    }

    /// Writes `config` atomically.
    pub fn save(&self, config: &AppConfig) -> Result<()> {
        self.file.save(config)?;
        Ok(())
    }
}
