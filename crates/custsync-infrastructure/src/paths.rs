//! Unified path management for custsync files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/custsync/                     # Config directory
//! ├── config.toml                         # Application configuration
//! └── cookie_stores/
//!     └── <cookie_store_id>/cookies.json  # Captured cookie exports
//!
//! ~/.local/share/custsync/                # Data directory
//! ├── datasets/
//! │   └── <store_id>/
//! │       ├── trends.csv
//! │       └── locations.csv
//! ├── debug/
//! │   └── <run_id>/                       # Screenshots, HTML, unknown CSVs
//! └── logs/
//!     └── custsync.log.YYYY-MM-DD
//! ```
//!
//! A base directory override (tests, `paths.data_dir` in config) puts both
//! trees under that single directory.

use custsync_core::record::RecordKind;
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "custsync";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Path resolver rooted either at the platform directories or at a base
/// directory override.
#[derive(Debug, Clone)]
pub struct CustsyncPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl CustsyncPaths {
    /// Creates a resolver.
    ///
    /// # Arguments
    ///
    /// * `base_dir` - When set, config and data both live under this directory
    pub fn new(base_dir: Option<&Path>) -> Result<Self, PathError> {
        match base_dir {
            Some(base) => Ok(Self {
                config_dir: base.to_path_buf(),
                data_dir: base.to_path_buf(),
            }),
            None => Ok(Self {
                config_dir: Self::default_config_dir()?,
                data_dir: Self::default_data_dir()?,
            }),
        }
    }

    /// Returns the platform config directory (e.g., `~/.config/custsync/`).
    pub fn default_config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the platform data directory (e.g., `~/.local/share/custsync/`).
    pub fn default_data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns a copy whose data directory is `data_dir`.
    pub fn with_data_dir(mut self, data_dir: PathBuf) -> Self {
        self.data_dir = data_dir;
        self
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the path to the main configuration file.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Returns the directory holding all named cookie stores.
    pub fn cookie_stores_dir(&self) -> PathBuf {
        self.config_dir.join("cookie_stores")
    }

    /// Returns the cookie export file of one cookie store.
    pub fn cookie_file(&self, cookie_store_id: &str) -> PathBuf {
        self.cookie_stores_dir()
            .join(cookie_store_id)
            .join("cookies.json")
    }

    /// Returns the dataset directory of one merchant store.
    pub fn dataset_dir(&self, store_id: &str) -> PathBuf {
        self.data_dir.join("datasets").join(store_id)
    }

    /// Returns the CSV file backing one dataset.
    pub fn dataset_file(&self, store_id: &str, kind: RecordKind) -> PathBuf {
        self.dataset_dir(store_id).join(format!("{}.csv", kind))
    }

    /// Returns the debug artifact directory of one run.
    pub fn debug_dir(&self, run_id: &str) -> PathBuf {
        self.data_dir.join("debug").join(run_id)
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}
