//! File-based CookieSource implementation.

use async_trait::async_trait;
use custsync_core::session::{CookieSource, SessionCookie};
use custsync_core::{CustsyncError, Result};
use std::path::Path;

use crate::paths::CustsyncPaths;

/// Reads cookie exports saved as JSON arrays.
///
/// Directory structure:
/// ```text
/// cookie_stores/
/// └── <cookie_store_id>/
///     └── cookies.json   # array in the browser-extension export format
/// ```
pub struct JsonCookieSource {
    paths: CustsyncPaths,
}

impl JsonCookieSource {
    pub fn new(paths: CustsyncPaths) -> Self {
        Self { paths }
    }

    /// Copies a cookie export into the named store, validating it parses.
    ///
    /// # Returns
    ///
    /// The number of cookies imported.
    pub async fn import(&self, cookie_store_id: &str, export_file: &Path) -> Result<usize> {
        let content = tokio::fs::read_to_string(export_file).await?;
        let cookies: Vec<SessionCookie> = serde_json::from_str(&content)?;

        let target = self.paths.cookie_file(cookie_store_id);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, content).await?;

        tracing::info!(
            cookie_store_id,
            count = cookies.len(),
            "Imported cookie export"
        );
        Ok(cookies.len())
    }
}

#[async_trait]
impl CookieSource for JsonCookieSource {
    async fn load(&self, cookie_store_id: &str) -> Result<Option<Vec<SessionCookie>>> {
        let path = self.paths.cookie_file(cookie_store_id);

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No cookie file");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        let cookies: Vec<SessionCookie> = serde_json::from_str(&content).map_err(|e| {
            CustsyncError::data_access(format!(
                "Invalid cookie file {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!(count = cookies.len(), "Loaded cookies");
        Ok(Some(cookies))
    }
}
