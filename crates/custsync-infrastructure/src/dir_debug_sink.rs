//! Debug sink writing artifacts into a per-run directory.

use async_trait::async_trait;
use custsync_core::Result;
use custsync_core::debug::{DebugBlob, DebugSink};
use std::path::{Path, PathBuf};

use crate::paths::CustsyncPaths;

/// Writes each blob to `<data_dir>/debug/<run_id>/<name>`.
pub struct DirDebugSink {
    dir: PathBuf,
}

impl DirDebugSink {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn for_run(paths: &CustsyncPaths, run_id: &str) -> Self {
        Self::new(paths.debug_dir(run_id))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_name(name: &str, blob: &DebugBlob) -> String {
        let mut file_name: String = name
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        if !file_name.contains('.') {
            let extension = match blob.content_type.as_str() {
                "image/png" => "png",
                "text/html" => "html",
                "application/json" => "json",
                _ => "bin",
            };
            file_name.push('.');
            file_name.push_str(extension);
        }
        file_name
    }
}

#[async_trait]
impl DebugSink for DirDebugSink {
    async fn put(&self, name: &str, blob: DebugBlob) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.dir.join(Self::file_name(name, &blob));
        tokio::fs::write(&path, &blob.bytes).await?;

        tracing::info!(path = %path.display(), bytes = blob.bytes.len(), "Saved debug artifact");
        Ok(())
    }
}
