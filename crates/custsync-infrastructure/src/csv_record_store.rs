//! CSV-backed RecordStore implementation.
//!
//! Each dataset is a single CSV file whose header row is the record's field
//! names. Batches are appended under an exclusive [`FileLock`]; the header
//! is written only when the file is new or empty.

use async_trait::async_trait;
use custsync_core::record::{DatasetRecord, RecordStore};
use custsync_core::{CustsyncError, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::paths::CustsyncPaths;
use crate::storage::FileLock;

/// Append-only dataset stored as a CSV file.
pub struct CsvRecordStore<R> {
    path: PathBuf,
    _phantom: PhantomData<fn() -> R>,
}

impl<R: DatasetRecord> CsvRecordStore<R> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    /// Opens the dataset of `R::KIND` for one merchant store.
    pub fn for_store(paths: &CustsyncPaths, store_id: &str) -> Self {
        Self::new(paths.dataset_file(store_id, R::KIND))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all_blocking(path: &Path) -> Result<Vec<R>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)?;

        let mut records = Vec::new();
        for result in reader.deserialize::<R>() {
            records.push(result?);
        }
        Ok(records)
    }

    fn append_blocking(path: &Path, records: &[R]) -> Result<()> {
        let _lock = FileLock::acquire(path)?;

        let needs_header = match std::fs::metadata(path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => return Err(e.into()),
        };

        // Render the whole batch first so the file sees a single write.
        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(Vec::new());
        for record in records {
            writer.serialize(record)?;
        }
        let buffer = writer
            .into_inner()
            .map_err(|e| CustsyncError::io(e.error().to_string()))?;

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(&buffer)?;
        file.sync_all()?;
        Ok(())
    }
}

#[async_trait]
impl<R: DatasetRecord> RecordStore<R> for CsvRecordStore<R> {
    async fn read_all(&self) -> Result<Vec<R>> {
        let path = self.path.clone();
        let records = tokio::task::spawn_blocking(move || Self::read_all_blocking(&path))
            .await
            .map_err(|e| CustsyncError::io(format!("Dataset read task failed: {}", e)))??;

        tracing::debug!(
            kind = %R::KIND,
            count = records.len(),
            path = %self.path.display(),
            "Read dataset"
        );
        Ok(records)
    }

    async fn append_batch(&self, records: &[R]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let path = self.path.clone();
        let batch = records.to_vec();
        tokio::task::spawn_blocking(move || Self::append_blocking(&path, &batch))
            .await
            .map_err(|e| CustsyncError::io(format!("Dataset append task failed: {}", e)))??;

        tracing::debug!(
            kind = %R::KIND,
            count = records.len(),
            path = %self.path.display(),
            "Appended batch"
        );
        Ok(())
    }
}
