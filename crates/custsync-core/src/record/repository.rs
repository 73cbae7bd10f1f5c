//! Dataset store trait.
//!
//! Defines the append-only persistence contract for canonical records.

use super::model::DatasetRecord;
use crate::error::Result;
use async_trait::async_trait;

/// An append-only collection of records of one kind.
///
/// There is no update or delete; durable storage is the
/// source of truth for which identity keys already exist.
///
/// # Implementation Notes
///
/// Implementations should write a batch in a single call so that a
/// partially written batch is the exception (a crash mid-write), not the
/// norm.
#[async_trait]
pub trait RecordStore<R: DatasetRecord>: Send + Sync {
    /// Reads every stored record.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<R>)`: All stored records (empty if the dataset does not exist yet)
    /// - `Err(_)`: The dataset could not be read
    async fn read_all(&self) -> Result<Vec<R>>;

    /// Appends a batch of records.
    ///
    /// # Arguments
    ///
    /// * `records` - The records to append, in order
    async fn append_batch(&self, records: &[R]) -> Result<()>;
}
