//! Application layer for custsync.
//!
//! Use cases that coordinate the session gate, the browser boundary and the
//! dataset stores into one sync run.

pub mod ingestion_pipeline;
pub mod report;
pub mod sync_usecase;

#[cfg(test)]
mod test_support;

pub use ingestion_pipeline::{IngestOutcome, IngestionPipeline};
pub use report::{KindCounts, RunCounters, RunReport};
pub use sync_usecase::{SyncRunUseCase, SyncSettings};
