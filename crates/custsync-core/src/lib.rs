//! Domain layer for custsync.
//!
//! Session validation, CSV classification, record normalization and
//! identity keys, plus the traits behind which every external collaborator
//! (cookie source, browser driver, dataset store, debug sink) sits.

pub mod browser;
pub mod debug;
pub mod error;
pub mod record;
pub mod session;

// Re-export common error type
pub use error::{CustsyncError, Result};
