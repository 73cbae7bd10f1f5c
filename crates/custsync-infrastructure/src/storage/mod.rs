//! Storage primitives shared by the file-backed implementations.

mod atomic_toml;
mod file_lock;

pub use atomic_toml::{AtomicTomlError, AtomicTomlFile};
pub use file_lock::FileLock;
