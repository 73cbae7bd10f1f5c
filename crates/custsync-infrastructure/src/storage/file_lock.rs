//! Exclusive advisory lock held next to a data file.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

/// A file lock guard that releases the lock when dropped.
///
/// The lock file is left in place after release. Waiters block on that
/// inode, so unlinking it would let a later caller lock a fresh file while
/// a waiter still acquires the old one.
pub struct FileLock {
    #[allow(dead_code)]
    file: File,
}

impl FileLock {
    /// Acquires an exclusive lock for `path`, blocking until it is free.
    ///
    /// The lock lives in a sibling `<name>.lock` file so the data file itself
    /// can be replaced or appended to while the lock is held.
    pub fn acquire(path: &Path) -> io::Result<Self> {
        let lock_path = path.with_extension("lock");

        // Ensure parent directory exists
        if let Some(parent) = lock_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()?;
        }

        Ok(FileLock { file })
    }
}
