//! Error types for custsync.

use thiserror::Error;

use crate::record::RecordKind;

/// A shared error type for the whole sync pipeline.
///
/// Session variants are fatal and raised before any side effect. A
/// `DownloadFailure` is recovered per CSV by the orchestrator. A
/// `StorageAppend` is fatal and carries the number of rows that were about
/// to be written.
#[derive(Error, Debug, Clone)]
pub enum CustsyncError {
    /// The cookie source returned nothing.
    #[error("No cookies found; save a cookie export for this store first")]
    NoCookies,

    /// No cookie named `sid` was supplied.
    #[error("Authentication cookie 'sid' is missing from the cookie set")]
    MissingAuthCookie,

    /// The `sid` cookie has expired.
    #[error("Session cookie expired ({days_remaining} days remaining); re-export cookies manually")]
    ExpiredSession { days_remaining: i64 },

    /// The dashboard redirected to a login page after cookie injection.
    #[error("Session rejected: redirected to {url}")]
    SessionRejected { url: String },

    /// A single CSV download failed.
    #[error("Download failed for {target}: {message}")]
    DownloadFailure { target: String, message: String },

    /// Appending the accepted batch to durable storage failed.
    #[error("Failed to append {pending} {kind} rows: {message}")]
    StorageAppend {
        kind: RecordKind,
        pending: usize,
        message: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data access error (store layer)
    #[error("Data access error: {0}")]
    DataAccess(String),
}

impl CustsyncError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a DataAccess error
    pub fn data_access(message: impl Into<String>) -> Self {
        Self::DataAccess(message.into())
    }

    /// Creates a DownloadFailure error
    pub fn download_failure(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DownloadFailure {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Creates a StorageAppend error
    pub fn storage_append(kind: RecordKind, pending: usize, message: impl Into<String>) -> Self {
        Self::StorageAppend {
            kind,
            pending,
            message: message.into(),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this error comes from session validation or verification.
    pub fn is_session(&self) -> bool {
        matches!(
            self,
            Self::NoCookies
                | Self::MissingAuthCookie
                | Self::ExpiredSession { .. }
                | Self::SessionRejected { .. }
        )
    }

    /// Check if this is a storage append failure
    pub fn is_storage_append(&self) -> bool {
        matches!(self, Self::StorageAppend { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for CustsyncError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for CustsyncError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for CustsyncError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for CustsyncError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<csv::Error> for CustsyncError {
    fn from(err: csv::Error) -> Self {
        Self::Serialization {
            format: "CSV".to_string(),
            message: err.to_string(),
        }
    }
}

/// Conversion from anyhow::Error for collaborator glue code
impl From<anyhow::Error> for CustsyncError {
    fn from(err: anyhow::Error) -> Self {
        Self::DataAccess(err.to_string())
    }
}

/// A type alias for `Result<T, CustsyncError>`.
pub type Result<T> = std::result::Result<T, CustsyncError>;
