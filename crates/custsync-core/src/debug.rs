//! Debug sink trait.
//!
//! Screenshots, page HTML and unrecognized CSV dumps are handed to a sink
//! for later inspection. Sinks are write-only from the pipeline's point of
//! view.

use crate::error::Result;
use async_trait::async_trait;

/// A named blob for inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugBlob {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl DebugBlob {
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            content_type: "image/png".to_string(),
            bytes,
        }
    }

    pub fn html(html: impl Into<String>) -> Self {
        Self {
            content_type: "text/html".to_string(),
            bytes: html.into().into_bytes(),
        }
    }

    pub fn json(bytes: Vec<u8>) -> Self {
        Self {
            content_type: "application/json".to_string(),
            bytes,
        }
    }
}

/// Fire-and-forget storage for debugging artifacts.
#[async_trait]
pub trait DebugSink: Send + Sync {
    /// Stores `blob` under `name`. Callers log and ignore failures.
    async fn put(&self, name: &str, blob: DebugBlob) -> Result<()>;
}
