//! Cookie source trait.
//!
//! Defines how the pipeline obtains the externally captured cookie set.

use super::model::SessionCookie;
use crate::error::Result;
use async_trait::async_trait;

/// An abstract source of captured session cookies.
///
/// Implementations decouple the sync run from where cookies are kept
/// (a JSON file, a key-value store, a secrets manager).
#[async_trait]
pub trait CookieSource: Send + Sync {
    /// Loads the cookie set saved under `cookie_store_id`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(cookies))`: A cookie set was found (it may still be empty)
    /// - `Ok(None)`: Nothing is stored under this id
    /// - `Err(_)`: The store could not be read
    async fn load(&self, cookie_store_id: &str) -> Result<Option<Vec<SessionCookie>>>;
}
