//! Browser driver boundary.
//!
//! Launching and driving the headless browser is external to custsync. This
//! module only defines what a sync run needs from a driver.

mod strategy;

pub use strategy::{DownloadOutcome, DownloadStrategy, DownloadTarget, DownloadedFile};

use crate::error::Result;
use crate::session::SanitizedCookie;
use async_trait::async_trait;

/// What the driver saw after navigation, for content checks and debugging.
#[derive(Debug, Clone, Default)]
pub struct PageCapture {
    pub title: String,
    /// Rendered body text.
    pub text: String,
    pub html: String,
    /// Full-page PNG, when the driver supports screenshots.
    pub screenshot: Option<Vec<u8>>,
}

/// A browser session driven by an external collaborator.
#[async_trait]
pub trait BrowserSession: Send {
    /// Injects `cookies` and navigates to `url`.
    ///
    /// # Returns
    ///
    /// The URL the browser ended up on after redirects.
    async fn navigate(&mut self, cookies: &[SanitizedCookie], url: &str) -> Result<String>;

    /// Captures the current page.
    async fn capture_page(&mut self) -> Result<PageCapture>;

    /// Triggers one download control and waits for the file.
    ///
    /// # Returns
    ///
    /// - `Ok(DownloadOutcome::File(_))`: The export was downloaded
    /// - `Ok(DownloadOutcome::NoTarget)`: No matching control on the page
    /// - `Err(_)`: The control was found but the download failed
    async fn download(&mut self, target: &DownloadTarget) -> Result<DownloadOutcome>;
}
