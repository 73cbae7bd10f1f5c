//! Hand-written collaborators for application tests.

use async_trait::async_trait;
use custsync_core::browser::{BrowserSession, DownloadOutcome, DownloadTarget, PageCapture};
use custsync_core::debug::{DebugBlob, DebugSink};
use custsync_core::record::{DatasetRecord, RawRow, RecordStore};
use custsync_core::session::{CookieSource, SanitizedCookie, SessionCookie};
use custsync_core::{CustsyncError, Result};
use std::collections::VecDeque;
use std::sync::Mutex;

pub fn row(cells: &[(&str, &str)]) -> RawRow {
    cells
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// In-memory dataset that remembers what was appended.
pub struct MemoryStore<R> {
    records: Mutex<Vec<R>>,
    appended: Mutex<Vec<R>>,
    append_calls: Mutex<usize>,
    fail_appends: bool,
}

impl<R> Default for MemoryStore<R> {
    fn default() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            appended: Mutex::new(Vec::new()),
            append_calls: Mutex::new(0),
            fail_appends: false,
        }
    }
}

impl<R: Clone> MemoryStore<R> {
    pub fn with_records(records: Vec<R>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Default::default()
        }
    }

    pub fn failing_appends() -> Self {
        Self {
            fail_appends: true,
            ..Default::default()
        }
    }

    pub fn appended(&self) -> Vec<R> {
        self.appended.lock().unwrap().clone()
    }

    pub fn append_calls(&self) -> usize {
        *self.append_calls.lock().unwrap()
    }
}

#[async_trait]
impl<R: DatasetRecord> RecordStore<R> for MemoryStore<R> {
    async fn read_all(&self) -> Result<Vec<R>> {
        Ok(self.records.lock().unwrap().clone())
    }

    async fn append_batch(&self, records: &[R]) -> Result<()> {
        *self.append_calls.lock().unwrap() += 1;
        if self.fail_appends {
            return Err(CustsyncError::io("disk full"));
        }
        self.records.lock().unwrap().extend_from_slice(records);
        self.appended.lock().unwrap().extend_from_slice(records);
        Ok(())
    }
}

/// Debug sink that keeps every blob in memory.
#[derive(Default)]
pub struct RecordingSink {
    blobs: Mutex<Vec<(String, DebugBlob)>>,
    fail: bool,
}

impl RecordingSink {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.blobs
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn blob(&self, index: usize) -> DebugBlob {
        self.blobs.lock().unwrap()[index].1.clone()
    }
}

#[async_trait]
impl DebugSink for RecordingSink {
    async fn put(&self, name: &str, blob: DebugBlob) -> Result<()> {
        if self.fail {
            return Err(CustsyncError::io("read-only file system"));
        }
        self.blobs.lock().unwrap().push((name.to_string(), blob));
        Ok(())
    }
}

pub struct MockCookieSource {
    cookies: Option<Vec<SessionCookie>>,
}

impl MockCookieSource {
    pub fn new(cookies: Option<Vec<SessionCookie>>) -> Self {
        Self { cookies }
    }
}

#[async_trait]
impl CookieSource for MockCookieSource {
    async fn load(&self, _cookie_store_id: &str) -> Result<Option<Vec<SessionCookie>>> {
        Ok(self.cookies.clone())
    }
}

/// Builds a `sid` cookie expiring `days` from now.
pub fn sid_cookie(days: i64) -> SessionCookie {
    let expires = chrono::Utc::now().timestamp() + days * 86_400 + 3_600;
    SessionCookie {
        name: Some("sid".to_string()),
        value: "token".to_string(),
        domain: Some(".ubereats.com".to_string()),
        path: Some("/".to_string()),
        secure: true,
        http_only: true,
        same_site: Some("no_restriction".to_string()),
        expires_at_epoch_seconds: Some(expires as f64),
        ..Default::default()
    }
}

/// Scripted browser driver.
pub struct MockBrowser {
    pub landing_url: String,
    pub page: PageCapture,
    pub downloads: VecDeque<Result<DownloadOutcome>>,
    pub navigated: Vec<(String, Vec<SanitizedCookie>)>,
    pub attempted: Vec<DownloadTarget>,
}

impl MockBrowser {
    pub fn new(landing_url: &str, downloads: Vec<Result<DownloadOutcome>>) -> Self {
        Self {
            landing_url: landing_url.to_string(),
            page: PageCapture {
                title: "Customers".to_string(),
                text: "注文者分析データ".to_string(),
                html: "<html></html>".to_string(),
                screenshot: Some(vec![0x89, b'P', b'N', b'G']),
            },
            downloads: downloads.into(),
            navigated: Vec::new(),
            attempted: Vec::new(),
        }
    }
}

#[async_trait]
impl BrowserSession for MockBrowser {
    async fn navigate(&mut self, cookies: &[SanitizedCookie], url: &str) -> Result<String> {
        self.navigated.push((url.to_string(), cookies.to_vec()));
        Ok(self.landing_url.clone())
    }

    async fn capture_page(&mut self) -> Result<PageCapture> {
        Ok(self.page.clone())
    }

    async fn download(&mut self, target: &DownloadTarget) -> Result<DownloadOutcome> {
        self.attempted.push(target.clone());
        self.downloads
            .pop_front()
            .unwrap_or(Ok(DownloadOutcome::NoTarget))
    }
}
