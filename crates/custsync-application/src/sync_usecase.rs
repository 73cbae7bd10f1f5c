//! Sync run use case.
//!
//! Orchestrates one run end to end: session gate, cookie injection and
//! navigation, landing verification, the download loop and ingestion.
//! Session failures abort before any download; per-CSV failures are
//! recorded in the report and the next target is still attempted; a
//! storage append failure aborts the run.

use custsync_core::browser::{BrowserSession, DownloadOutcome, DownloadStrategy, DownloadTarget};
use custsync_core::debug::{DebugBlob, DebugSink};
use custsync_core::record::{LocationPeriod, LocationRecord, RecordStore, StoreContext, TrendRecord};
use custsync_core::session::{
    CookieSource, SessionReport, has_dashboard_content, sanitize_cookies, validate,
    verify_landing_url,
};
use custsync_core::{CustsyncError, Result};
use custsync_infrastructure::AppConfig;
use custsync_infrastructure::csv_decoder::decode_csv;
use rand::Rng;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::ingestion_pipeline::IngestionPipeline;
use crate::report::RunReport;

/// Everything a run needs to know besides its collaborators.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub run_id: String,
    pub cookie_store_id: String,
    pub store: StoreContext,
    pub period: LocationPeriod,
    pub target_url: String,
    pub strategy: DownloadStrategy,
    /// Asks the browser driver to run without a visible window.
    pub headless: bool,
    /// Saves screenshots and page HTML through the debug sink.
    pub debug_mode: bool,
    pub settle_min_ms: u64,
    pub settle_max_ms: u64,
}

impl SyncSettings {
    pub fn from_config(config: &AppConfig, run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            cookie_store_id: config.cookie_store_id.clone(),
            store: config.store_context(),
            period: config.location_period(),
            target_url: config.target_url(),
            strategy: config.download.clone(),
            headless: config.headless,
            debug_mode: config.debug_mode,
            settle_min_ms: config.dashboard.settle_min_ms,
            settle_max_ms: config.dashboard.settle_max_ms,
        }
    }
}

/// Generates a fresh run identifier.
pub fn new_run_id() -> String {
    Uuid::new_v4().to_string()
}

pub struct SyncRunUseCase {
    settings: SyncSettings,
    cookie_source: Arc<dyn CookieSource>,
    trend_store: Arc<dyn RecordStore<TrendRecord>>,
    location_store: Arc<dyn RecordStore<LocationRecord>>,
    debug_sink: Arc<dyn DebugSink>,
}

impl SyncRunUseCase {
    pub fn new(
        settings: SyncSettings,
        cookie_source: Arc<dyn CookieSource>,
        trend_store: Arc<dyn RecordStore<TrendRecord>>,
        location_store: Arc<dyn RecordStore<LocationRecord>>,
        debug_sink: Arc<dyn DebugSink>,
    ) -> Self {
        Self {
            settings,
            cookie_source,
            trend_store,
            location_store,
            debug_sink,
        }
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Loads the configured cookie store and validates it.
    pub async fn check_session(&self) -> Result<SessionReport> {
        let cookies = self
            .cookie_source
            .load(&self.settings.cookie_store_id)
            .await?
            .unwrap_or_default();

        validate(&cookies)
    }

    /// Runs a full sync against `browser`.
    pub async fn run(&self, browser: &mut dyn BrowserSession) -> Result<RunReport> {
        let settings = &self.settings;
        tracing::info!(
            run_id = %settings.run_id,
            store_id = %settings.store.store_id,
            headless = settings.headless,
            "Starting sync run"
        );

        let cookies = self
            .cookie_source
            .load(&settings.cookie_store_id)
            .await?
            .unwrap_or_default();
        let session = validate(&cookies)?;
        let sanitized = sanitize_cookies(&cookies);

        let landing_url = browser.navigate(&sanitized, &settings.target_url).await?;
        self.settle().await;

        if let Err(e) = verify_landing_url(&landing_url) {
            tracing::error!(
                landing_url = %landing_url,
                "Redirected to a login page; cookies were rejected"
            );
            if settings.debug_mode {
                self.capture_debug(browser, "screenshot_login_failed", false)
                    .await;
            }
            return Err(e);
        }
        tracing::info!(landing_url = %landing_url, "Dashboard reached");

        match browser.capture_page().await {
            Ok(page) => {
                if !has_dashboard_content(&page.text) {
                    tracing::warn!(title = %page.title, "Dashboard content markers not found");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Could not capture dashboard page"),
        }
        if settings.debug_mode {
            self.capture_debug(browser, "screenshot_success", true).await;
        }

        let mut report = RunReport::new(&settings.run_id, &settings.store.store_id);
        report.days_remaining = Some(session.status.days_remaining);
        report.session_warning = session.warning;

        let mut pipeline = self.load_pipeline().await?;

        for target in settings.strategy.targets() {
            match browser.download(&target).await {
                Ok(DownloadOutcome::File(file)) => {
                    tracing::info!(
                        %target,
                        file_name = ?file.file_name,
                        bytes = file.bytes.len(),
                        "Downloaded CSV"
                    );
                    self.process_csv(
                        &mut pipeline,
                        &target.to_string(),
                        &target.slug(),
                        &file.bytes,
                        &mut report,
                    )
                    .await?;
                }
                Ok(DownloadOutcome::NoTarget) => {
                    tracing::warn!(%target, "No download control found");
                    report.missing_targets.push(target.to_string());
                }
                Err(e) => {
                    let error = as_download_failure(&target, e);
                    tracing::warn!(%target, error = %error, "Download failed, continuing");
                    report.errors.push(error);
                }
            }
        }

        report.counters = *pipeline.counters();
        tracing::info!(
            run_id = %settings.run_id,
            accepted = report.counters.total_accepted(),
            errors = report.errors.len(),
            "Sync run finished"
        );
        Ok(report)
    }

    /// Ingests already-downloaded CSV files without touching a browser.
    pub async fn ingest_files(&self, files: &[PathBuf]) -> Result<RunReport> {
        let mut report = RunReport::new(&self.settings.run_id, &self.settings.store.store_id);
        let mut pipeline = self.load_pipeline().await?;

        for path in files {
            let name = path.display().to_string();
            let slug = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "file".to_string());

            match tokio::fs::read(path).await {
                Ok(bytes) => {
                    self.process_csv(&mut pipeline, &name, &slug, &bytes, &mut report)
                        .await?
                }
                Err(e) => {
                    tracing::warn!(file = %name, error = %e, "Could not read CSV file");
                    report
                        .errors
                        .push(CustsyncError::io(format!("{}: {}", name, e)));
                }
            }
        }

        report.counters = *pipeline.counters();
        Ok(report)
    }

    async fn load_pipeline(&self) -> Result<IngestionPipeline> {
        IngestionPipeline::load(
            self.settings.store.clone(),
            self.settings.period.clone(),
            self.trend_store.clone(),
            self.location_store.clone(),
            self.debug_sink.clone(),
        )
        .await
    }

    /// Decodes and ingests one CSV. Only storage failures are returned.
    async fn process_csv(
        &self,
        pipeline: &mut IngestionPipeline,
        name: &str,
        slug: &str,
        bytes: &[u8],
        report: &mut RunReport,
    ) -> Result<()> {
        let csv = match decode_csv(bytes) {
            Ok(csv) => csv,
            Err(e) => {
                tracing::warn!(csv = name, error = %e, "Unparseable CSV, skipping");
                report.errors.push(CustsyncError::download_failure(
                    name,
                    format!("unparseable CSV: {}", e),
                ));
                return Ok(());
            }
        };

        let outcome = pipeline.ingest(&csv.rows, &csv.headers, slug).await?;
        tracing::info!(
            csv = name,
            kind = %outcome.kind,
            accepted = outcome.accepted,
            skipped = outcome.skipped,
            "Ingested CSV"
        );
        Ok(())
    }

    /// Waits a random interval so the dashboard finishes rendering.
    async fn settle(&self) {
        let (min, max) = (self.settings.settle_min_ms, self.settings.settle_max_ms);
        let millis = if max > min {
            rand::thread_rng().gen_range(min..=max)
        } else {
            min
        };
        if millis > 0 {
            tracing::debug!(millis, "Waiting for dashboard to settle");
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }

    async fn capture_debug(&self, browser: &mut dyn BrowserSession, name: &str, with_html: bool) {
        let page = match browser.capture_page().await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(error = %e, "Debug capture failed");
                return;
            }
        };

        if let Some(png) = page.screenshot {
            self.save_debug(name, DebugBlob::png(png)).await;
        }
        if with_html {
            self.save_debug("page_html", DebugBlob::html(page.html)).await;
        }
    }

    async fn save_debug(&self, name: &str, blob: DebugBlob) {
        if let Err(e) = self.debug_sink.put(name, blob).await {
            tracing::warn!(name, error = %e, "Failed to save debug artifact");
        }
    }
}

fn as_download_failure(target: &DownloadTarget, error: CustsyncError) -> CustsyncError {
    match error {
        CustsyncError::DownloadFailure { .. } => error,
        other => CustsyncError::download_failure(target.to_string(), other.to_string()),
    }
}
