use anyhow::{Context, Result};
use colored::Colorize;
use custsync_application::sync_usecase::new_run_id;
use custsync_application::{RunReport, SyncRunUseCase, SyncSettings};
use custsync_core::record::{LocationRecord, TrendRecord};
use custsync_infrastructure::{CsvRecordStore, DirDebugSink, JsonCookieSource};
use std::path::PathBuf;
use std::sync::Arc;

use crate::context::AppContext;

pub async fn run(ctx: &AppContext, files: &[PathBuf]) -> Result<()> {
    ctx.config.validate()?;

    let run_id = new_run_id();
    let store_id = &ctx.config.store_id;
    let usecase = SyncRunUseCase::new(
        SyncSettings::from_config(&ctx.config, run_id.clone()),
        Arc::new(JsonCookieSource::new(ctx.paths.clone())),
        Arc::new(CsvRecordStore::<TrendRecord>::for_store(&ctx.paths, store_id)),
        Arc::new(CsvRecordStore::<LocationRecord>::for_store(&ctx.paths, store_id)),
        Arc::new(DirDebugSink::for_run(&ctx.paths, &run_id)),
    );

    let report = usecase
        .ingest_files(files)
        .await
        .context("Ingestion aborted")?;

    print_summary(&report);
    println!(
        "  datasets: {}",
        ctx.paths.dataset_dir(store_id).display()
    );
    Ok(())
}

pub fn print_summary(report: &RunReport) {
    let headline = format!(
        "Accepted {} trends and {} locations rows",
        report.counters.trends.accepted, report.counters.locations.accepted
    );
    if report.has_errors() {
        println!("{} {}", "!".yellow().bold(), headline);
    } else {
        println!("{} {}", "✓".green().bold(), headline);
    }
    print!("{}", report);
}
