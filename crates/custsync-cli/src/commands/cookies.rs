use anyhow::{Context, Result};
use colored::Colorize;
use custsync_infrastructure::JsonCookieSource;
use std::path::Path;

use crate::context::AppContext;

pub async fn import(ctx: &AppContext, export_file: &Path) -> Result<()> {
    let cookie_store_id = &ctx.config.cookie_store_id;
    let source = JsonCookieSource::new(ctx.paths.clone());

    let count = source
        .import(cookie_store_id, export_file)
        .await
        .with_context(|| format!("Failed to import {}", export_file.display()))?;

    println!(
        "{} imported {} cookies into '{}' ({})",
        "✓".green().bold(),
        count,
        cookie_store_id,
        ctx.paths.cookie_file(cookie_store_id).display()
    );
    Ok(())
}
