use anyhow::Result;
use colored::Colorize;
use custsync_core::session::{CookieSource, validate};
use custsync_infrastructure::JsonCookieSource;

use crate::context::AppContext;

pub async fn check(ctx: &AppContext) -> Result<()> {
    let cookie_store_id = &ctx.config.cookie_store_id;
    let source = JsonCookieSource::new(ctx.paths.clone());

    let cookies = source.load(cookie_store_id).await?.unwrap_or_default();
    let report = validate(&cookies)?;

    println!(
        "{} session for cookie store '{}' is valid ({} remaining)",
        "✓".green().bold(),
        cookie_store_id,
        report.status.days_remaining
    );
    if let Some(warning) = report.warning {
        println!("{} {}", "!".yellow().bold(), warning);
    }

    Ok(())
}
