use anyhow::{Context, Result};
use colored::Colorize;

use crate::context::AppContext;

pub fn init(ctx: &AppContext, force: bool) -> Result<()> {
    let path = ctx.config_service.path();
    let written = ctx
        .config_service
        .init_template(force)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    if written {
        println!("{} wrote {}", "✓".green().bold(), path.display());
    } else {
        println!(
            "{} {} already exists (use --force to overwrite)",
            "!".yellow().bold(),
            path.display()
        );
    }
    Ok(())
}

pub fn show(ctx: &AppContext) -> Result<()> {
    let rendered = toml_string(ctx)?;
    println!("# {}", ctx.config_service.path().display());
    println!("{}", rendered);
    Ok(())
}

pub fn path(ctx: &AppContext) -> Result<()> {
    println!("{}", ctx.config_service.path().display());
    Ok(())
}

fn toml_string(ctx: &AppContext) -> Result<String> {
    custsync_infrastructure::config::render(&ctx.config).context("Failed to render configuration")
}
