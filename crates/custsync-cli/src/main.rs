use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use custsync_core::CustsyncError;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;
mod context;
mod logging;

use context::GlobalArgs;

#[derive(Parser)]
#[command(name = "custsync")]
#[command(
    about = "custsync - sync merchant customer analytics exports into local datasets",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the saved session cookies and report days remaining
    CheckSession,
    /// Ingest downloaded customer analytics CSV files
    Ingest {
        /// CSV files exported from the customers dashboard
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Manage saved cookie exports
    Cookies {
        #[command(subcommand)]
        action: CookiesAction,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum CookiesAction {
    /// Import a browser-extension cookie export into the cookie store
    Import {
        /// JSON array exported from the browser
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a commented config.toml template
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            exit_code_for(&e)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let ctx = context::AppContext::load(&cli.global)?;
    let _log_guard = logging::init(&ctx.paths.logs_dir(), cli.global.verbose)?;

    match cli.command {
        Commands::CheckSession => commands::session::check(&ctx).await,
        Commands::Ingest { files } => commands::ingest::run(&ctx, &files).await,
        Commands::Cookies { action } => match action {
            CookiesAction::Import { file } => commands::cookies::import(&ctx, &file).await,
        },
        Commands::Config { action } => match action {
            ConfigAction::Init { force } => commands::config::init(&ctx, force),
            ConfigAction::Show => commands::config::show(&ctx),
            ConfigAction::Path => commands::config::path(&ctx),
        },
    }
}

/// Session problems exit with 2 so schedulers can prompt for a cookie refresh.
fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    match error.downcast_ref::<CustsyncError>() {
        Some(e) if e.is_session() => ExitCode::from(2),
        _ => ExitCode::from(1),
    }
}
