use anyhow::{Context, Result};
use clap::Args;
use custsync_infrastructure::{AppConfig, ConfigOverrides, ConfigService, CustsyncPaths};
use std::path::PathBuf;

/// Flags shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Path to config.toml (default: ~/.config/custsync/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Keep config and data under this single directory
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    /// Override the data directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Target merchant store id
    #[arg(long, global = true)]
    pub store_id: Option<String>,

    /// Store label written on every record
    #[arg(long, global = true)]
    pub store_name: Option<String>,

    /// Cookie store to read the session from
    #[arg(long, global = true)]
    pub cookie_store: Option<String>,

    /// Dashboard date range preset recorded on location rows
    #[arg(long, global = true)]
    pub period_preset: Option<String>,

    /// Show the browser window instead of running headless
    #[arg(long, global = true)]
    pub headed: bool,

    /// Save screenshots and page HTML for inspection
    #[arg(long, global = true)]
    pub debug: bool,

    /// Log at debug level on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            cookie_store_id: self.cookie_store.clone(),
            store_id: self.store_id.clone(),
            store_name: self.store_name.clone(),
            headless: self.headed.then_some(false),
            debug_mode: self.debug.then_some(true),
            period_preset: self.period_preset.clone(),
            data_dir: self.data_dir.clone(),
        }
    }
}

/// Resolved configuration and paths for one invocation.
pub struct AppContext {
    pub paths: CustsyncPaths,
    pub config: AppConfig,
    pub config_service: ConfigService,
}

impl AppContext {
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        let base_paths = CustsyncPaths::new(args.base_dir.as_deref())
            .context("Failed to resolve custsync directories")?;

        let config_service = match &args.config {
            Some(path) => ConfigService::at(path.clone()),
            None => ConfigService::new(&base_paths),
        };

        let mut config = config_service.load().with_context(|| {
            format!(
                "Failed to load configuration from {}",
                config_service.path().display()
            )
        })?;

        let overrides = args.overrides();
        if !overrides.is_empty() {
            config.apply(&overrides);
        }

        let paths = config.resolve_paths(base_paths);
        Ok(Self {
            paths,
            config,
            config_service,
        })
    }
}
