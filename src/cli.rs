//! CLI argument parsing and command execution

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use commit_sync::config::{self, SyncConfig};
use commit_sync::defaults;
use commit_sync::git::GitCli;
use commit_sync::output::{self, OutputConfig};
use commit_sync::sync::{Repositories, SyncDriver};

/// Commit Sync - Export commits missing between a standalone repository and
/// its subtree copy as ready-to-review patches
#[derive(Parser, Debug)]
#[command(name = "commit-sync")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the narrow repository (contains only the shared subsystem)
    #[arg(value_name = "NARROW_REPO")]
    narrow: PathBuf,

    /// Path to the wide repository (contains the subsystem as a subtree)
    #[arg(value_name = "WIDE_REPO")]
    wide: PathBuf,

    /// Path to a YAML configuration file
    ///
    /// Without this flag `.commit-sync.yaml` in the current directory is used,
    /// then the per-user config file, then built-in defaults.
    #[arg(short, long, value_name = "FILE", env = "COMMIT_SYNC_CONFIG")]
    config: Option<PathBuf>,

    /// List the commits that would be exported without writing any patches
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Colorize output (always, never, auto)
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

impl Cli {
    /// Set up logging from `--log-level`; `RUST_LOG` takes precedence.
    pub fn init_logging(&self) {
        let env = env_logger::Env::default().default_filter_or(self.log_level.as_str());
        let _ = env_logger::Builder::from_env(env)
            .format_timestamp(None)
            .try_init();
    }

    /// Execute the synchronization
    pub fn execute(self) -> Result<()> {
        let sync_config = self.load_config()?;
        let output_config = OutputConfig::from_env_and_flag(&self.color);

        let git = GitCli::new();
        let driver = SyncDriver::new(&git, &git, &sync_config);
        let repos = Repositories::new(&self.narrow, &self.wide);

        let plan = driver.plan(repos).with_context(|| {
            format!(
                "Failed to compare {} with {}",
                self.narrow.display(),
                self.wide.display()
            )
        })?;

        if self.dry_run {
            match self.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
                Format::Text => print!("{}", output::render_plan(&plan, &output_config)),
            }
            return Ok(());
        }

        let total = (plan.narrow_to_wide.len() + plan.wide_to_narrow.len()) as u64;
        let progress = if self.format == Format::Text {
            ProgressBar::new(total)
        } else {
            ProgressBar::hidden()
        };
        progress.set_style(
            ProgressStyle::with_template("{spinner} [{pos}/{len}] {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let report = driver
            .execute(repos, &plan, |path| {
                progress.set_message(file_name(path));
                progress.inc(1);
            })
            .context("Failed to export patches")?;
        progress.finish_and_clear();

        match self.format {
            Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            Format::Text => print!("{}", output::render_report(&report, &output_config)),
        }
        Ok(())
    }

    fn load_config(&self) -> Result<SyncConfig> {
        let path = match &self.config {
            Some(path) => Some(path.clone()),
            None => {
                let cwd = std::env::current_dir().context("Failed to read current directory")?;
                defaults::discover_config(&cwd)
            }
        };

        match path {
            Some(path) => {
                log::info!("Loading configuration from {}", path.display());
                config::from_file(&path)
                    .with_context(|| format!("Failed to load config from {}", path.display()))
            }
            None => {
                log::info!("No configuration file found, using built-in defaults");
                Ok(SyncConfig::default())
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
