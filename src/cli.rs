use std::path::PathBuf;

use ck_core::AppConfig;
use clap::Parser;

/// Keeps copied text alive by taking over clipboard ownership
#[derive(Debug, Parser)]
#[command(name = "clipkeeper", version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to <data dir>/clipkeeper/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Attempts to open a busy clipboard before skipping a change
    #[arg(long, value_name = "N")]
    pub max_attempts: Option<u32>,

    /// Log to stdout only
    #[arg(long)]
    pub no_file_log: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Cli {
    /// Command-line flags take precedence over the configuration file.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(max_attempts) = self.max_attempts {
            config.guard.max_attempts = max_attempts;
        }
        if self.no_file_log {
            config.logging.file_logging = false;
        }
    }
}
