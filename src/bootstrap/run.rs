use anyhow::Context;
use ck_app::ListenerStats;
use ck_core::ports::AppDirsPort;
use ck_core::AppConfig;
use ck_platform::app_dirs::DirsAppDirsAdapter;
use tracing::{info, warn};

use super::config::resolve_config;
use super::tracing::init_tracing_subscriber;
use crate::cli::Cli;

/// Resolve configuration, set up logging and run the listener until its
/// message queue closes.
pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    let app_dirs = DirsAppDirsAdapter::new().get_app_dirs();

    let default_config = app_dirs.as_ref().ok().map(|dirs| dirs.config_file());
    let mut config = resolve_config(cli.config.as_deref(), default_config)?;
    cli.apply_overrides(&mut config);

    if cli.print_config {
        let rendered =
            toml::to_string_pretty(&config).context("Failed to render configuration")?;
        print!("{rendered}");
        return Ok(());
    }

    let default_logs_dir = app_dirs.as_ref().ok().map(|dirs| dirs.logs_dir());
    init_tracing_subscriber(&config.logging, default_logs_dir.as_deref())
        .context("Failed to initialize tracing")?;

    if let Err(err) = &app_dirs {
        warn!(error = %err, "using built-in defaults, no data directory");
    }
    info!(
        version = env!("CARGO_PKG_VERSION"),
        max_attempts = config.guard.max_attempts,
        "starting clipkeeper"
    );

    let stats = run_listener(&config)?;
    info!(?stats, "clipkeeper stopped");
    Ok(())
}

/// Sets up the listener window and dispatches clipboard notifications
/// until the queue closes or a cycle fails fatally.
#[cfg(windows)]
pub fn run_listener(config: &AppConfig) -> anyhow::Result<ListenerStats> {
    use ck_app::{CaptureAndRepublish, ClipboardListener, ResourceGuard, RunListener};
    use ck_platform::win32::ListenerHost;

    let host = ListenerHost::setup(&config.listener)
        .context("Failed to set up clipboard listener")?;

    let guard = ResourceGuard::new(host.clipboard(), config.guard.retry_policy());
    let listener = ClipboardListener::new(CaptureAndRepublish::new(guard, host.memory()));
    let mut runner = RunListener::new(host.pump(), listener);

    let stats = runner.execute().context("Clipboard listener stopped")?;
    Ok(stats)
}

#[cfg(not(windows))]
pub fn run_listener(_config: &AppConfig) -> anyhow::Result<ListenerStats> {
    Err(ck_platform::SetupError::Unsupported).context("Failed to set up clipboard listener")
}
