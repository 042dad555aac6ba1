// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::cli::CliArgs;
use crate::config::{load_env_file, parse_duration, parse_env_pairs, WatchConfig};
use crate::engine::ReloadOrchestrator;
use crate::exec::ProcessSupervisor;
use crate::watch::PollingDetector;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config from CLI flags (+ optional `.env` in the workdir)
/// - change detector + process supervisor + reload loop
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config = Arc::new(build_config(&args)?);
    config.validate()?;

    info!(
        path = %config.path.display(),
        workdir = %config.effective_workdir().display(),
        patterns = ?config.patterns,
        "starting hot reload"
    );

    // One cancellation signal for everything: Ctrl-C cancels it, and a
    // parent embedding this crate can pass its own token into
    // `ReloadOrchestrator::run` instead.
    let cancel = CancellationToken::new();

    // Ctrl-C → graceful shutdown.
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                error!(error = %err, "failed to listen for Ctrl+C");
                return;
            }
            cancel.cancel();
        });
    }

    let detector = PollingDetector::new(Arc::clone(&config))?;
    let supervisor = ProcessSupervisor::new(Arc::clone(&config));

    ReloadOrchestrator::new(config, detector, supervisor)
        .run(cancel)
        .await
}

/// Map CLI flags onto a validated [`WatchConfig`].
fn build_config(args: &CliArgs) -> Result<WatchConfig> {
    let path = std::fs::canonicalize(&args.path)
        .with_context(|| format!("invalid watch path '{}'", args.path))?;

    let workdir: Option<PathBuf> = match &args.workdir {
        Some(dir) => Some(
            std::fs::canonicalize(dir)
                .with_context(|| format!("invalid workdir '{dir}'"))?,
        ),
        None => None,
    };

    // .env is read from where the command will actually run.
    let env_dir = workdir.as_deref().unwrap_or(&path);
    let env_vars = load_env_file(env_dir, parse_env_pairs(&args.env));

    let mut config = WatchConfig::new(path, args.command.clone());
    config.workdir = workdir;
    config.patterns = args.regex.clone();
    config.env_vars = env_vars;
    config.poll_interval =
        parse_duration(&args.poll_interval).context("invalid --poll-interval")?;
    config.restart_delay =
        parse_duration(&args.restart_delay).context("invalid --restart-delay")?;
    config.debug = args.debug;
    config.quiet = args.quiet;

    Ok(config)
}
