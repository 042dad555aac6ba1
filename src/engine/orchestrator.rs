// src/engine/orchestrator.rs

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

use crate::config::WatchConfig;
use crate::errors::ProcessError;
use crate::exec::ProcessSupervisor;
use crate::watch::PollingDetector;

/// The control loop tying detector and supervisor together.
///
/// Owns both collaborators; neither the file-state map nor the process
/// handle is ever touched directly here — only their public operations.
pub struct ReloadOrchestrator {
    config: Arc<WatchConfig>,
    detector: PollingDetector,
    supervisor: ProcessSupervisor,
}

impl ReloadOrchestrator {
    pub fn new(
        config: Arc<WatchConfig>,
        detector: PollingDetector,
        supervisor: ProcessSupervisor,
    ) -> Self {
        Self {
            config,
            detector,
            supervisor,
        }
    }

    /// Run until `cancel` fires.
    ///
    /// Only the *initial* start failure propagates as an error. Restart
    /// failures, detector errors, and even a failing stop at shutdown are
    /// logged and never abort the loop: the user may fix their code and
    /// trigger another change, and shutdown must be unconditional.
    pub async fn run(self, cancel: CancellationToken) -> Result<()> {
        // `watch` moves the detector into its scan task, so take the parts
        // apart here instead of borrowing through `self` afterwards.
        let Self {
            config,
            detector,
            supervisor,
        } = self;

        info!(command = %config.command_line(), "running command");
        supervisor
            .start()
            .await
            .context("failed to start initial process")?;

        let (mut changes, mut errors) = detector.watch(cancel.clone());
        let mut errors_open = true;

        // Set only after a successful restart, so a failed attempt leaves
        // the debounce window open and the next event retries immediately.
        let mut last_restart: Option<Instant> = None;

        let reason = loop {
            tokio::select! {
                change = changes.recv() => {
                    let Some(change) = change else {
                        break "change stream closed";
                    };

                    // Debounce: a burst of edits inside the delay window
                    // collapses into the one restart that opened it. Events
                    // inside the window are dropped, not deferred.
                    if let Some(at) = last_restart {
                        if at.elapsed() < config.restart_delay {
                            trace!(path = %change.path.display(), "change debounced");
                            continue;
                        }
                    }

                    debug!(kind = %change.kind, path = %change.path.display(), "change event");
                    info!("changes detected, restarting");

                    match restart(&config, &supervisor).await {
                        Ok(()) => last_restart = Some(Instant::now()),
                        Err(err) => {
                            error!(error = %err, "restart failed; still watching")
                        }
                    }
                }
                err = errors.recv(), if errors_open => {
                    match err {
                        Some(err) => error!(error = %err, "watch error"),
                        None => errors_open = false,
                    }
                }
                _ = cancel.cancelled() => {
                    break "shutdown requested";
                }
            }
        };

        info!(reason, "stopping");
        if let Err(err) = supervisor.stop().await {
            error!(error = %err, "failed to stop process during shutdown");
        }

        Ok(())
    }
}

/// One stop/start cycle. Never runs concurrently with itself: the loop
/// awaits the attempt before reading the next event.
async fn restart(
    config: &WatchConfig,
    supervisor: &ProcessSupervisor,
) -> Result<(), ProcessError> {
    supervisor.stop().await?;
    info!(command = %config.command_line(), "running command");
    supervisor.start().await
}
