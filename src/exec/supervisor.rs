// src/exec/supervisor.rs

use std::io;
use std::process::Stdio;
use std::sync::Arc;
use std::time::SystemTime;

use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::WatchConfig;
use crate::errors::ProcessError;

/// Snapshot of the currently tracked process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub pid: u32,
    pub command: Vec<String>,
    pub started: SystemTime,
}

/// The one live child: the process itself, its start time, and the pid
/// recorded at spawn (still reportable after exit).
///
/// The cancellation mechanism is the child itself: it is spawned with
/// `kill_on_drop`, and [`ProcessSupervisor::stop`] kills and awaits it
/// explicitly.
pub(crate) struct ProcessHandle {
    child: Child,
    pid: u32,
    started: SystemTime,
}

/// Runs exactly one external command as a child of the current process.
///
/// All operations serialize on a single mutex around the optional handle,
/// which is what enforces the "at most one live child" invariant under
/// concurrent start/stop calls.
pub struct ProcessSupervisor {
    config: Arc<WatchConfig>,
    handle: Mutex<Option<ProcessHandle>>,
}

impl ProcessSupervisor {
    pub fn new(config: Arc<WatchConfig>) -> Self {
        Self {
            config,
            handle: Mutex::new(None),
        }
    }

    /// Launch the configured command, tearing down any previous child first.
    ///
    /// The previous child is killed and awaited *before* the new one spawns,
    /// so two children never race on the same port or file. The child
    /// inherits this process's environment overlaid with the configured
    /// variables (configured ones win), runs in the configured workdir (or
    /// the watched path), and shares our stdin/stdout/stderr so interactive
    /// children keep working.
    pub async fn start(&self) -> Result<(), ProcessError> {
        let mut guard = self.handle.lock().await;

        if let Some(handle) = guard.take() {
            terminate(handle).await?;
        }

        let mut cmd = Command::new(&self.config.command[0]);
        cmd.args(&self.config.command[1..])
            .current_dir(self.config.effective_workdir())
            .envs(&self.config.env_vars)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|source| ProcessError::Start {
            command: self.config.command_line(),
            source,
        })?;

        let pid = child.id().unwrap_or_default();
        debug!(pid, command = %self.config.command_line(), "process started");

        *guard = Some(ProcessHandle {
            child,
            pid,
            started: SystemTime::now(),
        });

        Ok(())
    }

    /// Kill the current child and wait for it to fully exit.
    ///
    /// No-op when nothing is tracked. Only genuine termination failures are
    /// surfaced; a child that already exited on its own is not an error.
    pub async fn stop(&self) -> Result<(), ProcessError> {
        let mut guard = self.handle.lock().await;
        match guard.take() {
            Some(handle) => terminate(handle).await,
            None => Ok(()),
        }
    }

    /// True iff a handle is tracked and the child has not reported an exit
    /// status yet.
    pub async fn is_running(&self) -> bool {
        let mut guard = self.handle.lock().await;
        match guard.as_mut() {
            Some(handle) => match handle.child.try_wait() {
                Ok(None) => true,
                Ok(Some(_)) => false,
                Err(err) => {
                    warn!(error = %err, "failed to query process status");
                    false
                }
            },
            None => false,
        }
    }

    /// Snapshot of the tracked process, or `None` when nothing is tracked.
    pub async fn info(&self) -> Option<ProcessInfo> {
        let guard = self.handle.lock().await;
        guard.as_ref().map(|handle| ProcessInfo {
            pid: handle.pid,
            command: self.config.command.clone(),
            started: handle.started,
        })
    }
}

/// Kill → await-exit, propagating only genuine termination errors.
async fn terminate(mut handle: ProcessHandle) -> Result<(), ProcessError> {
    match handle.child.start_kill() {
        Ok(()) => {}
        // InvalidInput means the child already exited and was reaped.
        Err(err) if err.kind() == io::ErrorKind::InvalidInput => {}
        Err(source) => return Err(ProcessError::Stop { source }),
    }

    let status = handle
        .child
        .wait()
        .await
        .map_err(|source| ProcessError::Stop { source })?;

    debug!(pid = handle.pid, ?status, "process stopped");
    Ok(())
}
