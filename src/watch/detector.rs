// src/watch/detector.rs

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};
use walkdir::WalkDir;

use crate::config::WatchConfig;
use crate::errors::WatchError;
use crate::watch::patterns::PatternSet;

/// Kind of observed file change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Deleted,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeKind::Created => "Created",
            ChangeKind::Modified => "Modified",
            ChangeKind::Deleted => "Deleted",
        };
        f.write_str(s)
    }
}

/// A single observed file change, immutable once emitted.
///
/// For `Deleted` the timestamp is the scan time, not a filesystem timestamp
/// (the file is already gone).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: PathBuf,
    pub kind: ChangeKind,
    pub timestamp: SystemTime,
}

/// Polling change detector.
///
/// Re-walks the watched tree on a fixed interval and diffs each file's
/// modification time against the previous cycle. The path → mtime map is
/// owned exclusively by the detector and replaced wholesale every cycle.
pub struct PollingDetector {
    config: Arc<WatchConfig>,
    patterns: PatternSet,
    file_states: HashMap<PathBuf, SystemTime>,
}

impl PollingDetector {
    /// Build a detector, compiling the configured patterns.
    ///
    /// A malformed pattern fails here, before any scan runs.
    pub fn new(config: Arc<WatchConfig>) -> Result<Self, WatchError> {
        let patterns = PatternSet::compile(&config.patterns)?;
        Ok(Self {
            config,
            patterns,
            file_states: HashMap::new(),
        })
    }

    /// Start watching: one synchronous baseline scan, then a periodic scan
    /// loop in a background task.
    ///
    /// The baseline scan means already-existing files are *not* reported as
    /// `Created` on the first poll. Both returned streams close when `cancel`
    /// fires (within one poll interval) or when the receivers are dropped;
    /// that is the only stop mechanism — see [`PollingDetector::stop`].
    pub fn watch(
        mut self,
        cancel: CancellationToken,
    ) -> (mpsc::Receiver<FileChange>, mpsc::Receiver<WatchError>) {
        let (change_tx, change_rx) = mpsc::channel::<FileChange>(16);
        let (error_tx, error_rx) = mpsc::channel::<WatchError>(4);

        if let Err(err) = self.initial_scan() {
            // Baseline failure is not fatal; report it and start from an
            // empty state so the next successful scan rebuilds the baseline.
            let _ = error_tx.try_send(err);
        }

        info!(
            path = %self.config.path.display(),
            interval_ms = self.config.poll_interval.as_millis() as u64,
            "change detector started"
        );

        tokio::spawn(async move {
            let mut ticker = interval(self.config.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick of `interval` completes immediately; the
            // baseline scan already ran, so consume it.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                match self.poll_once() {
                    Ok(changes) => {
                        for change in changes {
                            tokio::select! {
                                _ = cancel.cancelled() => return,
                                res = change_tx.send(change) => {
                                    if res.is_err() {
                                        return;
                                    }
                                }
                            }
                        }
                    }
                    Err(err) => {
                        if error_tx.send(err).await.is_err() {
                            return;
                        }
                    }
                }
            }

            debug!("change detector loop ended");
        });

        (change_rx, error_rx)
    }

    /// Best-effort stop hint.
    ///
    /// The scan loop is cancellation-driven, so there is nothing to do here;
    /// correctness never depends on this being called.
    pub fn stop(&self) {}

    /// Record the current tree as the baseline without emitting events.
    pub fn initial_scan(&mut self) -> Result<(), WatchError> {
        self.file_states = self.walk_tree()?;
        debug!(files = self.file_states.len(), "baseline scan complete");
        Ok(())
    }

    /// Run one scan cycle and return the observed changes.
    ///
    /// Created/Modified come first, in walk order (which callers must not
    /// rely on); Deleted entries follow once the full current set is known.
    /// On error the previous state is kept untouched.
    pub fn poll_once(&mut self) -> Result<Vec<FileChange>, WatchError> {
        let current = self.walk_tree()?;
        let now = SystemTime::now();
        let mut changes = Vec::new();

        for (path, modified) in &current {
            match self.file_states.get(path) {
                None => changes.push(FileChange {
                    path: path.clone(),
                    kind: ChangeKind::Created,
                    timestamp: now,
                }),
                Some(previous) if modified > previous => changes.push(FileChange {
                    path: path.clone(),
                    kind: ChangeKind::Modified,
                    timestamp: now,
                }),
                Some(_) => {}
            }
        }

        for path in self.file_states.keys() {
            if !current.contains_key(path) {
                changes.push(FileChange {
                    path: path.clone(),
                    kind: ChangeKind::Deleted,
                    timestamp: now,
                });
            }
        }

        self.file_states = current;
        Ok(changes)
    }

    /// Paths currently tracked (matching, non-hidden files seen by the last
    /// scan).
    pub fn tracked_paths(&self) -> Vec<PathBuf> {
        self.file_states.keys().cloned().collect()
    }

    /// Walk the watched tree and collect matching files with their mtimes.
    ///
    /// Unreadable subdirectories are skipped; only a failure to read the
    /// root itself aborts the walk.
    fn walk_tree(&self) -> Result<HashMap<PathBuf, SystemTime>, WatchError> {
        let root = &self.config.path;
        let mut files = HashMap::new();

        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => {
                    return Err(WatchError::Scan {
                        path: root.clone(),
                        source: err
                            .into_io_error()
                            .unwrap_or_else(|| io::Error::other("walk failed")),
                    });
                }
                Err(err) => {
                    trace!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();
            if is_hidden(root, path) {
                continue;
            }
            if !self.patterns.matches(&path.to_string_lossy()) {
                continue;
            }

            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            let Ok(modified) = metadata.modified() else {
                continue;
            };

            files.insert(path.to_path_buf(), modified);
        }

        Ok(files)
    }
}

/// True if any component of `path` below `root` starts with a dot.
fn is_hidden(root: &Path, path: &Path) -> bool {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components().any(|component| {
        component
            .as_os_str()
            .to_string_lossy()
            .starts_with('.')
    })
}
