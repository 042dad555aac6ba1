// src/config/model.rs

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Result};

/// One immutable configuration value per run.
///
/// Built from CLI flags (plus `.env`) in `lib.rs` and handed to the detector,
/// supervisor, and reload loop. None of them mutate it.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Directory tree to scan for changes.
    pub path: PathBuf,

    /// Working directory for the child process.
    ///
    /// May differ from `path` (e.g. watch `./src` while running from the
    /// project root). If `None`, the child runs from the watched path.
    pub workdir: Option<PathBuf>,

    /// Regex patterns selecting files of interest, matched against the full
    /// path. A file is kept if at least one pattern matches.
    pub patterns: Vec<String>,

    /// Extra environment variables for the child. These win over inherited
    /// variables on key collision.
    pub env_vars: BTreeMap<String, String>,

    /// Command line for the child; the first token is the executable.
    pub command: Vec<String>,

    /// How often the detector re-scans the tree.
    pub poll_interval: Duration,

    /// Minimum delay between consecutive restarts. Change events arriving
    /// inside this window are dropped, not deferred.
    pub restart_delay: Duration,

    /// Log every observed change event at debug level.
    pub debug: bool,

    /// Suppress all output below error level.
    pub quiet: bool,
}

impl WatchConfig {
    /// Config with defaults for everything except the watched path and the
    /// command line.
    pub fn new(path: impl Into<PathBuf>, command: Vec<String>) -> Self {
        Self {
            path: path.into(),
            workdir: None,
            patterns: vec![default_pattern()],
            env_vars: BTreeMap::new(),
            command,
            poll_interval: default_poll_interval(),
            restart_delay: default_restart_delay(),
            debug: false,
            quiet: false,
        }
    }

    /// Semantic validation, run once before anything is spawned.
    pub fn validate(&self) -> Result<()> {
        if self.command.is_empty() {
            return Err(anyhow!("command must have at least one token"));
        }
        if self.patterns.is_empty() {
            // An empty pattern set would silently track nothing.
            return Err(anyhow!("at least one watch pattern is required"));
        }
        Ok(())
    }

    /// Where the child runs: the configured workdir, else the watched path.
    pub fn effective_workdir(&self) -> &Path {
        self.workdir.as_deref().unwrap_or(&self.path)
    }

    /// The command line as a single display string, for logs.
    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }
}

fn default_pattern() -> String {
    ".*".to_string()
}

fn default_poll_interval() -> Duration {
    Duration::from_millis(500)
}

fn default_restart_delay() -> Duration {
    Duration::from_secs(1)
}

/// Parse a simple duration string like `"3s"`, `"250ms"`, `"1m"`, `"2h"`.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return Err(anyhow!("empty duration string"));
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| anyhow!("duration '{s}' is missing a unit suffix"))?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| anyhow!("invalid duration number '{num_part}': {e}"))?;
    let unit = unit_part.trim().to_lowercase();

    match unit.as_str() {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        "m" => Ok(Duration::from_secs(value * 60)),
        "h" => Ok(Duration::from_secs(value * 60 * 60)),
        _ => Err(anyhow!(
            "unsupported duration unit '{unit}'; expected ms, s, m, or h"
        )),
    }
}
