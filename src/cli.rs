// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `hotreload`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "hotreload",
    version,
    about = "Restart a command whenever watched files change.",
    long_about = None
)]
pub struct CliArgs {
    /// Directory tree to watch for changes.
    #[arg(long, short = 'p', value_name = "PATH", default_value = ".")]
    pub path: String,

    /// Working directory for the command.
    ///
    /// Defaults to the watched path.
    #[arg(long, value_name = "PATH")]
    pub workdir: Option<String>,

    /// Comma-separated regex patterns for files to watch.
    ///
    /// Patterns are matched against the full path, not just the file name.
    #[arg(
        long,
        short = 'r',
        value_name = "REGEX",
        value_delimiter = ',',
        default_value = ".*"
    )]
    pub regex: Vec<String>,

    /// Comma-separated KEY=VALUE environment variables for the command.
    ///
    /// These win over a `.env` file in the working directory, which in turn
    /// wins over the inherited environment.
    #[arg(long, short = 'e', value_name = "KEY=VALUE", value_delimiter = ',')]
    pub env: Vec<String>,

    /// How often to scan for changes (e.g. "500ms", "2s").
    #[arg(long, value_name = "DURATION", default_value = "500ms")]
    pub poll_interval: String,

    /// Minimum delay between restarts; changes inside the window are dropped.
    #[arg(long, value_name = "DURATION", default_value = "1s")]
    pub restart_delay: String,

    /// Enable debug logging.
    #[arg(long, short = 'd')]
    pub debug: bool,

    /// Only log errors.
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `HOTRELOAD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// The command to run and restart, given after `--`.
    #[arg(value_name = "COMMAND", last = true, required = true, num_args = 1..)]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
