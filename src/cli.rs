// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `orte-runner`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "orte-runner",
    version,
    about = "Launch a test suite through orterun and supervise it with a timeout.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    #[arg(long, value_name = "PATH", default_value = "OrteRunner.toml")]
    pub config: String,

    /// Override `[runner].suite` (also used as the log file stem).
    #[arg(long, value_name = "NAME")]
    pub suite: Option<String>,

    /// Override `[runner].wait_secs`: how long to wait before escalating.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `ORTE_RUNNER_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Build and print the launcher command, but don't start it.
    #[arg(long)]
    pub dry_run: bool,
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
