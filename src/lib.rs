// src/lib.rs

pub mod cli;
pub mod command;
pub mod config;
pub mod errors;
pub mod logging;
pub mod supervisor;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::cli::CliArgs;
use crate::command::{CommandLine, LayeredEnv};
use crate::config::{ConfigFile, load_and_validate};
use crate::supervisor::{EscalationPolicy, OrteRunner};

/// High-level entry point used by `main.rs`.
///
/// Loads the config, builds the launcher command, starts it, and waits for
/// it with the configured timeout. Ctrl-C terminates the launcher.
/// Returns the launcher's exit code.
pub async fn run(args: CliArgs) -> Result<i32> {
    let config_path = PathBuf::from(&args.config);
    let mut cfg = load_and_validate(&config_path)
        .with_context(|| format!("loading config {}", config_path.display()))?;
    apply_overrides(&mut cfg, &args)?;

    let defaults = Arc::new(LayeredEnv::new(cfg.default_env.clone()));
    let runner = OrteRunner::new(defaults, EscalationPolicy::from(&cfg.escalation));
    let cmd = runner.build_from_config(&cfg)?;

    if args.dry_run {
        print_dry_run(&cfg, &cmd);
        return Ok(0);
    }

    let mut handle = runner.start(&cmd)?;
    let timeout = cfg.wait_timeout();

    let finished = tokio::select! {
        res = runner.wait(&mut handle, timeout) => Some(res),
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                warn!(error = %e, "failed to listen for Ctrl+C");
            }
            None
        }
    };

    let code = match finished {
        Some(res) => res?,
        None => {
            warn!(suite = handle.suite(), "interrupted; terminating launcher");
            runner.terminate(&mut handle).await?.exit_code
        }
    };

    Ok(code)
}

/// CLI flags win over the file. Overridden values go through the same
/// checks the loader applies.
fn apply_overrides(cfg: &mut ConfigFile, args: &CliArgs) -> Result<()> {
    if let Some(suite) = &args.suite {
        let suite = suite.trim();
        if suite.is_empty() || suite.contains('/') || suite.contains('\\') {
            anyhow::bail!("--suite '{suite}' must be a non-empty name without path separators");
        }
        cfg.runner.suite = suite.to_string();
    }
    if let Some(secs) = args.timeout {
        if secs == 0 {
            anyhow::bail!("--timeout must be >= 1 second");
        }
        cfg.runner.wait_secs = secs;
    }
    Ok(())
}

fn print_dry_run(cfg: &ConfigFile, cmd: &CommandLine) {
    println!("orte-runner dry-run");
    println!("  suite = {}", cfg.runner.suite);
    println!("  wait = {:?}", cfg.wait_timeout());
    println!("  stdout log: {}", cmd.stdout_log().display());
    println!("  stderr log: {}", cmd.stderr_log().display());
    println!();
    println!("command:");
    println!("  {}", cmd.render());

    debug!("dry-run complete (no execution)");
}
