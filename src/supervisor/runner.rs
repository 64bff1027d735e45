// src/supervisor/runner.rs

//! The launcher supervisor.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::command::{self, CommandLine, DefaultEnv};
use crate::config::ConfigFile;
use crate::errors::{OrteRunnerError, Result};

use super::escalation::{EscalationPolicy, StopOutcome, StopStage};
use super::handle::ProcessHandle;
use super::{FORCED_EXIT_CODE, signal};

/// Wait used when the caller has no better idea.
pub const DEFAULT_WAIT: Duration = Duration::from_secs(180);

const BANNER_WIDTH: usize = 40;

/// Builds launcher commands and supervises the processes they start.
///
/// Collaborators are passed in at construction; a runner holds no per-process
/// state, so one instance can start any number of suites in sequence.
#[derive(Debug, Clone)]
pub struct OrteRunner {
    defaults: Arc<dyn DefaultEnv>,
    policy: EscalationPolicy,
}

impl OrteRunner {
    pub fn new(defaults: Arc<dyn DefaultEnv>, policy: EscalationPolicy) -> Self {
        Self { defaults, policy }
    }

    pub fn policy(&self) -> &EscalationPolicy {
        &self.policy
    }

    pub fn defaults(&self) -> &dyn DefaultEnv {
        self.defaults.as_ref()
    }

    /// Begin a launcher command for `suite` logging into `log_path`.
    pub fn start_cmd_list(
        &self,
        log_path: impl AsRef<Path>,
        suite: &str,
        prefix: &str,
    ) -> Result<CommandLine> {
        CommandLine::start(log_path, suite, prefix, self.defaults())
    }

    /// Append `-H/-N`, resolving upper-case node names through the defaults.
    pub fn add_nodes(&self, cmd: &mut CommandLine, nodes: &str, procs: u32) -> Result<()> {
        cmd.add_nodes(nodes, procs, self.defaults())?;
        Ok(())
    }

    pub fn build_from_config(&self, cfg: &ConfigFile) -> Result<CommandLine> {
        command::build_from_config(cfg, self.defaults())
    }

    /// Launch `cmd` with stdout/stderr appended to the suite log files.
    ///
    /// Both logs get a banner with the exact command string before the
    /// process starts writing.
    pub fn start(&self, cmd: &CommandLine) -> Result<ProcessHandle> {
        let cmdstr = cmd.render();
        info!(suite = cmd.suite(), command = %cmdstr, "starting launcher");

        let argv = cmd.argv()?;
        let Some((program, args)) = argv.split_first() else {
            return Err(OrteRunnerError::TokenizeError(
                "command line is empty".to_string(),
            ));
        };

        let stdout_log = cmd.stdout_log();
        let stderr_log = cmd.stderr_log();

        let mut outfile = open_log(&stdout_log)?;
        let mut errfile = open_log(&stderr_log)?;
        write_banner(&mut outfile, &cmdstr)?;
        write_banner(&mut errfile, &cmdstr)?;

        let child = Command::new(program)
            .args(args)
            .stdout(Stdio::from(outfile))
            .stderr(Stdio::from(errfile))
            .spawn()
            .map_err(|source| OrteRunnerError::SpawnError {
                program: program.clone(),
                source,
            })?;

        let pid = child.id().ok_or_else(|| {
            OrteRunnerError::Other(anyhow::anyhow!("launcher exited before its pid was read"))
        })?;

        debug!(suite = cmd.suite(), pid, "launcher spawned");
        Ok(ProcessHandle::new(
            child,
            pid,
            cmd.suite().to_string(),
            stdout_log,
            stderr_log,
        ))
    }

    /// Non-blocking liveness check.
    pub fn is_running(&self, handle: &mut ProcessHandle) -> Result<bool> {
        match handle.poll()? {
            None => Ok(true),
            Some(code) => {
                info!(
                    suite = handle.suite(),
                    pid = handle.pid(),
                    exit_code = code,
                    "process has exited"
                );
                Ok(false)
            }
        }
    }

    /// Wait up to `timeout` for the process, stopping it if it overruns.
    ///
    /// Always yields an exit code; `-1` means the process had to be forced.
    pub async fn wait(&self, handle: &mut ProcessHandle, timeout: Duration) -> Result<i32> {
        info!(suite = handle.suite(), pid = handle.pid(), ?timeout, "waiting for process");

        let waited = tokio::time::timeout(timeout, handle.wait_exit()).await;
        let code = match waited {
            Ok(res) => res?,
            Err(_elapsed) => {
                info!(suite = handle.suite(), pid = handle.pid(), ?timeout, "process timeout");
                self.stop("process timeout", handle).await?
            }
        };

        info!(suite = handle.suite(), exit_code = code, "return code");
        Ok(code)
    }

    /// Stop the process, returning the best-known exit code.
    pub async fn stop(&self, reason: &str, handle: &mut ProcessHandle) -> Result<i32> {
        Ok(self.escalate(reason, handle).await?.exit_code)
    }

    /// Run the full stop escalation and report where it ended.
    ///
    /// Polls for a natural exit first, then terminates, then kills.
    pub async fn escalate(&self, reason: &str, handle: &mut ProcessHandle) -> Result<StopOutcome> {
        info!(suite = handle.suite(), reason, pid = handle.pid(), "stopping process");

        let mut natural = None;
        for _ in 0..self.policy.poll_attempts {
            if let Some(code) = handle.poll()? {
                natural = Some(code);
                break;
            }
            tokio::time::sleep(self.policy.poll_interval).await;
        }

        let outcome = match natural {
            Some(exit_code) => StopOutcome {
                stage: StopStage::Exited,
                exit_code,
            },
            None => {
                info!(suite = handle.suite(), pid = handle.pid(), "still running; terminating");
                self.terminate(handle).await?
            }
        };

        info!(
            suite = handle.suite(),
            reason,
            stage = ?outcome.stage,
            exit_code = outcome.exit_code,
            "process stopped"
        );
        Ok(outcome)
    }

    /// Skip the polling window: SIGTERM, wait the grace period, then kill.
    pub async fn terminate(&self, handle: &mut ProcessHandle) -> Result<StopOutcome> {
        if let Some(exit_code) = handle.poll()? {
            return Ok(StopOutcome {
                stage: StopStage::Exited,
                exit_code,
            });
        }

        let pid = handle.pid();
        let stage = if signal::request_terminate(pid)? {
            let waited = tokio::time::timeout(self.policy.terminate_grace, handle.wait_exit()).await;
            match waited {
                Ok(Ok(_)) => StopStage::Terminated,
                Ok(Err(err)) => {
                    warn!(suite = handle.suite(), pid, error = %err, "wait after terminate failed");
                    force_kill(handle).await?;
                    StopStage::Killed
                }
                Err(_elapsed) => {
                    info!(suite = handle.suite(), pid, "killing process");
                    force_kill(handle).await?;
                    StopStage::Killed
                }
            }
        } else {
            debug!(suite = handle.suite(), pid, "process already gone");
            StopStage::Terminated
        };

        handle.mark_forced();
        Ok(StopOutcome {
            stage,
            exit_code: FORCED_EXIT_CODE,
        })
    }
}

async fn force_kill(handle: &mut ProcessHandle) -> Result<()> {
    match handle.kill().await {
        Ok(()) => Ok(()),
        Err(err) if signal::is_already_gone(&err) => {
            debug!(pid = handle.pid(), "process vanished before kill");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn open_log(path: &Path) -> Result<File> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(file)
}

fn write_banner(file: &mut File, cmdstr: &str) -> Result<()> {
    let rule = "=".repeat(BANNER_WIDTH);
    write!(file, "{rule}\n  Command: {cmdstr} \n{rule}\n")?;
    file.flush()?;
    Ok(())
}
