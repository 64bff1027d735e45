// src/supervisor/handle.rs

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use tokio::process::Child;

use crate::errors::Result;

use super::FORCED_EXIT_CODE;

/// A running (or finished) launcher process together with its log files.
///
/// The exit code is `None` until the process has been observed to exit.
#[derive(Debug)]
pub struct ProcessHandle {
    child: Child,
    pid: u32,
    suite: String,
    exit_code: Option<i32>,
    stdout_log: PathBuf,
    stderr_log: PathBuf,
}

impl ProcessHandle {
    pub(crate) fn new(
        child: Child,
        pid: u32,
        suite: String,
        stdout_log: PathBuf,
        stderr_log: PathBuf,
    ) -> Self {
        Self {
            child,
            pid,
            suite,
            exit_code: None,
            stdout_log,
            stderr_log,
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn suite(&self) -> &str {
        &self.suite
    }

    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    pub fn stdout_log(&self) -> &Path {
        &self.stdout_log
    }

    pub fn stderr_log(&self) -> &Path {
        &self.stderr_log
    }

    /// Non-blocking check. Returns the exit code once the child has exited.
    pub(crate) fn poll(&mut self) -> Result<Option<i32>> {
        if self.exit_code.is_some() {
            return Ok(self.exit_code);
        }
        if let Some(status) = self.child.try_wait()? {
            self.exit_code = Some(exit_code_of(status));
        }
        Ok(self.exit_code)
    }

    /// Block until the child exits and record its code.
    pub(crate) async fn wait_exit(&mut self) -> Result<i32> {
        if let Some(code) = self.exit_code {
            return Ok(code);
        }
        let status = self.child.wait().await?;
        let code = exit_code_of(status);
        self.exit_code = Some(code);
        Ok(code)
    }

    /// Force-kill and reap the child.
    pub(crate) async fn kill(&mut self) -> std::io::Result<()> {
        self.child.kill().await
    }

    /// Record the code reported for a forced stop.
    pub(crate) fn mark_forced(&mut self) {
        self.exit_code = Some(FORCED_EXIT_CODE);
    }
}

/// Exit code of a finished process; a death by signal `N` maps to `-N`.
pub(crate) fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return -sig;
        }
    }

    FORCED_EXIT_CODE
}
