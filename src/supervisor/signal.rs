// src/supervisor/signal.rs

use crate::errors::{OrteRunnerError, Result};

/// Ask `pid` to terminate. Returns `Ok(false)` if the process is already
/// gone.
#[cfg(unix)]
pub fn request_terminate(pid: u32) -> Result<bool> {
    use nix::errno::Errno;
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    let raw = i32::try_from(pid).map_err(|_| OrteRunnerError::SignalError {
        pid,
        reason: "pid does not fit in pid_t".to_string(),
    })?;

    match kill(Pid::from_raw(raw), Signal::SIGTERM) {
        Ok(()) => Ok(true),
        Err(Errno::ESRCH) => Ok(false),
        Err(errno) => Err(OrteRunnerError::SignalError {
            pid,
            reason: errno.desc().to_string(),
        }),
    }
}

/// Without POSIX signals there is no graceful request to send; the caller
/// falls through to a hard kill after the grace period.
#[cfg(not(unix))]
pub fn request_terminate(_pid: u32) -> Result<bool> {
    Ok(true)
}

/// True for errors meaning "there is no such process any more".
pub fn is_already_gone(err: &std::io::Error) -> bool {
    if err.kind() == std::io::ErrorKind::InvalidInput {
        return true;
    }

    #[cfg(unix)]
    {
        if err.raw_os_error() == Some(nix::errno::Errno::ESRCH as i32) {
            return true;
        }
    }

    false
}
