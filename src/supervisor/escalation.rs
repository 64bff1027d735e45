// src/supervisor/escalation.rs

use std::time::Duration;

/// Timing for stopping a launcher that outlived its wait timeout.
///
/// Stopping moves through: poll for a natural exit (`poll_attempts` polls,
/// `poll_interval` apart), then SIGTERM with `terminate_grace` to exit,
/// then SIGKILL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalationPolicy {
    pub poll_interval: Duration,
    pub poll_attempts: u32,
    pub terminate_grace: Duration,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            poll_attempts: 60,
            terminate_grace: Duration::from_secs(2),
        }
    }
}

impl EscalationPolicy {
    /// Upper bound on the time spent before the final kill is issued.
    pub fn max_stop_duration(&self) -> Duration {
        self.poll_interval * self.poll_attempts + self.terminate_grace
    }
}

/// Where the stop state machine ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopStage {
    /// The process exited on its own (possibly before stop was called).
    Exited,
    /// The process went away after SIGTERM, or was already gone when
    /// the signal was sent.
    Terminated,
    /// SIGTERM was not enough; the process was killed.
    Killed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopOutcome {
    pub stage: StopStage,
    pub exit_code: i32,
}

impl StopOutcome {
    pub fn was_forced(&self) -> bool {
        self.stage != StopStage::Exited
    }
}
