// src/supervisor/mod.rs

//! Launcher process supervision.
//!
//! - [`runner`] owns [`OrteRunner`]: start, liveness check, bounded wait and
//!   the stop escalation.
//! - [`handle`] wraps the spawned child as a [`ProcessHandle`].
//! - [`escalation`] holds the timing policy and the stop state machine types.
//! - [`signal`] sends the graceful terminate request.

pub mod escalation;
pub mod handle;
pub mod runner;
pub mod signal;

pub use escalation::{EscalationPolicy, StopOutcome, StopStage};
pub use handle::ProcessHandle;
pub use runner::{DEFAULT_WAIT, OrteRunner};

/// Exit code reported when the launcher had to be terminated or killed.
pub const FORCED_EXIT_CODE: i32 = -1;
