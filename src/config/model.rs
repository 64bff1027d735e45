// src/config/model.rs

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::command::EnvOverlay;
use crate::supervisor::EscalationPolicy;

/// Configuration exactly as deserialized from TOML, before validation.
///
/// ```toml
/// [runner]
/// suite = "cart_echo"
/// log_dir = "logs"
///
/// [default_env]
/// CRT_NODES = "node1,node2"
///
/// [[program]]
/// cmd = "tests/crt_echo_srv"
/// nodes = "CRT_NODES"
/// env = { CRT_PHY_ADDR_STR = "ofi+sockets" }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    pub runner: RunnerSection,

    #[serde(default)]
    pub escalation: EscalationSection,

    /// Values consulted before the process environment when resolving
    /// upper-case node names and `TR_USE_URI`.
    #[serde(default)]
    pub default_env: BTreeMap<String, String>,

    /// Program blocks, joined with ` :` on the launcher command line.
    #[serde(default)]
    pub program: Vec<ProgramConfig>,
}

/// Validated configuration. Only obtainable through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub runner: RunnerSection,
    pub escalation: EscalationSection,
    pub default_env: BTreeMap<String, String>,
    pub program: Vec<ProgramConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            runner: raw.runner,
            escalation: raw.escalation,
            default_env: raw.default_env,
            program: raw.program,
        }
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.runner.wait_secs)
    }
}

/// `[runner]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerSection {
    /// Suite name; used as the stem of `<suite>.out` / `<suite>.err`.
    pub suite: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    /// Directory holding `orterun`, including the trailing separator.
    /// Empty means "look it up on PATH".
    #[serde(default)]
    pub prefix: String,

    /// Seconds to wait for the launcher before escalating.
    #[serde(default = "default_wait_secs")]
    pub wait_secs: u64,
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_wait_secs() -> u64 {
    crate::supervisor::DEFAULT_WAIT.as_secs()
}

/// `[escalation]` section. Controls how hard and how fast a stuck launcher is
/// stopped once the wait timeout expires.
#[derive(Debug, Clone, Deserialize)]
pub struct EscalationSection {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,

    #[serde(default = "default_terminate_grace_ms")]
    pub terminate_grace_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    1_000
}

fn default_poll_attempts() -> u32 {
    60
}

fn default_terminate_grace_ms() -> u64 {
    2_000
}

impl Default for EscalationSection {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            poll_attempts: default_poll_attempts(),
            terminate_grace_ms: default_terminate_grace_ms(),
        }
    }
}

impl From<&EscalationSection> for EscalationPolicy {
    fn from(section: &EscalationSection) -> Self {
        EscalationPolicy {
            poll_interval: Duration::from_millis(section.poll_interval_ms),
            poll_attempts: section.poll_attempts,
            terminate_grace: Duration::from_millis(section.terminate_grace_ms),
        }
    }
}

/// One `[[program]]` block.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgramConfig {
    /// Program path as the launcher should see it.
    pub cmd: String,

    /// Extra arguments, appended verbatim (shell quoting is honoured).
    #[serde(default)]
    pub parameters: String,

    /// Host list, or the name of a default-env variable holding one when it
    /// starts with an upper-case letter.
    #[serde(default = "default_nodes")]
    pub nodes: String,

    #[serde(default = "default_procs")]
    pub procs: u32,

    /// Variables injected with `-x`. An empty value forwards the caller's
    /// value instead of setting one.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

fn default_nodes() -> String {
    "localhost".to_string()
}

fn default_procs() -> u32 {
    1
}

impl ProgramConfig {
    pub fn env_overlay(&self) -> EnvOverlay {
        self.env
            .iter()
            .map(|(name, value)| {
                let value = (!value.is_empty()).then(|| value.clone());
                (name.clone(), value)
            })
            .collect()
    }
}
