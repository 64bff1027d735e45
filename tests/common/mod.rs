#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use orte_runner::command::MapEnv;
use orte_runner::config::ConfigFile;
use orte_runner::supervisor::{EscalationPolicy, OrteRunner};

pub use orte_runner_test_utils::init_tracing;

/// A runner that only sees the config's `[default_env]` table.
pub fn hermetic_runner(cfg: &ConfigFile) -> OrteRunner {
    let defaults = MapEnv::new(cfg.default_env.clone());
    OrteRunner::new(Arc::new(defaults), EscalationPolicy::from(&cfg.escalation))
}

pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| panic!("reading {path:?}: {e}"))
}

pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}
