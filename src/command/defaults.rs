// src/command/defaults.rs

//! Lookup of "default environment" values.
//!
//! Node lists given as upper-case names (e.g. `CRT_NODES`) and the launcher
//! URI (`TR_USE_URI`) are resolved through a [`DefaultEnv`] handed to the
//! builder, so callers decide whether the process environment, a config
//! table, or both are consulted.

use std::collections::BTreeMap;
use std::fmt::Debug;

/// Name of the variable holding the launcher URI file (`--hnp file:<uri>`).
pub const USE_URI_VAR: &str = "TR_USE_URI";

pub trait DefaultEnv: Send + Sync + Debug {
    fn get(&self, key: &str) -> Option<String>;

    /// Like [`get`](Self::get), but treats an empty value as unset.
    fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.is_empty())
    }
}

/// Reads straight from `std::env`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl DefaultEnv for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// A fixed map with no fallback. Useful for hermetic callers and tests.
#[derive(Debug, Clone, Default)]
pub struct MapEnv {
    values: BTreeMap<String, String>,
}

impl MapEnv {
    pub fn new(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl DefaultEnv for MapEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Config-provided values first, then the process environment.
#[derive(Debug, Clone, Default)]
pub struct LayeredEnv {
    overrides: MapEnv,
    fallback: ProcessEnv,
}

impl LayeredEnv {
    pub fn new(overrides: BTreeMap<String, String>) -> Self {
        Self {
            overrides: MapEnv::new(overrides),
            fallback: ProcessEnv,
        }
    }
}

impl DefaultEnv for LayeredEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.overrides.get(key).or_else(|| self.fallback.get(key))
    }
}
