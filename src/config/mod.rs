// src/config/mod.rs

//! Configuration loading and validation.
//!
//! - [`model`] holds the serde types mirroring the TOML layout.
//! - [`loader`] reads files from disk.
//! - [`validate`] turns a [`RawConfigFile`] into a checked [`ConfigFile`].

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{
    ConfigFile, EscalationSection, ProgramConfig, RawConfigFile, RunnerSection,
};
