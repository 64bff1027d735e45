// src/command/mod.rs

//! Launcher command-line construction.
//!
//! - [`builder`] owns [`CommandLine`], the ordered list of fragments passed
//!   to `orterun`.
//! - [`defaults`] resolves upper-case node names and `TR_USE_URI` through an
//!   injected [`DefaultEnv`].
//! - [`user`] answers "are we root?" for `--allow-run-as-root`.

pub mod builder;
pub mod defaults;
pub mod user;

use std::collections::BTreeMap;

use crate::config::ConfigFile;
use crate::errors::Result;

pub use builder::{CommandLine, LAUNCHER_BINARY};
pub use defaults::{DefaultEnv, LayeredEnv, MapEnv, ProcessEnv, USE_URI_VAR};

/// Variables injected into the launched ranks with `-x`, rendered sorted
/// by name.
///
/// `None` forwards the caller's value (`-x NAME`), `Some` sets one
/// (`-x NAME=VALUE`).
pub type EnvOverlay = BTreeMap<String, Option<String>>;

/// Build the full launcher command for a validated config.
///
/// Program blocks after the first are separated with ` :`.
pub fn build_from_config(cfg: &ConfigFile, defaults: &dyn DefaultEnv) -> Result<CommandLine> {
    let mut cmd = CommandLine::start(
        &cfg.runner.log_dir,
        &cfg.runner.suite,
        &cfg.runner.prefix,
        defaults,
    )?;

    for (idx, program) in cfg.program.iter().enumerate() {
        if idx > 0 {
            cmd.add_separator();
        }
        cmd.add_nodes(&program.nodes, program.procs, defaults)?;
        cmd.add_env_vars(&program.env_overlay())?;
        cmd.add_cmd(&program.cmd, &program.parameters, false);
    }

    Ok(cmd)
}
