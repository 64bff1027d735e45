// src/command/builder.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::command::EnvOverlay;
use crate::command::defaults::{DefaultEnv, USE_URI_VAR};
use crate::command::user;
use crate::errors::{OrteRunnerError, Result};

pub const LAUNCHER_BINARY: &str = "orterun";

/// Ordered fragments of an `orterun` invocation.
///
/// The first fragment is the launcher path. Every later fragment starts with
/// a single space, so concatenating them yields a well-formed command string
/// that can be re-tokenized with shell word rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    fragments: Vec<String>,
    suite: String,
    log_dir: PathBuf,
}

impl CommandLine {
    /// Begin a command for `suite`, logging into `log_path`.
    ///
    /// `log_path` is made absolute and created if missing. `prefix` is
    /// prepended verbatim to the launcher name, so a directory prefix needs
    /// its trailing separator.
    pub fn start(
        log_path: impl AsRef<Path>,
        suite: &str,
        prefix: &str,
        defaults: &dyn DefaultEnv,
    ) -> Result<Self> {
        Self::start_with_root(log_path, suite, prefix, defaults, user::is_root())
    }

    /// Same as [`start`](Self::start) with the root check supplied by the
    /// caller.
    pub fn start_with_root(
        log_path: impl AsRef<Path>,
        suite: &str,
        prefix: &str,
        defaults: &dyn DefaultEnv,
        as_root: bool,
    ) -> Result<Self> {
        let log_dir = std::path::absolute(log_path.as_ref())?;
        fs::create_dir_all(&log_dir)?;

        let launcher = quote_word(&format!("{prefix}{LAUNCHER_BINARY}"))?;
        let output_dir = quote_word(&log_dir.to_string_lossy())?;

        let mut cmd = Self {
            fragments: vec![launcher],
            suite: suite.to_string(),
            log_dir,
        };

        if let Some(uri) = defaults.get_non_empty(USE_URI_VAR) {
            cmd.push(format!("--hnp {}", quote_word(&format!("file:{uri}"))?));
        }
        cmd.push(format!("--output-filename {output_dir}"));
        if as_root {
            cmd.push("--allow-run-as-root");
        }

        debug!(suite, log_dir = %cmd.log_dir.display(), "started launcher command");
        Ok(cmd)
    }

    /// Append a program and its parameters. With `next_cmd`, a ` :` block
    /// separator is added first.
    ///
    /// Both are taken as shell words, so quoting inside `parameters` is
    /// honoured by [`argv`](Self::argv).
    pub fn add_cmd(&mut self, cmd: &str, parameters: &str, next_cmd: bool) -> &mut Self {
        if next_cmd {
            self.add_separator();
        }
        self.push(cmd);
        if !parameters.is_empty() {
            self.push(parameters);
        }
        self
    }

    /// Append the ` :` separator that starts a new program block.
    pub fn add_separator(&mut self) -> &mut Self {
        self.push(":")
    }

    /// Append one `-x` flag per overlay entry, sorted by variable name.
    pub fn add_env_vars(&mut self, env: &EnvOverlay) -> Result<&mut Self> {
        for (name, value) in env {
            match value.as_deref() {
                Some(v) if !v.is_empty() => self.push(format!("-x {name}={}", quote_word(v)?)),
                _ => self.push(format!("-x {name}")),
            };
        }
        Ok(self)
    }

    /// Append `-H <hosts> -N <procs>`.
    ///
    /// A `nodes` value starting with an upper-case letter names a default
    /// environment variable holding the host list.
    pub fn add_nodes(
        &mut self,
        nodes: &str,
        procs: u32,
        defaults: &dyn DefaultEnv,
    ) -> Result<&mut Self> {
        let host_list = quote_word(&resolve_nodes(nodes, defaults)?)?;
        Ok(self.push(format!("-H {host_list} -N {procs}")))
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn suite(&self) -> &str {
        &self.suite
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn stdout_log(&self) -> PathBuf {
        self.log_dir.join(format!("{}.out", self.suite))
    }

    pub fn stderr_log(&self) -> PathBuf {
        self.log_dir.join(format!("{}.err", self.suite))
    }

    /// The command as a single string, exactly as logged.
    pub fn render(&self) -> String {
        self.fragments.concat()
    }

    /// Re-tokenize the rendered command into argv.
    pub fn argv(&self) -> Result<Vec<String>> {
        let rendered = self.render();
        let argv = shlex::split(&rendered).ok_or_else(|| {
            OrteRunnerError::TokenizeError(format!("unbalanced quoting in `{rendered}`"))
        })?;
        if argv.is_empty() {
            return Err(OrteRunnerError::TokenizeError(
                "command line is empty".to_string(),
            ));
        }
        Ok(argv)
    }

    fn push(&mut self, fragment: impl AsRef<str>) -> &mut Self {
        self.fragments.push(format!(" {}", fragment.as_ref()));
        self
    }
}

/// Quote a single value so it survives re-tokenization as one word.
fn quote_word(value: &str) -> Result<String> {
    shlex::try_quote(value)
        .map(|quoted| quoted.into_owned())
        .map_err(|e| OrteRunnerError::TokenizeError(format!("cannot quote `{value}`: {e}")))
}

fn resolve_nodes(nodes: &str, defaults: &dyn DefaultEnv) -> Result<String> {
    match nodes.chars().next() {
        None => Err(OrteRunnerError::ConfigError(
            "node list must not be empty".to_string(),
        )),
        Some(c) if c.is_ascii_uppercase() => defaults.get_non_empty(nodes).ok_or_else(|| {
            OrteRunnerError::ConfigError(format!(
                "node variable '{nodes}' is not set in the default environment"
            ))
        }),
        Some(_) => Ok(nodes.to_string()),
    }
}
