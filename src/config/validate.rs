// src/config/validate.rs

use std::sync::LazyLock;

use regex::Regex;

use crate::config::model::{ConfigFile, ProgramConfig, RawConfigFile};
use crate::errors::{OrteRunnerError, Result};

static ENV_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static env-name regex is valid")
});

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = OrteRunnerError;

    fn try_from(mut raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        raw.runner.suite = raw.runner.suite.trim().to_string();
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_runner(cfg)?;
    validate_escalation(cfg)?;
    ensure_has_programs(cfg)?;
    for (idx, program) in cfg.program.iter().enumerate() {
        validate_program(idx, program)?;
    }
    for name in cfg.default_env.keys() {
        validate_env_name("[default_env]", name)?;
    }
    Ok(())
}

fn config_error(msg: impl Into<String>) -> OrteRunnerError {
    OrteRunnerError::ConfigError(msg.into())
}

fn validate_runner(cfg: &RawConfigFile) -> Result<()> {
    let suite = cfg.runner.suite.as_str();
    if suite.is_empty() {
        return Err(config_error("[runner].suite must not be empty"));
    }
    if suite.contains('/') || suite.contains('\\') {
        return Err(config_error(format!(
            "[runner].suite '{suite}' must not contain path separators"
        )));
    }
    if cfg.runner.wait_secs == 0 {
        return Err(config_error("[runner].wait_secs must be >= 1 (got 0)"));
    }
    Ok(())
}

fn validate_escalation(cfg: &RawConfigFile) -> Result<()> {
    if cfg.escalation.poll_interval_ms == 0 {
        return Err(config_error(
            "[escalation].poll_interval_ms must be >= 1 (got 0)",
        ));
    }
    Ok(())
}

fn ensure_has_programs(cfg: &RawConfigFile) -> Result<()> {
    if cfg.program.is_empty() {
        return Err(config_error(
            "config must contain at least one [[program]] section",
        ));
    }
    Ok(())
}

fn validate_program(idx: usize, program: &ProgramConfig) -> Result<()> {
    if program.cmd.trim().is_empty() {
        return Err(config_error(format!("program #{idx} has an empty `cmd`")));
    }
    if program.nodes.trim().is_empty() {
        return Err(config_error(format!(
            "program '{}' has an empty `nodes`",
            program.cmd
        )));
    }
    if program.procs == 0 {
        return Err(config_error(format!(
            "program '{}' must use procs >= 1 (got 0)",
            program.cmd
        )));
    }
    let section = format!("program '{}' env", program.cmd);
    for name in program.env.keys() {
        validate_env_name(&section, name)?;
    }
    Ok(())
}

fn validate_env_name(section: &str, name: &str) -> Result<()> {
    if ENV_NAME.is_match(name) {
        Ok(())
    } else {
        Err(config_error(format!(
            "{section}: '{name}' is not a valid environment variable name"
        )))
    }
}
