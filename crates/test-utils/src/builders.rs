#![allow(dead_code)]

use std::collections::BTreeMap;

use orte_runner::config::{
    ConfigFile, EscalationSection, ProgramConfig, RawConfigFile, RunnerSection,
};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new(suite: &str) -> Self {
        Self {
            config: RawConfigFile {
                runner: RunnerSection {
                    suite: suite.to_string(),
                    log_dir: "logs".to_string(),
                    prefix: String::new(),
                    wait_secs: 180,
                },
                escalation: EscalationSection::default(),
                default_env: BTreeMap::new(),
                program: vec![],
            },
        }
    }

    pub fn log_dir(mut self, dir: &str) -> Self {
        self.config.runner.log_dir = dir.to_string();
        self
    }

    pub fn prefix(mut self, prefix: &str) -> Self {
        self.config.runner.prefix = prefix.to_string();
        self
    }

    pub fn wait_secs(mut self, secs: u64) -> Self {
        self.config.runner.wait_secs = secs;
        self
    }

    /// Shrink the stop escalation so tests finish quickly.
    pub fn fast_escalation(mut self) -> Self {
        self.config.escalation = EscalationSection {
            poll_interval_ms: 20,
            poll_attempts: 5,
            terminate_grace_ms: 300,
        };
        self
    }

    pub fn default_env(mut self, key: &str, value: &str) -> Self {
        self.config
            .default_env
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_program(mut self, program: ProgramConfig) -> Self {
        self.config.program.push(program);
        self
    }

    /// The unvalidated config, for tests that exercise validation itself.
    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

/// Builder for `ProgramConfig`.
pub struct ProgramConfigBuilder {
    program: ProgramConfig,
}

impl ProgramConfigBuilder {
    pub fn new(cmd: &str) -> Self {
        Self {
            program: ProgramConfig {
                cmd: cmd.to_string(),
                parameters: String::new(),
                nodes: "localhost".to_string(),
                procs: 1,
                env: BTreeMap::new(),
            },
        }
    }

    pub fn parameters(mut self, params: &str) -> Self {
        self.program.parameters = params.to_string();
        self
    }

    pub fn nodes(mut self, nodes: &str) -> Self {
        self.program.nodes = nodes.to_string();
        self
    }

    pub fn procs(mut self, procs: u32) -> Self {
        self.program.procs = procs;
        self
    }

    pub fn env(mut self, name: &str, value: &str) -> Self {
        self.program.env.insert(name.to_string(), value.to_string());
        self
    }

    pub fn build(self) -> ProgramConfig {
        self.program
    }
}
