use std::io::Write;

use orte_runner::config::load_and_validate;
use orte_runner::errors::OrteRunnerError;
use tempfile::NamedTempFile;

fn load(contents: &str) -> Result<orte_runner::config::ConfigFile, OrteRunnerError> {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    load_and_validate(file.path())
}

fn expect_config_error(contents: &str, needle: &str) {
    match load(contents) {
        Err(OrteRunnerError::ConfigError(msg)) => {
            assert!(msg.contains(needle), "message {msg:?} should mention {needle:?}");
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn full_config_loads() {
    let cfg = load(
        r#"
[runner]
suite = "cart_echo"
log_dir = "out/logs"
prefix = "/opt/ompi/bin/"
wait_secs = 30

[escalation]
poll_interval_ms = 250
poll_attempts = 8
terminate_grace_ms = 500

[default_env]
CRT_NODES = "n1,n2"

[[program]]
cmd = "tests/crt_echo_srv"
nodes = "CRT_NODES"
procs = 2
env = { CRT_PHY_ADDR_STR = "ofi+sockets" }

[[program]]
cmd = "tests/crt_echo_cli"
parameters = "--name client"
"#,
    )
    .unwrap();

    assert_eq!(cfg.runner.suite, "cart_echo");
    assert_eq!(cfg.wait_timeout(), std::time::Duration::from_secs(30));
    assert_eq!(cfg.escalation.poll_attempts, 8);
    assert_eq!(cfg.program.len(), 2);
    assert_eq!(cfg.program[1].parameters, "--name client");
}

#[test]
fn missing_programs_is_rejected() {
    expect_config_error(
        r#"
[runner]
suite = "s"
"#,
        "[[program]]",
    );
}

#[test]
fn suite_with_path_separator_is_rejected() {
    expect_config_error(
        r#"
[runner]
suite = "../escape"

[[program]]
cmd = "a.out"
"#,
        "path separators",
    );
}

#[test]
fn suite_is_stored_trimmed() {
    let cfg = load(
        r#"
[runner]
suite = "  cart_test "

[[program]]
cmd = "a.out"
"#,
    )
    .unwrap();
    assert_eq!(cfg.runner.suite, "cart_test");
}

#[test]
fn blank_suite_is_rejected() {
    expect_config_error(
        r#"
[runner]
suite = "   "

[[program]]
cmd = "a.out"
"#,
        "suite",
    );
}

#[test]
fn zero_procs_is_rejected() {
    expect_config_error(
        r#"
[runner]
suite = "s"

[[program]]
cmd = "a.out"
procs = 0
"#,
        "procs",
    );
}

#[test]
fn zero_wait_is_rejected() {
    expect_config_error(
        r#"
[runner]
suite = "s"
wait_secs = 0

[[program]]
cmd = "a.out"
"#,
        "wait_secs",
    );
}

#[test]
fn bad_env_name_is_rejected() {
    expect_config_error(
        r#"
[runner]
suite = "s"

[[program]]
cmd = "a.out"
env = { "1BAD" = "x" }
"#,
        "1BAD",
    );
}

#[test]
fn missing_runner_section_is_a_toml_error() {
    let result = load(
        r#"
[[program]]
cmd = "a.out"
"#,
    );
    assert!(matches!(result, Err(OrteRunnerError::TomlError(_))));
}

#[test]
fn missing_file_is_an_io_error() {
    let result = load_and_validate("/definitely/not/here/OrteRunner.toml");
    assert!(matches!(result, Err(OrteRunnerError::IoError(_))));
}
