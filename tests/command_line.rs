use orte_runner::command::{CommandLine, MapEnv, USE_URI_VAR, build_from_config};
use orte_runner::errors::OrteRunnerError;
use orte_runner_test_utils::builders::{ConfigFileBuilder, ProgramConfigBuilder};
use proptest::prelude::*;

#[test]
fn single_program_renders_in_launcher_order() {
    let tmp = tempfile::tempdir().unwrap();
    let log_dir = tmp.path().join("logs");
    let cfg = ConfigFileBuilder::new("echo")
        .log_dir(log_dir.to_str().unwrap())
        .prefix("/opt/ompi/bin/")
        .with_program(
            ProgramConfigBuilder::new("tests/crt_echo_srv")
                .parameters("--name srv")
                .nodes("node1")
                .procs(2)
                .env("CRT_PHY_ADDR_STR", "ofi+sockets")
                .env("OFI_INTERFACE", "")
                .build(),
        )
        .build();

    let cmd = build_from_config(&cfg, &MapEnv::default()).unwrap();
    let rendered = cmd.render();

    assert!(rendered.starts_with("/opt/ompi/bin/orterun --output-filename "));
    assert!(rendered.ends_with(
        " -H node1 -N 2 -x CRT_PHY_ADDR_STR=ofi+sockets -x OFI_INTERFACE tests/crt_echo_srv --name srv"
    ));
    assert_eq!(cmd.stdout_log(), log_dir.join("echo.out"));
}

#[test]
fn multiple_programs_are_joined_with_colon() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = ConfigFileBuilder::new("mpmd")
        .log_dir(tmp.path().to_str().unwrap())
        .default_env("SRV_NODES", "s1")
        .with_program(ProgramConfigBuilder::new("srv").nodes("SRV_NODES").build())
        .with_program(ProgramConfigBuilder::new("cli").nodes("c1").procs(3).build())
        .build();

    let defaults = MapEnv::new(cfg.default_env.clone());
    let argv = build_from_config(&cfg, &defaults).unwrap().argv().unwrap();
    let colon = argv.iter().position(|a| a == ":").expect("separator present");

    assert_eq!(&argv[colon - 5..colon], ["-H", "s1", "-N", "1", "srv"]);
    assert_eq!(&argv[colon + 1..], ["-H", "c1", "-N", "3", "cli"]);
}

#[test]
fn launcher_uri_comes_from_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = ConfigFileBuilder::new("uri")
        .log_dir(tmp.path().to_str().unwrap())
        .default_env(USE_URI_VAR, "/tmp/ompi.uri")
        .with_program(ProgramConfigBuilder::new("a.out").build())
        .build();

    let defaults = MapEnv::new(cfg.default_env.clone());
    let cmd = build_from_config(&cfg, &defaults).unwrap();
    assert_eq!(cmd.fragments()[1], " --hnp file:/tmp/ompi.uri");
}

#[test]
fn unknown_node_variable_fails_the_build() {
    let tmp = tempfile::tempdir().unwrap();
    let cfg = ConfigFileBuilder::new("nodes")
        .log_dir(tmp.path().to_str().unwrap())
        .with_program(ProgramConfigBuilder::new("a.out").nodes("NOT_SET").build())
        .build();

    let err = build_from_config(&cfg, &MapEnv::default()).unwrap_err();
    assert!(matches!(err, OrteRunnerError::ConfigError(_)));
}

#[cfg(unix)]
#[test]
fn relative_log_dir_is_made_absolute() {
    let tmp = tempfile::tempdir().unwrap();
    let cwd = std::env::current_dir().unwrap();
    // Climb from the working directory to `/`, then back down into the tempdir.
    let ups = "../".repeat(cwd.components().count() - 1);
    let target = tmp.path().join("logs");
    let relative = format!("{ups}{}", target.strip_prefix("/").unwrap().display());

    let cfg = ConfigFileBuilder::new("rel")
        .log_dir(&relative)
        .with_program(ProgramConfigBuilder::new("a.out").build())
        .build();

    let cmd = build_from_config(&cfg, &MapEnv::default()).unwrap();
    assert!(cmd.log_dir().is_absolute());
    assert!(target.is_dir());
}

#[test]
fn log_dir_with_spaces_is_one_argument() {
    let tmp = tempfile::tempdir().unwrap();
    let log_dir = tmp.path().join("my logs");
    let cfg = ConfigFileBuilder::new("spaced")
        .log_dir(log_dir.to_str().unwrap())
        .with_program(
            ProgramConfigBuilder::new("a.out")
                .nodes("node1,node2")
                .env("GREETING", "hello world")
                .build(),
        )
        .build();

    let argv = build_from_config(&cfg, &MapEnv::default())
        .unwrap()
        .argv()
        .unwrap();
    assert_eq!(&argv[1..3], ["--output-filename", log_dir.to_str().unwrap()]);
    assert_eq!(
        &argv[3..],
        ["-H", "node1,node2", "-N", "1", "-x", "GREETING=hello world", "a.out"]
    );
}

fn word() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_./-]{0,12}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn fragments_keep_launcher_first_and_leading_spaces(
        prefix in prop_oneof![Just(String::new()), Just("/opt/ompi/bin/".to_string())],
        programs in proptest::collection::vec((word(), word(), 1u32..16), 1..4),
        env in proptest::collection::btree_map("[A-Z_][A-Z0-9_]{0,8}", proptest::option::of(word()), 0..4),
        as_root in any::<bool>(),
    ) {
        let tmp = tempfile::tempdir().unwrap();
        let defaults = MapEnv::default();
        let mut cmd = CommandLine::start_with_root(tmp.path(), "prop", &prefix, &defaults, as_root).unwrap();

        for (idx, (program, nodes, procs)) in programs.iter().enumerate() {
            if idx > 0 {
                cmd.add_separator();
            }
            cmd.add_nodes(nodes, *procs, &defaults).unwrap();
            cmd.add_env_vars(&env).unwrap();
            cmd.add_cmd(program, "", false);
        }

        let fragments = cmd.fragments();
        let launcher = format!("{prefix}orterun");
        prop_assert_eq!(&fragments[0], &launcher);
        for fragment in &fragments[1..] {
            prop_assert!(fragment.starts_with(' '), "fragment {:?} lacks leading space", fragment);
            prop_assert!(!fragment.starts_with("  "), "fragment {:?} has a doubled space", fragment);
        }

        let argv = cmd.argv().unwrap();
        prop_assert_eq!(&argv[0], &launcher);
        prop_assert_eq!(argv.iter().filter(|a| *a == ":").count(), programs.len() - 1);
    }
}
