//! Stand-in `orterun` scripts.
//!
//! Each fake lives in its own temp directory; point a command's prefix at
//! [`FakeLauncher::prefix`] and the real launcher is never touched.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tempfile::TempDir;

pub struct FakeLauncher {
    dir: TempDir,
    prefix: String,
}

impl FakeLauncher {
    /// Write an executable `orterun` whose body is the given shell snippet.
    /// The launcher's arguments are available as `"$@"`.
    pub fn with_body(body: &str) -> Self {
        let dir = tempfile::tempdir().expect("creating fake launcher dir");
        let script = dir.path().join("orterun");
        fs::write(&script, format!("#!/bin/sh\n{body}\n")).expect("writing fake launcher");
        let mut perms = fs::metadata(&script)
            .expect("stat fake launcher")
            .permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&script, perms).expect("chmod fake launcher");

        let prefix = format!("{}/", dir.path().display());
        Self { dir, prefix }
    }

    /// Echo the arguments to stdout, a marker to stderr, and exit with `code`.
    pub fn exiting_with(code: i32) -> Self {
        Self::with_body(&format!(
            "echo \"args: $*\"\necho \"launcher stderr\" >&2\nexit {code}"
        ))
    }

    /// Replace itself with a long `sleep`; dies on SIGTERM.
    pub fn sleeping() -> Self {
        Self::with_body("exec sleep 30")
    }

    /// Ignore SIGTERM and keep looping; only SIGKILL stops it.
    pub fn ignoring_terminate() -> Self {
        Self::with_body("trap '' TERM\nwhile :; do sleep 1; done")
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}
