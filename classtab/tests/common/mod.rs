//! Shared integration-test harness for running the `classtab` binary.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Environment variables that would leak host settings into a run.
const CLASSTAB_ENV: [&str; 5] = [
    "CLASSTAB_CONFIG",
    "CLASSTAB_COLOR",
    "CLASSTAB_LOG_LEVEL",
    "CLASSTAB_MAX_CONFIG_SIZE",
    "CLASSTAB_MAX_PAGE_SIZE",
];

/// Runs `classtab` with `args` and waits for it to finish.
#[allow(clippy::missing_panics_doc)]
pub fn spawn_command(args: &[&str]) -> Output {
    spawn_command_with_env(args, &[])
}

/// Like [`spawn_command`] but with extra environment variables.
#[allow(clippy::missing_panics_doc)]
pub fn spawn_command_with_env(args: &[&str], env: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_classtab"));
    for var in CLASSTAB_ENV {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1")
        .envs(env.iter().copied())
        .args(args)
        .output()
        .expect("failed to spawn classtab")
}

/// Returns the path to a test fixture.
#[must_use]
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Copies a fixture into `dir` and returns the new path.
#[allow(clippy::missing_panics_doc)]
pub fn copy_fixture(name: &str, dir: &Path) -> PathBuf {
    let target = dir.join(name);
    std::fs::copy(fixture_path(name), &target).expect("failed to copy fixture");
    target
}

/// Lossy stdout.
#[must_use]
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Lossy stderr.
#[must_use]
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
