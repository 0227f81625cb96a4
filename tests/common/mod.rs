//! Shared helpers for CLI integration tests.
//!
//! Every test runs the built binary inside its own temp directory with the
//! `JAMAL_*` environment cleared, so nothing depends on the developer's shell.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

pub const VALID_SITE: &str = "\
name: blog
host: 203.0.113.7
user: deploy
domains:
  - blog.example.com
local_path: ./_site
";

/// Isolated working directory for one CLI invocation
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("_jamal.yml")
    }

    pub fn write_config(&self, content: &str) -> &Self {
        std::fs::write(self.config_path(), content).unwrap();
        self
    }

    pub fn read_config(&self) -> String {
        std::fs::read_to_string(self.config_path()).unwrap()
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        let output = self.command().args(args).output().unwrap();
        TestResult::from(output)
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_jamal"));
        cmd.current_dir(self.dir.path())
            .env_remove("JAMAL_CONFIG")
            .env_remove("JAMAL_HOST")
            .env_remove("JAMAL_USER")
            .env_remove("JAMAL_PASSWORD")
            .env_remove("GITHUB_ACTIONS")
            .env("NO_COLOR", "1");
        cmd
    }
}

/// Captured outcome of one CLI invocation
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl From<Output> for TestResult {
    fn from(output: Output) -> Self {
        Self {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl TestResult {
    /// Parse stdout as NDJSON
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .map(|l| serde_json::from_str(l).unwrap_or_else(|e| panic!("bad NDJSON {l:?}: {e}")))
            .collect()
    }
}
