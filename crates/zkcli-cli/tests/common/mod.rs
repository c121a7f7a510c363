#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Temporary SQLite store driven through the built binary
pub struct CliHarness {
    pub dir: TempDir,
    pub db: PathBuf,
}

impl CliHarness {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("nodes.db");
        Self { dir, db }
    }

    /// Run `zkcli --store <db> <args...>`
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_zkcli"))
            .current_dir(self.dir.path())
            .env_remove("RUST_LOG")
            .arg("--store")
            .arg(&self.db)
            .args(args)
            .output()
            .expect("Failed to execute CLI")
    }

    /// Run and require success, returning stdout
    pub fn ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "zkcli {:?} should succeed. Stderr: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap()
    }

    /// Write a file inside the harness directory
    pub fn write_file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
