//! Shared test utilities for CLI end-to-end tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     if !git_available() {
//!         return;
//!     }
//!     let fixture = SyncFixture::new().with_config(configs::NO_START);
//!     let hash = fixture.narrow().commit(&[("src/a.c", "a")], "Add a", 1000);
//!     // ... test code
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    pub use super::git_available;
    #[allow(unused_imports)]
    pub use super::{GitRepo, SyncFixture};
}

/// Configuration snippets for testing.
#[allow(dead_code)]
pub mod configs {
    /// Scan both histories from the first commit, nothing ignored.
    pub const NO_START: &str = r#"
ignore: []
narrow_start: ""
wide_start: ""
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "ignore: [unclosed";

    /// Well-formed YAML with a misspelled field.
    pub const UNKNOWN_FIELD: &str = "ignored: []\n";
}

/// Whether a usable `git` binary is on `PATH`.
///
/// Tests that need real repositories return early when it is not.
pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// A throwaway git repository with deterministic commit timestamps.
pub struct GitRepo {
    path: PathBuf,
}

impl GitRepo {
    /// Initialize an empty repository at `path`.
    pub fn init(path: &Path) -> Self {
        std::fs::create_dir_all(path).expect("Failed to create repository directory");
        let repo = Self {
            path: path.to_path_buf(),
        };
        repo.git(&["init", "-q"]);
        repo.git(&["config", "user.name", "Sync Tester"]);
        repo.git(&["config", "user.email", "sync@example.com"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo
    }

    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `files`, commit them with `subject` at `timestamp` and return the
    /// new commit hash.
    pub fn commit(&self, files: &[(&str, &str)], subject: &str, timestamp: i64) -> String {
        for (name, content) in files {
            let file = self.path.join(name);
            if let Some(parent) = file.parent() {
                std::fs::create_dir_all(parent).expect("Failed to create parent directory");
            }
            std::fs::write(&file, content).expect("Failed to write file");
        }
        self.git(&["add", "-A"]);

        let date = format!("@{} +0000", timestamp);
        let output = Command::new("git")
            .current_dir(&self.path)
            .env("GIT_AUTHOR_DATE", &date)
            .env("GIT_COMMITTER_DATE", &date)
            .args(["commit", "-q", "-m", subject])
            .output()
            .expect("Failed to run git commit");
        assert!(
            output.status.success(),
            "git commit failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        self.git(&["rev-parse", "HEAD"]).trim().to_string()
    }

    fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .current_dir(&self.path)
            .args(args)
            .output()
            .expect("Failed to run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    /// Patch files currently sitting in the working directory, sorted by name.
    #[allow(dead_code)]
    pub fn patches(&self) -> Vec<PathBuf> {
        let mut patches: Vec<PathBuf> = std::fs::read_dir(&self.path)
            .expect("Failed to read repository directory")
            .map(|entry| entry.expect("Failed to read entry").path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "patch"))
            .collect();
        patches.sort();
        patches
    }
}

/// A temporary directory holding a narrow and a wide repository.
///
/// The narrow repository lives in `cycles/`, the wide one in `blender/`.
pub struct SyncFixture {
    temp_dir: assert_fs::TempDir,
    narrow: GitRepo,
    wide: GitRepo,
}

impl SyncFixture {
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        let narrow = GitRepo::init(&temp_dir.path().join("cycles"));
        let wide = GitRepo::init(&temp_dir.path().join("blender"));
        Self {
            temp_dir,
            narrow,
            wide,
        }
    }

    /// Add a `.commit-sync.yaml` configuration file with the given content.
    #[allow(dead_code)]
    pub fn with_config(self, content: &str) -> Self {
        self.temp_dir
            .child(".commit-sync.yaml")
            .write_str(content)
            .expect("Failed to write config file");
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn narrow(&self) -> &GitRepo {
        &self.narrow
    }

    pub fn wide(&self) -> &GitRepo {
        &self.wide
    }

    /// Command running the binary in the fixture root with both repositories
    /// as arguments.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("commit-sync");
        cmd.current_dir(self.path())
            .env_remove("COMMIT_SYNC_CONFIG")
            .env_remove("RUST_LOG")
            .arg(self.narrow.path())
            .arg(self.wide.path());
        cmd
    }
}

impl Default for SyncFixture {
    fn default() -> Self {
        Self::new()
    }
}
