//! Git collaborators: reading commit history and exporting single commits.
//!
//! The synchronization logic only sees the [`HistorySource`] and
//! [`PatchExporter`] traits. [`GitCli`] implements both by running the system
//! `git` binary, which picks up the user's configuration (author identity,
//! `format.*` settings) without any extra plumbing.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::commit_map::CommitRecord;
use crate::error::{Error, Result};

/// Supplies the history of a path inside a repository.
pub trait HistorySource {
    /// Commits touching `subtree` in `repo`, oldest first.
    ///
    /// When `start` is non-empty only commits after it (up to `HEAD`) are
    /// listed.
    fn history(&self, repo: &Path, subtree: &str, start: &str) -> Result<Vec<CommitRecord>>;
}

/// Materializes one commit as a patch file.
pub trait PatchExporter {
    /// Write commit `id` from `repo` into `out_dir` as patch number `sequence`
    /// and return the path of the created file.
    fn export(&self, repo: &Path, id: &str, out_dir: &Path, sequence: usize) -> Result<PathBuf>;
}

/// [`HistorySource`] and [`PatchExporter`] backed by the `git` command line.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: OsString,
}

impl Default for GitCli {
    fn default() -> Self {
        Self {
            program: OsString::from("git"),
        }
    }
}

impl GitCli {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific git executable instead of the one on `PATH`.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run git against `repo`, failing on a non-zero exit status.
    fn run(&self, repo: &Path, args: &[OsString]) -> Result<Output> {
        let display = args
            .iter()
            .map(|a| a.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ");
        log::debug!("Running git {} in {}", display, repo.display());

        let mut git_dir = OsString::from("--git-dir=");
        git_dir.push(repo.join(".git"));
        let mut work_tree = OsString::from("--work-tree=");
        work_tree.push(repo);

        let output = Command::new(&self.program)
            .arg(git_dir)
            .arg(work_tree)
            .args(args)
            .output()
            .map_err(|e| Error::GitCommand {
                command: display.clone(),
                repo: repo.display().to_string(),
                stderr: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::GitCommand {
                command: display,
                repo: repo.display().to_string(),
                stderr: stderr.trim_end().to_string(),
            });
        }

        Ok(output)
    }
}

impl HistorySource for GitCli {
    fn history(&self, repo: &Path, subtree: &str, start: &str) -> Result<Vec<CommitRecord>> {
        let mut args: Vec<OsString> = vec![
            "log".into(),
            "--format=%H %at %s".into(),
            "--reverse".into(),
        ];
        if !start.is_empty() {
            args.push(format!("{}..HEAD", start).into());
        }
        args.push("--".into());
        args.push(repo.join(subtree).into_os_string());

        let output = self.run(repo, &args)?;
        parse_history(&output.stdout, repo)
    }
}

impl PatchExporter for GitCli {
    fn export(&self, repo: &Path, id: &str, out_dir: &Path, sequence: usize) -> Result<PathBuf> {
        let args: Vec<OsString> = vec![
            "format-patch".into(),
            "-1".into(),
            "--start-number".into(),
            sequence.to_string().into(),
            "-o".into(),
            out_dir.as_os_str().to_owned(),
            id.into(),
        ];

        let output = self.run(repo, &args)?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let path = stdout.trim_end_matches(['\n', '\r']);
        if path.is_empty() {
            return Err(Error::GitCommand {
                command: "format-patch".to_string(),
                repo: repo.display().to_string(),
                stderr: format!("no patch produced for {}", id),
            });
        }
        Ok(PathBuf::from(path))
    }
}

/// Parse `git log --format='%H %at %s'` output.
///
/// Empty lines are skipped. Subjects are kept as raw bytes.
pub fn parse_history(stdout: &[u8], repo: &Path) -> Result<Vec<CommitRecord>> {
    stdout
        .split(|&b| b == b'\n')
        .filter(|line| !line.is_empty())
        .map(|line| parse_history_line(line, repo))
        .collect()
}

fn parse_history_line(line: &[u8], repo: &Path) -> Result<CommitRecord> {
    let malformed = || Error::HistoryParse {
        repo: repo.display().to_string(),
        line: String::from_utf8_lossy(line).into_owned(),
    };

    let mut parts = line.splitn(3, |&b| b == b' ');
    let id = parts.next().filter(|id| !id.is_empty()).ok_or_else(malformed)?;
    let stamp = parts.next().ok_or_else(malformed)?;
    let subject = parts.next().ok_or_else(malformed)?;

    let timestamp = std::str::from_utf8(stamp)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(malformed)?;
    let id = std::str::from_utf8(id).map_err(|_| malformed())?;

    Ok(CommitRecord::new(id, timestamp, subject))
}
