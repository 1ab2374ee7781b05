//! # Synchronization Driver
//!
//! Ties the pieces together for both transfer directions:
//!
//! 1. Read the narrow history and the wide subtree history.
//! 2. Fingerprint both into commit maps.
//! 3. Compute the commits each side is missing.
//! 4. Export every missing commit into the destination repository's working
//!    directory, numbered from 1 per direction, and rewrite its paths.
//!
//! Nothing is applied or committed; the numbered patches are left for review.
//! The first failing export aborts the run, and patches written before it stay
//! on disk.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::commit_map::{self, CommitRecord};
use crate::config::SyncConfig;
use crate::difference::{self, Difference};
use crate::error::Result;
use crate::git::{HistorySource, PatchExporter};
use crate::patch;

/// Which way commits are being carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    NarrowToWide,
    WideToNarrow,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NarrowToWide => write!(f, "narrow -> wide"),
            Self::WideToNarrow => write!(f, "wide -> narrow"),
        }
    }
}

/// The two repositories taking part in a run.
#[derive(Debug, Clone, Copy)]
pub struct Repositories<'a> {
    /// Repository holding only the shared subsystem.
    pub narrow: &'a Path,
    /// Repository holding the subsystem under a subtree.
    pub wide: &'a Path,
}

impl<'a> Repositories<'a> {
    pub fn new(narrow: &'a Path, wide: &'a Path) -> Self {
        Self { narrow, wide }
    }

    /// Repository commits are exported from.
    pub fn source(&self, direction: Direction) -> &'a Path {
        match direction {
            Direction::NarrowToWide => self.narrow,
            Direction::WideToNarrow => self.wide,
        }
    }

    /// Repository whose working directory receives the patches.
    pub fn destination(&self, direction: Direction) -> &'a Path {
        match direction {
            Direction::NarrowToWide => self.wide,
            Direction::WideToNarrow => self.narrow,
        }
    }
}

/// Commits each side is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Plan {
    /// Fingerprinted commits in the narrow history.
    pub narrow_commits: usize,
    /// Fingerprinted commits in the wide subtree history.
    pub wide_commits: usize,
    /// Narrow commits to port to the wide repository, oldest first.
    pub narrow_to_wide: Vec<String>,
    /// Wide commits to port to the narrow repository, oldest first.
    pub wide_to_narrow: Vec<String>,
}

impl Plan {
    /// Compare two already retrieved histories.
    pub fn from_histories(
        narrow: &[CommitRecord],
        wide: &[CommitRecord],
        config: &SyncConfig,
    ) -> Self {
        let narrow_map = commit_map::build(narrow, &config.ignore, &config.skip_prefixes);
        let wide_map = commit_map::build(wide, &config.ignore, &config.skip_prefixes);
        let Difference {
            only_in_a,
            only_in_b,
        } = difference::diff(&narrow_map, &wide_map);

        Self {
            narrow_commits: narrow_map.len(),
            wide_commits: wide_map.len(),
            narrow_to_wide: only_in_a,
            wide_to_narrow: only_in_b,
        }
    }

    pub fn commits(&self, direction: Direction) -> &[String] {
        match direction {
            Direction::NarrowToWide => &self.narrow_to_wide,
            Direction::WideToNarrow => &self.wide_to_narrow,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.narrow_to_wide.is_empty() && self.wide_to_narrow.is_empty()
    }
}

/// Patch files produced by a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub narrow_to_wide: Vec<PathBuf>,
    pub wide_to_narrow: Vec<PathBuf>,
}

impl SyncReport {
    pub fn patches(&self, direction: Direction) -> &[PathBuf] {
        match direction {
            Direction::NarrowToWide => &self.narrow_to_wide,
            Direction::WideToNarrow => &self.wide_to_narrow,
        }
    }

    pub fn total(&self) -> usize {
        self.narrow_to_wide.len() + self.wide_to_narrow.len()
    }
}

/// Runs the comparison and export against a pair of repositories.
pub struct SyncDriver<'a, H, E> {
    history: &'a H,
    exporter: &'a E,
    config: &'a SyncConfig,
}

impl<'a, H: HistorySource, E: PatchExporter> SyncDriver<'a, H, E> {
    pub fn new(history: &'a H, exporter: &'a E, config: &'a SyncConfig) -> Self {
        Self {
            history,
            exporter,
            config,
        }
    }

    /// Work out which commits each side is missing without writing anything.
    pub fn plan(&self, repos: Repositories<'_>) -> Result<Plan> {
        let narrow = self.history.history(
            repos.narrow,
            &self.config.narrow_history_path,
            &self.config.narrow_start,
        )?;
        log::info!(
            "Read {} commits from {}",
            narrow.len(),
            repos.narrow.display()
        );

        let wide = self.history.history(
            repos.wide,
            &self.config.wide_subtree,
            &self.config.wide_start,
        )?;
        log::info!("Read {} commits from {}", wide.len(), repos.wide.display());

        let plan = Plan::from_histories(&narrow, &wide, self.config);
        log::info!(
            "{} commits missing in wide, {} missing in narrow",
            plan.narrow_to_wide.len(),
            plan.wide_to_narrow.len()
        );
        Ok(plan)
    }

    /// Export and rewrite `commits` for one direction.
    ///
    /// Patches are numbered from 1 in the order given. `on_patch` is called
    /// after each patch has been rewritten.
    pub fn transfer<F>(
        &self,
        repos: Repositories<'_>,
        direction: Direction,
        commits: &[String],
        mut on_patch: F,
    ) -> Result<Vec<PathBuf>>
    where
        F: FnMut(&Path),
    {
        let (accept, replace) = self.prefixes(direction);
        // Reject absolute prefixes before the first export touches the destination.
        patch::PatchRewriter::new(
            accept.as_bytes(),
            replace.as_bytes(),
            &self.config.skip_prefixes,
        )?;
        let source = repos.source(direction);
        let destination = repos.destination(direction);

        log::info!(
            "Exporting {} commits {} into {}",
            commits.len(),
            direction,
            destination.display()
        );

        let mut written = Vec::with_capacity(commits.len());
        for (i, id) in commits.iter().enumerate() {
            let path = self.exporter.export(source, id, destination, i + 1)?;
            patch::rewrite_file(
                &path,
                accept.as_bytes(),
                replace.as_bytes(),
                &self.config.skip_prefixes,
            )?;
            log::debug!("Wrote {} for {}", path.display(), id);
            on_patch(&path);
            written.push(path);
        }
        Ok(written)
    }

    /// Export every missing commit in both directions.
    pub fn synchronize(&self, repos: Repositories<'_>) -> Result<SyncReport> {
        let plan = self.plan(repos)?;
        self.execute(repos, &plan, |_| {})
    }

    /// Export the commits of an existing plan, narrow to wide first.
    pub fn execute<F>(&self, repos: Repositories<'_>, plan: &Plan, mut on_patch: F) -> Result<SyncReport>
    where
        F: FnMut(&Path),
    {
        let narrow_to_wide = self.transfer(
            repos,
            Direction::NarrowToWide,
            plan.commits(Direction::NarrowToWide),
            &mut on_patch,
        )?;
        let wide_to_narrow = self.transfer(
            repos,
            Direction::WideToNarrow,
            plan.commits(Direction::WideToNarrow),
            &mut on_patch,
        )?;
        Ok(SyncReport {
            narrow_to_wide,
            wide_to_narrow,
        })
    }

    /// `(accept, replace)` path prefixes for `direction`.
    fn prefixes(&self, direction: Direction) -> (&'a str, &'a str) {
        let config = self.config;
        match direction {
            Direction::NarrowToWide => (config.narrow_path.as_str(), config.wide_subtree.as_str()),
            Direction::WideToNarrow => (config.wide_subtree.as_str(), config.narrow_path.as_str()),
        }
    }
}
