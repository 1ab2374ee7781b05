//! # Commit Sync Library
//!
//! Keeps a standalone ("narrow") repository and its copy inside a larger
//! ("wide") repository in step. It finds the commits present on one side but
//! missing on the other and exports them as patches whose paths are moved to
//! the destination layout, ready for `git am`.
//!
//! ## Quick Example
//!
//! ```
//! use std::collections::HashSet;
//! use commit_sync::commit_map::{self, CommitRecord};
//! use commit_sync::difference;
//!
//! let skip = ["Cycles: "];
//! let narrow = vec![
//!     CommitRecord::new("h1", 100, "Improve BVH build"),
//!     CommitRecord::new("b1", 200, "Fix memory leak."),
//! ];
//! let wide = vec![CommitRecord::new("c1", 200, "Cycles: Fix memory leak")];
//!
//! let ignore = HashSet::new();
//! let diff = difference::diff(
//!     &commit_map::build(&narrow, &ignore, &skip),
//!     &commit_map::build(&wide, &ignore, &skip),
//! );
//! assert_eq!(diff.only_in_a, vec!["h1"]);
//! assert!(diff.only_in_b.is_empty());
//! ```
//!
//! ## Core Concepts
//!
//! - **Subjects (`subject`)**: Topic prefixes such as `Cycles: ` are dropped
//!   and the rest recapitalized, so both sides compare equal.
//! - **Fingerprints (`commit_map`)**: `"<timestamp> <subject>"` keys in an
//!   insertion-ordered map.
//! - **Differences (`difference`)**: What each map has that the other lacks.
//! - **Patches (`patch`)**: A two-state line rewriter that moves paths between
//!   prefixes and drops file sections outside the synchronized subtree.
//! - **Driver (`sync`)**: Runs the whole comparison and export through the
//!   `git` collaborators (`git`).
//! - **Configuration (`config`, `defaults`)**: Ignore set, start revisions,
//!   path prefixes and topic list, loaded from YAML.

pub mod commit_map;
pub mod config;
pub mod defaults;
pub mod difference;
pub mod error;
pub mod git;
pub mod output;
pub mod patch;
pub mod subject;
pub mod sync;

#[cfg(test)]
mod sync_proptest;
