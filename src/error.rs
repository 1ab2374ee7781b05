//! # Error Handling
//!
//! This module defines the centralized error type for the `commit-sync`
//! library. It uses the `thiserror` library to create an `Error` enum that
//! covers every failure the synchronization can run into.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum that represents all possible errors. Each
//!   variant carries enough context (the git command, the repository, the
//!   offending line) to tell the user what went wrong without re-running
//!   anything.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`, used
//!   throughout the library.
//!
//! Malformed patch input is deliberately absent from this list: the patch
//! rewriter passes unrecognized lines through under its current state instead
//! of failing.

use thiserror::Error;

/// Main error type for commit-sync operations
#[derive(Error, Debug)]
pub enum Error {
    /// A git invocation exited with a non-zero status or could not be spawned.
    #[error("Git command failed for {repo}: {command} - {stderr}")]
    GitCommand {
        command: String,
        repo: String,
        stderr: String,
    },

    /// A line of `git log` output did not have the `<hash> <stamp> <subject>`
    /// shape.
    #[error("Unexpected history line from {repo}: {line:?}")]
    HistoryParse { repo: String, line: String },

    /// Path prefixes used for rewriting must be relative to the repository root.
    #[error("Path prefix must be relative: {prefix:?}")]
    InvalidPrefix { prefix: String },

    /// The configuration file could not be interpreted.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
