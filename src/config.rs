//! # Synchronization Configuration
//!
//! This module defines [`SyncConfig`], the explicit configuration value that
//! is threaded through the synchronization instead of global constants, and
//! the logic for loading it from a YAML file.
//!
//! Every field is optional in the file; anything left out falls back to the
//! built-in defaults, which describe the Cycles standalone repository (narrow)
//! and its copy under `intern/cycles` in Blender (wide).
//!
//! ```yaml
//! ignore:
//!   - 7e690198b16c21158e428d3324e6e7f3b102f674
//! narrow_start: 0c633bb4c21cce2a71d42d4087e50a83a713f306
//! wide_start: 912f2b1a29cd079ea7e163f5839047612423f05c
//! narrow_path: src
//! wide_subtree: intern/cycles
//! skip_prefixes:
//!   - "Cycles: "
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Commits that the fingerprint matching gets wrong.
///
/// Occasionally a commit that was already ported is still reported as missing
/// (for example because its timestamp changed while porting). Listing it here,
/// or moving the start revisions forward, silences it.
pub const DEFAULT_IGNORE: &[&str] = &[
    "7e690198b16c21158e428d3324e6e7f3b102f674",
    "e1ec85876e809b1bb23be45ed91f3766de10ee66",
    "38f08c1cecb2dd6ac32c5b705de065474b15dfc2",
    "e2a5251d35b10bdbc67f227765664984d6504722",
    "cdc1ddf20bcf6b0a3783039a3828847afd3fd633",
    "3e472d87a8d13aee078e156d584cf2171ed2d8a3",
    "0456223cde98712c16cb9b584b5c66c58ec915c3",
    "c07c7957c6b4780b643e0e056a78a56b3e08f51b",
];

/// blender-v2.92 in the narrow repository.
pub const DEFAULT_NARROW_START: &str = "0c633bb4c21cce2a71d42d4087e50a83a713f306";

/// v2.92 in the wide repository.
pub const DEFAULT_WIDE_START: &str = "912f2b1a29cd079ea7e163f5839047612423f05c";

/// Topics dropped from subjects, checked in order.
pub const DEFAULT_SKIP_PREFIXES: &[&str] = &[
    "Cycles: ",
    "cycles: ",
    "Cycles Standalone: ",
    "Cycles standalone: ",
    "cycles standalone: ",
];

/// Everything the synchronization needs besides the two repository paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    /// Commit hashes excluded from matching entirely.
    pub ignore: HashSet<String>,
    /// Exclusive start revision for the narrow history; empty scans everything.
    pub narrow_start: String,
    /// Exclusive start revision for the wide history; empty scans everything.
    pub wide_start: String,
    /// Path inside the narrow repository whose history is compared.
    pub narrow_history_path: String,
    /// Prefix of synchronized files in narrow patches.
    pub narrow_path: String,
    /// Prefix of the same files inside the wide repository.
    pub wide_subtree: String,
    /// Subject topics to drop, checked in order.
    pub skip_prefixes: Vec<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            ignore: DEFAULT_IGNORE.iter().map(|s| s.to_string()).collect(),
            narrow_start: DEFAULT_NARROW_START.to_string(),
            wide_start: DEFAULT_WIDE_START.to_string(),
            narrow_history_path: String::new(),
            narrow_path: "src".to_string(),
            wide_subtree: "intern/cycles".to_string(),
            skip_prefixes: DEFAULT_SKIP_PREFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl SyncConfig {
    /// Check the invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        for (field, prefix) in [
            ("narrow_path", &self.narrow_path),
            ("wide_subtree", &self.wide_subtree),
        ] {
            if prefix.starts_with('/') {
                return Err(Error::ConfigParse {
                    message: format!("{} must be relative, got {:?}", field, prefix),
                    hint: Some(format!(
                        "Use a path relative to the repository root, e.g. {:?}",
                        prefix.trim_start_matches('/')
                    )),
                });
            }
        }
        Ok(())
    }
}

/// Parse a YAML configuration string.
pub fn parse(yaml_content: &str) -> Result<SyncConfig> {
    // An empty document (or one with only comments) means "all defaults".
    if yaml_content.trim().is_empty() || serde_yaml::from_str::<()>(yaml_content).is_ok() {
        return Ok(SyncConfig::default());
    }

    let config: SyncConfig = serde_yaml::from_str(yaml_content).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
        hint: e
            .to_string()
            .contains("unknown field")
            .then(|| "Valid fields: ignore, narrow_start, wide_start, narrow_history_path, narrow_path, wide_subtree, skip_prefixes".to_string()),
    })?;
    config.validate()?;
    Ok(config)
}

/// Load a configuration file from disk.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<SyncConfig> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}
