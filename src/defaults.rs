//! Default locations for commit-sync configuration.
//!
//! This module centralizes where the CLI looks for a configuration file when
//! `--config` is not given.

use std::path::{Path, PathBuf};

/// File name looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = ".commit-sync.yaml";

/// Returns the per-user configuration file path.
///
/// Uses the platform-appropriate config directory:
/// - Linux: `~/.config/commit-sync/config.yaml` (XDG Base Directory)
/// - macOS: `~/Library/Application Support/commit-sync/config.yaml`
/// - Windows: `{FOLDERID_RoamingAppData}\commit-sync\config.yaml`
///
/// Returns `None` if the platform config directory cannot be determined.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("commit-sync").join("config.yaml"))
}

/// Find the configuration file to use when none was given explicitly.
///
/// `.commit-sync.yaml` in `working_dir` wins over the per-user file. Returns
/// `None` when neither exists, meaning the built-in defaults apply.
pub fn discover_config(working_dir: &Path) -> Option<PathBuf> {
    let local = working_dir.join(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }
    user_config_path().filter(|path| path.is_file())
}
