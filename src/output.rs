//! # Output Rendering
//!
//! Turns a [`Plan`] or a [`SyncReport`] into the text the CLI prints, with
//! color and emoji only when the terminal and the user allow it.
//!
//! ## Respecting User Preferences
//!
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals

use std::env;
use std::fmt::Write as _;

use console::style;

use crate::sync::{Direction, Plan, SyncReport};

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `--color=always` overrides `NO_COLOR`; `--color=auto` (or anything
    /// unrecognized) inspects the environment and the terminal.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // The presence of NO_COLOR (even empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Pick the emoji or its plain-text stand-in.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

fn heading(config: &OutputConfig, text: &str) -> String {
    if config.use_color {
        style(text).bold().to_string()
    } else {
        text.to_string()
    }
}

fn commit_id(config: &OutputConfig, id: &str) -> String {
    if config.use_color {
        style(id).yellow().to_string()
    } else {
        id.to_string()
    }
}

/// Describe which commits a dry run would export.
pub fn render_plan(plan: &Plan, config: &OutputConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} Compared {} narrow and {} wide commits",
        emoji(config, "🔍", "[SCAN]"),
        plan.narrow_commits,
        plan.wide_commits
    );

    if plan.is_empty() {
        let _ = writeln!(
            out,
            "{} Both repositories are in sync.",
            emoji(config, "✅", "[OK]")
        );
        return out;
    }

    for direction in [Direction::NarrowToWide, Direction::WideToNarrow] {
        let commits = plan.commits(direction);
        if commits.is_empty() {
            continue;
        }
        let _ = writeln!(
            out,
            "\n{}",
            heading(config, &format!("{} ({} commits):", direction, commits.len()))
        );
        for (i, id) in commits.iter().enumerate() {
            let _ = writeln!(out, "  {:04} {}", i + 1, commit_id(config, id));
        }
    }
    out
}

/// Summarize the patches written by a run.
pub fn render_report(report: &SyncReport, config: &OutputConfig) -> String {
    let mut out = String::new();
    if report.total() == 0 {
        let _ = writeln!(
            out,
            "{} Both repositories are in sync, no patches written.",
            emoji(config, "✅", "[OK]")
        );
        return out;
    }

    for direction in [Direction::NarrowToWide, Direction::WideToNarrow] {
        let patches = report.patches(direction);
        if patches.is_empty() {
            continue;
        }
        let _ = writeln!(
            out,
            "{}",
            heading(config, &format!("{} ({} patches):", direction, patches.len()))
        );
        for path in patches {
            let _ = writeln!(out, "  {}", path.display());
        }
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "{} Missing commits were saved to the narrow and wide repositories.",
        emoji(config, "📦", "[DONE]")
    );
    out.push_str("Check them and if they're all fine run:\n\n  git am *.patch\n");
    out
}
