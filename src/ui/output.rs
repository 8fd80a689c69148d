//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag.
//! When `--json` is enabled, output is machine-readable JSON.
//!
//! Formatting functions return strings so they can be tested; the `print*`
//! functions do the writing.

use std::fmt::Display;

use serde::Serialize;

use crate::core::types::{BaseBranch, BranchComparison, DiffResult, FileDiffSummary, RepoStatus};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Pretty-printed JSON for `value`.
pub fn to_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

/// Print `value` as JSON on stdout. Ignores quiet mode.
pub fn print_json<T: Serialize>(value: &T) -> serde_json::Result<()> {
    println!("{}", to_json(value)?);
    Ok(())
}

/// One diff line: `status +adds -dels path`.
///
/// Renames and copies show `old -> new`.
pub fn format_file(file: &FileDiffSummary) -> String {
    let path = match &file.old_file_path {
        Some(old) => format!("{} -> {}", old, file.file_path),
        None => file.file_path.clone(),
    };
    format!(
        "{:<9} +{} -{} {}",
        file.status, file.additions, file.deletions, path
    )
}

/// Totals line, e.g. `3 files changed, 10 insertions(+), 2 deletions(-)`.
pub fn format_totals(result: &DiffResult) -> String {
    let s = &result.summary;
    format!(
        "{} {} changed, {} {}(+), {} {}(-)",
        s.total_files,
        plural(s.total_files as u64, "file", "files"),
        s.total_additions,
        plural(s.total_additions, "insertion", "insertions"),
        s.total_deletions,
        plural(s.total_deletions, "deletion", "deletions"),
    )
}

/// Per-file lines for a diff.
pub fn format_diff(result: &DiffResult) -> Vec<String> {
    result.files.iter().map(format_file).collect()
}

/// One line per path: `status path`.
pub fn format_status(status: &RepoStatus) -> Vec<String> {
    status
        .files
        .iter()
        .map(|(path, file_status)| format!("{:<9} {}", file_status, path))
        .collect()
}

/// `base hash`, or a notice when there is none.
pub fn format_base(target: &str, base: Option<&BaseBranch>) -> String {
    match base {
        Some(base) => base.to_string(),
        None => format!("no base branch found for '{}'", target),
    }
}

pub fn format_comparison(a: &str, b: &str, comparison: &BranchComparison) -> String {
    format!(
        "{}...{}: behind {}, ahead {}",
        a, b, comparison.behind, comparison.ahead
    )
}

fn plural(count: u64, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 {
        one
    } else {
        many
    }
}
