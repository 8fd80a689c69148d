//! engine::parse
//!
//! Parsers for git's machine-readable output formats.
//!
//! # Formats
//!
//! Path-bearing queries run with `-z`: every field ends in NUL and paths are
//! never quoted or escaped, so names with spaces, quotes, or control
//! characters come through verbatim.
//!
//! - numstat: `additions\tdeletions\tpath`. A rename record leaves the path
//!   column empty and carries the old and new paths as the next two fields,
//!   which reads as four columns where the fourth is the new path. `-`
//!   counts mark binary files.
//! - name-status: the change code, then the path, then the new path for
//!   renames and copies, each in its own field.
//! - porcelain status: two status columns, one separator, then the path. A
//!   rename or copy record is followed by a field holding the old path.
//! - commit listings: `hash [parent ...]` per line.
//! - `rev-list --left-right --count`: `left\tright`.
//!
//! All parsers are lenient: malformed records are skipped rather than
//! failing the whole parse, except for `--count` output where a missing
//! number means the command did not do what was asked.

use std::collections::HashMap;

use crate::core::types::{BranchComparison, CommitNode, DiffStatus, FileStatus};
use crate::git::VcsError;

/// Marker that starts an untracked record in porcelain status output.
pub const UNTRACKED_MARKER: &str = "?? ";

/// Field terminator in `-z` output.
const NUL: char = '\0';

/// One numstat record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumstatEntry {
    /// Lookup key: the new path for renames
    pub path: String,
    pub additions: u64,
    pub deletions: u64,
}

/// One name-status record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameStatusEntry {
    pub status: DiffStatus,
    /// Previous path for renames and copies
    pub old_path: Option<String>,
}

/// Parse `diff --numstat -z` output in record order.
///
/// Binary files (`-` counts) report zero additions and deletions. Records
/// with fewer than three columns are skipped.
pub fn parse_numstat(output: &str) -> Vec<NumstatEntry> {
    let mut entries = Vec::new();
    let mut fields = output.split(NUL);

    while let Some(field) = fields.next() {
        let mut cols: Vec<&str> = field.splitn(3, '\t').collect();
        if cols.len() < 3 {
            continue;
        }
        if cols[2].is_empty() {
            // rename: old and new paths follow as fields of their own
            cols[2] = fields.next().unwrap_or_default();
            cols.extend(fields.next());
        }

        let path = cols.get(3).copied().unwrap_or(cols[2]);
        if path.is_empty() {
            continue;
        }
        entries.push(NumstatEntry {
            path: path.to_string(),
            additions: parse_count(cols[0]),
            deletions: parse_count(cols[1]),
        });
    }

    entries
}

/// `-` (binary) and anything unparseable count as zero.
fn parse_count(text: &str) -> u64 {
    text.trim().parse().unwrap_or(0)
}

/// Parse `diff --name-status -z` output keyed by current path.
///
/// Unknown change codes (`T`, `U`, `X`) map to [`DiffStatus::Modified`].
pub fn parse_name_status(output: &str) -> HashMap<String, NameStatusEntry> {
    let mut entries = HashMap::new();
    let mut fields = output.split(NUL);

    while let Some(code) = fields.next() {
        let Some(code) = code.trim().chars().next() else {
            continue;
        };
        let Some(path) = fields.next().filter(|p| !p.is_empty()) else {
            continue;
        };

        let (key, entry) = match code {
            'R' | 'C' => {
                let new = fields.next().filter(|p| !p.is_empty()).unwrap_or(path);
                let status = if code == 'R' {
                    DiffStatus::Renamed
                } else {
                    DiffStatus::Copied
                };
                (
                    new,
                    NameStatusEntry {
                        status,
                        old_path: Some(path.to_string()),
                    },
                )
            }
            _ => {
                let status = match code {
                    'A' => DiffStatus::Added,
                    'D' => DiffStatus::Deleted,
                    _ => DiffStatus::Modified,
                };
                (
                    path,
                    NameStatusEntry {
                        status,
                        old_path: None,
                    },
                )
            }
        };

        entries.insert(key.to_string(), entry);
    }

    entries
}

/// Split `status --porcelain -z` output into `XY path` records.
///
/// The old-path field that follows a rename or copy is consumed and
/// dropped; the record itself carries the current path.
pub fn status_records(output: &str) -> Vec<&str> {
    let mut records = Vec::new();
    let mut fields = output.split(NUL);

    while let Some(field) = fields.next() {
        if field.is_empty() {
            continue;
        }
        let bytes = field.as_bytes();
        let moved = bytes.len() >= 2
            && (matches!(bytes[0], b'R' | b'C') || matches!(bytes[1], b'R' | b'C'));
        records.push(field);
        if moved {
            fields.next();
        }
    }

    records
}

/// Paths of untracked files in porcelain status output.
pub fn parse_untracked(output: &str) -> Vec<String> {
    status_records(output)
        .into_iter()
        .filter_map(|record| record.strip_prefix(UNTRACKED_MARKER))
        .filter(|path| !path.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse one porcelain status record into its current path and status.
///
/// The record must not be trimmed: a leading space in the index column means
/// "unchanged in the index". Returns `None` for records that carry no status
/// this layer reports.
pub fn parse_status_record(record: &str) -> Option<(String, FileStatus)> {
    let bytes = record.as_bytes();
    if bytes.len() < 4 || !record.is_char_boundary(3) {
        return None;
    }
    let (index, worktree) = (bytes[0], bytes[1]);
    let path = &record[3..];

    let status = if index == b'?' && worktree == b'?' {
        FileStatus::Untracked
    } else {
        match index {
            b'A' => FileStatus::Added,
            b'M' => FileStatus::Modified,
            b'D' => FileStatus::Deleted,
            b'R' => FileStatus::Renamed,
            b'C' => FileStatus::Added,
            _ => match worktree {
                b'M' => FileStatus::Modified,
                b'D' => FileStatus::Deleted,
                b'A' => FileStatus::Added,
                _ => return None,
            },
        }
    };

    if path.is_empty() {
        return None;
    }
    Some((path.to_string(), status))
}

/// Parse `hash [parent ...]` lines, keeping the first parent.
pub fn parse_commit_lines(output: &str) -> Vec<CommitNode> {
    output
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let hash = fields.next()?;
            let parent = fields.next().map(str::to_string);
            Some(CommitNode::new(hash, parent))
        })
        .collect()
}

/// Parse branch names, one per line.
///
/// Detached-HEAD placeholders such as `(HEAD detached at 1a2b3c)` are not
/// branches and are dropped.
pub fn parse_branch_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|line| line.trim().trim_start_matches("* ").trim())
        .filter(|name| !name.is_empty() && !name.starts_with('('))
        .map(str::to_string)
        .collect()
}

/// Parse `rev-list --left-right --count a...b` output.
///
/// The left count (only in `a`) is `behind`; the right count (only in `b`)
/// is `ahead`.
///
/// # Errors
///
/// Returns a parse error unless the output is exactly two counts.
pub fn parse_left_right(output: &str) -> Result<BranchComparison, VcsError> {
    let counts: Vec<u64> = output
        .split_whitespace()
        .map(|field| field.parse::<u64>())
        .collect::<Result<_, _>>()
        .map_err(|e| VcsError::parse(format!("invalid commit count {output:?}: {e}")))?;

    match counts.as_slice() {
        [left, right] => Ok(BranchComparison::new(*right, *left)),
        _ => Err(VcsError::parse(format!(
            "expected two commit counts, got {output:?}"
        ))),
    }
}
