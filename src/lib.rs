//! forkpoint - structured git diffs and base-branch inference
//!
//! forkpoint computes file-level differences between two revisions of a git
//! working tree (including uncommitted and untracked work) and infers which
//! branch a given branch was created from.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Diff computation, status, and branch-lineage resolution
//! - [`core`] - Value types, ref descriptors, and configuration
//! - [`git`] - Single doorway for all git access
//! - [`ui`] - Output formatting
//! - [`telemetry`] - Logging setup for the binary
//!
//! # Guarantees
//!
//! 1. History is never rewritten; the only index change (intent-to-add marks
//!    for untracked files) is reverted before a diff returns
//! 2. Nothing is cached between calls
//! 3. Gateway failures surface as typed [`git::VcsError`] values

pub mod cli;
pub mod core;
pub mod engine;
pub mod git;
pub mod telemetry;
pub mod ui;
