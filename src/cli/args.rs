//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::refs::RefSpec;

/// forkpoint - structured diffs and base-branch inference for git
#[derive(Parser, Debug)]
#[command(name = "fp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if fp was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show a per-file summary of changes between two refs
    #[command(
        name = "diff",
        long_about = "Show a per-file summary of changes between two refs.\n\n\
            Each ref is a descriptor: \"<label>:<value>\" for a branch, tag, or \
            commit (the label is informational), \"HEAD\" for the checked-out \
            commit, or \"working\" for the uncommitted working tree. The working \
            tree may only appear as the second ref.\n\n\
            Untracked files are included in working-tree diffs and reported as \
            untracked. The index is left exactly as it was found.",
        after_help = "\
EXAMPLES:
    # Everything changed since branching off main, including uncommitted work
    fp diff branch:main working

    # Committed changes between two branches
    fp diff branch:main branch:feature

    # Include the unified diff
    fp diff HEAD working --patch

    # Machine-readable output
    fp diff commit:abc123 HEAD --json"
    )]
    Diff {
        /// Ref to diff from
        #[arg(value_name = "FROM")]
        from: RefSpec,

        /// Ref to diff to
        #[arg(value_name = "TO")]
        to: RefSpec,

        /// Also print the unified diff
        #[arg(long)]
        patch: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the status of every changed path in the working tree
    #[command(name = "status")]
    Status {
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Find the branch a branch was created from
    #[command(
        name = "base",
        long_about = "Find the branch a branch was created from.\n\n\
            Walks the branch's recent history newest first and reports the first \
            other branch that shares a commit with it while lacking some of its \
            work. Only a bounded window of history is examined (see \
            lineage.max_commits).",
        after_help = "\
EXAMPLES:
    # Which branch did feature/login fork from?
    fp base feature/login

    # Machine-readable output (null when there is no base)
    fp base feature/login --json"
    )]
    Base {
        /// Branch to resolve
        branch: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Count commits unique to each of two branches
    #[command(
        name = "compare",
        long_about = "Count commits unique to each of two branches.\n\n\
            \"behind\" counts commits only reachable from the first branch and \
            \"ahead\" counts commits only reachable from the second."
    )]
    Compare {
        /// First branch
        a: String,

        /// Second branch
        b: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("fp").chain(args.iter().copied()))
    }

    #[test]
    fn definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn diff_parses_descriptors() {
        let cli = parse(&["diff", "branch:main", "working", "--json"]).unwrap();
        match cli.command {
            Command::Diff {
                from,
                to,
                json,
                patch,
            } => {
                assert_eq!(from, RefSpec::Revision("main".to_string()));
                assert_eq!(to, RefSpec::WorkingTree);
                assert!(json);
                assert!(!patch);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn diff_rejects_bare_token() {
        let err = parse(&["diff", "main", "HEAD"]).unwrap_err();
        assert!(err.to_string().contains("invalid ref"));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["status", "--cwd", "/tmp/repo", "--debug", "-q"]).unwrap();
        assert_eq!(cli.cwd, Some(PathBuf::from("/tmp/repo")));
        assert!(cli.debug);
        assert!(cli.quiet);
    }

    #[test]
    fn compare_takes_two_branches() {
        let cli = parse(&["compare", "feature", "main"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Compare { ref a, ref b, json: false } if a == "feature" && b == "main"
        ));
    }

    #[test]
    fn base_requires_branch() {
        assert!(parse(&["base"]).is_err());
    }
}
