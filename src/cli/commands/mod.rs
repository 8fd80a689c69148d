//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Calls the engine
//! 3. Formats and displays output
//!
//! # Async Commands
//!
//! The engine is async. Handlers are synchronous wrappers that build a tokio
//! runtime and `block_on` the async implementation.

mod base;
mod compare;
mod diff;
mod status;

pub use base::base;
pub use compare::compare;
pub use diff::diff;
pub use status::status;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};

use super::args::Command;
use super::Context;
use crate::core::config::Config;
use crate::engine::Engine;
use crate::git::GitCli;
use crate::ui::output::{self, Verbosity};

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Diff {
            from,
            to,
            patch,
            json,
        } => diff(ctx, &from, &to, patch, json),
        Command::Status { json } => status(ctx, json),
        Command::Base { branch, json } => base(ctx, &branch, json),
        Command::Compare { a, b, json } => compare(ctx, &a, &b, json),
    }
}

/// An engine wired to the real git binary, plus the directory to run in.
struct Session {
    engine: Engine,
    dir: PathBuf,
    verbosity: Verbosity,
}

impl Session {
    fn open(ctx: &Context) -> Result<Self> {
        let verbosity = Verbosity::from_flags(ctx.quiet, ctx.debug);
        let dir = match &ctx.cwd {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().context("failed to read current directory")?,
        };

        let root = repo_root(&dir);
        let loaded = Config::load(root.as_deref()).context("failed to load configuration")?;
        for warning in &loaded.warnings {
            output::warn(
                format!("{} ({})", warning.message, warning.path.display()),
                verbosity,
            );
        }

        let settings = loaded.config.engine_settings();
        let gateway = Arc::new(GitCli::with_binary(settings.git_binary.clone()));
        Ok(Self {
            engine: Engine::new(gateway, settings),
            dir,
            verbosity,
        })
    }

    fn block_on<F: std::future::Future>(future: F) -> Result<F::Output> {
        let rt = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
        Ok(rt.block_on(future))
    }
}

/// Top of the working tree containing `dir`, if any.
fn repo_root(dir: &Path) -> Option<PathBuf> {
    git2::Repository::discover(dir)
        .ok()
        .and_then(|repo| repo.workdir().map(Path::to_path_buf))
}
