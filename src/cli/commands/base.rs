//! base command - Closest ancestor branch

use anyhow::{Context as _, Result};

use super::Session;
use crate::cli::Context;
use crate::ui::output;

/// Print the branch `branch` was created from, with the fork commit.
pub fn base(ctx: &Context, branch: &str, json: bool) -> Result<()> {
    let session = Session::open(ctx)?;
    let base = Session::block_on(session.engine.base_branch(&session.dir, branch))?
        .with_context(|| format!("failed to resolve base branch of '{}'", branch))?;

    if json {
        output::print_json(&base)?;
        return Ok(());
    }

    match &base {
        Some(found) => println!("{}", output::format_base(branch, Some(found))),
        None => output::print(output::format_base(branch, None), session.verbosity),
    }
    Ok(())
}
