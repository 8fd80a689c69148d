//! status command - Changed paths in the working tree

use anyhow::Result;

use super::Session;
use crate::cli::Context;
use crate::ui::output;

/// Print the status of every changed path.
///
/// Outside a repository this reports the fact rather than failing, matching
/// the engine's best-effort status semantics.
pub fn status(ctx: &Context, json: bool) -> Result<()> {
    let session = Session::open(ctx)?;
    let status = Session::block_on(session.engine.status(&session.dir))?;

    if json {
        output::print_json(&status)?;
        return Ok(());
    }

    if !status.is_git_repo {
        output::print(
            format!("{} is not a git repository", session.dir.display()),
            session.verbosity,
        );
        return Ok(());
    }

    if status.files.is_empty() {
        output::print("working tree clean", session.verbosity);
        return Ok(());
    }

    for line in output::format_status(&status) {
        println!("{}", line);
    }
    Ok(())
}
