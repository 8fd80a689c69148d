//! diff command - Per-file change summary between two refs

use anyhow::{Context as _, Result};

use super::Session;
use crate::cli::Context;
use crate::core::refs::RefSpec;
use crate::ui::output;

/// Print the diff between `from` and `to`.
///
/// The working tree is accepted only as `to`; the engine rejects it as
/// `from` before running anything.
pub fn diff(ctx: &Context, from: &RefSpec, to: &RefSpec, patch: bool, json: bool) -> Result<()> {
    let session = Session::open(ctx)?;
    let result = Session::block_on(session.engine.diff_refs(&session.dir, from, to))?
        .with_context(|| format!("failed to diff {} against {}", from, to))?;

    if json {
        output::print_json(&result)?;
        return Ok(());
    }

    if result.is_empty() {
        output::print("no changes", session.verbosity);
        return Ok(());
    }

    for line in output::format_diff(&result) {
        println!("{}", line);
    }
    output::print(output::format_totals(&result), session.verbosity);

    if patch && !result.raw_diff.is_empty() {
        println!();
        print!("{}", result.raw_diff);
    }
    Ok(())
}
