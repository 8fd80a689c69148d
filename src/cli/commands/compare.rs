//! compare command - Ahead/behind counts between two branches

use anyhow::{Context as _, Result};

use super::Session;
use crate::cli::Context;
use crate::ui::output;

pub fn compare(ctx: &Context, a: &str, b: &str, json: bool) -> Result<()> {
    let session = Session::open(ctx)?;
    let comparison = Session::block_on(session.engine.compare(&session.dir, a, b))?
        .with_context(|| format!("failed to compare '{}' with '{}'", a, b))?;

    if json {
        output::print_json(&comparison)?;
    } else {
        println!("{}", output::format_comparison(a, b, &comparison));
    }
    Ok(())
}
