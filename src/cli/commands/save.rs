//! save command - Send the form and staged sub list

use anyhow::{bail, Result};
use tracing::info;

use super::{block_on, check_outcome};
use crate::cli::Context;
use crate::page::FormMode;
use crate::ui::output;

/// Save the open form, or print the payload with `dry_run`.
pub fn save(ctx: &Context, dry_run: bool) -> Result<()> {
    let store = ctx.open_store()?;
    if store.mode() == FormMode::Browsing {
        bail!("no open form to save");
    }

    let request = store.save_request();
    if dry_run {
        // The payload is the command's output, so it ignores quiet mode.
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(());
    }

    info!(children = request.sub_list.len(), "saving");
    let outcome = block_on(store.save(Some(request)))?;
    check_outcome(outcome, "save", ctx)?;
    output::print("saved", ctx.verbosity);
    Ok(())
}
