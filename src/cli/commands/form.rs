//! form commands - Select a row, open a new form, cancel, edit fields

use anyhow::{bail, Context as _, Result};
use tracing::info;

use super::{block_on, check_outcome, parse_assignment, parse_record, parse_row_key};
use crate::cli::Context;
use crate::core::record::Record;
use crate::page::list::find_row;
use crate::page::FormMode;
use crate::ui::output;

/// Select a row and open the form on it.
///
/// With `inline`, the list row's values fill the form and no detail
/// request is made.
pub fn select(ctx: &Context, raw_key: &str, inline: bool) -> Result<()> {
    let key = parse_row_key(raw_key)?;
    let store = ctx.open_store()?;

    let rows = store.rows();
    let source = match find_row(&rows, &key) {
        Some((_, row)) if inline => Some(row.values.clone()),
        Some(_) => None,
        None => bail!("no row '{}' in the current list (run `pgs list` first)", key),
    };

    let outcome = block_on(store.select_row(key.clone(), source))?;
    check_outcome(outcome, "select", ctx)?;
    info!(key = %key, "row selected");

    print_form(ctx, store.form().as_ref(), store.mode());
    Ok(())
}

/// Open an empty form.
pub fn new(ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    store.activate_create();
    output::print("creating a new entry", ctx.verbosity);
    Ok(())
}

/// Close the form and clear the selection.
pub fn cancel(ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    store.cancel();
    output::print("form closed", ctx.verbosity);
    Ok(())
}

/// Edit fields of the form snapshot.
pub fn set(ctx: &Context, assignments: &[String], json: Option<&str>) -> Result<()> {
    let store = ctx.open_store()?;
    if store.mode() == FormMode::Browsing {
        bail!("no open form (use `pgs new` or `pgs select`)");
    }

    let form = match json {
        Some(raw) => parse_record(raw).context("invalid --json form")?,
        None => {
            if assignments.is_empty() {
                bail!("nothing to set");
            }
            let mut form = store.form().unwrap_or_default();
            for raw in assignments {
                let (field, value) = parse_assignment(raw)?;
                form.set(field, value);
            }
            form
        }
    };

    store.set_form(form);
    print_form(ctx, store.form().as_ref(), store.mode());
    Ok(())
}

fn print_form(ctx: &Context, form: Option<&Record>, mode: FormMode) {
    let body = match form {
        Some(form) => serde_json::to_string_pretty(form).unwrap_or_else(|_| "{}".to_string()),
        None => "{}".to_string(),
    };
    output::print(format!("form ({}):\n{}", mode, body), ctx.verbosity);
}
