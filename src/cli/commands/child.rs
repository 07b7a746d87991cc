//! child command - Stage changes to the embedded sub list

use anyhow::{bail, Result};

use super::{parse_record, parse_row_key};
use crate::cli::args::ChildAction;
use crate::cli::Context;
use crate::page::FormMode;
use crate::ui::output;

/// Apply one sub list action and show the staged rows.
pub fn child(ctx: &Context, action: ChildAction) -> Result<()> {
    let store = ctx.open_store()?;
    if store.mode() == FormMode::Browsing {
        bail!("no open form (use `pgs new` or `pgs select`)");
    }

    match action {
        ChildAction::Add { rows } => {
            let records = rows
                .iter()
                .map(|raw| parse_record(raw))
                .collect::<Result<Vec<_>>>()?;
            store.add_children(records);
        }
        ChildAction::Edit { index, row } => {
            let len = store.child_rows().len();
            if index >= len {
                bail!("child row {} out of range ({} rows)", index, len);
            }
            store.edit_child(index, parse_record(&row)?);
        }
        ChildAction::Remove { indexes } => store.remove_children(&indexes),
        ChildAction::Check { indexes } => store.set_checked_indexes(indexes),
        ChildAction::Select { key } => {
            let key = key.as_deref().map(parse_row_key).transpose()?;
            store.set_child_selected_key(key);
        }
    }

    let rows = store.child_rows();
    if rows.is_empty() {
        output::print("no child rows", ctx.verbosity);
    } else {
        output::print(
            output::format_rows(&rows, store.child_selected_key().as_ref()),
            ctx.verbosity,
        );
    }
    Ok(())
}
