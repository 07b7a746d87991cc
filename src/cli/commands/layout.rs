//! layout and reset commands - Grid layout and saved state

use anyhow::{bail, Result};
use tracing::info;

use crate::cli::Context;
use crate::registry::TabRegistry;
use crate::ui::output;

/// Set column widths and the layout ratio.
pub fn layout(
    ctx: &Context,
    col_widths: Option<Vec<u32>>,
    child_col_widths: Option<Vec<u32>>,
    flex_grow: Option<f64>,
) -> Result<()> {
    if let Some(grow) = flex_grow {
        if !grow.is_finite() || grow < 0.0 {
            bail!("flex grow must be a non-negative number, got {}", grow);
        }
    }

    let store = ctx.open_store()?;
    if let Some(widths) = col_widths {
        store.set_col_widths(widths);
    }
    if let Some(widths) = child_col_widths {
        store.set_child_col_widths(widths);
    }
    if let Some(grow) = flex_grow {
        store.set_flex_grow(grow);
    }

    let meta = store.snapshot();
    output::print(
        format!(
            "columns: {:?}\nchild columns: {:?}\nflex grow: {}",
            meta.list_col_widths, meta.sub_list_col_widths, meta.flex_grow
        ),
        ctx.verbosity,
    );
    Ok(())
}

/// Drop the route's saved state from the registry.
pub fn reset(ctx: &Context) -> Result<()> {
    let registry = ctx.registry()?;
    registry.remove(&ctx.route)?;
    info!(route = %ctx.route, "page state removed");
    output::print(format!("reset {}", ctx.route), ctx.verbosity);
    Ok(())
}
