//! list and page commands - Run the list query

use anyhow::Result;

use super::{block_on, check_outcome, parse_assignment};
use crate::cli::Context;
use crate::core::record::Record;
use crate::core::types::SortParam;
use crate::page::PageStore;
use crate::ui::output;

/// Run the list query, replacing filters, sort or page size first when given.
pub fn list(ctx: &Context, filters: &[String], sort: &[String], size: Option<u32>) -> Result<()> {
    let store = ctx.open_store()?;

    if !filters.is_empty() || size.is_some() {
        let mut query = store.query();
        if !filters.is_empty() {
            query.filters = filters
                .iter()
                .map(|raw| parse_assignment(raw))
                .collect::<Result<_>>()?;
        }
        if let Some(size) = size {
            query = query.paged(1, Some(size));
        }
        store.set_query(query);
    }
    if !sort.is_empty() {
        let params = sort
            .iter()
            .map(|raw| raw.parse::<SortParam>())
            .collect::<Result<Vec<_>, _>>()?;
        store.set_sort_params(params);
    }

    let outcome = block_on(store.run_query(None))?;
    check_outcome(outcome, "list", ctx)?;
    print_rows(ctx, &store);
    Ok(())
}

/// Move to page `number` and run the query.
pub fn page(ctx: &Context, number: u32, size: Option<u32>) -> Result<()> {
    if number == 0 {
        anyhow::bail!("page numbers start at 1");
    }
    let store = ctx.open_store()?;
    let outcome = block_on(store.change_page(number, size))?;
    check_outcome(outcome, "page change", ctx)?;
    print_rows(ctx, &store);
    Ok(())
}

fn print_rows(ctx: &Context, store: &PageStore<Record>) {
    let rows = store.rows();
    if rows.is_empty() {
        output::print("no rows", ctx.verbosity);
    } else {
        output::print(
            output::format_rows(&rows, store.selected_key().as_ref()),
            ctx.verbosity,
        );
    }
    output::print(output::format_page(&store.page()), ctx.verbosity);
}
