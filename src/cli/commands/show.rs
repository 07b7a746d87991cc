//! show command - Display the page state

use anyhow::Result;

use crate::cli::Context;
use crate::core::metadata::to_document;
use crate::core::types::SortParam;
use crate::ui::output;

/// Show the page state, or the full metadata document with `json`.
pub fn show(ctx: &Context, json: bool) -> Result<()> {
    let store = ctx.open_store()?;
    let meta = store.snapshot();

    if json {
        let doc = to_document(&store.route(), &meta)?;
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    let v = ctx.verbosity;
    output::print(format!("route: {}", store.route()), v);
    output::print(format!("mode: {}", store.mode()), v);
    output::print(
        format!(
            "query: page {} size {}{}",
            meta.list_query.page_number,
            meta.list_query.page_size,
            describe_sort(&meta.list_sort_params)
        ),
        v,
    );
    if !meta.list_query.filters.is_empty() {
        let filters: Vec<String> = meta
            .list_query
            .filters
            .iter()
            .map(|(k, value)| format!("{}={}", k, value))
            .collect();
        output::print(format!("filters:\n{}", output::format_list(&filters, "  ")), v);
    }
    output::print(output::format_page(&meta.list_page), v);

    if !meta.list_rows.is_empty() {
        output::print(
            output::format_rows(&meta.list_rows, meta.list_selected_row_key.as_ref()),
            v,
        );
    }

    if meta.form_active {
        let form = meta
            .form
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?
            .unwrap_or_else(|| "{}".to_string());
        output::print(format!("form: {}", form), v);

        if !meta.sub_list_rows.is_empty() {
            output::print("children:", v);
            output::print(
                output::format_rows(&meta.sub_list_rows, meta.sub_list_selected_row_key.as_ref()),
                v,
            );
        }
        if !meta.sub_list_checked_indexes.is_empty() {
            output::print(format!("checked: {:?}", meta.sub_list_checked_indexes), v);
        }
    }
    Ok(())
}

fn describe_sort(params: &[SortParam]) -> String {
    if params.is_empty() {
        String::new()
    } else {
        let parts: Vec<String> = params.iter().map(ToString::to_string).collect();
        format!(" sort {}", parts.join(","))
    }
}
