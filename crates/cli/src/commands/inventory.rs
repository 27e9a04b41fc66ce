//! Inventory dump.

use wix_headless_storefront::wix::CursorQuery;

use super::{CliError, Context, write_json};

/// Write every inventory item to `inventory.json`.
///
/// # Errors
///
/// Returns an error if a page request or the write fails.
pub async fn dump(ctx: &Context) -> Result<(), CliError> {
    let collected = ctx
        .client
        .query_all_inventory(CursorQuery::with_limit(100))
        .await?;
    if collected.truncated {
        tracing::warn!(pages = collected.pages, "Inventory dump stopped at the page cap");
    }
    tracing::info!(items = collected.items.len(), "Fetched inventory items");
    write_json(&ctx.out, "inventory.json", &collected.items)?;
    Ok(())
}
