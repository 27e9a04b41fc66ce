//! Category dump.

use wix_headless_storefront::wix::CursorQuery;

use super::{CliError, Context, write_json};

/// Write every store category to `all-categories.json`.
///
/// # Errors
///
/// Returns an error if a page request or the write fails.
pub async fn dump(ctx: &Context) -> Result<(), CliError> {
    let collected = ctx
        .client
        .query_all_categories(CursorQuery::with_limit(100))
        .await?;
    if collected.truncated {
        tracing::warn!(pages = collected.pages, "Category dump stopped at the page cap");
    }
    tracing::info!(
        categories = collected.items.len(),
        pages = collected.pages,
        "Fetched categories"
    );
    write_json(&ctx.out, "all-categories.json", &collected.items)?;
    Ok(())
}
