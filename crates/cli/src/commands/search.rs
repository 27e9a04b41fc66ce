//! Product search with price facets.

use clap::Args;
use wix_headless_core::CategoryId;
use wix_headless_storefront::components::pricing::{
    PriceRangeOption, map_price_buckets, result_symbol,
};
use wix_headless_storefront::components::search::{ProductSort, SEARCH_PAGE_SIZE, SearchFilters};
use wix_headless_storefront::wix::{PRICE_AGGREGATION, ProductField};

use super::{CliError, Context, write_json};

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Free-text query
    #[arg(long, default_value = "")]
    pub query: String,

    /// Minimum price
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Maximum price
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Only products with stock
    #[arg(long)]
    pub in_stock: bool,

    /// Category ID (repeatable)
    #[arg(long = "category")]
    pub categories: Vec<String>,

    /// Page size
    #[arg(long, default_value_t = SEARCH_PAGE_SIZE)]
    pub limit: u32,
}

impl SearchArgs {
    #[must_use]
    pub fn filters(&self) -> SearchFilters {
        SearchFilters {
            query: self.query.clone(),
            category_ids: self.categories.iter().map(CategoryId::new).collect(),
            min_price: self.min_price,
            max_price: self.max_price,
            in_stock_only: self.in_stock,
            sort: ProductSort::Relevance,
        }
    }
}

/// Run one search, write the raw response to `search-results.json` and
/// print the price range facets.
///
/// # Errors
///
/// Returns an error if the request or the write fails.
pub async fn run(ctx: &Context, args: &SearchArgs) -> Result<(), CliError> {
    let search = args.filters().to_search(args.limit);
    let page = ctx.client.search_products(&search, ProductField::CARD).await?;

    let ranges = map_price_buckets(
        page.aggregation_data.range_buckets(PRICE_AGGREGATION),
        &result_symbol(&page.products),
    );
    tracing::info!(
        products = page.products.len(),
        price_ranges = ranges.len(),
        "Search complete"
    );

    write_json(&ctx.out, "search-results.json", &page)?;
    print_ranges(&ranges);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_ranges(ranges: &[PriceRangeOption]) {
    if ranges.is_empty() {
        println!("No price ranges");
        return;
    }
    for range in ranges {
        println!("{} ({})", range.label, range.count);
    }
}
