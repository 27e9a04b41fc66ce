//! Product dumps.

use std::collections::BTreeSet;

use serde::Serialize;
use wix_headless_storefront::wix::{CursorQuery, Product, ProductField};

use super::{CliError, Context, fetched_at, write_json};

/// How `products get` finds its product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Id(String),
    Slug(String),
}

impl Lookup {
    fn key(&self) -> &str {
        match self {
            Self::Id(key) | Self::Slug(key) => key,
        }
    }
}

/// Contents of `summary.json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DumpSummary {
    pub total_products: usize,
    pub pages_fetched: usize,
    pub visible_products: usize,
    pub with_variants: usize,
    pub with_options: usize,
    pub currencies: BTreeSet<String>,
    pub fetched_at: String,
}

impl DumpSummary {
    #[must_use]
    pub fn from_products(products: &[Product], pages_fetched: usize, fetched_at: String) -> Self {
        Self {
            total_products: products.len(),
            pages_fetched,
            visible_products: products.iter().filter(|p| p.visible.unwrap_or(true)).count(),
            with_variants: products.iter().filter(|p| p.variants().len() > 1).count(),
            with_options: products.iter().filter(|p| !p.options.is_empty()).count(),
            currencies: products.iter().filter_map(|p| p.currency.clone()).collect(),
            fetched_at,
        }
    }
}

/// One failed product in `fetch-summary.json`.
#[derive(Debug, Serialize)]
pub struct FetchFailure {
    pub id: String,
    pub error: String,
}

/// Contents of `fetch-summary.json`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<FetchFailure>,
    pub fetched_at: String,
}

/// File name for one product under `products/`.
///
/// Slugs that could leave the directory fall back to the product id, and
/// path separators in the id are replaced.
#[must_use]
pub fn product_file_name(product: &Product) -> String {
    let key = product
        .slug
        .as_deref()
        .filter(|slug| is_plain_file_stem(slug))
        .map_or_else(|| sanitize_file_stem(product.id.as_str()), str::to_string);
    format!("products/{key}.json")
}

fn is_plain_file_stem(stem: &str) -> bool {
    !stem.is_empty() && !stem.starts_with('.') && !stem.contains(['/', '\\'])
}

fn sanitize_file_stem(stem: &str) -> String {
    let cleaned: String = stem
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned.to_string()
    }
}

async fn all_products(ctx: &Context) -> Result<(Vec<Product>, usize), CliError> {
    let collected = ctx
        .client
        .query_all_products(CursorQuery::with_limit(100), ProductField::CARD)
        .await?;
    if collected.truncated {
        tracing::warn!(pages = collected.pages, "Product dump stopped at the page cap");
    }
    Ok((collected.items, collected.pages))
}

/// Write every product to `all-products.json` and a `summary.json`.
///
/// # Errors
///
/// Returns an error if a page request or a write fails.
pub async fn dump(ctx: &Context) -> Result<(), CliError> {
    let (products, pages) = all_products(ctx).await?;
    let summary = DumpSummary::from_products(&products, pages, fetched_at());
    tracing::info!(
        products = summary.total_products,
        pages = summary.pages_fetched,
        visible = summary.visible_products,
        "Fetched products"
    );

    write_json(&ctx.out, "all-products.json", &products)?;
    write_json(&ctx.out, "summary.json", &summary)?;
    Ok(())
}

/// Fetch each product by ID with the product-page field set.
///
/// A product that fails is recorded in `fetch-summary.json` and the run
/// continues.
///
/// # Errors
///
/// Returns an error if listing the products or a write fails.
pub async fn fetch_each(ctx: &Context) -> Result<(), CliError> {
    let (products, _) = all_products(ctx).await?;
    let mut failures = Vec::new();
    let mut succeeded = 0;

    for listed in &products {
        match ctx.client.get_product(listed.id.as_str(), ProductField::PAGE).await {
            Ok(product) => {
                write_json(&ctx.out, &product_file_name(&product), &product)?;
                succeeded += 1;
            }
            Err(e) => {
                tracing::warn!(id = %listed.id, error = %e, "Failed to fetch product");
                failures.push(FetchFailure {
                    id: listed.id.to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    let summary = FetchSummary {
        total: products.len(),
        succeeded,
        failed: failures.len(),
        failures,
        fetched_at: fetched_at(),
    };
    tracing::info!(
        total = summary.total,
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Fetched products individually"
    );
    write_json(&ctx.out, "fetch-summary.json", &summary)?;
    Ok(())
}

/// Write one product to `product-<key>.json`.
///
/// # Errors
///
/// Returns an error if the product is not found or the write fails.
pub async fn get(ctx: &Context, lookup: &Lookup) -> Result<(), CliError> {
    let product = match lookup {
        Lookup::Id(id) => ctx.client.get_product(id, ProductField::PAGE).await?,
        Lookup::Slug(slug) => ctx.client.get_product_by_slug(slug).await?,
    };
    let name = format!("product-{}.json", sanitize_file_stem(lookup.key()));
    write_json(&ctx.out, &name, &product)?;
    Ok(())
}
