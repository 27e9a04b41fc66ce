//! Catalog V3 product methods.

use serde::Serialize;
use tracing::{debug, instrument};

use super::cache::{CacheKey, CacheValue};
use super::client::WixClient;
use super::paging::{Collected, collect_all};
use super::types::{
    CursorQuery, CursorSearch, Product, ProductField, ProductResponse, ProductsPage, SearchPage,
};
use super::WixError;

/// Name of the price RANGE aggregation in search requests.
pub const PRICE_AGGREGATION: &str = "price-ranges";

/// Field path of the minimum actual price.
pub const MIN_PRICE_FIELD: &str = "actualPriceRange.minValue.amount";

#[derive(Serialize)]
struct QueryBody<'a> {
    query: &'a CursorQuery,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<&'static str>,
}

#[derive(Serialize)]
struct SearchBody<'a> {
    search: &'a CursorSearch,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<&'static str>,
}

fn field_names(fields: &[ProductField]) -> Vec<&'static str> {
    fields.iter().map(|f| f.as_str()).collect()
}

fn field_params(fields: &[ProductField]) -> Vec<(&'static str, &'static str)> {
    fields.iter().map(|f| ("fields", f.as_str())).collect()
}

impl WixClient {
    /// Query one page of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, query))]
    pub async fn query_products(
        &self,
        query: &CursorQuery,
        fields: &[ProductField],
    ) -> Result<ProductsPage, WixError> {
        self.post(
            "/stores/v3/products/query",
            &QueryBody {
                query,
                fields: field_names(fields),
            },
        )
        .await
    }

    /// Query every page of products matching `query`.
    ///
    /// # Errors
    ///
    /// Returns the first page error.
    pub async fn query_all_products(
        &self,
        query: CursorQuery,
        fields: &[ProductField],
    ) -> Result<Collected<Product>, WixError> {
        collect_all(query, |q| async move {
            let page = self.query_products(&q, fields).await?;
            Ok((page.products, page.paging_metadata))
        })
        .await
    }

    /// Search products with free text, filters and aggregations.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, search))]
    pub async fn search_products(
        &self,
        search: &CursorSearch,
        fields: &[ProductField],
    ) -> Result<SearchPage, WixError> {
        self.post(
            "/stores/v3/products/search",
            &SearchBody {
                search,
                fields: field_names(fields),
            },
        )
        .await
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self, fields), fields(id = %id))]
    pub async fn get_product(
        &self,
        id: &str,
        fields: &[ProductField],
    ) -> Result<Product, WixError> {
        let path = format!("/stores/v3/products/{}", urlencoding::encode(id));
        let response: ProductResponse = self.get(&path, &field_params(fields)).await?;
        response
            .product
            .ok_or_else(|| WixError::NotFound(format!("Product not found: {id}")))
    }

    /// Get a product by slug with the full product-page field set.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_product_by_slug(&self, slug: &str) -> Result<Product, WixError> {
        let cache_key = CacheKey::ProductBySlug(slug.to_string());

        if let Some(CacheValue::Product(product)) = self.cached(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let path = format!("/stores/v3/products/slug/{}", urlencoding::encode(slug));
        let response: ProductResponse = self.get(&path, &field_params(ProductField::PAGE)).await?;
        let product = response
            .product
            .ok_or_else(|| WixError::NotFound(format!("Product not found: {slug}")))?;

        self.store(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }
}
