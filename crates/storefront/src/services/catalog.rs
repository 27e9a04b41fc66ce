//! Catalog reads behind the product, category and search pages.

use tracing::{instrument, warn};
use wix_headless_core::CategoryId;

use crate::components::category_page::{
    CategoryFastViewState, CategorySlowViewState, category_products_query, next_products_query,
};
use crate::components::product_page::ProductPage;
use crate::components::search::{
    ProductSort, SEARCH_PAGE_SIZE, SearchFilters, SearchViewState, next_search,
};
use crate::wix::{InventoryItem, ProductField, WixClient, WixError};

/// Reads with the server-side API-key client.
#[derive(Debug, Clone)]
pub struct CatalogService {
    client: WixClient,
}

impl CatalogService {
    #[must_use]
    pub const fn new(client: WixClient) -> Self {
        Self { client }
    }

    /// Live stock of one product. Failures fall back to catalog flags.
    async fn live_stock(&self, product_id: &str) -> Vec<InventoryItem> {
        match self.client.inventory_for_products(&[product_id]).await {
            Ok(items) => items,
            Err(e) => {
                warn!(product_id, error = %e, "Inventory unavailable, using catalog stock");
                Vec::new()
            }
        }
    }

    /// Product page for `slug` with live stock.
    ///
    /// # Errors
    ///
    /// Returns an error if the product cannot be loaded.
    #[instrument(skip(self))]
    pub async fn product_page(&self, slug: &str) -> Result<ProductPage, WixError> {
        let product = self.client.get_product_by_slug(slug).await?;
        let stock = self.live_stock(product.id.as_str()).await;
        Ok(ProductPage::new(product, &stock))
    }

    /// Category data plus the first page of its products.
    ///
    /// # Errors
    ///
    /// Returns an error if the category or its products cannot be loaded.
    #[instrument(skip(self))]
    pub async fn category_page(
        &self,
        slug: &str,
        sort: ProductSort,
    ) -> Result<(CategorySlowViewState, CategoryFastViewState), WixError> {
        let category = self.client.get_category_by_slug(slug).await?;
        let page = self
            .client
            .query_products(
                &category_products_query(&category.id, sort),
                ProductField::CARD,
            )
            .await?;
        Ok((
            CategorySlowViewState::from_category(&category),
            CategoryFastViewState::from_page(sort, &page),
        ))
    }

    /// Products of a category after `cursor`, or the first page when `cursor` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the category or its products cannot be loaded.
    #[instrument(skip(self))]
    pub async fn category_products(
        &self,
        slug: &str,
        sort: ProductSort,
        cursor: Option<&str>,
    ) -> Result<CategoryFastViewState, WixError> {
        let query = match cursor.filter(|c| !c.is_empty()) {
            Some(cursor) => next_products_query(cursor),
            None => {
                let category = self.client.get_category_by_slug(slug).await?;
                category_products_query(&category.id, sort)
            }
        };
        let page = self.client.query_products(&query, ProductField::CARD).await?;
        Ok(CategoryFastViewState::from_page(sort, &page))
    }

    /// Run a search, or fetch the page after `cursor`.
    ///
    /// # Errors
    ///
    /// Returns an error if the search request fails.
    #[instrument(skip(self, filters), fields(query = %filters.query))]
    pub async fn search(
        &self,
        filters: &SearchFilters,
        cursor: Option<&str>,
    ) -> Result<SearchViewState, WixError> {
        let search = match cursor.filter(|c| !c.is_empty()) {
            Some(cursor) => next_search(cursor, SEARCH_PAGE_SIZE),
            None => filters.to_search(SEARCH_PAGE_SIZE),
        };
        let page = self
            .client
            .search_products(&search, ProductField::CARD)
            .await?;
        Ok(SearchViewState::from_page(filters, &page))
    }

    /// Category IDs for the search facet, keyed by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if a category cannot be loaded.
    pub async fn category_ids(&self, slugs: &[String]) -> Result<Vec<CategoryId>, WixError> {
        let mut ids = Vec::with_capacity(slugs.len());
        for slug in slugs {
            ids.push(self.client.get_category_by_slug(slug).await?.id);
        }
        Ok(ids)
    }
}
