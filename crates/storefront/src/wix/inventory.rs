//! Catalog V3 inventory methods.

use serde::Serialize;
use tracing::instrument;

use super::WixError;
use super::client::WixClient;
use super::paging::{Collected, collect_all};
use super::types::{CursorQuery, Filter, InventoryItem, InventoryItemsPage};

#[derive(Serialize)]
struct QueryBody<'a> {
    query: &'a CursorQuery,
}

impl WixClient {
    /// Query one page of inventory items.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, query))]
    pub async fn query_inventory(&self, query: &CursorQuery) -> Result<InventoryItemsPage, WixError> {
        self.post("/stores/v3/inventory-items/query", &QueryBody { query })
            .await
    }

    /// Every inventory item of the given products.
    ///
    /// # Errors
    ///
    /// Returns the first page error.
    pub async fn inventory_for_products(
        &self,
        product_ids: &[&str],
    ) -> Result<Vec<InventoryItem>, WixError> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = CursorQuery::with_limit(100)
            .filter(Filter::new().is_in("productId", product_ids.iter().copied()));
        Ok(self.query_all_inventory(query).await?.items)
    }

    /// Query every page of inventory items.
    ///
    /// # Errors
    ///
    /// Returns the first page error.
    pub async fn query_all_inventory(
        &self,
        query: CursorQuery,
    ) -> Result<Collected<InventoryItem>, WixError> {
        collect_all(query, |q| async move {
            let page = self.query_inventory(&q).await?;
            Ok((page.inventory_items, page.paging_metadata))
        })
        .await
    }
}
