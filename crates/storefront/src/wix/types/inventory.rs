//! Catalog V3 inventory item shapes.

use serde::{Deserialize, Serialize};
use wix_headless_core::{AvailabilityStatus, InventoryItemId, ProductId, VariantId};

use super::common::PagingMetadata;

/// Live stock for one variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: InventoryItemId,
    #[serde(default)]
    pub product_id: ProductId,
    #[serde(default)]
    pub variant_id: VariantId,
    /// Whether quantity is tracked. Untracked items use `in_stock` only.
    pub track_quantity: Option<bool>,
    /// Units in stock when tracked.
    pub quantity: Option<i64>,
    /// Explicit stock flag.
    pub in_stock: Option<bool>,
    pub availability_status: Option<AvailabilityStatus>,
    pub preorder_info: Option<PreorderInfo>,
}

impl InventoryItem {
    /// Whether the variant can be bought right now.
    ///
    /// Preorderable items are always purchasable. Tracked items need a
    /// positive quantity; untracked items follow their stock flag or status.
    #[must_use]
    pub fn is_available(&self) -> bool {
        if self.preorder_info.as_ref().is_some_and(|p| p.enabled.unwrap_or(false)) {
            return true;
        }
        if self.track_quantity.unwrap_or(false) {
            return self.quantity.unwrap_or(0) > 0;
        }
        self.in_stock.unwrap_or_else(|| {
            self.availability_status
                .is_none_or(AvailabilityStatus::is_purchasable)
        })
    }

    /// Units the shopper can add, when tracked.
    #[must_use]
    pub fn available_quantity(&self) -> Option<u32> {
        if !self.track_quantity.unwrap_or(false) {
            return None;
        }
        self.quantity
            .map(|q| u32::try_from(q.max(0)).unwrap_or(u32::MAX))
    }
}

/// Preorder settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreorderInfo {
    pub enabled: Option<bool>,
}

/// `{ "inventoryItems": [...] }` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemsPage {
    #[serde(default)]
    pub inventory_items: Vec<InventoryItem>,
    #[serde(default)]
    pub paging_metadata: PagingMetadata,
}
