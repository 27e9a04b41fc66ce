//! eCommerce cart shapes.

use serde::{Deserialize, Serialize};
use wix_headless_core::{CartId, LineItemId, ProductId, VariantId};

use super::common::{ImageRef, MultiCurrencyPrice, TranslatableString};

/// App ID of Wix Stores, used in catalog references.
pub const STORES_APP_ID: &str = "215238eb-22a5-4c36-9e7b-e7c08025e04e";

/// Application error code returned when the visitor has no cart yet.
pub const OWNED_CART_NOT_FOUND: &str = "OWNED_CART_NOT_FOUND";

/// A shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Cart ID.
    #[serde(rename = "_id", alias = "id", default)]
    pub id: CartId,
    /// Line items.
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    /// Currency the cart is priced in.
    pub currency: Option<String>,
    /// Visitor-currency code, when converted.
    pub conversion_currency: Option<String>,
    /// Subtotal, when the API includes it.
    pub subtotal: Option<MultiCurrencyPrice>,
    /// Checkout created from this cart.
    pub checkout_id: Option<String>,
}

impl Cart {
    /// Sum of line item quantities, saturating at `u32::MAX`.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.line_items
            .iter()
            .map(LineItem::quantity)
            .fold(0u32, u32::saturating_add)
    }
}

/// A cart line item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Line item ID.
    #[serde(rename = "_id", alias = "id", default)]
    pub id: LineItemId,
    /// Quantity; missing means one.
    pub quantity: Option<u32>,
    /// What was added.
    pub catalog_reference: Option<CatalogReference>,
    /// Product name.
    pub product_name: Option<TranslatableString>,
    /// Product page URL.
    pub url: Option<String>,
    /// Unit price after discounts.
    pub price: Option<MultiCurrencyPrice>,
    /// Unit price before discounts.
    pub full_price: Option<MultiCurrencyPrice>,
    /// Total for the line (price × quantity).
    pub line_item_price: Option<MultiCurrencyPrice>,
    /// Line image.
    pub image: Option<ImageRef>,
    /// Option/modifier descriptions ("Color: Red").
    #[serde(default)]
    pub description_lines: Vec<DescriptionLine>,
    /// Availability of the line.
    pub availability: Option<LineItemAvailability>,
}

impl LineItem {
    /// Quantity, defaulting to one.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity.unwrap_or(1)
    }
}

/// Reference from a line item into a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogReference {
    /// Product ID for Wix Stores items.
    #[serde(default)]
    pub catalog_item_id: ProductId,
    /// Catalog app ID.
    pub app_id: String,
    /// Variant and modifier selections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<CatalogOptions>,
}

impl CatalogReference {
    /// Reference to a Wix Stores product variant.
    #[must_use]
    pub fn stores_variant(product_id: ProductId, variant_id: Option<VariantId>) -> Self {
        Self {
            catalog_item_id: product_id,
            app_id: STORES_APP_ID.to_string(),
            options: variant_id.map(|variant_id| CatalogOptions {
                variant_id: Some(variant_id),
                custom_text_fields: None,
            }),
        }
    }
}

/// Catalog options of a line item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<VariantId>,
    /// Free-text modifier values keyed by modifier name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_text_fields: Option<std::collections::BTreeMap<String, String>>,
}

/// One description line of a cart item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionLine {
    pub name: Option<TranslatableString>,
    pub plain_text: Option<TranslatableString>,
    pub color_info: Option<ColorInfo>,
}

impl DescriptionLine {
    /// "Name: value" text of the line, when both parts exist.
    #[must_use]
    pub fn display(&self) -> Option<String> {
        let name = self.name.as_ref().and_then(TranslatableString::text)?;
        let value = self
            .plain_text
            .as_ref()
            .and_then(TranslatableString::text)
            .or_else(|| {
                self.color_info
                    .as_ref()
                    .and_then(|c| c.original.as_deref())
            })?;
        Some(format!("{name}: {value}"))
    }
}

/// Color option value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorInfo {
    pub original: Option<String>,
    pub translated: Option<String>,
    pub code: Option<String>,
}

/// Availability of a cart line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemAvailability {
    /// `AVAILABLE`, `NOT_AVAILABLE`, `NOT_FOUND`, `PARTIALLY_AVAILABLE`.
    pub status: Option<String>,
    pub quantity_available: Option<u32>,
}

impl LineItemAvailability {
    /// Whether the line can be checked out.
    #[must_use]
    pub fn is_available(&self) -> bool {
        !matches!(
            self.status.as_deref(),
            Some("NOT_AVAILABLE" | "NOT_FOUND")
        )
    }
}

/// Line to add to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLineItem {
    pub catalog_reference: CatalogReference,
    pub quantity: u32,
}

/// Quantity change of an existing line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemQuantityUpdate {
    #[serde(rename = "_id")]
    pub id: LineItemId,
    pub quantity: u32,
}

/// `{ "cart": ... }` response.
#[derive(Debug, Clone, Deserialize)]
pub struct CartResponse {
    pub cart: Option<Cart>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_total_quantity_defaults_missing_to_one() {
        let cart: Cart = serde_json::from_value(serde_json::json!({
            "_id": "cart-1",
            "lineItems": [
                { "_id": "a", "quantity": 2 },
                { "_id": "b" },
                { "_id": "c", "quantity": 3 }
            ]
        }))
        .unwrap();
        assert_eq!(cart.total_quantity(), 6);
    }

    #[test]
    fn test_total_quantity_saturates() {
        let cart: Cart = serde_json::from_value(serde_json::json!({
            "_id": "cart-1",
            "lineItems": [
                { "_id": "a", "quantity": u32::MAX },
                { "_id": "b", "quantity": 2 }
            ]
        }))
        .unwrap();
        assert_eq!(cart.total_quantity(), u32::MAX);
    }

    #[test]
    fn test_stores_variant_reference() {
        let reference = CatalogReference::stores_variant(
            ProductId::new("p1"),
            Some(VariantId::new("v1")),
        );
        let json = serde_json::to_value(&reference).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "catalogItemId": "p1",
                "appId": STORES_APP_ID,
                "options": { "variantId": "v1" }
            })
        );
    }

    #[test]
    fn test_description_line_display() {
        let line: DescriptionLine = serde_json::from_value(serde_json::json!({
            "name": { "original": "Color" },
            "colorInfo": { "original": "Red", "code": "#ff0000" }
        }))
        .unwrap();
        assert_eq!(line.display().as_deref(), Some("Color: Red"));
    }

    #[test]
    fn test_line_availability() {
        let missing = LineItemAvailability {
            status: Some("NOT_FOUND".to_string()),
            quantity_available: None,
        };
        assert!(!missing.is_available());
        assert!(LineItemAvailability::default().is_available());
    }
}
