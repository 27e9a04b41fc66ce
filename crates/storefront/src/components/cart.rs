//! Cart indicator and cart page view states.

use serde::Serialize;
use wix_headless_core::LineItemId;

use super::UNNAMED;
use super::media::{MediaViewState, image_view};
use crate::wix::{
    Cart, DescriptionLine, LineItem, LineItemAvailability, LineItemQuantityUpdate,
    MultiCurrencyPrice,
};

/// Header badge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CartIndicatorViewState {
    pub item_count: u32,
    pub has_items: bool,
}

impl CartIndicatorViewState {
    /// Badge for the visitor's cart; no cart is an empty badge.
    #[must_use]
    pub fn from_cart(cart: Option<&Cart>) -> Self {
        let item_count = cart.map_or(0, Cart::total_quantity);
        Self {
            item_count,
            has_items: item_count > 0,
        }
    }
}

/// One cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineItem {
    pub id: String,
    pub product_id: Option<String>,
    pub name: String,
    /// Description lines joined, e.g. `"Size: M, Color: Blue"`.
    pub variant_description: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
    pub image: Option<MediaViewState>,
    pub url: Option<String>,
    pub available: bool,
}

impl CartLineItem {
    #[must_use]
    pub fn from_line_item(item: &LineItem) -> Self {
        let name = item
            .product_name
            .as_ref()
            .and_then(|n| n.text())
            .filter(|n| !n.is_empty())
            .unwrap_or(UNNAMED)
            .to_string();

        let formatted = |price: Option<&MultiCurrencyPrice>| {
            price
                .and_then(|p| p.effective_formatted().or_else(|| p.effective_amount()))
                .unwrap_or_default()
                .to_string()
        };

        Self {
            id: item.id.to_string(),
            product_id: item
                .catalog_reference
                .as_ref()
                .map(|r| r.catalog_item_id.to_string()),
            variant_description: item
                .description_lines
                .iter()
                .filter_map(DescriptionLine::display)
                .collect::<Vec<_>>()
                .join(", "),
            quantity: item.quantity(),
            unit_price: formatted(item.price.as_ref()),
            line_total: formatted(item.line_item_price.as_ref().or(item.price.as_ref())),
            image: item.image.as_ref().and_then(|i| image_view(i, &name)),
            url: item.url.clone(),
            available: item
                .availability
                .as_ref()
                .is_none_or(LineItemAvailability::is_available),
            name,
        }
    }
}

/// Cart page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartState {
    pub line_items: Vec<CartLineItem>,
    pub item_count: u32,
    pub subtotal: String,
    pub is_empty: bool,
    pub currency: Option<String>,
}

impl CartState {
    /// Page state; no cart is an empty cart.
    #[must_use]
    pub fn from_cart(cart: Option<&Cart>) -> Self {
        let Some(cart) = cart else {
            return Self::empty();
        };
        let line_items: Vec<CartLineItem> =
            cart.line_items.iter().map(CartLineItem::from_line_item).collect();

        Self {
            item_count: cart.total_quantity(),
            subtotal: cart
                .subtotal
                .as_ref()
                .and_then(|s| s.effective_formatted().or_else(|| s.effective_amount()))
                .unwrap_or_default()
                .to_string(),
            is_empty: line_items.is_empty(),
            currency: cart
                .conversion_currency
                .clone()
                .or_else(|| cart.currency.clone()),
            line_items,
        }
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self {
            line_items: Vec::new(),
            item_count: 0,
            subtotal: String::new(),
            is_empty: true,
            currency: None,
        }
    }
}

/// What a quantity change turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    Update(LineItemQuantityUpdate),
    Remove(LineItemId),
}

/// Quantity change for a line; zero removes it.
#[must_use]
pub fn quantity_change(line_item_id: LineItemId, quantity: u32) -> CartAction {
    if quantity == 0 {
        CartAction::Remove(line_item_id)
    } else {
        CartAction::Update(LineItemQuantityUpdate {
            id: line_item_id,
            quantity: quantity.min(super::product_page::MAX_QUANTITY),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cart() -> Cart {
        serde_json::from_value(serde_json::json!({
            "_id": "cart-1",
            "currency": "USD",
            "subtotal": { "amount": "94", "formattedAmount": "$94.00" },
            "lineItems": [
                {
                    "_id": "line-1",
                    "quantity": 2,
                    "productName": { "original": "Linen Shirt" },
                    "catalogReference": {
                        "catalogItemId": "p1",
                        "appId": "215238eb-22a5-4c36-9e7b-e7c08025e04e",
                        "options": { "variantId": "v1" }
                    },
                    "price": { "amount": "40", "formattedAmount": "$40.00" },
                    "lineItemPrice": { "amount": "80", "formattedAmount": "$80.00" },
                    "descriptionLines": [
                        { "name": { "original": "Size" }, "plainText": { "original": "M" } },
                        { "name": { "original": "Color" }, "colorInfo": { "original": "Blue", "code": "#00f" } }
                    ],
                    "url": "https://shop.example.com/product-page/linen-shirt"
                },
                {
                    "_id": "line-2",
                    "productName": { "original": "Mug" },
                    "price": { "amount": "14", "formattedAmount": "$14.00" },
                    "availability": { "status": "NOT_AVAILABLE" }
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_indicator_without_cart() {
        let indicator = CartIndicatorViewState::from_cart(None);
        assert_eq!(indicator.item_count, 0);
        assert!(!indicator.has_items);
    }

    #[test]
    fn test_indicator_sums_quantities() {
        let cart = cart();
        let indicator = CartIndicatorViewState::from_cart(Some(&cart));
        assert_eq!(indicator.item_count, 3);
        assert!(indicator.has_items);
    }

    #[test]
    fn test_indicator_with_huge_quantities() {
        let mut cart = cart();
        cart.line_items[0].quantity = Some(u32::MAX);
        let indicator = CartIndicatorViewState::from_cart(Some(&cart));
        assert_eq!(indicator.item_count, u32::MAX);
        assert_eq!(CartState::from_cart(Some(&cart)).item_count, u32::MAX);
    }

    #[test]
    fn test_cart_state() {
        let cart = cart();
        let state = CartState::from_cart(Some(&cart));
        assert_eq!(state.item_count, 3);
        assert_eq!(state.subtotal, "$94.00");
        assert_eq!(state.currency.as_deref(), Some("USD"));
        assert!(!state.is_empty);

        let first = &state.line_items[0];
        assert_eq!(first.name, "Linen Shirt");
        assert_eq!(first.product_id.as_deref(), Some("p1"));
        assert_eq!(first.variant_description, "Size: M, Color: Blue");
        assert_eq!(first.unit_price, "$40.00");
        assert_eq!(first.line_total, "$80.00");
        assert!(first.available);

        let second = &state.line_items[1];
        assert_eq!(second.quantity, 1);
        assert_eq!(second.line_total, "$14.00");
        assert!(!second.available);
    }

    #[test]
    fn test_empty_cart_state() {
        let state = CartState::from_cart(None);
        assert!(state.is_empty);
        assert_eq!(state.item_count, 0);
        assert!(state.line_items.is_empty());
    }

    #[test]
    fn test_quantity_zero_removes_line() {
        assert_eq!(
            quantity_change(LineItemId::new("line-1"), 0),
            CartAction::Remove(LineItemId::new("line-1"))
        );
        assert_eq!(
            quantity_change(LineItemId::new("line-1"), 3),
            CartAction::Update(LineItemQuantityUpdate {
                id: LineItemId::new("line-1"),
                quantity: 3
            })
        );
    }
}
