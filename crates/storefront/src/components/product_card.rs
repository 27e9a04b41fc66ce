//! Product card view state used by listings and search results.

use serde::Serialize;

use super::UNNAMED;
use super::media::{MediaViewState, main_media};
use super::pricing::{DEFAULT_SYMBOL, format_price, is_discounted, product_symbol};
use crate::wix::Product;

/// A product tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCardViewState {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub url: String,
    pub price: String,
    pub compare_at_price: Option<String>,
    pub has_discount: bool,
    pub image: Option<MediaViewState>,
    pub ribbon: Option<String>,
    pub brand: Option<String>,
    pub in_stock: bool,
}

impl ProductCardViewState {
    /// Card for one product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        let symbol = product_symbol(product).unwrap_or_else(|| DEFAULT_SYMBOL.to_string());
        let slug = product.slug.clone().unwrap_or_default();
        let has_discount = is_discounted(product.min_price(), product.min_compare_at_price());

        Self {
            id: product.id.to_string(),
            name: product
                .name
                .clone()
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| UNNAMED.to_string()),
            url: format!("/products/{slug}"),
            slug,
            price: product
                .min_price()
                .and_then(|p| format_price(p, &symbol))
                .unwrap_or_default(),
            compare_at_price: has_discount
                .then(|| product.min_compare_at_price())
                .flatten()
                .and_then(|p| format_price(p, &symbol)),
            has_discount,
            image: main_media(product),
            ribbon: product.ribbon.as_ref().and_then(|r| r.name.clone()),
            brand: product.brand.as_ref().and_then(|b| b.name.clone()),
            in_stock: product.availability().is_purchasable(),
        }
    }
}

/// Cards for a list of products.
#[must_use]
pub fn product_cards(products: &[Product]) -> Vec<ProductCardViewState> {
    products.iter().map(ProductCardViewState::from_product).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_card_from_full_product() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "_id": "p1",
            "name": "Linen Shirt",
            "slug": "linen-shirt",
            "ribbon": { "name": "Sale" },
            "inventory": { "availabilityStatus": "IN_STOCK" },
            "currency": "USD",
            "actualPriceRange": { "minValue": { "amount": "40", "formattedAmount": "$40.00" } },
            "compareAtPriceRange": { "minValue": { "amount": "55", "formattedAmount": "$55.00" } },
            "media": { "main": { "url": "https://static.wixstatic.com/media/a.jpg" } }
        }))
        .unwrap();

        let card = ProductCardViewState::from_product(&product);
        assert_eq!(card.name, "Linen Shirt");
        assert_eq!(card.url, "/products/linen-shirt");
        assert_eq!(card.price, "$40.00");
        assert_eq!(card.compare_at_price.as_deref(), Some("$55.00"));
        assert!(card.has_discount);
        assert!(card.in_stock);
        assert_eq!(card.ribbon.as_deref(), Some("Sale"));
        assert_eq!(card.image.unwrap().alt, "Linen Shirt");
    }

    #[test]
    fn test_card_defaults_for_sparse_product() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "_id": "p2",
            "currency": "EUR",
            "actualPriceRange": { "minValue": { "amount": "10" } },
            "inventory": { "availabilityStatus": "OUT_OF_STOCK" }
        }))
        .unwrap();

        let card = ProductCardViewState::from_product(&product);
        assert_eq!(card.name, "unnamed");
        assert_eq!(card.slug, "");
        assert_eq!(card.price, "€10");
        assert!(!card.has_discount);
        assert!(card.compare_at_price.is_none());
        assert!(!card.in_stock);
        assert!(card.image.is_none());
    }
}
