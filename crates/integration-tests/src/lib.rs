//! Integration tests for the Wix headless clients and storefront.
//!
//! Every test runs against an `httpmock` server standing in for
//! `www.wixapis.com`, so no credentials or network access are needed.
//!
//! ```bash
//! cargo test -p wix-headless-integration-tests
//! ```

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use secrecy::SecretString;
use serde_json::{Value, json};
use wix_headless_storefront::config::{StorefrontConfig, WixConfig};
use wix_headless_storefront::wix::{
    ApiKeyCredentials, ClientFactory, TokenStore, WixClient, WixError,
};

pub const API_KEY: &str = "IST.test-key";
pub const SITE_ID: &str = "site-123";
pub const CLIENT_ID: &str = "client-123";
pub const VISITOR_KEY: &str = "visitor-1";

/// Credentials the mock server expects.
#[must_use]
pub fn wix_config() -> WixConfig {
    WixConfig {
        api_key: ApiKeyCredentials {
            api_key: SecretString::from(API_KEY),
            site_id: SITE_ID.to_string(),
        },
        client_id: Some(CLIENT_ID.to_string()),
    }
}

/// Factory pointed at a mock server.
#[must_use]
pub fn factory(base_url: &str) -> ClientFactory {
    ClientFactory::new(&wix_config(), base_url)
}

/// API-key client pointed at a mock server.
#[must_use]
pub fn server_client(base_url: &str) -> WixClient {
    factory(base_url).server_client()
}

/// Visitor client pointed at a mock server.
///
/// # Errors
///
/// Returns an auth error if the OAuth client id is missing.
pub fn visitor_client(base_url: &str, store: Arc<dyn TokenStore>) -> Result<WixClient, WixError> {
    factory(base_url).visitor_client(VISITOR_KEY, store)
}

/// Storefront config pointed at a mock server.
#[must_use]
pub fn storefront_config(base_url: &str) -> StorefrontConfig {
    StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        api_base_url: base_url.to_string(),
        wix: wix_config(),
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// A Catalog V3 product with one variant priced in USD.
#[must_use]
pub fn product_json(id: &str, slug: &str, name: &str) -> Value {
    json!({
        "_id": id,
        "name": name,
        "slug": slug,
        "visible": true,
        "currency": "USD",
        "plainDescription": "Soft cotton.",
        "actualPriceRange": {
            "minValue": { "amount": "19.90", "formattedAmount": "$19.90" },
            "maxValue": { "amount": "19.90", "formattedAmount": "$19.90" }
        },
        "inventory": { "availabilityStatus": "IN_STOCK" },
        "variantsInfo": {
            "variants": [
                {
                    "_id": format!("{id}-v1"),
                    "visible": true,
                    "choices": [],
                    "price": { "actualPrice": { "amount": "19.90", "formattedAmount": "$19.90" } },
                    "inventoryStatus": { "inStock": true }
                }
            ]
        }
    })
}

/// A cart holding `quantity` of one product.
#[must_use]
pub fn cart_json(quantity: u32) -> Value {
    json!({
        "cart": {
            "_id": "cart-1",
            "currency": "USD",
            "lineItems": [
                {
                    "_id": "line-1",
                    "quantity": quantity,
                    "productName": { "original": "Classic Tee" },
                    "price": { "amount": "19.90", "formattedAmount": "$19.90" },
                    "catalogReference": {
                        "catalogItemId": "prod-1",
                        "appId": wix_headless_storefront::wix::STORES_APP_ID
                    }
                }
            ]
        }
    })
}

/// Wix error body for an application error code.
#[must_use]
pub fn application_error(code: &str) -> Value {
    json!({
        "message": code,
        "details": { "applicationError": { "code": code, "description": code } }
    })
}

/// Paging metadata with an optional next cursor.
#[must_use]
pub fn paging(count: u32, next: Option<&str>) -> Value {
    match next {
        Some(cursor) => json!({ "count": count, "cursors": { "next": cursor }, "hasNext": true }),
        None => json!({ "count": count, "cursors": {}, "hasNext": false }),
    }
}
