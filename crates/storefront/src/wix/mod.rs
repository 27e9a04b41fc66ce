//! Wix REST API clients.
//!
//! # Architecture
//!
//! - Plain REST over `reqwest`; Wix is the source of truth, nothing is synced
//! - Two authentication strategies: API key + site id (server side) and
//!   OAuth visitor tokens (per visitor, persisted in a [`TokenStore`])
//! - Slow-render reads are cached via `moka` (5 minute TTL)
//!
//! # APIs
//!
//! - Catalog V3: products, search with aggregations, inventory items
//! - Categories: the `@wix/stores` category tree
//! - eCommerce: the visitor's current cart
//!
//! # Example
//!
//! ```rust,ignore
//! use wix_headless_storefront::wix::ClientFactory;
//!
//! let factory = ClientFactory::new(&config.wix, &config.api_base_url);
//! let client = factory.server_client();
//!
//! let product = client.get_product_by_slug("linen-shirt").await?;
//! ```

mod auth;
mod cache;
mod cart;
mod categories;
mod client;
mod factory;
mod inventory;
mod paging;
mod products;
pub mod types;

pub use auth::{
    ApiKeyCredentials, MemoryTokenStore, OAuthClient, TokenStore, VisitorTokens,
    REFRESH_MARGIN_SECS,
};
pub use client::{DEFAULT_API_BASE_URL, WixClient};
pub use factory::ClientFactory;
pub use paging::{Collected, MAX_PAGES, collect_all, collect_all_capped};
pub use products::{MIN_PRICE_FIELD, PRICE_AGGREGATION};
pub use types::*;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when interacting with the Wix APIs.
#[derive(Debug, Error)]
pub enum WixError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Wix answered with a non-success status.
    #[error("Wix API error ({status}): {}", format_api_error(code.as_deref(), message))]
    Api {
        /// HTTP status code.
        status: u16,
        /// Application error code (e.g., `OWNED_CART_NOT_FOUND`).
        code: Option<String>,
        /// Human readable message.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Wix.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Credentials missing or rejected.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Application error codes that mean "nothing there".
const NOT_FOUND_CODES: &[&str] = &[
    types::OWNED_CART_NOT_FOUND,
    "NOT_FOUND",
    "PRODUCT_NOT_FOUND",
    "CATEGORY_NOT_FOUND",
];

impl WixError {
    /// Whether this is the expected "not found" class rather than a failure.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Api { status, code, .. } => {
                *status == 404
                    || code
                        .as_deref()
                        .is_some_and(|c| NOT_FOUND_CODES.contains(&c))
            }
            _ => false,
        }
    }

    /// Build an API error from a status and raw response body.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) else {
            return Self::Api {
                status,
                code: None,
                message: body.chars().take(200).collect(),
            };
        };
        let code = parsed
            .details
            .and_then(|d| d.application_error)
            .and_then(|a| a.code)
            .or(parsed.code);
        Self::Api {
            status,
            code,
            message: parsed.message.unwrap_or_default(),
        }
    }
}

fn format_api_error(code: Option<&str>, message: &str) -> String {
    match code {
        Some(code) if message.is_empty() => code.to_string(),
        Some(code) => format!("{code}: {message}"),
        None if message.is_empty() => "(no error details provided)".to_string(),
        None => message.to_string(),
    }
}

/// Error body returned by Wix.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    code: Option<String>,
    details: Option<ApiErrorDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrorDetails {
    application_error: Option<ApplicationError>,
}

#[derive(Debug, Deserialize)]
struct ApplicationError {
    code: Option<String>,
}
