//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Health check
//!
//! # Products
//! GET  /products/{slug}            - Product page
//! POST /products/{slug}/select     - Apply a selection (fast view state)
//! POST /products/{slug}/add        - Add to cart (cart indicator)
//!
//! # Categories
//! GET  /categories/{slug}          - Category page
//! GET  /categories/{slug}/more     - Next page of cards
//!
//! # Search
//! GET  /search                     - Search page
//! GET  /api/search                 - Search results (stale-aware)
//!
//! # Cart
//! GET  /cart                       - Cart page
//! GET  /cart/indicator             - Cart badge
//! POST /cart/update                - Update quantity (cart state)
//! POST /cart/remove                - Remove line (cart state)
//! ```

pub mod cart;
pub mod categories;
pub mod products;
pub mod search;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/{slug}", get(products::show))
        .route("/{slug}/select", post(products::select))
        .route("/{slug}/add", post(products::add))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/{slug}", get(categories::show))
        .route("/{slug}/more", get(categories::more))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/indicator", get(cart::indicator))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        .route("/search", get(search::page))
        .route("/api/search", get(search::api))
        .nest("/cart", cart_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check Wix.
async fn health() -> &'static str {
    "ok"
}
