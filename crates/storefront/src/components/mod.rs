//! Headless storefront components.
//!
//! Each component maps vendor data into serializable view states:
//! - slow render: data that can be cached with the page
//! - fast render: per-request data (stock, the visitor's cart)
//! - interactive: state changes driven by the shopper
//!
//! Components never perform I/O; the services in [`crate::services`]
//! fetch the data and hand it over.

pub mod cart;
pub mod category_page;
pub mod media;
pub mod pricing;
pub mod product_card;
pub mod product_page;
pub mod search;
pub mod variants;

/// Display name for entities without one.
pub const UNNAMED: &str = "unnamed";
