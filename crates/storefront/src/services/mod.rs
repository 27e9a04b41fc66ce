//! Services that fetch vendor data and hand it to the components.
//!
//! - [`CatalogService`] - products, categories and search (API-key client)
//! - [`CartService`] - the visitor's cart (visitor client)

pub mod cart;
pub mod catalog;

pub use cart::CartService;
pub use catalog::CatalogService;
