//! Domain types for the Wix REST APIs.
//!
//! Every vendor field is optional or defaulted: Wix omits fields that were
//! not requested via `fields`, and unknown fields are ignored.

mod cart;
mod category;
mod common;
mod inventory;
mod product;
mod query;

pub use cart::*;
pub use category::*;
pub use common::*;
pub use inventory::*;
pub use product::*;
pub use query::*;
