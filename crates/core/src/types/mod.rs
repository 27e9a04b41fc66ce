//! Core types for Wix Headless.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod status;

pub use id::*;
pub use price::{CurrencyCode, Money, MoneyError, symbol_for};
pub use status::AvailabilityStatus;
