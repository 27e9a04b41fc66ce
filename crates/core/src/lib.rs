//! Wix Headless Core - Shared types library.
//!
//! This crate provides common types used across all Wix Headless components:
//! - `storefront` - Wix client, headless components and the storefront server
//! - `cli` - Exploration scripts that dump catalog data to disk
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices and stock statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
