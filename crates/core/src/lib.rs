//! Catalog Proxy Core - Shared catalog types.
//!
//! This crate provides the product shapes the catalog proxy serves to the
//! frontend:
//! - `ProductDetail` - single product with full image and variant metadata
//! - `ProductSummary` - list entry with bare image URLs and trimmed variants
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no caching.
//! Upstream (Printify) wire shapes live in the proxy crate; this crate only
//! describes what leaves the proxy.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, and product projections

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
