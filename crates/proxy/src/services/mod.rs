//! Business logic services for the catalog proxy.
//!
//! # Services
//!
//! - `catalog` - Cached product detail and list bodies

pub mod catalog;

pub use catalog::{CatalogResponse, CatalogService};
