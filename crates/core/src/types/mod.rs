//! Core types for the catalog proxy.
//!
//! This module provides type-safe wrappers for catalog concepts and the
//! outbound product projections.

pub mod id;
pub mod price;
pub mod product;

pub use id::{ProductId, VariantId};
pub use price::Price;
pub use product::{
    ProductDetail, ProductImage, ProductListResponse, ProductResponse, ProductSummary,
    ProductVariant, VariantSummary,
};
