//! Product projections served to the frontend.
//!
//! Two shapes exist because the list endpoint is rendered as a grid and only
//! needs thumbnails and prices, while the detail page needs per-image variant
//! mapping and variant options to drive the option pickers.
//!
//! Field declaration order is the JSON key order on the wire.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Price, ProductId, VariantId};

// =============================================================================
// Detail view
// =============================================================================

/// A single product with full image and variant metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub images: Vec<ProductImage>,
    pub variants: Vec<ProductVariant>,
    /// Product-level option definitions (sizes, colors). Empty when upstream
    /// omits them.
    pub options: Vec<Value>,
    pub tags: Vec<String>,
}

/// A product image and the variants it depicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub src: String,
    pub variant_ids: Vec<VariantId>,
    pub is_default: bool,
}

/// A purchasable variant on the detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: VariantId,
    pub title: String,
    pub price: Price,
    pub is_enabled: bool,
    /// Upstream option selection for this variant, passed through as-is.
    /// An empty object when upstream omits it.
    pub options: Value,
}

/// Response envelope for the detail endpoint: `{"product": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductResponse {
    pub product: ProductDetail,
}

// =============================================================================
// List view
// =============================================================================

/// A product as it appears in the catalog listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    /// Image source URLs, in upstream order.
    pub images: Vec<String>,
    pub variants: Vec<VariantSummary>,
    pub tags: Vec<String>,
}

/// A variant on the list view (no options).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSummary {
    pub id: VariantId,
    pub title: String,
    pub price: Price,
    pub is_enabled: bool,
}

/// Response envelope for the list endpoint: `{"products": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductSummary>,
}
