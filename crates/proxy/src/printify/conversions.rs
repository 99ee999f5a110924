//! Projections from Printify shapes to the frontend shapes.
//!
//! Both are pure field selection: prices, flags and option payloads are
//! passed through unchanged.

use catalog_proxy_core::{
    Price, ProductDetail, ProductId, ProductImage, ProductSummary, ProductVariant, VariantId,
    VariantSummary,
};
use serde_json::{Map, Value};

use super::types::{PrintifyImage, PrintifyProduct, PrintifyVariant};

// =============================================================================
// Detail view
// =============================================================================

/// Project a product for the detail endpoint.
#[must_use]
pub fn to_product_detail(product: PrintifyProduct) -> ProductDetail {
    ProductDetail {
        id: ProductId::from(product.id),
        title: product.title,
        description: product.description,
        images: product.images.into_iter().map(convert_image).collect(),
        variants: product.variants.into_iter().map(convert_variant).collect(),
        options: product.options.unwrap_or_default(),
        tags: product.tags,
    }
}

fn convert_image(image: PrintifyImage) -> ProductImage {
    ProductImage {
        src: image.src,
        variant_ids: image.variant_ids.into_iter().map(VariantId::from).collect(),
        is_default: image.is_default,
    }
}

fn convert_variant(variant: PrintifyVariant) -> ProductVariant {
    ProductVariant {
        id: VariantId::new(variant.id),
        title: variant.title,
        price: Price::from_minor_units(variant.price),
        is_enabled: variant.is_enabled,
        options: variant
            .options
            .unwrap_or_else(|| Value::Object(Map::new())),
    }
}

// =============================================================================
// List view
// =============================================================================

/// Project a product for the list endpoint.
///
/// Images collapse to their source URL and variants lose their options.
#[must_use]
pub fn to_product_summary(product: PrintifyProduct) -> ProductSummary {
    ProductSummary {
        id: ProductId::from(product.id),
        title: product.title,
        description: product.description,
        images: product.images.into_iter().map(|image| image.src).collect(),
        variants: product
            .variants
            .into_iter()
            .map(|variant| VariantSummary {
                id: VariantId::new(variant.id),
                title: variant.title,
                price: Price::from_minor_units(variant.price),
                is_enabled: variant.is_enabled,
            })
            .collect(),
        tags: product.tags,
    }
}
