//! Printify REST API response shapes.
//!
//! Only the fields the proxy projects are declared; everything else in the
//! upstream payload is ignored. A missing or mistyped declared field fails
//! deserialization instead of leaking through as `null`.

use serde::Deserialize;
use serde_json::Value;

/// A product from `GET /v1/shops/{shop_id}/products/{product_id}.json`, and
/// each element of the list endpoint's `data` array.
#[derive(Debug, Clone, Deserialize)]
pub struct PrintifyProduct {
    pub id: String,
    pub title: String,
    pub description: String,
    pub images: Vec<PrintifyImage>,
    pub variants: Vec<PrintifyVariant>,
    /// Option definitions (e.g. sizes, colors). May be absent or `null`.
    #[serde(default)]
    pub options: Option<Vec<Value>>,
    pub tags: Vec<String>,
}

/// A product mockup image.
#[derive(Debug, Clone, Deserialize)]
pub struct PrintifyImage {
    pub src: String,
    pub variant_ids: Vec<u64>,
    pub is_default: bool,
}

/// A product variant.
#[derive(Debug, Clone, Deserialize)]
pub struct PrintifyVariant {
    pub id: u64,
    pub title: String,
    /// Retail price in minor units.
    pub price: i64,
    pub is_enabled: bool,
    /// Option value ids this variant selects. May be absent or `null`.
    #[serde(default)]
    pub options: Option<Value>,
}

/// Response of `GET /v1/shops/{shop_id}/products.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct PrintifyProductPage {
    pub data: Vec<PrintifyProduct>,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub last_page: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_product_ignores_unknown_fields() {
        let product: PrintifyProduct = serde_json::from_value(json!({
            "id": "5d39b159e7c48c000728c89f",
            "title": "Mug 11oz",
            "description": "Ceramic mug",
            "tags": ["Home & Living"],
            "images": [],
            "variants": [],
            "blueprint_id": 68,
            "print_provider_id": 9,
            "visible": true
        }))
        .unwrap();

        assert_eq!(product.id, "5d39b159e7c48c000728c89f");
        assert!(product.options.is_none());
    }

    #[test]
    fn test_null_options_deserialize_as_none() {
        let variant: PrintifyVariant = serde_json::from_value(json!({
            "id": 12345,
            "title": "11oz",
            "price": 1500,
            "is_enabled": true,
            "options": null
        }))
        .unwrap();

        assert!(variant.options.is_none());
    }

    #[test]
    fn test_missing_required_field_is_rejected() {
        let result = serde_json::from_value::<PrintifyProduct>(json!({
            "id": "abc",
            "title": "No variants",
            "description": "",
            "tags": [],
            "images": []
        }));

        let err = result.unwrap_err();
        assert!(err.to_string().contains("variants"));
    }

    #[test]
    fn test_page_metadata_is_optional() {
        let page: PrintifyProductPage = serde_json::from_value(json!({ "data": [] })).unwrap();
        assert!(page.data.is_empty());
        assert!(page.current_page.is_none());
    }
}
