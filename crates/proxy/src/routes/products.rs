//! Catalog route handler.

use axum::{
    body::Body,
    extract::{RawQuery, State},
    http::{HeaderValue, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use catalog_proxy_core::ProductId;

use crate::error::Result;
use crate::services::CatalogResponse;
use crate::state::AppState;

/// Cache status response header.
pub const X_CACHE: &str = "x-cache";

/// Serve the product list, or one product when `?id=` is given.
///
/// An empty `id` is treated as absent. If `id` repeats, the first value wins.
pub async fn catalog(State(state): State<AppState>, RawQuery(query): RawQuery) -> Result<Response> {
    let response = match product_id_param(query.as_deref()) {
        Some(id) => state.catalog().product(&id).await?,
        None => state.catalog().products().await?,
    };

    Ok(json_response(response))
}

/// First non-empty `id` value in a raw query string.
fn product_id_param(query: Option<&str>) -> Option<ProductId> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.into_owned())
        .filter(|id| !id.is_empty())
        .map(ProductId::from)
}

fn json_response(response: CatalogResponse) -> Response {
    let mut http_response = Body::from(response.body).into_response();
    let headers = http_response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(X_CACHE, response.cache.header_value());
    http_response
}
