//! HTTP routes for the catalog proxy.
//!
//! # Route Structure
//!
//! ```text
//! GET     /                        - Product list, or one product with ?id=
//! GET     /printify-products       - Same handler, under the function name the
//!                                    frontend was built against
//! GET     /health                  - Liveness check
//! OPTIONS *                        - CORS pre-flight (answered by middleware)
//! ```

pub mod products;

use axum::{Router, middleware, routing::get};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{cors_middleware, request_id_middleware};
use crate::state::AppState;

/// Build the application router with its middleware stack.
///
/// Sentry layers are added by the binary, outside this router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(products::catalog))
        .route("/printify-products", get(products::catalog))
        .route("/health", get(health))
        .layer(middleware::from_fn(cors_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not call Printify.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{Body, Bytes, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use catalog_proxy_core::ProductId;
    use secrecy::SecretString;
    use tower::ServiceExt;
    use url::Url;

    use super::*;
    use crate::cache::{CacheKey, ManualClock};
    use crate::config::{CacheConfig, CredentialSource, PrintifyConfig, ProxyConfig};

    fn test_config() -> ProxyConfig {
        ProxyConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            // Nothing listens on the discard port; these tests never reach upstream
            printify: PrintifyConfig {
                api_base_url: Url::parse("http://127.0.0.1:9").unwrap(),
            },
            cache: CacheConfig {
                ttl: Duration::from_secs(300),
                max_entries: 100,
            },
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    fn state(credentials: CredentialSource) -> AppState {
        AppState::new(
            test_config(),
            credentials,
            Arc::new(ManualClock::default()),
        )
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Bytes) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, body)
    }

    #[tokio::test]
    async fn test_health() {
        let app = router(state(CredentialSource::fixed("key", "shop")));
        let (status, headers, body) = get(app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
        assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
        assert!(headers.get("x-request-id").is_some());
    }

    #[tokio::test]
    async fn test_cached_product_is_replayed() {
        let state = state(CredentialSource::fixed("key", "shop"));
        let body = Bytes::from_static(br#"{"product":{"id":"abc"}}"#);
        state
            .catalog()
            .cache()
            .insert(CacheKey::Product(ProductId::new("abc")), body.clone())
            .await;

        let (status, headers, response_body) = get(router(state), "/?id=abc").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(response_body, body);
        assert_eq!(headers.get("x-cache").unwrap(), "HIT");
        assert_eq!(headers.get("content-type").unwrap(), "application/json");
        assert_eq!(
            headers.get("access-control-allow-methods").unwrap(),
            "GET, OPTIONS"
        );
    }

    #[tokio::test]
    async fn test_cached_list_is_replayed_on_function_path() {
        let state = state(CredentialSource::fixed("key", "shop"));
        let body = Bytes::from_static(br#"{"products":[]}"#);
        state
            .catalog()
            .cache()
            .insert(CacheKey::ProductList, body.clone())
            .await;

        let (status, headers, response_body) = get(router(state), "/printify-products").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(response_body, body);
        assert_eq!(headers.get("x-cache").unwrap(), "HIT");
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_even_when_cached() {
        let state = state(CredentialSource::Fixed {
            api_key: Some(SecretString::from("key")),
            shop_id: None,
        });
        state
            .catalog()
            .cache()
            .insert(CacheKey::ProductList, Bytes::from_static(b"{}"))
            .await;

        for uri in ["/", "/?id=abc"] {
            let (status, headers, body) = get(router(state.clone()), uri).await;
            let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(
                json["error"],
                "Missing Printify credentials in environment"
            );
            assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
            assert!(headers.get("x-cache").is_none());
        }
    }

    #[tokio::test]
    async fn test_preflight_returns_empty_ok() {
        let app = router(state(CredentialSource::fixed("key", "shop")));
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/?id=abc")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-headers")
                .unwrap(),
            "Content-Type, Authorization, apikey"
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }
}
