//! Cross-origin headers for the browser frontend.
//!
//! The catalog is public data fetched from arbitrary origins, so every
//! response (success, error, 404) carries the same permissive headers, and
//! every `OPTIONS` pre-flight is answered here without reaching a handler.

use axum::{
    body::Body,
    extract::Request,
    http::{
        HeaderMap, HeaderValue, Method, StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
    },
    middleware::Next,
    response::Response,
};

/// `Access-Control-Allow-Origin` value.
pub const ALLOW_ORIGIN: &str = "*";

/// `Access-Control-Allow-Methods` value.
pub const ALLOW_METHODS: &str = "GET, OPTIONS";

/// `Access-Control-Allow-Headers` value.
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization, apikey";

/// Add CORS headers to all responses and short-circuit pre-flight requests.
///
/// Headers applied:
/// - `Access-Control-Allow-Origin: *`
/// - `Access-Control-Allow-Methods: GET, OPTIONS`
/// - `Access-Control-Allow-Headers: Content-Type, Authorization, apikey`
pub async fn cors_middleware(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        tracing::debug!(uri = %request.uri(), "Answering pre-flight request");
        preflight_response()
    } else {
        next.run(request).await
    };

    apply_cors_headers(response.headers_mut());
    response
}

fn preflight_response() -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::OK;
    response
}

fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{Router, body::to_bytes, middleware, routing::get};
    use tower::ServiceExt;

    use super::*;

    fn app(calls: Arc<AtomicUsize>) -> Router {
        Router::new()
            .route(
                "/",
                get(move || {
                    let calls = calls.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        "catalog"
                    }
                }),
            )
            .layer(middleware::from_fn(cors_middleware))
    }

    fn assert_cors_headers(headers: &HeaderMap) {
        assert_eq!(headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");
        assert_eq!(
            headers.get(ACCESS_CONTROL_ALLOW_METHODS).unwrap(),
            "GET, OPTIONS"
        );
        assert_eq!(
            headers.get(ACCESS_CONTROL_ALLOW_HEADERS).unwrap(),
            "Content-Type, Authorization, apikey"
        );
    }

    #[tokio::test]
    async fn test_preflight_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/?id=abc")
            .body(Body::empty())
            .unwrap();

        let response = app(calls.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_cors_headers(response.headers());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_preflight_on_unknown_path() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/nope")
            .body(Body::empty())
            .unwrap();

        let response = app(Arc::new(AtomicUsize::new(0)))
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_cors_headers(response.headers());
    }

    #[tokio::test]
    async fn test_get_passes_through_with_headers() {
        let calls = Arc::new(AtomicUsize::new(0));
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();

        let response = app(calls.clone()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_cors_headers(response.headers());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_not_found_still_has_headers() {
        let request = Request::builder().uri("/missing").body(Body::empty()).unwrap();

        let response = app(Arc::new(AtomicUsize::new(0)))
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_cors_headers(response.headers());
    }
}
