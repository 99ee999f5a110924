//! Integration test harness for the catalog proxy.
//!
//! Both sides run over real sockets on ephemeral ports:
//!
//! - [`MockPrintify`] - an axum server that mimics the two Printify catalog
//!   endpoints and counts every request it receives
//! - [`TestProxy`] - the real proxy router, pointed at the mock, with a
//!   [`ManualClock`] so tests can step past the cache TTL
//!
//! # Example
//!
//! ```rust,ignore
//! let upstream = MockPrintify::start().await;
//! let proxy = TestProxy::start(&upstream, CredentialSource::fixed("key", SHOP_ID)).await;
//!
//! let resp = proxy.get("/?id=abc").await;
//! assert_eq!(upstream.hits(), 1);
//! ```

#![allow(clippy::missing_panics_doc)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, Uri, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::get,
};
use catalog_proxy::cache::ManualClock;
use catalog_proxy::config::{CacheConfig, CredentialSource, PrintifyConfig, ProxyConfig};
use catalog_proxy::routes;
use catalog_proxy::state::AppState;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

/// Shop ID the mock upstream accepts.
pub const SHOP_ID: &str = "4820553";

/// API key tests configure the proxy with.
pub const API_KEY: &str = "test-printify-token";

/// Product ID the mock upstream knows about.
pub const PRODUCT_ID: &str = "5d39b159e7c48c000728c89f";

/// Cache TTL used by [`TestProxy`].
pub const TTL: Duration = Duration::from_secs(300);

// =============================================================================
// Mock upstream
// =============================================================================

/// How the mock upstream answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamMode {
    /// Serve the fixtures.
    Normal,
    /// Answer every request with this status and a JSON error body.
    Status(u16),
    /// Answer 200 with a body that does not match the Printify schema.
    Malformed,
}

#[derive(Debug)]
struct MockState {
    hits: AtomicUsize,
    mode: Mutex<UpstreamMode>,
    last_authorization: Mutex<Option<String>>,
    last_path: Mutex<Option<String>>,
}

/// A fake Printify API on 127.0.0.1.
#[derive(Debug)]
pub struct MockPrintify {
    base_url: Url,
    state: Arc<MockState>,
}

impl MockPrintify {
    /// Bind an ephemeral port and start serving.
    pub async fn start() -> Self {
        let state = Arc::new(MockState {
            hits: AtomicUsize::new(0),
            mode: Mutex::new(UpstreamMode::Normal),
            last_authorization: Mutex::new(None),
            last_path: Mutex::new(None),
        });

        let app = Router::new()
            .route("/v1/shops/{shop_id}/products.json", get(mock_list))
            .route("/v1/shops/{shop_id}/products/{file}", get(mock_product))
            .with_state(state.clone());

        let base_url = serve(app).await;
        Self { base_url, state }
    }

    /// Base URL to configure the proxy with.
    #[must_use]
    pub fn base_url(&self) -> Url {
        self.base_url.clone()
    }

    /// Requests received so far.
    #[must_use]
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    /// Change how subsequent requests are answered.
    pub fn set_mode(&self, mode: UpstreamMode) {
        *self.state.mode.lock().expect("mode lock") = mode;
    }

    /// `Authorization` header of the latest request.
    #[must_use]
    pub fn last_authorization(&self) -> Option<String> {
        self.state
            .last_authorization
            .lock()
            .expect("authorization lock")
            .clone()
    }

    /// Path of the latest request.
    #[must_use]
    pub fn last_path(&self) -> Option<String> {
        self.state.last_path.lock().expect("path lock").clone()
    }
}

/// Record the request and return the override response, if any.
fn record(state: &MockState, headers: &HeaderMap, uri: &Uri, shop_id: &str) -> Option<Response> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    *state.last_authorization.lock().expect("authorization lock") = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    *state.last_path.lock().expect("path lock") = Some(uri.path().to_string());

    if shop_id != SHOP_ID {
        return Some(error_response(StatusCode::NOT_FOUND));
    }

    match *state.mode.lock().expect("mode lock") {
        UpstreamMode::Normal => None,
        UpstreamMode::Status(code) => Some(error_response(
            StatusCode::from_u16(code).expect("valid status code"),
        )),
        UpstreamMode::Malformed => Some(Json(json!({"data": "not a list"})).into_response()),
    }
}

fn error_response(status: StatusCode) -> Response {
    (status, Json(json!({"status": "error", "code": status.as_u16()}))).into_response()
}

async fn mock_list(
    State(state): State<Arc<MockState>>,
    Path(shop_id): Path<String>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    if let Some(response) = record(&state, &headers, &uri, &shop_id) {
        return response;
    }

    Json(json!({
        "current_page": 1,
        "data": [product_fixture(), second_product_fixture()],
        "last_page": 1,
        "total": 2
    }))
    .into_response()
}

async fn mock_product(
    State(state): State<Arc<MockState>>,
    Path((shop_id, file)): Path<(String, String)>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    if let Some(response) = record(&state, &headers, &uri, &shop_id) {
        return response;
    }

    match file.strip_suffix(".json") {
        Some(PRODUCT_ID) => Json(product_fixture()).into_response(),
        _ => error_response(StatusCode::NOT_FOUND),
    }
}

/// A Printify product with fields the proxy drops and fields it defaults.
#[must_use]
pub fn product_fixture() -> Value {
    json!({
        "id": PRODUCT_ID,
        "title": "Classic Tee",
        "description": "<p>Heavyweight cotton tee.</p>",
        "tags": ["T-shirts", "Summer"],
        "options": [
            {"name": "Sizes", "type": "size", "values": [{"id": 14, "title": "S"}, {"id": 15, "title": "M"}]}
        ],
        "variants": [
            {"id": 17887, "sku": "PT-S", "cost": 1100, "title": "S", "price": 2500,
             "is_enabled": true, "is_default": true, "is_available": true, "options": [14]},
            {"id": 17888, "sku": "PT-M", "cost": 1100, "title": "M", "price": 2700,
             "is_enabled": false, "is_default": false, "is_available": true}
        ],
        "images": [
            {"src": "https://images-api.printify.com/mockup/front.jpg",
             "variant_ids": [17887, 17888], "position": "front", "is_default": true},
            {"src": "https://images-api.printify.com/mockup/back.jpg",
             "variant_ids": [17888], "position": "back", "is_default": false}
        ],
        "created_at": "2024-03-01 10:00:00+00:00",
        "visible": true,
        "blueprint_id": 6,
        "print_provider_id": 99
    })
}

fn second_product_fixture() -> Value {
    json!({
        "id": "6a01c2d3e4f5a6b7c8d9e0f1",
        "title": "Ceramic Mug",
        "description": "",
        "tags": [],
        "options": null,
        "variants": [
            {"id": 33719, "title": "11oz", "price": 1500, "is_enabled": true, "options": null}
        ],
        "images": [
            {"src": "https://images-api.printify.com/mockup/mug.jpg",
             "variant_ids": [33719], "position": "other", "is_default": true}
        ]
    })
}

// =============================================================================
// Proxy under test
// =============================================================================

/// The catalog proxy, served on 127.0.0.1 with a controllable clock.
pub struct TestProxy {
    base_url: String,
    client: reqwest::Client,
    clock: Arc<ManualClock>,
    state: AppState,
}

impl TestProxy {
    /// Start a proxy that calls `upstream` with the given credentials.
    pub async fn start(upstream: &MockPrintify, credentials: CredentialSource) -> Self {
        Self::start_with_base_url(upstream.base_url(), credentials).await
    }

    /// Start a proxy against an arbitrary upstream base URL.
    pub async fn start_with_base_url(api_base_url: Url, credentials: CredentialSource) -> Self {
        let config = ProxyConfig {
            host: "127.0.0.1".parse().expect("valid IP"),
            port: 0,
            printify: PrintifyConfig { api_base_url },
            cache: CacheConfig {
                ttl: TTL,
                max_entries: 100,
            },
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };

        let clock = Arc::new(ManualClock::default());
        let state = AppState::new(config, credentials, clock.clone());
        let url = serve(routes::router(state.clone())).await;

        Self {
            base_url: url.as_str().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            clock,
            state,
        }
    }

    /// Full URL for a path on the proxy.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send a GET request.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("proxy request failed")
    }

    /// Send an OPTIONS pre-flight request.
    pub async fn preflight(&self, path: &str) -> reqwest::Response {
        self.client
            .request(reqwest::Method::OPTIONS, self.url(path))
            .header("Origin", "https://shop.example.com")
            .header("Access-Control-Request-Method", "GET")
            .send()
            .await
            .expect("proxy request failed")
    }

    /// Move the cache clock forward.
    pub fn advance_clock(&self, by: Duration) {
        self.clock.advance(by);
    }

    /// Shared state, for inspecting the cache.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }
}

/// Credentials the mock upstream accepts.
#[must_use]
pub fn valid_credentials() -> CredentialSource {
    CredentialSource::fixed(API_KEY, SHOP_ID)
}

/// Serve a router on an ephemeral port and return its base URL.
async fn serve(app: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind test listener");
    let addr = listener.local_addr().expect("listener has address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("test server error");
    });

    Url::parse(&format!("http://{addr}/")).expect("valid test URL")
}
