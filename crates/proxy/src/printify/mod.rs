//! Printify REST API client.
//!
//! # Architecture
//!
//! - Plain `reqwest` calls against the v1 REST API, bearer-token auth
//! - Credentials are passed per call, never stored on the client
//! - Responses are decoded into the strict shapes in [`types`] and projected
//!   with [`conversions`]
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_proxy::printify::PrintifyClient;
//!
//! let client = PrintifyClient::new(&config.printify);
//! let credentials = CredentialSource::Environment.resolve()?;
//!
//! let product = client.get_product(&credentials, &ProductId::new("5d39b1...")).await?;
//! let page = client.list_products(&credentials).await?;
//! ```

pub mod conversions;
pub mod types;

use std::sync::Arc;

use catalog_proxy_core::ProductId;
use reqwest::header::CONTENT_TYPE;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::{PrintifyConfig, PrintifyCredentials};

pub use types::{PrintifyImage, PrintifyProduct, PrintifyProductPage, PrintifyVariant};

/// Errors that can occur when calling the Printify API.
#[derive(Debug, Error)]
pub enum PrintifyError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Printify answered with a non-success status.
    #[error("Printify API error: {0}")]
    Status(u16),

    /// Response body did not match the expected shape.
    #[error("Invalid Printify response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot take path segments.
    #[error("Invalid Printify base URL: {0}")]
    InvalidBaseUrl(String),
}

// =============================================================================
// PrintifyClient
// =============================================================================

/// Client for the Printify catalog endpoints.
#[derive(Clone)]
pub struct PrintifyClient {
    inner: Arc<PrintifyClientInner>,
}

struct PrintifyClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl PrintifyClient {
    /// Create a new Printify API client.
    #[must_use]
    pub fn new(config: &PrintifyConfig) -> Self {
        Self {
            inner: Arc::new(PrintifyClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_base_url.clone(),
            }),
        }
    }

    /// Fetch a single product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, Printify answers with a
    /// non-success status, or the body is not a valid product.
    #[instrument(skip(self, credentials), fields(shop_id = %credentials.shop_id))]
    pub async fn get_product(
        &self,
        credentials: &PrintifyCredentials,
        product_id: &ProductId,
    ) -> Result<PrintifyProduct, PrintifyError> {
        let file = format!("{product_id}.json");
        let url = self.endpoint(&["v1", "shops", &credentials.shop_id, "products", &file])?;

        self.get_json(credentials, url).await
    }

    /// Fetch the shop's product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, Printify answers with a
    /// non-success status, or the body is not a valid product page.
    #[instrument(skip(self, credentials), fields(shop_id = %credentials.shop_id))]
    pub async fn list_products(
        &self,
        credentials: &PrintifyCredentials,
    ) -> Result<PrintifyProductPage, PrintifyError> {
        let url = self.endpoint(&["v1", "shops", &credentials.shop_id, "products.json"])?;

        self.get_json(credentials, url).await
    }

    /// Build an endpoint URL. Each segment is percent-encoded on its own, so
    /// a `/` inside an id cannot change the path.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, PrintifyError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| PrintifyError::InvalidBaseUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Execute an authorized GET and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        credentials: &PrintifyCredentials,
        url: Url,
    ) -> Result<T, PrintifyError> {
        tracing::info!(path = %url.path(), "Fetching from Printify");

        let response = self
            .inner
            .client
            .get(url)
            .bearer_auth(credentials.api_key.expose_secret())
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(500).collect::<String>(),
                "Printify API returned non-success status"
            );
            return Err(PrintifyError::Status(status.as_u16()));
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse Printify response"
            );
            PrintifyError::Parse(e)
        })
    }
}

impl std::fmt::Debug for PrintifyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrintifyClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}
