//! Catalog read-through cache over the Printify client.
//!
//! Each call resolves credentials first, so a misconfigured deployment fails
//! every request (cached or not) without touching the network. A miss fetches
//! from Printify, projects, serializes, and stores the exact body served.
//!
//! Concurrent misses for the same key are not coalesced: both fetch and the
//! later write wins. Both writes hold a projection of the same upstream
//! resource.

use std::sync::Arc;

use axum::body::Bytes;
use catalog_proxy_core::{ProductId, ProductListResponse, ProductResponse};
use serde::Serialize;
use tracing::instrument;

use crate::cache::{CacheKey, CacheStatus, ResponseCache};
use crate::config::CredentialSource;
use crate::error::{AppError, Result};
use crate::printify::PrintifyClient;
use crate::printify::conversions::{to_product_detail, to_product_summary};

/// A serialized catalog body and where it came from.
#[derive(Debug, Clone)]
pub struct CatalogResponse {
    pub body: Bytes,
    pub cache: CacheStatus,
}

/// Serves product detail and list bodies, backed by [`ResponseCache`].
#[derive(Clone)]
pub struct CatalogService {
    inner: Arc<CatalogServiceInner>,
}

struct CatalogServiceInner {
    printify: PrintifyClient,
    cache: ResponseCache,
    credentials: CredentialSource,
}

impl CatalogService {
    /// Create a new catalog service.
    #[must_use]
    pub fn new(printify: PrintifyClient, cache: ResponseCache, credentials: CredentialSource) -> Self {
        Self {
            inner: Arc::new(CatalogServiceInner {
                printify,
                cache,
                credentials,
            }),
        }
    }

    /// The response cache backing this service.
    #[must_use]
    pub fn cache(&self) -> &ResponseCache {
        &self.inner.cache
    }

    /// Get the `{"product": ...}` body for one product.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing, the Printify call fails,
    /// or the projection cannot be serialized.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn product(&self, product_id: &ProductId) -> Result<CatalogResponse> {
        let credentials = self.inner.credentials.resolve()?;
        let key = CacheKey::Product(product_id.clone());

        if let Some(body) = self.inner.cache.get(&key).await {
            return Ok(CatalogResponse {
                body,
                cache: CacheStatus::Hit,
            });
        }

        let product = self
            .inner
            .printify
            .get_product(&credentials, product_id)
            .await?;

        let body = encode(&ProductResponse {
            product: to_product_detail(product),
        })?;

        self.inner.cache.insert(key, body.clone()).await;

        Ok(CatalogResponse {
            body,
            cache: CacheStatus::Miss,
        })
    }

    /// Get the `{"products": [...]}` body for the whole shop.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials are missing, the Printify call fails,
    /// or the projection cannot be serialized.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<CatalogResponse> {
        let credentials = self.inner.credentials.resolve()?;

        if let Some(body) = self.inner.cache.get(&CacheKey::ProductList).await {
            return Ok(CatalogResponse {
                body,
                cache: CacheStatus::Hit,
            });
        }

        let page = self.inner.printify.list_products(&credentials).await?;

        tracing::debug!(count = page.data.len(), "Fetched product list");

        let body = encode(&ProductListResponse {
            products: page.data.into_iter().map(to_product_summary).collect(),
        })?;

        self.inner
            .cache
            .insert(CacheKey::ProductList, body.clone())
            .await;

        Ok(CatalogResponse {
            body,
            cache: CacheStatus::Miss,
        })
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(AppError::Encode)
}
