//! Application state shared across handlers.

use std::sync::Arc;

use crate::cache::{Clock, ResponseCache};
use crate::config::{CredentialSource, ProxyConfig};
use crate::printify::PrintifyClient;
use crate::services::catalog::CatalogService;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The response cache inside it is
/// created here, once per process, and dropped with it; there is no other
/// copy of cache state anywhere.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ProxyConfig,
    catalog: CatalogService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Proxy configuration
    /// * `credentials` - Where Printify credentials are read from per request
    /// * `clock` - Time source for cache freshness
    #[must_use]
    pub fn new(config: ProxyConfig, credentials: CredentialSource, clock: Arc<dyn Clock>) -> Self {
        let printify = PrintifyClient::new(&config.printify);
        let cache = ResponseCache::new(config.cache.ttl, config.cache.max_entries, clock);
        let catalog = CatalogService::new(printify, cache, credentials);

        Self {
            inner: Arc::new(AppStateInner { config, catalog }),
        }
    }

    /// Get a reference to the proxy configuration.
    #[must_use]
    pub fn config(&self) -> &ProxyConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog service.
    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }
}
