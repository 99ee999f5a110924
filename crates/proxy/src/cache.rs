//! In-memory response cache for serialized catalog bodies.
//!
//! Stores the exact bytes served to the client so a cache hit replays a
//! byte-identical response. Freshness is judged lazily on read by comparing
//! the entry's timestamp against an injected [`Clock`]; stale entries are not
//! removed, only superseded by the next write to the same key.
//!
//! The cache lives as long as the process. Nothing is persisted, so every
//! restart starts cold.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use axum::body::Bytes;
use axum::http::HeaderValue;
use catalog_proxy_core::ProductId;
use chrono::{DateTime, TimeDelta, Utc};
use moka::future::Cache;
use tracing::debug;

// =============================================================================
// Clock
// =============================================================================

/// Source of the current time for freshness checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Used in tests to step past the TTL without sleeping.
#[derive(Debug)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    /// Create a clock frozen at `start`.
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            millis: AtomicI64::new(start.timestamp_millis()),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let delta = i64::try_from(by.as_millis()).unwrap_or(i64::MAX);
        self.millis.fetch_add(delta, Ordering::SeqCst);
    }

    /// Jump the clock to an absolute time.
    pub fn set(&self, to: DateTime<Utc>) {
        self.millis.store(to.timestamp_millis(), Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.millis.load(Ordering::SeqCst)).unwrap_or_default()
    }
}

// =============================================================================
// Keys and values
// =============================================================================

/// Cache key: one entry per product, plus a single slot for the full list.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
    ProductList,
}

/// Whether a response was replayed from the cache or freshly fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    /// Value for the `X-Cache` response header.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "HIT",
            Self::Miss => "MISS",
        }
    }

    #[must_use]
    pub fn header_value(self) -> HeaderValue {
        HeaderValue::from_static(self.as_str())
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    body: Bytes,
    stored_at: DateTime<Utc>,
}

// =============================================================================
// ResponseCache
// =============================================================================

/// Serialized response bodies keyed by [`CacheKey`], with lazy TTL expiry.
///
/// Cheaply cloneable; clones share the same storage.
#[derive(Clone)]
pub struct ResponseCache {
    entries: Cache<CacheKey, CacheEntry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    /// Create an empty cache.
    ///
    /// `max_entries` bounds memory; an entry evicted to honor it behaves like
    /// one that was never stored.
    #[must_use]
    pub fn new(ttl: Duration, max_entries: u64, clock: Arc<dyn Clock>) -> Self {
        let entries = Cache::builder().max_capacity(max_entries).build();

        Self {
            entries,
            ttl,
            clock,
        }
    }

    /// The freshness window applied on read.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get a stored body if it is younger than the TTL.
    pub async fn get(&self, key: &CacheKey) -> Option<Bytes> {
        let entry = self.entries.get(key).await?;

        if self.is_fresh(&entry) {
            debug!(?key, "Cache hit");
            Some(entry.body)
        } else {
            debug!(?key, stored_at = %entry.stored_at, "Cache entry stale");
            None
        }
    }

    /// Store a body stamped with the current time, replacing any previous
    /// entry for the key.
    pub async fn insert(&self, key: CacheKey, body: Bytes) {
        let entry = CacheEntry {
            body,
            stored_at: self.clock.now(),
        };
        self.entries.insert(key, entry).await;
    }

    /// When the entry for `key` was stored, whether or not it is still fresh.
    pub async fn stored_at(&self, key: &CacheKey) -> Option<DateTime<Utc>> {
        self.entries.get(key).await.map(|entry| entry.stored_at)
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        let ttl = TimeDelta::from_std(self.ttl).unwrap_or(TimeDelta::MAX);
        self.clock.now() - entry.stored_at < ttl
    }
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.entries.entry_count())
            .finish_non_exhaustive()
    }
}
