//! Raw document cache with TTL-based expiration and single-flight fetching
//!
//! Entries hold the unparsed backend text keyed by `(route id, service)`. An
//! entry is fresh for exactly one TTL after it was written; after that the next
//! request refetches and replaces it. Nothing invalidates entries early.
//!
//! Concurrent misses for the same key are coalesced: the first caller fetches
//! while later callers wait on a per-key gate and then re-check the cache.
//! Different keys never wait on each other and no lock is held across a fetch
//! except the gate of the key being fetched.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Cache key: one route and one requested service/version segment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    route_id: String,
    service: String,
}

impl CacheKey {
    pub fn new(route_id: impl Into<String>, service: impl Into<String>) -> Self {
        Self { route_id: route_id.into(), service: service.into() }
    }

    pub fn route_id(&self) -> &str {
        &self.route_id
    }

    pub fn service(&self) -> &str {
        &self.service
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "swagger-{}-{}", self.route_id, self.service)
    }
}

/// Configuration for the document cache
#[derive(Debug, Clone)]
pub struct DocumentCacheConfig {
    /// Time-to-live for cached entries
    pub ttl: Duration,
}

impl Default for DocumentCacheConfig {
    fn default() -> Self {
        Self { ttl: Duration::from_secs(300) }
    }
}

/// How a lookup was satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Fresh entry found, no backend call
    Hit,
    /// Another request fetched the document while this one waited
    Coalesced,
    /// This request fetched and stored the document
    Fetched,
}

impl CacheOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheOutcome::Hit => "hit",
            CacheOutcome::Coalesced => "coalesced",
            CacheOutcome::Fetched => "fetched",
        }
    }
}

/// Result of [`DocumentCache::get_or_fetch`]
#[derive(Debug, Clone)]
pub struct CacheLookup {
    pub document: Arc<str>,
    pub outcome: CacheOutcome,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    document: Arc<str>,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(document: Arc<str>, ttl: Duration) -> Self {
        Self { document, expires_at: Instant::now() + ttl }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Removes a key's single-flight gate from the map once no caller holds it.
///
/// Declared before the gate handle so it drops after it, including when the
/// owning request is cancelled mid-fetch.
struct GateCleanup<'a> {
    in_flight: &'a DashMap<CacheKey, Arc<Mutex<()>>>,
    key: &'a CacheKey,
}

impl Drop for GateCleanup<'_> {
    fn drop(&mut self) {
        self.in_flight.remove_if(self.key, |_, current| Arc::strong_count(current) == 1);
    }
}

/// Process-wide cache of raw backend documents
pub struct DocumentCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    in_flight: DashMap<CacheKey, Arc<Mutex<()>>>,
    config: DocumentCacheConfig,
}

impl DocumentCache {
    pub fn new(config: DocumentCacheConfig) -> Self {
        Self { entries: RwLock::new(HashMap::new()), in_flight: DashMap::new(), config }
    }

    pub fn with_defaults() -> Self {
        Self::new(DocumentCacheConfig::default())
    }

    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    /// Get the cached document for `key`, if present and not expired
    pub fn get(&self, key: &CacheKey) -> Option<Arc<str>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).filter(|entry| !entry.is_expired()).map(|entry| entry.document.clone())
    }

    /// Store a document, replacing any previous entry for `key`
    pub fn insert(&self, key: CacheKey, document: impl Into<Arc<str>>) -> Arc<str> {
        let document = document.into();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key, CacheEntry::new(document.clone(), self.config.ttl));
        document
    }

    /// Return the fresh cached document for `key`, or run `fetch` and cache its
    /// output.
    ///
    /// A failed fetch leaves the cache untouched and its error is returned to
    /// the caller. Callers that were waiting on the same key then try their own
    /// fetch.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: &CacheKey,
        fetch: F,
    ) -> Result<CacheLookup, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        if let Some(document) = self.get(key) {
            return Ok(CacheLookup { document, outcome: CacheOutcome::Hit });
        }

        // The last caller to let go of the gate removes it from the map.
        let _cleanup = GateCleanup { in_flight: &self.in_flight, key };
        let gate = Arc::clone(self.in_flight.entry(key.clone()).or_default().value());
        let _permit = gate.lock().await;
        match self.get(key) {
            Some(document) => Ok(CacheLookup { document, outcome: CacheOutcome::Coalesced }),
            None => fetch().await.map(|text| CacheLookup {
                document: self.insert(key.clone(), text),
                outcome: CacheOutcome::Fetched,
            }),
        }
    }

    /// Remove entries whose TTL already elapsed; fresh entries are never touched
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }

    /// Number of stored entries, including expired ones not yet purged
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of keys currently being fetched
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

impl Default for DocumentCache {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::task::JoinSet;

    fn key() -> CacheKey {
        CacheKey::new("orders", "v1")
    }

    async fn fetch_ok(calls: &AtomicUsize, body: &str) -> Result<String, String> {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(body.to_string())
    }

    #[test]
    fn key_display() {
        assert_eq!(key().to_string(), "swagger-orders-v1");
        assert_eq!(key().route_id(), "orders");
        assert_eq!(key().service(), "v1");
    }

    #[tokio::test]
    async fn miss_fetches_then_hit_serves_identical_text() {
        let cache = DocumentCache::with_defaults();
        let calls = AtomicUsize::new(0);

        let first = cache.get_or_fetch(&key(), || fetch_ok(&calls, "{\"a\": 1}")).await.unwrap();
        assert_eq!(first.outcome, CacheOutcome::Fetched);

        let second = cache.get_or_fetch(&key(), || fetch_ok(&calls, "other")).await.unwrap();
        assert_eq!(second.outcome, CacheOutcome::Hit);
        assert_eq!(&*second.document, "{\"a\": 1}");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.in_flight(), 0);
    }

    #[tokio::test]
    async fn failed_fetch_is_not_cached() {
        let cache = DocumentCache::with_defaults();

        let result = cache
            .get_or_fetch(&key(), || async { Err::<String, _>("backend down".to_string()) })
            .await;
        assert_eq!(result.unwrap_err(), "backend down");
        assert!(cache.is_empty());
        assert_eq!(cache.in_flight(), 0);

        let calls = AtomicUsize::new(0);
        let lookup = cache.get_or_fetch(&key(), || fetch_ok(&calls, "{}")).await.unwrap();
        assert_eq!(lookup.outcome, CacheOutcome::Fetched);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn entry_expires_after_ttl_and_is_replaced() {
        let cache = DocumentCache::new(DocumentCacheConfig { ttl: Duration::from_secs(300) });
        let calls = AtomicUsize::new(0);

        cache.get_or_fetch(&key(), || fetch_ok(&calls, "old")).await.unwrap();

        tokio::time::advance(Duration::from_secs(299)).await;
        let lookup = cache.get_or_fetch(&key(), || fetch_ok(&calls, "new")).await.unwrap();
        assert_eq!(&*lookup.document, "old");

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get(&key()).is_none());
        let lookup = cache.get_or_fetch(&key(), || fetch_ok(&calls, "new")).await.unwrap();
        assert_eq!(lookup.outcome, CacheOutcome::Fetched);
        assert_eq!(&*lookup.document, "new");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn purge_removes_only_expired_entries() {
        let cache = DocumentCache::new(DocumentCacheConfig { ttl: Duration::from_secs(10) });
        cache.insert(CacheKey::new("orders", "v1"), "a");

        tokio::time::advance(Duration::from_secs(6)).await;
        cache.insert(CacheKey::new("orders", "v2"), "b");

        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&CacheKey::new("orders", "v2")).is_some());
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let cache = DocumentCache::with_defaults();
        let calls = AtomicUsize::new(0);

        for (route_id, service) in [("orders", "v1"), ("orders", "v2"), ("billing", "v1")] {
            let key = CacheKey::new(route_id, service);
            cache.get_or_fetch(&key, || fetch_ok(&calls, route_id)).await.unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(cache.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_fetch_releases_its_gate() {
        let cache = DocumentCache::with_defaults();
        let key = key();

        let stalled = cache.get_or_fetch(&key, std::future::pending::<Result<String, String>>);
        assert!(tokio::time::timeout(Duration::from_secs(1), stalled).await.is_err());

        assert_eq!(cache.in_flight(), 0);
        assert!(cache.is_empty());

        let calls = AtomicUsize::new(0);
        let lookup = cache.get_or_fetch(&key, || fetch_ok(&calls, "{}")).await.unwrap();
        assert_eq!(lookup.outcome, CacheOutcome::Fetched);
        assert_eq!(cache.in_flight(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_misses_issue_one_fetch() {
        let cache = Arc::new(DocumentCache::with_defaults());
        let calls = Arc::new(AtomicUsize::new(0));
        let mut tasks = JoinSet::new();

        for _ in 0..16 {
            let cache = cache.clone();
            let calls = calls.clone();
            tasks.spawn(async move {
                cache
                    .get_or_fetch(&key(), || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        Ok::<_, String>("{\"paths\":{}}".to_string())
                    })
                    .await
                    .unwrap()
            });
        }

        let mut outcomes = Vec::new();
        while let Some(result) = tasks.join_next().await {
            let lookup = result.unwrap();
            assert_eq!(&*lookup.document, "{\"paths\":{}}");
            outcomes.push(lookup.outcome);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(outcomes.iter().filter(|o| **o == CacheOutcome::Fetched).count(), 1);
        assert_eq!(cache.in_flight(), 0);
    }
}
