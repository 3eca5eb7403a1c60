//! Startup sequence for the Swagger gateway
//!
//! Resolves the route table snapshot, wires the aggregation pipeline and runs
//! the HTTP server until shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::api::{build_router, start_api_server};
use crate::config::AppConfig;
use crate::errors::Result;
use crate::observability::MetricsRecorder;
use crate::services::{
    DocumentCache, DocumentCacheConfig, FetcherConfig, HttpDocumentFetcher, SwaggerAggregator,
};

/// Build the aggregation pipeline from configuration
pub fn build_aggregator(config: &AppConfig) -> Result<Arc<SwaggerAggregator>> {
    let route_table = Arc::new(config.reverse_proxy.to_route_table());
    let fetcher = HttpDocumentFetcher::new(&FetcherConfig::from(&config.aggregator))?;
    let cache = Arc::new(DocumentCache::new(DocumentCacheConfig {
        ttl: config.aggregator.cache_ttl(),
    }));

    info!(
        routes = route_table.routes().len(),
        clusters = route_table.cluster_count(),
        load_balancing = ?config.aggregator.load_balancing,
        "Route table snapshot loaded"
    );

    Ok(Arc::new(SwaggerAggregator::new(
        route_table,
        config.aggregator.load_balancing.selector(),
        Arc::new(fetcher),
        cache,
    )))
}

/// Periodically drop expired cache entries so unused keys do not accumulate.
///
/// Fresh entries are never removed; expiry itself is enforced on lookup.
pub fn spawn_cache_sweeper(cache: Arc<DocumentCache>, period: Duration) -> JoinHandle<()> {
    let metrics = MetricsRecorder::new();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = cache.purge_expired();
            if removed > 0 {
                metrics.record_cache_purge(removed);
                debug!(removed, remaining = cache.len(), "Purged expired documents");
            }
        }
    })
}

/// Serve documentation until the process receives ctrl-c
pub async fn run(config: AppConfig) -> Result<()> {
    let aggregator = build_aggregator(&config)?;
    let router = build_router(aggregator.clone(), &config)?;

    let sweeper = spawn_cache_sweeper(aggregator.cache().clone(), config.aggregator.cache_ttl());
    let result = start_api_server(&config.server, router).await;
    sweeper.abort();

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::CacheKey;

    #[test]
    fn builds_aggregator_from_default_config() {
        let aggregator = build_aggregator(&AppConfig::default()).unwrap();
        assert!(aggregator.route_table().is_empty());
        assert_eq!(aggregator.cache().ttl(), Duration::from_secs(300));
    }

    #[tokio::test(start_paused = true)]
    async fn sweeper_purges_expired_entries() {
        let cache = Arc::new(DocumentCache::new(DocumentCacheConfig {
            ttl: Duration::from_secs(10),
        }));
        cache.insert(CacheKey::new("orders", "v1"), "{}");
        let sweeper = spawn_cache_sweeper(cache.clone(), Duration::from_secs(10));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(cache.len(), 1);

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert!(cache.is_empty());
        sweeper.abort();
    }
}
