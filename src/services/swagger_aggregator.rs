//! # Swagger Aggregator
//!
//! Produces the aggregated API document of one route: resolve the route's
//! cluster, serve the raw backend document from the cache or fetch it from a
//! selected destination, then rewrite its paths so they are reachable through
//! the proxy.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, instrument, warn, Instrument};

use super::backend_selector::DestinationSelector;
use super::document_cache::{CacheKey, DocumentCache};
use super::document_fetcher::DocumentSource;
use super::error::{AggregationError, FetchError};
use super::path_rewriter::rewrite_document;
use crate::domain::RouteTable;
use crate::observability::MetricsRecorder;

/// Aggregation pipeline shared by every documentation endpoint
pub struct SwaggerAggregator {
    route_table: Arc<RouteTable>,
    selector: Arc<dyn DestinationSelector>,
    source: Arc<dyn DocumentSource>,
    cache: Arc<DocumentCache>,
    metrics: MetricsRecorder,
}

impl SwaggerAggregator {
    pub fn new(
        route_table: Arc<RouteTable>,
        selector: Arc<dyn DestinationSelector>,
        source: Arc<dyn DocumentSource>,
        cache: Arc<DocumentCache>,
    ) -> Self {
        Self { route_table, selector, source, cache, metrics: MetricsRecorder::new() }
    }

    pub fn route_table(&self) -> &RouteTable {
        &self.route_table
    }

    pub fn cache(&self) -> &Arc<DocumentCache> {
        &self.cache
    }

    /// Build the aggregated document of `service` for `route_id`.
    ///
    /// A destination is chosen only when the cache has no fresh entry. The
    /// cached text is the backend's raw response, so a malformed document is
    /// reported on every request until its entry expires.
    #[instrument(skip_all, fields(route_id = %route_id, service = %service))]
    pub async fn aggregate(
        &self,
        route_id: &str,
        service: &str,
    ) -> Result<Value, AggregationError> {
        let started = Instant::now();
        let result = self.aggregate_inner(route_id, service).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(error) => error.kind(),
        };
        self.metrics.record_aggregation(route_id, outcome, started.elapsed().as_secs_f64());
        result
    }

    async fn aggregate_inner(
        &self,
        route_id: &str,
        service: &str,
    ) -> Result<Value, AggregationError> {
        let route = self
            .route_table
            .route(route_id)
            .ok_or_else(|| AggregationError::configuration(route_id, "route is not configured"))?;

        let cluster = self.route_table.resolve_cluster(route).ok_or_else(|| {
            warn!(
                cluster_id = %route.cluster_id,
                "Route cluster is missing or has no destinations"
            );
            AggregationError::configuration(
                route_id,
                format!("cluster '{}' is missing or has no destinations", route.cluster_id),
            )
        })?;

        let key = CacheKey::new(route_id, service);
        let lookup = self
            .cache
            .get_or_fetch(&key, || async move {
                let destination = self.selector.select(cluster).map_err(|e| {
                    AggregationError::configuration(route_id, e.to_string())
                })?;
                debug!(
                    destination = %destination.name,
                    strategy = self.selector.name(),
                    "Selected destination for document fetch"
                );

                let fetch_started = Instant::now();
                let span = crate::fetch_span!(route_id, service, destination = %destination.name);
                let fetched = self.source.fetch(destination, service).instrument(span).await;
                self.metrics.record_upstream_fetch(
                    &cluster.id,
                    fetched.is_ok(),
                    fetch_started.elapsed().as_secs_f64(),
                );

                fetched.map_err(|source: FetchError| {
                    warn!(
                        destination = %destination.name,
                        error = %source,
                        "Failed to fetch backend document"
                    );
                    AggregationError::UpstreamFetch { route_id: route_id.to_string(), source }
                })
            })
            .await?;

        self.metrics.record_cache_lookup(route_id, lookup.outcome.as_str());
        debug!(cache = lookup.outcome.as_str(), key = %key, "Resolved backend document");

        let prefix = route.path_remove_prefix.as_str();
        let document = rewrite_document(&lookup.document, prefix).map_err(|error| {
            warn!(error = %error, "Backend document is not a well-formed API document");
            AggregationError::from(error)
        })?;

        info!(prefix = %prefix, "Aggregated backend document");
        Ok(document)
    }
}
