//! Health check endpoint for monitoring and readiness probes

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::services::SwaggerAggregator;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status (always "ok" when responding)
    #[schema(example = "ok")]
    pub status: String,

    /// Gateway version
    #[schema(example = "0.1.0")]
    pub version: String,

    /// Number of routes with a documentation endpoint
    pub routes: usize,

    /// Backend documents currently held in the cache
    pub cached_documents: usize,
}

/// Health check endpoint
///
/// Returns 200 OK when the gateway is operational. It never contacts a
/// backend, so it is suitable for liveness and readiness probes.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_handler(
    State(aggregator): State<Arc<SwaggerAggregator>>,
) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            version: crate::VERSION.to_string(),
            routes: aggregator.route_table().routes().len(),
            cached_documents: aggregator.cache().len(),
        }),
    )
}
