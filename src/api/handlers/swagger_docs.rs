//! Aggregated backend documentation endpoint

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::api::error::ApiError;
use crate::services::SwaggerAggregator;

/// Per-route handler context, bound when the endpoint table is built
#[derive(Clone)]
pub struct RouteDocsState {
    pub route_id: Arc<str>,
    pub aggregator: Arc<SwaggerAggregator>,
}

/// Serve the aggregated document of one backend service
///
/// Paths of the backend document are rewritten so that every operation is
/// reachable through the proxy route.
#[utoipa::path(
    get,
    path = "/swagger-json/{route_id}/swagger/{service}/swagger.json",
    tag = "documentation",
    params(
        ("route_id" = String, Path, description = "Proxy route identifier"),
        (
            "service" = String,
            Path,
            description = "Backend document name, usually its version",
            example = "v1"
        )
    ),
    responses(
        (
            status = 200,
            description = "Aggregated API document",
            content_type = "application/json",
            body = serde_json::Value
        ),
        (status = 404, description = "Route cluster is missing or has no destinations"),
        (
            status = 502,
            description = "Backend document could not be fetched",
            content_type = "text/plain",
            body = String
        ),
        (status = 500, description = "Backend document is not well-formed")
    )
)]
pub async fn aggregated_document_handler(
    State(state): State<RouteDocsState>,
    Path(service): Path<String>,
) -> Result<Response, ApiError> {
    let document = state.aggregator.aggregate(&state.route_id, &service).await?;

    let body = serde_json::to_vec_pretty(&document).map_err(|e| {
        error!(error = %e, route_id = %state.route_id, "Failed to serialize aggregated document");
        ApiError::Internal(e.to_string())
    })?;

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "application/json")], body).into_response())
}
