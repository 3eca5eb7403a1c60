use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::services::AggregationError;

/// Body returned when the backend document could not be fetched
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to fetch Swagger from backend.";

#[derive(Debug)]
pub enum ApiError {
    /// Route or cluster cannot serve documentation
    NotFound(String),
    /// Backend document could not be fetched
    BadGateway(String),
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            // Details stay in the logs; clients only learn the outcome.
            ApiError::NotFound(_) | ApiError::Internal(_) => status.into_response(),
            ApiError::BadGateway(_) => (
                status,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                UPSTREAM_FAILURE_MESSAGE,
            )
                .into_response(),
        }
    }
}

impl From<AggregationError> for ApiError {
    fn from(err: AggregationError) -> Self {
        match err {
            AggregationError::Configuration { .. } => ApiError::NotFound(err.to_string()),
            AggregationError::UpstreamFetch { .. } => ApiError::BadGateway(err.to_string()),
            AggregationError::DocumentParse(ref source) => {
                error!(error = %source, "Aggregated document could not be produced");
                ApiError::Internal(err.to_string())
            }
        }
    }
}
