//! Error taxonomy of the documentation aggregation pipeline.
//!
//! Every variant is local to a single request; none of them is fatal to the
//! process and none is retried.

use thiserror::Error;

use super::path_rewriter::RewriteError;

/// Failure to pick a destination from a cluster
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no destination available in cluster '{cluster_id}'")]
    NoDestinationAvailable { cluster_id: String },
}

/// Failure to retrieve a raw document from a backend destination
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid destination address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },
}

/// Failure of one aggregated-document request
#[derive(Debug, Error)]
pub enum AggregationError {
    /// The route is unknown or its cluster is missing or has no destinations
    #[error("route '{route_id}' has no servable cluster: {reason}")]
    Configuration { route_id: String, reason: String },

    /// The backend could not be reached or answered with a failure status
    #[error("failed to fetch document for route '{route_id}'")]
    UpstreamFetch {
        route_id: String,
        #[source]
        source: FetchError,
    },

    /// The cached or freshly fetched document is not a well-formed API document
    #[error("document is not well-formed")]
    DocumentParse(#[from] RewriteError),
}

impl AggregationError {
    pub fn configuration(route_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Configuration { route_id: route_id.into(), reason: reason.into() }
    }

    /// Short label used for metrics and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            AggregationError::Configuration { .. } => "configuration",
            AggregationError::UpstreamFetch { .. } => "upstream_fetch",
            AggregationError::DocumentParse(_) => "document_parse",
        }
    }
}
