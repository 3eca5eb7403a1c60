//! Documentation aggregation services
//!
//! This module contains the aggregation pipeline and its building blocks,
//! separated from HTTP concerns.

pub mod backend_selector;
pub mod document_cache;
pub mod document_fetcher;
pub mod error;
pub mod path_rewriter;
pub mod swagger_aggregator;

pub use backend_selector::{DestinationSelector, LoadBalancingStrategy};
pub use document_cache::{CacheKey, CacheOutcome, DocumentCache, DocumentCacheConfig};
pub use document_fetcher::{DocumentSource, FetcherConfig, HttpDocumentFetcher};
pub use error::{AggregationError, FetchError, SelectionError};
pub use path_rewriter::RewriteError;
pub use swagger_aggregator::SwaggerAggregator;
