//! HTTP request handlers

pub mod health;
pub mod swagger_docs;

pub use health::{health_handler, HealthResponse};
pub use swagger_docs::{aggregated_document_handler, RouteDocsState};
