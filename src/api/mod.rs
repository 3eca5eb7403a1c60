//! # HTTP API Components
//!
//! Routing, handlers and error mapping for the documentation endpoints.

pub mod docs;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use routes::{build_router, EndpointTable};
pub use server::start_api_server;
