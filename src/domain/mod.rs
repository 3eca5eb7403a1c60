//! Domain layer
//!
//! Pure routing entities with no infrastructure dependencies: routes, the
//! clusters backing them, and the immutable snapshot the gateway resolves once
//! at startup.
//!
//! ## Module Organization
//!
//! - `route`: externally exposed routes and their prefix-removal rule
//! - `cluster`: clusters of interchangeable destinations
//! - `route_table`: read-only snapshot shared by all request handlers

pub mod cluster;
pub mod route;
pub mod route_table;

pub use cluster::{Cluster, Destination};
pub use route::Route;
pub use route_table::RouteTable;
