//! Route domain types

use serde::{Deserialize, Serialize};

/// Externally exposed route bound to exactly one cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Route identifier, also used as a path segment of the docs endpoint
    pub id: String,

    /// Cluster serving this route
    pub cluster_id: String,

    /// Prefix the proxy strips before forwarding; empty when no transform applies
    pub path_remove_prefix: String,
}

impl Route {
    pub fn new(
        id: impl Into<String>,
        cluster_id: impl Into<String>,
        path_remove_prefix: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            cluster_id: cluster_id.into(),
            path_remove_prefix: path_remove_prefix.into(),
        }
    }

    /// Whether `id` can be embedded verbatim as one URL path segment.
    ///
    /// Route ids are placed into router templates, so characters the router
    /// treats specially (`/`, `{`, `}`, leading `:` or `*`) are rejected.
    pub fn is_valid_id(id: &str) -> bool {
        !id.is_empty()
            && id.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && id != "."
            && id != ".."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_id_validation() {
        assert!(Route::is_valid_id("orders"));
        assert!(Route::is_valid_id("api-v1_route.2"));
        assert!(!Route::is_valid_id(""));
        assert!(!Route::is_valid_id("orders/v1"));
        assert!(!Route::is_valid_id("{orders}"));
        assert!(!Route::is_valid_id(":orders"));
        assert!(!Route::is_valid_id("*rest"));
        assert!(!Route::is_valid_id(".."));
    }
}
