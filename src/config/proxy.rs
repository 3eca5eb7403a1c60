//! # Reverse Proxy Configuration
//!
//! Route and cluster definitions shared with the request-forwarding proxy.
//! The shape follows the usual proxy layout:
//!
//! ```yaml
//! reverse_proxy:
//!   routes:
//!     orders:
//!       cluster_id: orders-cluster
//!       match:
//!         path: /orders/{**catch-all}
//!       transforms:
//!         - PathRemovePrefix: /orders
//!   clusters:
//!     orders-cluster:
//!       destinations:
//!         primary:
//!           address: http://orders:8080/
//! ```
//!
//! Only the pieces the documentation gateway needs are interpreted; other
//! transforms are accepted and ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{Cluster, Destination, Route, RouteTable};

/// Transform key carrying the prefix the proxy strips before forwarding
pub const PATH_REMOVE_PREFIX_TRANSFORM: &str = "PathRemovePrefix";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ReverseProxyConfig {
    pub routes: BTreeMap<String, RouteConfig>,
    pub clusters: BTreeMap<String, ClusterConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RouteConfig {
    pub cluster_id: String,

    #[serde(rename = "match")]
    pub route_match: Option<RouteMatchConfig>,

    /// Ordered transform list, each entry a single-key map such as
    /// `{PathRemovePrefix: /orders}`
    pub transforms: Vec<BTreeMap<String, String>>,
}

impl RouteConfig {
    /// Prefix of the first `PathRemovePrefix` transform, or empty when none.
    ///
    /// Keys are compared case-insensitively because configuration sources may
    /// normalise key casing.
    pub fn path_remove_prefix(&self) -> &str {
        self.transforms
            .iter()
            .find_map(|transform| {
                transform.iter().find_map(|(key, value)| {
                    key.eq_ignore_ascii_case(PATH_REMOVE_PREFIX_TRANSFORM)
                        .then_some(value.as_str())
                })
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RouteMatchConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ClusterConfig {
    pub destinations: BTreeMap<String, DestinationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct DestinationConfig {
    pub address: String,
}

impl ReverseProxyConfig {
    /// Resolve the configuration into the immutable snapshot used at runtime.
    ///
    /// Routes pointing at unknown or empty clusters are kept: they answer 404 at
    /// request time rather than failing startup.
    pub fn to_route_table(&self) -> RouteTable {
        let routes = self
            .routes
            .iter()
            .map(|(route_id, route)| {
                if !self.clusters.contains_key(&route.cluster_id) {
                    warn!(
                        route_id = %route_id,
                        cluster_id = %route.cluster_id,
                        "Route references an unknown cluster; its documentation will be unavailable"
                    );
                }
                Route::new(route_id.clone(), route.cluster_id.clone(), route.path_remove_prefix())
            })
            .collect();

        let clusters = self.clusters.iter().map(|(cluster_id, cluster)| {
            if cluster.destinations.is_empty() {
                warn!(cluster_id = %cluster_id, "Cluster has no destinations");
            }
            let destinations = cluster
                .destinations
                .iter()
                .map(|(name, destination)| {
                    Destination::new(name.clone(), destination.address.clone())
                })
                .collect();
            Cluster::new(cluster_id.clone(), destinations)
        });

        RouteTable::new(routes, clusters)
    }
}
