//! Read-only snapshot of routes and clusters resolved at startup.

use std::collections::HashMap;

use super::{Cluster, Route};

/// Immutable route table shared by every request handler.
///
/// Routes keep their insertion order, which is also the order entries appear in
/// the documentation UI. Clusters are looked up by id.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
    clusters: HashMap<String, Cluster>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>, clusters: impl IntoIterator<Item = Cluster>) -> Self {
        let clusters = clusters.into_iter().map(|cluster| (cluster.id.clone(), cluster)).collect();
        Self { routes, clusters }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn route(&self, route_id: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.id == route_id)
    }

    pub fn cluster(&self, cluster_id: &str) -> Option<&Cluster> {
        self.clusters.get(cluster_id)
    }

    /// Resolve the cluster backing `route`, but only if it can serve requests.
    pub fn resolve_cluster(&self, route: &Route) -> Option<&Cluster> {
        self.cluster(&route.cluster_id).filter(|cluster| cluster.is_servable())
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
