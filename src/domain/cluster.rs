//! Cluster domain types
//!
//! A cluster is a named group of interchangeable backend instances. The gateway
//! only needs their base addresses: health and weighting are not tracked here.

use serde::{Deserialize, Serialize};

/// One backend instance's base network address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    /// Name the destination is keyed by in configuration
    pub name: String,

    /// Base URL of the instance, e.g. `http://orders-1:8080/`
    pub address: String,
}

impl Destination {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self { name: name.into(), address: address.into() }
    }
}

/// Cluster of destinations that serve the same backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    /// Cluster identifier referenced by routes
    pub id: String,

    /// Destinations ordered by name
    pub destinations: Vec<Destination>,
}

impl Cluster {
    /// Create a cluster; destinations are kept sorted by name so selection
    /// strategies see a stable ordering.
    pub fn new(id: impl Into<String>, mut destinations: Vec<Destination>) -> Self {
        destinations.sort_by(|a, b| a.name.cmp(&b.name));
        Self { id: id.into(), destinations }
    }

    /// A cluster can only serve documents when it has at least one destination
    pub fn is_servable(&self) -> bool {
        !self.destinations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.destinations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }
}
