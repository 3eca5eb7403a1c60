//! Destination selection within a cluster
//!
//! Selection is pure load distribution: it does not know whether a destination
//! is healthy. Strategies implement [`DestinationSelector`] so the aggregation
//! pipeline does not depend on a particular policy.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::error::SelectionError;
use crate::domain::{Cluster, Destination};

/// Picks one destination of a cluster for an upstream request
pub trait DestinationSelector: Send + Sync {
    fn select<'a>(&self, cluster: &'a Cluster) -> Result<&'a Destination, SelectionError>;

    /// Strategy name for logs
    fn name(&self) -> &'static str;
}

/// Configured selection strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoadBalancingStrategy {
    /// Uniformly random destination per request
    #[default]
    Random,
    /// Rotate through destinations per cluster
    RoundRobin,
}

impl LoadBalancingStrategy {
    pub fn selector(self) -> Arc<dyn DestinationSelector> {
        match self {
            LoadBalancingStrategy::Random => Arc::new(RandomSelector),
            LoadBalancingStrategy::RoundRobin => Arc::new(RoundRobinSelector::new()),
        }
    }
}

fn no_destination(cluster: &Cluster) -> SelectionError {
    SelectionError::NoDestinationAvailable { cluster_id: cluster.id.clone() }
}

/// Uniform random selection
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSelector;

impl DestinationSelector for RandomSelector {
    fn select<'a>(&self, cluster: &'a Cluster) -> Result<&'a Destination, SelectionError> {
        cluster.destinations.choose(&mut rand::thread_rng()).ok_or_else(|| no_destination(cluster))
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Round-robin selection with one counter per cluster
#[derive(Debug, Default)]
pub struct RoundRobinSelector {
    counters: DashMap<String, AtomicUsize>,
}

impl RoundRobinSelector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DestinationSelector for RoundRobinSelector {
    fn select<'a>(&self, cluster: &'a Cluster) -> Result<&'a Destination, SelectionError> {
        if cluster.destinations.is_empty() {
            return Err(no_destination(cluster));
        }

        let turn = self
            .counters
            .entry(cluster.id.clone())
            .or_default()
            .fetch_add(1, Ordering::Relaxed);
        Ok(&cluster.destinations[turn % cluster.destinations.len()])
    }

    fn name(&self) -> &'static str {
        "round_robin"
    }
}
