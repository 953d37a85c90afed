//! Node set: probing and selection.
//!
//! # Responsibilities
//! - Hold the cluster's fixed, ordered node membership
//! - Probe every node concurrently and wait for the whole cycle
//! - Pick the best node for a request by health tier

use std::sync::Arc;
use futures_util::future::join_all;
use rand::seq::SliceRandom;
use url::Url;
use crate::cluster::types::{ClusterError, ClusterResult};
use crate::health::Health;
use crate::nodes::node::Node;

/// Ordered collection of nodes. Cloning shares the nodes.
#[derive(Debug, Clone, Default)]
pub struct NodeSet {
    nodes: Vec<Arc<Node>>,
}

impl NodeSet {
    pub fn new(nodes: Vec<Arc<Node>>) -> Self {
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Node>> {
        self.nodes.iter()
    }

    /// Endpoint and current health of every node, in membership order.
    pub fn snapshot(&self) -> Vec<(Url, Health)> {
        self.nodes
            .iter()
            .map(|node| (node.endpoint().clone(), node.health()))
            .collect()
    }

    /// Probe all nodes at once and wait until every probe has finished.
    ///
    /// Each probe is bounded by its node's probe timeout, so a cycle takes
    /// as long as the slowest probe, not the sum of them.
    pub async fn probe_all(&self) {
        join_all(self.nodes.iter().map(|node| node.probe_and_update())).await;
    }

    /// Pick a random Green node, else a random Yellow node.
    pub fn select_best(&self) -> ClusterResult<Arc<Node>> {
        let mut green = Vec::new();
        let mut yellow = Vec::new();
        for node in &self.nodes {
            match node.health() {
                Health::Green => green.push(node),
                Health::Yellow => yellow.push(node),
                Health::Red => {}
            }
        }

        let mut rng = rand::thread_rng();
        green
            .choose(&mut rng)
            .or_else(|| yellow.choose(&mut rng))
            .map(|node| Arc::clone(*node))
            .ok_or(ClusterError::NoHealthyNode)
    }
}
