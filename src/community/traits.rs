//! Community detection traits.

use crate::error::Result;

/// A weighted undirected graph in the form handed to a detector.
///
/// Nodes are `0..node_count`; every undirected edge appears once as
/// `(i, j, weight)` with `i != j` and `weight > 0`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EdgeList {
    /// Number of nodes.
    pub node_count: usize,
    /// Undirected weighted edges.
    pub edges: Vec<(usize, usize, f64)>,
}

/// Capability: optimize a partition of a weighted undirected graph.
///
/// Implementations must be deterministic for a given `seed`.
pub trait CommunityDetection {
    /// Detect communities.
    ///
    /// Returns a community id for each node, indexed by node.
    fn detect(&self, graph: &EdgeList, resolution: f64, seed: u64) -> Result<Vec<usize>>;

    /// Short name used in logs and error diagnostics.
    fn name(&self) -> &'static str;
}
