//! Partitions and the community-detection adapter.
//!
//! [`detect`] is the only place the crate talks to a
//! [`CommunityDetection`] implementation: it marshals a view into an
//! [`EdgeList`], hands over resolution and seed, and checks what comes back
//! before turning it into a [`Partition`].

use crate::community::{CommunityDetection, EdgeList};
use crate::config::validate_resolution;
use crate::error::{Error, Result};
use crate::graph::{NodeKind, TextGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use tracing::debug;

/// Total, non-overlapping assignment of a graph's nodes to clusters.
///
/// Cluster ids run from 0 in order of first appearance over node order, so
/// two partitions with the same grouping compare equal whatever detector
/// produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    labels: Vec<String>,
    kinds: Vec<NodeKind>,
    membership: Vec<usize>,
    n_clusters: usize,
}

impl Partition {
    /// Wrap a membership vector for `graph`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`] if `membership` does not have exactly
    /// one entry per node.
    pub fn from_membership(graph: &TextGraph, membership: &[usize]) -> Result<Self> {
        if membership.len() != graph.node_count() {
            return Err(Error::invalid(
                "membership",
                format!(
                    "has {} entries for {} nodes",
                    membership.len(),
                    graph.node_count()
                ),
            ));
        }
        let mut ids: HashMap<usize, usize> = HashMap::new();
        let membership: Vec<usize> = membership
            .iter()
            .map(|&c| {
                let next = ids.len();
                *ids.entry(c).or_insert(next)
            })
            .collect();
        Ok(Self {
            labels: graph.node_indices().map(|i| graph[i].label.clone()).collect(),
            kinds: graph.node_indices().map(|i| graph[i].kind).collect(),
            membership,
            n_clusters: ids.len(),
        })
    }

    /// Every node in its own cluster.
    pub fn singletons(graph: &TextGraph) -> Self {
        let n = graph.node_count();
        Self {
            labels: graph.node_indices().map(|i| graph[i].label.clone()).collect(),
            kinds: graph.node_indices().map(|i| graph[i].kind).collect(),
            membership: (0..n).collect(),
            n_clusters: n,
        }
    }

    /// Cluster id per node index.
    pub fn membership(&self) -> &[usize] {
        &self.membership
    }

    /// Number of nodes covered.
    pub fn len(&self) -> usize {
        self.membership.len()
    }

    /// True for a partition of the empty graph.
    pub fn is_empty(&self) -> bool {
        self.membership.is_empty()
    }

    /// Number of clusters.
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Cluster of the first node with this label.
    ///
    /// In a bipartite partition a document and a term may share a label; use
    /// [`Partition::cluster_of_kind`] there.
    pub fn cluster_of(&self, label: &str) -> Option<usize> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|i| self.membership[i])
    }

    /// Cluster of the node with this kind and label.
    pub fn cluster_of_kind(&self, kind: NodeKind, label: &str) -> Option<usize> {
        self.labels
            .iter()
            .zip(&self.kinds)
            .position(|(l, k)| *k == kind && l == label)
            .map(|i| self.membership[i])
    }

    /// Cluster of a node index.
    pub fn cluster_of_node(&self, node: usize) -> Option<usize> {
        self.membership.get(node).copied()
    }

    /// Node indices in each cluster, clusters in id order.
    pub fn clusters(&self) -> Vec<Vec<usize>> {
        let mut out = vec![Vec::new(); self.n_clusters];
        for (node, &c) in self.membership.iter().enumerate() {
            out[c].push(node);
        }
        out
    }

    /// Labels of the nodes in `cluster`, in node order.
    pub fn members(&self, cluster: usize) -> Vec<&str> {
        self.membership
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c == cluster)
            .map(|(i, _)| self.labels[i].as_str())
            .collect()
    }

    /// Cluster sizes, indexed by cluster id.
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.n_clusters];
        for &c in &self.membership {
            sizes[c] += 1;
        }
        sizes
    }

    /// Node labels in node order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// Marshal a view into the detector's representation.
///
/// Zero-weight edges carry no information for modularity and are left out.
pub fn edge_list(graph: &TextGraph) -> EdgeList {
    EdgeList {
        node_count: graph.node_count(),
        edges: graph
            .edge_references()
            .filter(|e| *e.weight() > 0.0)
            .map(|e| (e.source().index(), e.target().index(), *e.weight()))
            .collect(),
    }
}

/// Run `detector` on `graph` and validate its answer.
///
/// A graph without edges is partitioned into singletons without consulting
/// the detector.
///
/// # Errors
///
/// - [`Error::InvalidConfiguration`] for a non-positive resolution.
/// - [`Error::ExternalToolFailure`] when the detector fails or returns a
///   membership of the wrong length. Failures are not retried.
pub fn detect(
    graph: &TextGraph,
    detector: &dyn CommunityDetection,
    resolution: f64,
    seed: u64,
) -> Result<Partition> {
    validate_resolution(resolution)?;

    let input = edge_list(graph);
    if input.edges.is_empty() {
        debug!(nodes = input.node_count, "no edges; singleton partition");
        return Ok(Partition::singletons(graph));
    }

    let membership = detector
        .detect(&input, resolution, seed)
        .map_err(|err| match err {
            Error::ExternalToolFailure { .. } => err,
            other => Error::ExternalToolFailure {
                tool: detector.name().to_string(),
                diagnostic: other.to_string(),
            },
        })?;
    if membership.len() != input.node_count {
        return Err(Error::ExternalToolFailure {
            tool: detector.name().to_string(),
            diagnostic: format!(
                "returned {} assignments for {} nodes",
                membership.len(),
                input.node_count
            ),
        });
    }

    let partition = Partition::from_membership(graph, &membership)?;
    debug!(
        detector = detector.name(),
        resolution,
        seed,
        nodes = partition.len(),
        clusters = partition.n_clusters(),
        "detected communities"
    );
    Ok(partition)
}
