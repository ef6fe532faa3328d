//! Adjacency-list persistence.
//!
//! A [`GraphRecord`] is the node list, the weighted edge list (with the
//! disparity score of each edge when the view has one) and optionally a
//! partition. It is written as JSON; weights round-trip exactly.
//!
//! ```json
//! {
//!   "nodes": [{"label": "a", "kind": "term"}, {"label": "b", "kind": "term"}],
//!   "edges": [{"source": 0, "target": 1, "weight": 2.0, "alpha": 0.0}],
//!   "membership": [0, 0],
//!   "backbone": true
//! }
//! ```

use crate::error::{Error, Result};
use crate::graph::{Node, NodeKind, TextGraph};
use crate::partition::Partition;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

/// One node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Document identifier or term.
    pub label: String,
    /// Document or term.
    pub kind: NodeKind,
}

/// One undirected edge between node positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Position of one endpoint in [`GraphRecord::nodes`].
    pub source: usize,
    /// Position of the other endpoint.
    pub target: usize,
    /// Edge weight.
    pub weight: f64,
    /// Disparity score, for backboned views.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
}

/// Serializable form of a view and, optionally, a partition of it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphRecord {
    /// Nodes in node-index order.
    pub nodes: Vec<NodeRecord>,
    /// Edges in edge-index order.
    pub edges: Vec<EdgeRecord>,
    /// Cluster id per node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership: Option<Vec<usize>>,
    /// Set for backboned views, which carry scores even with no edges left.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub backbone: bool,
}

impl GraphRecord {
    /// Capture `graph`, its per-edge scores and a partition of it.
    ///
    /// `scores` is indexed by edge index; a partition covering a different
    /// number of nodes is rejected.
    pub fn from_graph(
        graph: &TextGraph,
        scores: Option<&[f64]>,
        partition: Option<&Partition>,
    ) -> Result<Self> {
        if let Some(p) = partition {
            if p.len() != graph.node_count() {
                return Err(Error::invalid(
                    "partition",
                    format!("covers {} nodes, graph has {}", p.len(), graph.node_count()),
                ));
            }
        }
        let nodes = graph
            .node_indices()
            .map(|i| NodeRecord {
                label: graph[i].label.clone(),
                kind: graph[i].kind,
            })
            .collect();
        let edges = graph
            .edge_references()
            .map(|e| EdgeRecord {
                source: e.source().index(),
                target: e.target().index(),
                weight: *e.weight(),
                alpha: scores.and_then(|s| s.get(e.id().index()).copied()),
            })
            .collect();
        Ok(Self {
            nodes,
            edges,
            membership: partition.map(|p| p.membership().to_vec()),
            backbone: scores.is_some(),
        })
    }

    /// Rebuild the graph, checking indices and weights.
    pub fn to_graph(&self) -> Result<TextGraph> {
        let mut graph = TextGraph::with_capacity(self.nodes.len(), self.edges.len());
        for n in &self.nodes {
            let _ = graph.add_node(Node {
                label: n.label.clone(),
                kind: n.kind,
            });
        }
        for e in &self.edges {
            if e.source >= self.nodes.len() || e.target >= self.nodes.len() {
                return Err(Error::Serialization(format!(
                    "edge ({}, {}) refers to a missing node",
                    e.source, e.target
                )));
            }
            if e.source == e.target {
                return Err(Error::Serialization(format!(
                    "self-loop on node {}",
                    e.source
                )));
            }
            if !e.weight.is_finite() || e.weight < 0.0 {
                return Err(Error::Serialization(format!(
                    "edge ({}, {}) has weight {}",
                    e.source, e.target, e.weight
                )));
            }
            let _ = graph.add_edge(NodeIndex::new(e.source), NodeIndex::new(e.target), e.weight);
        }
        Ok(graph)
    }

    /// Per-edge scores, if every edge carries one.
    ///
    /// A backbone record with no edges yields an empty score list.
    pub fn scores(&self) -> Option<Vec<f64>> {
        if self.edges.is_empty() && !self.backbone {
            return None;
        }
        self.edges.iter().map(|e| e.alpha).collect()
    }

    /// The stored partition, attached to `graph`.
    pub fn partition(&self, graph: &TextGraph) -> Result<Option<Partition>> {
        self.membership
            .as_deref()
            .map(|m| Partition::from_membership(graph, m))
            .transpose()
    }

    /// Serialize as JSON.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Deserialize from JSON.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write to a file, replacing it.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        debug!(
            path = %path.display(),
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "saved graph"
        );
        Ok(())
    }

    /// Read from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let record = Self::from_reader(BufReader::new(File::open(path)?))?;
        debug!(
            path = %path.display(),
            nodes = record.nodes.len(),
            edges = record.edges.len(),
            "loaded graph"
        );
        Ok(record)
    }
}
