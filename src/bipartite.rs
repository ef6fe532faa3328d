//! Bipartite document-term graph.

use crate::config::Side;
use crate::graph::{Node, NodeKind, TextGraph};
use crate::weighting::IncidenceMatrix;
use petgraph::graph::NodeIndex;
use tracing::debug;

/// Weighted bipartite graph built from an incidence matrix.
///
/// Node indices `0..n_documents` are documents in row order, followed by the
/// terms in column order. Edges follow the matrix's row-then-column order, so
/// two builds from the same matrix are identical down to edge indices.
#[derive(Debug, Clone)]
pub struct BipartiteGraph {
    graph: TextGraph,
    n_documents: usize,
}

impl BipartiteGraph {
    /// One node per row and column, one edge per non-zero cell.
    ///
    /// Empty rows and columns still get a node.
    pub fn from_matrix(matrix: &IncidenceMatrix) -> Self {
        let n_documents = matrix.n_documents();
        let mut graph = TextGraph::with_capacity(n_documents + matrix.n_terms(), matrix.nnz());
        for doc in matrix.documents() {
            let _ = graph.add_node(Node::document(doc.as_str()));
        }
        for term in matrix.terms() {
            let _ = graph.add_node(Node::term(term.as_str()));
        }
        for (row, col, w) in matrix.iter() {
            let _ = graph.add_edge(
                NodeIndex::new(row),
                NodeIndex::new(n_documents + col),
                w,
            );
        }
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built bipartite graph"
        );
        Self { graph, n_documents }
    }

    /// Underlying graph.
    pub fn graph(&self) -> &TextGraph {
        &self.graph
    }

    /// Number of document nodes.
    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    /// Number of term nodes.
    pub fn n_terms(&self) -> usize {
        self.graph.node_count() - self.n_documents
    }

    /// Node indices of one side, in order.
    pub fn side(&self, side: Side) -> std::ops::Range<usize> {
        match side {
            Side::Documents => 0..self.n_documents,
            Side::Terms => self.n_documents..self.graph.node_count(),
        }
    }

    /// Side a node index belongs to.
    pub fn side_of(&self, node: usize) -> Side {
        if node < self.n_documents {
            Side::Documents
        } else {
            Side::Terms
        }
    }

    /// Index of a node by kind and label.
    pub fn find(&self, kind: NodeKind, label: &str) -> Option<usize> {
        let range = match kind {
            NodeKind::Document => self.side(Side::Documents),
            NodeKind::Term => self.side(Side::Terms),
        };
        range.into_iter().find(|&i| self.graph[NodeIndex::new(i)].label == label)
    }

    /// True if no edge joins two nodes of the same side.
    pub fn is_bipartite(&self) -> bool {
        use petgraph::visit::EdgeRef;
        self.graph
            .edge_references()
            .all(|e| self.side_of(e.source().index()) != self.side_of(e.target().index()))
    }
}
