//! Shared node model and graph helpers.
//!
//! Every view in this crate is a `petgraph` undirected graph whose nodes carry
//! a label and a [`NodeKind`] and whose edges carry an `f64` weight.

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Which side of the bipartite partition a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A document.
    Document,
    /// A term.
    Term,
}

/// Node payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Node {
    /// Document identifier or term string.
    pub label: String,
    /// Document or term.
    pub kind: NodeKind,
}

impl Node {
    /// A document node.
    pub fn document(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: NodeKind::Document,
        }
    }

    /// A term node.
    pub fn term(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: NodeKind::Term,
        }
    }
}

/// Weighted undirected graph used by every view.
pub type TextGraph = UnGraph<Node, f64>;

/// Adjacency lists in edge-index order: `adj[u] = [(v, weight, edge index)]`.
///
/// `petgraph` walks neighbors newest-first; building the lists from
/// `edge_references` gives an order that matches construction order instead.
pub(crate) fn adjacency(graph: &TextGraph) -> Vec<Vec<(usize, f64, usize)>> {
    let mut adj = vec![Vec::new(); graph.node_count()];
    for e in graph.edge_references() {
        let (u, v) = (e.source().index(), e.target().index());
        let w = *e.weight();
        let id = e.id().index();
        adj[u].push((v, w, id));
        if u != v {
            adj[v].push((u, w, id));
        }
    }
    adj
}

/// First node carrying `label`.
pub(crate) fn node_index(graph: &TextGraph, label: &str) -> Option<NodeIndex> {
    graph.node_indices().find(|&i| graph[i].label == label)
}

/// Connected components, each sorted ascending, ordered by smallest member.
pub fn connected_components(graph: &TextGraph) -> Vec<Vec<usize>> {
    let adj = adjacency(graph);
    let n = adj.len();
    let mut seen = vec![false; n];
    let mut components = Vec::new();

    for start in 0..n {
        if seen[start] {
            continue;
        }
        seen[start] = true;
        let mut component = vec![start];
        let mut queue = VecDeque::from([start]);
        while let Some(u) = queue.pop_front() {
            for &(v, _, _) in &adj[u] {
                if !seen[v] {
                    seen[v] = true;
                    component.push(v);
                    queue.push_back(v);
                }
            }
        }
        component.sort_unstable();
        components.push(component);
    }
    components
}

/// Subgraph induced by `keep` (sorted node indices). Edge order is preserved.
///
/// Returns the subgraph and, for each kept edge, its index in `graph`.
pub(crate) fn induced_subgraph(graph: &TextGraph, keep: &[usize]) -> (TextGraph, Vec<usize>) {
    let mut remap: Vec<Option<NodeIndex>> = vec![None; graph.node_count()];
    let mut sub = TextGraph::with_capacity(keep.len(), 0);
    for &i in keep {
        remap[i] = Some(sub.add_node(graph[NodeIndex::new(i)].clone()));
    }
    let mut kept_edges = Vec::new();
    for e in graph.edge_references() {
        if let (Some(a), Some(b)) = (remap[e.source().index()], remap[e.target().index()]) {
            let _ = sub.add_edge(a, b, *e.weight());
            kept_edges.push(e.id().index());
        }
    }
    (sub, kept_edges)
}

/// Largest connected component; ties go to the component with the lowest node.
pub(crate) fn giant_component(graph: &TextGraph) -> (TextGraph, Vec<usize>) {
    let components = connected_components(graph);
    let mut best: &[usize] = &[];
    for c in &components {
        if c.len() > best.len() {
            best = c;
        }
    }
    induced_subgraph(graph, best)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_components() -> TextGraph {
        let mut g = TextGraph::new_undirected();
        let n: Vec<_> = ["a", "b", "c", "d", "e"]
            .iter()
            .map(|l| g.add_node(Node::term(*l)))
            .collect();
        let _ = g.add_edge(n[0], n[1], 1.0);
        let _ = g.add_edge(n[2], n[3], 2.0);
        let _ = g.add_edge(n[3], n[4], 3.0);
        g
    }

    #[test]
    fn test_connected_components() {
        let comps = connected_components(&two_components());
        assert_eq!(comps, vec![vec![0, 1], vec![2, 3, 4]]);
    }

    #[test]
    fn test_giant_component_keeps_weights() {
        let (giant, kept) = giant_component(&two_components());
        assert_eq!(giant.node_count(), 3);
        assert_eq!(giant.edge_count(), 2);
        assert_eq!(kept, vec![1, 2]);
        let labels: Vec<_> = giant.node_indices().map(|i| giant[i].label.as_str()).collect();
        assert_eq!(labels, vec!["c", "d", "e"]);
        let weights: Vec<f64> = giant.edge_references().map(|e| *e.weight()).collect();
        assert_eq!(weights, vec![2.0, 3.0]);
    }

    #[test]
    fn test_adjacency_follows_edge_order() {
        let adj = adjacency(&two_components());
        assert_eq!(adj[3], vec![(2, 2.0, 1), (4, 3.0, 2)]);
    }
}
