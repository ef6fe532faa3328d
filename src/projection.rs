//! One-mode projection of a bipartite graph.
//!
//! For target-side nodes `u` and `v` sharing neighbors `x` on the opposite side:
//!
//! ```text
//! w(u, v) = Σ_x f(w(u, x), w(v, x))
//! ```
//!
//! With `f = product` this is `B·Bᵀ` (or `Bᵀ·B`) restricted to the
//! off-diagonal: co-occurrence counts under `count` weighting, cosine
//! similarity under `tfidf-l2`.
//!
//! ## Cost
//!
//! Every opposite-side node `x` contributes `d(x)²/2` pairs, so a handful of
//! very common terms can dominate the running time. [`Projector::max_hub_degree`]
//! skips such hubs entirely, which bounds the cost but removes their share of
//! every projected weight. It is never applied unless asked for.
//!
//! Rows are computed independently per target node, so they parallelize
//! without coordination and come out in the same order either way.

use crate::bipartite::BipartiteGraph;
use crate::config::Projector;
use crate::error::Result;
use crate::graph::{adjacency, TextGraph};
use petgraph::graph::NodeIndex;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Project `bipartite` onto `projector.side`.
///
/// Node order follows the bipartite node order of that side. The result is
/// simple: no self-loops, no parallel edges, no zero-weight edges.
pub fn project(bipartite: &BipartiteGraph, projector: &Projector) -> Result<TextGraph> {
    projector.validate()?;

    let source = bipartite.graph();
    let adj = adjacency(source);
    let targets = bipartite.side(projector.side);
    let offset = targets.start;

    let is_hub: Vec<bool> = adj
        .iter()
        .map(|nbrs| projector.max_hub_degree.is_some_and(|max| nbrs.len() > max))
        .collect();
    let skipped = bipartite
        .side(projector.side.opposite())
        .filter(|&x| is_hub[x])
        .count();
    if skipped > 0 {
        warn!(
            skipped,
            max_hub_degree = projector.max_hub_degree,
            "hub nodes excluded from projection; their weight contributions are dropped"
        );
    }

    let combine = projector.combine;
    let row = |u: usize| -> Vec<(usize, f64)> {
        let mut acc: BTreeMap<usize, f64> = BTreeMap::new();
        for &(x, w_ux, _) in &adj[u] {
            if is_hub[x] {
                continue;
            }
            for &(v, w_vx, _) in &adj[x] {
                if v > u {
                    *acc.entry(v).or_insert(0.0) += combine.apply(w_ux, w_vx);
                }
            }
        }
        acc.into_iter().filter(|&(_, w)| w > 0.0).collect()
    };

    let nodes: Vec<usize> = targets.clone().collect();
    #[cfg(feature = "parallel")]
    let rows: Vec<Vec<(usize, f64)>> = nodes.par_iter().map(|&u| row(u)).collect();
    #[cfg(not(feature = "parallel"))]
    let rows: Vec<Vec<(usize, f64)>> = nodes.iter().map(|&u| row(u)).collect();

    let n_edges = rows.iter().map(Vec::len).sum();
    let mut graph = TextGraph::with_capacity(nodes.len(), n_edges);
    for &u in &nodes {
        let _ = graph.add_node(source[NodeIndex::new(u)].clone());
    }
    for (u, row) in nodes.iter().zip(rows) {
        for (v, w) in row {
            let _ = graph.add_edge(NodeIndex::new(u - offset), NodeIndex::new(v - offset), w);
        }
    }

    debug!(
        side = %projector.side,
        combine = ?projector.combine,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "projected bipartite graph"
    );
    Ok(graph)
}
