//! Disparity-filter backbone extraction.
//!
//! ## The Null Model (Serrano, Boguñá, Vespignani 2009)
//!
//! At a node with `k` edges and strength `W`, suppose the `k` normalized weights
//! `p = w / W` were produced by dropping `k - 1` uniform points on `[0, 1]`.
//! The probability that one edge carries at least `p` is then
//!
//! ```text
//! α_u(p) = (1 - p)^(k - 1)
//! ```
//!
//! Small `α_u` means the edge is unusually strong for that node.
//!
//! ## Retention
//!
//! Each endpoint tests the edge on its own. The edge's score is the smaller
//! of the two, so an edge survives if **either** endpoint finds it significant.
//! This keeps edges that matter to a small node even when they are ordinary
//! for the hub at the other end. An endpoint of degree 1 scores 0: its only
//! edge is always kept.
//!
//! An edge is kept when `score < α`; `α = 1` keeps everything.
//!
//! ## References
//!
//! Serrano, Boguñá, Vespignani (2009). "Extracting the multiscale backbone of
//! complex weighted networks." PNAS 106(16), 6483–6488.

use crate::config::validate_alpha;
use crate::error::Result;
use crate::graph::TextGraph;
use petgraph::visit::EdgeRef;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::debug;

/// Disparity score of every edge, indexed by edge index.
pub fn significance(graph: &TextGraph) -> Vec<f64> {
    let n = graph.node_count();
    let mut degree = vec![0usize; n];
    let mut strength = vec![0.0f64; n];
    let edges: Vec<(usize, usize, f64)> = graph
        .edge_references()
        .map(|e| (e.source().index(), e.target().index(), *e.weight()))
        .collect();
    for &(u, v, w) in &edges {
        degree[u] += 1;
        degree[v] += 1;
        strength[u] += w;
        strength[v] += w;
    }

    let endpoint = |node: usize, w: f64| -> f64 {
        let k = degree[node];
        if k <= 1 {
            return 0.0;
        }
        if strength[node] <= 0.0 {
            return 1.0;
        }
        let p = w / strength[node];
        (1.0 - p).max(0.0).powf((k - 1) as f64)
    };
    let score = |&(u, v, w): &(usize, usize, f64)| endpoint(u, w).min(endpoint(v, w));

    #[cfg(feature = "parallel")]
    let scores = edges.par_iter().map(score).collect();
    #[cfg(not(feature = "parallel"))]
    let scores = edges.iter().map(score).collect();
    scores
}

/// Whether an edge with disparity score `score` survives at level `alpha`.
#[inline]
pub fn retains(score: f64, alpha: f64) -> bool {
    alpha >= 1.0 || score < alpha
}

/// Prune `graph` to its backbone at significance level `alpha`.
///
/// `scores` must come from [`significance`] on the same graph. Returns the
/// pruned graph (same nodes, same node indices, surviving edges in original
/// order) and the scores of the surviving edges.
///
/// # Errors
///
/// [`crate::Error::InvalidConfiguration`] if `alpha` is outside `(0, 1]`.
pub fn extract(graph: &TextGraph, scores: &[f64], alpha: f64) -> Result<(TextGraph, Vec<f64>)> {
    validate_alpha(alpha)?;

    let mut kept_scores = Vec::new();
    let pruned = graph.filter_map(
        |_, node| Some(node.clone()),
        |e, &w| {
            let s = scores.get(e.index()).copied().unwrap_or(1.0);
            if retains(s, alpha) {
                kept_scores.push(s);
                Some(w)
            } else {
                None
            }
        },
    );

    debug!(
        alpha,
        nodes = pruned.node_count(),
        edges_before = graph.edge_count(),
        edges_after = pruned.edge_count(),
        "extracted disparity backbone"
    );
    Ok((pruned, kept_scores))
}
