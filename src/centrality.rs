//! Node centralities on weighted views.
//!
//! Path-based measures (betweenness, closeness) walk edges by **cost**, not
//! weight: a strong tie should be a short hop.
//!
//! ```text
//! cost(w) = 1 / w^τ
//! ```
//!
//! with the tuning parameter τ from [`crate::Params`]. τ = 0 ignores weights;
//! τ = 1 uses plain inverse weights.
//!
//! All scores are indexed by node index.

use crate::graph::{adjacency, TextGraph};
use petgraph::graph::NodeIndex;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Sources handled per parallel task in betweenness; fixed so that the
/// summation order, and hence the result, does not depend on scheduling.
const BETWEENNESS_CHUNK: usize = 32;

/// Relative tolerance for treating two path lengths as equal.
const PATH_EPS: f64 = 1e-10;

/// Traversal cost of an edge of weight `weight`.
#[inline]
pub fn cost(weight: f64, tuning_parameter: f64) -> f64 {
    1.0 / weight.powf(tuning_parameter)
}

/// Number of incident edges.
pub fn degree(graph: &TextGraph) -> Vec<usize> {
    adjacency(graph).iter().map(Vec::len).collect()
}

/// Sum of incident edge weights.
pub fn strength(graph: &TextGraph) -> Vec<f64> {
    adjacency(graph)
        .iter()
        .map(|nbrs| nbrs.iter().map(|&(_, w, _)| w).sum())
        .collect()
}

/// Cost-weighted adjacency; edges with unusable cost are dropped.
fn cost_adjacency(graph: &TextGraph, tuning_parameter: f64) -> Vec<Vec<(usize, f64)>> {
    adjacency(graph)
        .into_iter()
        .map(|nbrs| {
            nbrs.into_iter()
                .map(|(v, w, _)| (v, cost(w, tuning_parameter)))
                .filter(|&(_, c)| c.is_finite() && c >= 0.0)
                .collect()
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
struct Visit {
    dist: f64,
    node: usize,
}

impl PartialEq for Visit {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Visit {}

impl Ord for Visit {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap on distance, then node index.
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Visit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn same_length(a: f64, b: f64) -> bool {
    (a - b).abs() <= PATH_EPS * a.abs().max(b.abs()).max(1.0)
}

/// Single-source shortest paths.
struct ShortestPaths {
    dist: Vec<f64>,
    /// Number of shortest paths from the source.
    sigma: Vec<f64>,
    /// Predecessors on shortest paths.
    preds: Vec<Vec<usize>>,
    /// Settled nodes in non-decreasing distance.
    order: Vec<usize>,
}

fn dijkstra(adj: &[Vec<(usize, f64)>], source: usize) -> ShortestPaths {
    let n = adj.len();
    let mut dist = vec![f64::INFINITY; n];
    let mut sigma = vec![0.0; n];
    let mut preds = vec![Vec::new(); n];
    let mut settled = vec![false; n];
    let mut order = Vec::new();
    let mut heap = BinaryHeap::new();

    dist[source] = 0.0;
    sigma[source] = 1.0;
    heap.push(Visit {
        dist: 0.0,
        node: source,
    });

    while let Some(Visit { dist: d, node: u }) = heap.pop() {
        if settled[u] || d > dist[u] {
            continue;
        }
        settled[u] = true;
        order.push(u);
        for &(v, c) in &adj[u] {
            if settled[v] {
                continue;
            }
            let alt = d + c;
            if dist[v].is_infinite() || (alt < dist[v] && !same_length(alt, dist[v])) {
                dist[v] = alt;
                sigma[v] = sigma[u];
                preds[v].clear();
                preds[v].push(u);
                heap.push(Visit { dist: alt, node: v });
            } else if same_length(alt, dist[v]) {
                sigma[v] += sigma[u];
                preds[v].push(u);
            }
        }
    }

    ShortestPaths {
        dist,
        sigma,
        preds,
        order,
    }
}

/// Brandes dependency accumulation for one source.
fn dependencies(adj: &[Vec<(usize, f64)>], source: usize, into: &mut [f64]) {
    let sp = dijkstra(adj, source);
    let mut delta = vec![0.0; adj.len()];
    for &w in sp.order.iter().rev() {
        for &v in &sp.preds[w] {
            delta[v] += sp.sigma[v] / sp.sigma[w] * (1.0 + delta[w]);
        }
        if w != source {
            into[w] += delta[w];
        }
    }
}

/// Weighted betweenness centrality; each unordered pair counts once.
pub fn betweenness(graph: &TextGraph, tuning_parameter: f64) -> Vec<f64> {
    let adj = cost_adjacency(graph, tuning_parameter);
    let n = adj.len();
    let sources: Vec<usize> = (0..n).collect();

    let chunk_sum = |chunk: &[usize]| -> Vec<f64> {
        let mut acc = vec![0.0; n];
        for &s in chunk {
            dependencies(&adj, s, &mut acc);
        }
        acc
    };

    #[cfg(feature = "parallel")]
    let partials: Vec<Vec<f64>> = sources.par_chunks(BETWEENNESS_CHUNK).map(chunk_sum).collect();
    #[cfg(not(feature = "parallel"))]
    let partials: Vec<Vec<f64>> = sources.chunks(BETWEENNESS_CHUNK).map(chunk_sum).collect();

    let mut total = vec![0.0; n];
    for partial in partials {
        for (t, p) in total.iter_mut().zip(partial) {
            *t += p;
        }
    }
    // Undirected: every pair was counted from both ends.
    total.iter_mut().for_each(|b| *b /= 2.0);
    total
}

/// Weighted closeness: reachable nodes over total distance to them.
///
/// Nodes that reach nothing score 0.
pub fn closeness(graph: &TextGraph, tuning_parameter: f64) -> Vec<f64> {
    let adj = cost_adjacency(graph, tuning_parameter);
    let score = |s: usize| -> f64 {
        let sp = dijkstra(&adj, s);
        let (reached, total) = sp
            .dist
            .iter()
            .enumerate()
            .filter(|&(v, d)| v != s && d.is_finite())
            .fold((0usize, 0.0f64), |(r, t), (_, d)| (r + 1, t + d));
        if reached == 0 || total <= 0.0 {
            0.0
        } else {
            reached as f64 / total
        }
    };

    #[cfg(feature = "parallel")]
    let scores = (0..adj.len()).into_par_iter().map(score).collect();
    #[cfg(not(feature = "parallel"))]
    let scores = (0..adj.len()).map(score).collect();
    scores
}

/// Weighted eigenvector centrality, scaled so the maximum is 1.
///
/// Power iteration on `A + I`; the shift leaves the eigenvectors alone but
/// stops bipartite graphs from oscillating. Edgeless graphs score all zeros.
pub fn eigenvector_centrality(graph: &TextGraph) -> Vec<f64> {
    const MAX_ITER: usize = 1000;
    const TOL: f64 = 1e-10;

    let adj = adjacency(graph);
    let n = adj.len();
    if graph.edge_count() == 0 {
        return vec![0.0; n];
    }

    let mut x = vec![1.0; n];
    for _ in 0..MAX_ITER {
        let mut next: Vec<f64> = x.clone();
        for (u, nbrs) in adj.iter().enumerate() {
            for &(v, w, _) in nbrs {
                next[u] += w * x[v];
            }
        }
        let max = next.iter().copied().fold(0.0f64, f64::max);
        if max <= 0.0 {
            return vec![0.0; n];
        }
        next.iter_mut().for_each(|v| *v /= max);
        let change: f64 = next.iter().zip(&x).map(|(a, b)| (a - b).abs()).sum();
        x = next;
        if change < TOL {
            break;
        }
    }
    x
}

/// The `n` highest-scoring labels, descending; ties keep node order.
pub fn top_n(graph: &TextGraph, scores: &[f64], n: usize) -> Vec<(String, f64)> {
    let mut ranked: Vec<(usize, f64)> = scores.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked
        .into_iter()
        .take(n)
        .map(|(i, s)| (graph[NodeIndex::new(i)].label.clone(), s))
        .collect()
}
