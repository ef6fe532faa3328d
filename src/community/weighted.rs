//! Weighted graph internals shared by Leiden and Louvain.

use super::traits::EdgeList;
use crate::error::{Error, Result};
use rand::prelude::*;
use std::collections::{BTreeMap, VecDeque};

/// Gains must beat the incumbent by this much to trigger a move.
const MOVE_EPS: f64 = 1e-12;

/// Weighted adjacency with self-loops, as produced by aggregation.
#[derive(Debug, Clone)]
pub(crate) struct WeightedGraph {
    pub(crate) n: usize,
    /// node -> [(neighbor, weight)], self-loops excluded.
    pub(crate) adj: Vec<Vec<(usize, f64)>>,
    /// Weight of the self-loop at each node (internal weight of a community).
    pub(crate) self_loops: Vec<f64>,
    /// Weighted degree; a self-loop counts twice.
    pub(crate) degrees: Vec<f64>,
    /// Sum of degrees (2m).
    pub(crate) total_weight: f64,
}

impl WeightedGraph {
    pub(crate) fn from_edge_list(graph: &EdgeList) -> Result<Self> {
        let n = graph.node_count;
        let mut adj = vec![Vec::new(); n];
        let mut self_loops = vec![0.0; n];
        for &(i, j, w) in &graph.edges {
            if i >= n || j >= n {
                return Err(Error::invalid(
                    "graph",
                    format!("edge ({i}, {j}) references a node outside 0..{n}"),
                ));
            }
            if !w.is_finite() || w < 0.0 {
                return Err(Error::invalid(
                    "graph",
                    format!("edge ({i}, {j}) has weight {w}"),
                ));
            }
            if i == j {
                self_loops[i] += w;
            } else {
                adj[i].push((j, w));
                adj[j].push((i, w));
            }
        }
        Ok(Self::from_parts(adj, self_loops))
    }

    fn from_parts(adj: Vec<Vec<(usize, f64)>>, self_loops: Vec<f64>) -> Self {
        let degrees: Vec<f64> = adj
            .iter()
            .zip(&self_loops)
            .map(|(nbrs, sl)| nbrs.iter().map(|(_, w)| w).sum::<f64>() + 2.0 * sl)
            .collect();
        let total_weight = degrees.iter().sum();
        Self {
            n: adj.len(),
            adj,
            self_loops,
            degrees,
            total_weight,
        }
    }

    /// Greedy local moving, visiting nodes in a seeded random order and
    /// re-queueing the neighbors of every node that moves.
    ///
    /// `assignment` values must be `< n`. Returns whether any node moved.
    pub(crate) fn local_moving<R: Rng>(
        &self,
        assignment: &mut [usize],
        resolution: f64,
        max_iter: usize,
        rng: &mut R,
    ) -> bool {
        if self.total_weight <= 0.0 {
            return false;
        }
        let m2 = self.total_weight;

        let mut comm_total = vec![0.0; self.n];
        for (node, &c) in assignment.iter().enumerate() {
            comm_total[c] += self.degrees[node];
        }

        let mut order: Vec<usize> = (0..self.n).collect();
        order.shuffle(rng);
        let mut queue: VecDeque<usize> = order.into();
        let mut in_queue = vec![true; self.n];

        let mut link = vec![0.0; self.n];
        let mut touched = vec![false; self.n];
        let mut neighbor_comms: Vec<usize> = Vec::new();

        let budget = max_iter.saturating_mul(self.n).max(self.n);
        let mut visits = 0usize;
        let mut moved = false;

        while let Some(node) = queue.pop_front() {
            in_queue[node] = false;
            visits += 1;
            if visits > budget {
                break;
            }

            let current = assignment[node];
            let k = self.degrees[node];

            for &(nbr, w) in &self.adj[node] {
                let c = assignment[nbr];
                if !touched[c] {
                    touched[c] = true;
                    neighbor_comms.push(c);
                }
                link[c] += w;
            }

            comm_total[current] -= k;
            let gain = |c: usize| link[c] - resolution * comm_total[c] * k / m2;

            let mut best = current;
            let mut best_gain = gain(current);
            for &c in &neighbor_comms {
                let g = gain(c);
                if g > best_gain + MOVE_EPS {
                    best = c;
                    best_gain = g;
                }
            }
            comm_total[best] += k;

            for &c in &neighbor_comms {
                link[c] = 0.0;
                touched[c] = false;
            }
            neighbor_comms.clear();

            if best != current {
                assignment[node] = best;
                moved = true;
                for &(nbr, _) in &self.adj[node] {
                    if !in_queue[nbr] && assignment[nbr] != best {
                        queue.push_back(nbr);
                        in_queue[nbr] = true;
                    }
                }
            }
        }
        moved
    }

    /// Contract each community into a single node.
    ///
    /// `membership` values must be `< n_communities`.
    pub(crate) fn aggregate(&self, membership: &[usize], n_communities: usize) -> Self {
        let mut self_loops = vec![0.0; n_communities];
        let mut between: BTreeMap<(usize, usize), f64> = BTreeMap::new();

        for i in 0..self.n {
            let ci = membership[i];
            self_loops[ci] += self.self_loops[i];
            for &(j, w) in &self.adj[i] {
                if j <= i {
                    continue;
                }
                let cj = membership[j];
                if ci == cj {
                    self_loops[ci] += w;
                } else {
                    *between.entry((ci.min(cj), ci.max(cj))).or_insert(0.0) += w;
                }
            }
        }

        let mut adj = vec![Vec::new(); n_communities];
        for ((a, b), w) in between {
            adj[a].push((b, w));
            adj[b].push((a, w));
        }
        Self::from_parts(adj, self_loops)
    }

    /// Split every community into its connected pieces.
    ///
    /// Returns a renumbered membership and the number of pieces.
    pub(crate) fn split_disconnected(&self, assignment: &[usize]) -> (Vec<usize>, usize) {
        const UNSET: usize = usize::MAX;
        let mut refined = vec![UNSET; self.n];
        let mut next = 0;

        for start in 0..self.n {
            if refined[start] != UNSET {
                continue;
            }
            let comm = assignment[start];
            refined[start] = next;
            let mut queue = VecDeque::from([start]);
            while let Some(node) = queue.pop_front() {
                for &(nbr, _) in &self.adj[node] {
                    if refined[nbr] == UNSET && assignment[nbr] == comm {
                        refined[nbr] = next;
                        queue.push_back(nbr);
                    }
                }
            }
            next += 1;
        }
        (refined, next)
    }

    /// Weighted modularity with resolution `γ`:
    ///
    /// ```text
    /// Q = Σ_c [ in_c / 2m - γ (tot_c / 2m)² ]
    /// ```
    pub(crate) fn modularity(&self, assignment: &[usize], resolution: f64) -> f64 {
        if self.total_weight <= 0.0 {
            return 0.0;
        }
        let m2 = self.total_weight;
        let mut internal: BTreeMap<usize, f64> = BTreeMap::new();
        let mut total: BTreeMap<usize, f64> = BTreeMap::new();

        for i in 0..self.n {
            let c = assignment[i];
            *total.entry(c).or_insert(0.0) += self.degrees[i];
            *internal.entry(c).or_insert(0.0) += 2.0 * self.self_loops[i];
            for &(j, w) in &self.adj[i] {
                if assignment[j] == c {
                    // Each internal edge is seen from both ends.
                    *internal.entry(c).or_insert(0.0) += w;
                }
            }
        }

        total
            .iter()
            .map(|(c, tot)| {
                let inside = internal.get(c).copied().unwrap_or(0.0);
                inside / m2 - resolution * (tot / m2) * (tot / m2)
            })
            .sum()
    }
}

/// Renumber labels to `0..k` in order of first appearance.
pub(crate) fn renumber(assignment: &[usize]) -> (Vec<usize>, usize) {
    let mut mapping: BTreeMap<usize, usize> = BTreeMap::new();
    let relabelled = assignment
        .iter()
        .map(|&c| {
            let next = mapping.len();
            *mapping.entry(c).or_insert(next)
        })
        .collect();
    (relabelled, mapping.len())
}
