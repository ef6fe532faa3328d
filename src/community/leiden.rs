//! Leiden: Louvain with a refinement step between levels.
//!
//! Per level:
//!
//! 1. **Local moving** in a seeded random order, as in Louvain.
//! 2. **Refinement**: every community is cut into its connected pieces.
//! 3. **Aggregation**: the pieces, not the communities, become the nodes of
//!    the next level, each starting in the community it came from.
//!
//! A last refinement on the input graph means every reported community is
//! connected, so nodes from different components never share a community.
//! Each pass is linear in the number of edges.
//!
//! Traag, Waltman, van Eck (2019). "From Louvain to Leiden: guaranteeing
//! well-connected communities." Scientific Reports 9, 5233.

use super::traits::{CommunityDetection, EdgeList};
use super::weighted::{renumber, WeightedGraph};
use crate::error::{Error, Result};
use rand::prelude::*;

/// Multi-level Leiden detector.
///
/// Resolution and seed are supplied per call; the struct only carries
/// iteration limits.
#[derive(Debug, Clone)]
pub struct Leiden {
    /// Maximum node visits per local-moving phase, in multiples of `n`.
    max_iter: usize,
    /// Maximum levels of aggregation.
    max_levels: usize,
}

impl Leiden {
    /// 100 visits per node, at most 20 levels.
    pub fn new() -> Self {
        Self {
            max_iter: 100,
            max_levels: 20,
        }
    }

    /// Node visit budget per local-moving pass, in multiples of `n`.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Cap on coarsening levels.
    pub fn with_max_levels(mut self, max_levels: usize) -> Self {
        self.max_levels = max_levels;
        self
    }
}

impl Default for Leiden {
    fn default() -> Self {
        Self::new()
    }
}

impl CommunityDetection for Leiden {
    fn detect(&self, graph: &EdgeList, resolution: f64, seed: u64) -> Result<Vec<usize>> {
        let n = graph.node_count;
        if n == 0 {
            return Err(Error::EmptyInput { what: "graph" });
        }

        let base = WeightedGraph::from_edge_list(graph)?;
        if base.total_weight <= 0.0 {
            return Ok((0..n).collect());
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut current = base.clone();
        // original node -> node of `current`
        let mut node_map: Vec<usize> = (0..n).collect();
        // node of `current` -> community
        let mut assignment: Vec<usize> = (0..n).collect();

        for _level in 0..self.max_levels {
            // Phase 1: Local moving
            let moved = current.local_moving(&mut assignment, resolution, self.max_iter, &mut rng);
            if !moved {
                break;
            }

            // Phase 2: Refinement
            let (refined, n_refined) = current.split_disconnected(&assignment);
            if n_refined == current.n {
                break;
            }

            // Phase 3: Aggregation, seeded with the unrefined partition
            let mut seeded = vec![0; n_refined];
            for (node, &piece) in refined.iter().enumerate() {
                seeded[piece] = assignment[node];
            }
            node_map = node_map.iter().map(|&v| refined[v]).collect();
            current = current.aggregate(&refined, n_refined);
            assignment = renumber(&seeded).0;
        }

        let membership: Vec<usize> = node_map.iter().map(|&v| assignment[v]).collect();
        let (connected, _) = base.split_disconnected(&membership);
        Ok(connected)
    }

    fn name(&self) -> &'static str {
        "leiden"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet, VecDeque};

    fn unit(node_count: usize, pairs: &[(usize, usize)]) -> EdgeList {
        EdgeList {
            node_count,
            edges: pairs.iter().map(|&(i, j)| (i, j, 1.0)).collect(),
        }
    }

    fn two_cliques() -> EdgeList {
        unit(
            6,
            &[(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5), (2, 3)],
        )
    }

    #[test]
    fn test_leiden_basic() {
        let graph = unit(3, &[(0, 1), (1, 2), (0, 2)]);
        let communities = Leiden::new().detect(&graph, 1.0, 42).unwrap();

        assert_eq!(communities, vec![0, 0, 0]);
    }

    #[test]
    fn test_leiden_two_cliques() {
        let communities = Leiden::new().detect(&two_cliques(), 1.0, 42).unwrap();
        assert_eq!(communities, vec![0, 0, 0, 1, 1, 1]);
    }

    #[test]
    fn test_leiden_uses_weights() {
        // A 4-cycle: the heavy edges decide the split.
        let graph = EdgeList {
            node_count: 4,
            edges: vec![(0, 1, 10.0), (1, 2, 0.1), (2, 3, 10.0), (3, 0, 0.1)],
        };
        let communities = Leiden::new().detect(&graph, 1.0, 1).unwrap();
        assert_eq!(communities, vec![0, 0, 1, 1]);

        let flipped = EdgeList {
            node_count: 4,
            edges: vec![(0, 1, 0.1), (1, 2, 10.0), (2, 3, 0.1), (3, 0, 10.0)],
        };
        let communities = Leiden::new().detect(&flipped, 1.0, 1).unwrap();
        assert_eq!(communities, vec![0, 1, 1, 0]);
    }

    #[test]
    fn test_leiden_disconnected_components_never_merge() {
        let graph = unit(5, &[(0, 1), (1, 2), (3, 4)]);
        for seed in 0..10 {
            for resolution in [0.01, 0.5, 1.0, 3.0] {
                let communities = Leiden::new().detect(&graph, resolution, seed).unwrap();
                for a in 0..3 {
                    for b in 3..5 {
                        assert_ne!(communities[a], communities[b]);
                    }
                }
            }
        }
    }

    #[test]
    fn test_leiden_same_seed_same_result() {
        let a = Leiden::new().detect(&two_cliques(), 1.0, 9).unwrap();
        let b = Leiden::new().detect(&two_cliques(), 1.0, 9).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_leiden_empty_graph() {
        let result = Leiden::new().detect(&EdgeList::default(), 1.0, 42);
        assert!(result.is_err());
    }

    #[test]
    fn test_leiden_no_edges() {
        let communities = Leiden::new().detect(&unit(3, &[]), 1.0, 42).unwrap();
        assert_eq!(communities, vec![0, 1, 2]);
    }

    #[test]
    fn test_leiden_high_resolution_splits_more() {
        let pairs: Vec<(usize, usize)> = (0..11).map(|i| (i, i + 1)).collect();
        let graph = unit(12, &pairs);
        let count = |res| {
            let c = Leiden::new().detect(&graph, res, 3).unwrap();
            c.iter().collect::<HashSet<_>>().len()
        };
        assert!(count(0.05) <= count(5.0));
        assert!(count(0.05) >= 1);
    }

    #[test]
    fn test_leiden_connectivity_guarantee() {
        let mut pairs: Vec<(usize, usize)> = (0..15).map(|i| (i, i + 1)).collect();
        pairs.push((0, 5));
        pairs.push((10, 15));
        let graph = unit(20, &pairs);
        let communities = Leiden::new().detect(&graph, 1.0, 42).unwrap();

        let mut by_community: HashMap<usize, Vec<usize>> = HashMap::new();
        for (node, &comm) in communities.iter().enumerate() {
            by_community.entry(comm).or_default().push(node);
        }

        for (_comm, nodes) in by_community {
            let node_set: HashSet<usize> = nodes.iter().copied().collect();
            let mut visited = HashSet::new();
            let mut queue = VecDeque::from([nodes[0]]);
            while let Some(node) = queue.pop_front() {
                if !visited.insert(node) {
                    continue;
                }
                for &(i, j) in &pairs {
                    let other = if i == node {
                        j
                    } else if j == node {
                        i
                    } else {
                        continue;
                    };
                    if node_set.contains(&other) && !visited.contains(&other) {
                        queue.push_back(other);
                    }
                }
            }
            assert_eq!(visited.len(), nodes.len(), "Community is not fully connected!");
        }
    }
}
