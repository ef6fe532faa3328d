//! Louvain: greedy weighted modularity optimization over coarsening levels.
//!
//! Each level runs local moving from singletons (or from the previous
//! level's communities), then contracts every community into one node whose
//! self-loop carries the internal weight. Levels stop when a pass moves
//! nothing or modularity gains less than `min_modularity_gain`.
//!
//! Nothing ever looks inside a community again after it is contracted, so a
//! reported community may be internally disconnected. [`super::Leiden`]
//! repairs that and is the default elsewhere in the crate.
//!
//! Blondel, Guillaume, Lambiotte, Lefebvre (2008). "Fast unfolding of
//! communities in large networks." J. Stat. Mech. P10008.

use super::traits::{CommunityDetection, EdgeList};
use super::weighted::{renumber, WeightedGraph};
use crate::error::{Error, Result};
use rand::prelude::*;

/// Multi-level Louvain detector.
#[derive(Debug, Clone)]
pub struct Louvain {
    /// Maximum node visits per level, in multiples of `n`.
    max_iter: usize,
    /// Maximum levels of aggregation.
    max_levels: usize,
    /// Minimum modularity improvement to continue.
    min_modularity_gain: f64,
}

impl Louvain {
    /// 100 visits per node, 10 levels, gain threshold `1e-7`.
    pub fn new() -> Self {
        Self {
            max_iter: 100,
            max_levels: 10,
            min_modularity_gain: 1e-7,
        }
    }

    /// Node visit budget per level, in multiples of `n`.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Cap on coarsening levels.
    pub fn with_max_levels(mut self, levels: usize) -> Self {
        self.max_levels = levels;
        self
    }

    /// Set minimum modularity gain between levels.
    pub fn with_min_modularity_gain(mut self, gain: f64) -> Self {
        self.min_modularity_gain = gain;
        self
    }
}

impl Default for Louvain {
    fn default() -> Self {
        Self::new()
    }
}

impl CommunityDetection for Louvain {
    fn detect(&self, graph: &EdgeList, resolution: f64, seed: u64) -> Result<Vec<usize>> {
        let n = graph.node_count;
        if n == 0 {
            return Err(Error::EmptyInput { what: "graph" });
        }

        let mut current = WeightedGraph::from_edge_list(graph)?;
        if current.total_weight <= 0.0 {
            return Ok((0..n).collect());
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut node_map: Vec<usize> = (0..n).collect();
        let mut assignment: Vec<usize> = (0..n).collect();
        let mut prev_modularity = current.modularity(&assignment, resolution);

        for _level in 0..self.max_levels {
            let moved = current.local_moving(&mut assignment, resolution, self.max_iter, &mut rng);
            if !moved {
                break;
            }

            let (partition, n_communities) = renumber(&assignment);
            let modularity = current.modularity(&partition, resolution);
            assignment = partition;

            if modularity - prev_modularity < self.min_modularity_gain
                || n_communities == current.n
            {
                break;
            }
            prev_modularity = modularity;

            node_map = node_map.iter().map(|&v| assignment[v]).collect();
            current = current.aggregate(&assignment, n_communities);
            assignment = (0..n_communities).collect();
        }

        let membership: Vec<usize> = node_map.iter().map(|&v| assignment[v]).collect();
        Ok(renumber(&membership).0)
    }

    fn name(&self) -> &'static str {
        "louvain"
    }
}
