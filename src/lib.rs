//! # textnet
//!
//! Text collections as weighted networks: a document-term bipartite graph,
//! its one-mode projections, disparity-filter backbones and community
//! partitions.
//!
//! The pipeline, leaves first:
//!
//! 1. [`weighting`]: corpus to sparse [`IncidenceMatrix`] (`count`, `binary`,
//!    `tfidf`, `tfidf-l2`).
//! 2. [`bipartite`]: matrix to [`BipartiteGraph`].
//! 3. [`projection`]: bipartite graph to a document or term network.
//! 4. [`backbone`]: disparity filter at significance level α.
//! 5. [`partition`]: marshal a view into any [`CommunityDetection`] and back.
//!
//! [`Textnet`] and [`ProjectedTextnet`] tie these together as immutable
//! views; every operation returns a new view.
//!
//! **Default build** enables the `parallel` feature (rayon) for projection,
//! significance scores and path-based centralities. Results do not depend on
//! the feature.

pub mod backbone;
pub mod bipartite;
pub mod centrality;
pub mod community;
pub mod config;
pub mod corpus;
/// Error types used across `textnet`.
pub mod error;
pub mod graph;
pub mod metrics;
pub mod network;
pub mod partition;
pub mod persist;
pub mod projection;
pub mod weighting;

#[cfg(test)]
mod pipeline_tests;

pub use bipartite::BipartiteGraph;
pub use community::{CommunityDetection, EdgeList, Leiden, Louvain};
pub use config::{Combine, Config, Params, Projector, Scheme, Side, WeightingConfig};
pub use corpus::{Corpus, Document, SimpleTokenizer, Tokenize};
pub use error::{Error, Result};
pub use graph::{Node, NodeKind, TextGraph};
pub use network::{GraphView, ProjectedTextnet, Textnet, TextnetCache};
pub use partition::Partition;
pub use persist::GraphRecord;
pub use weighting::IncidenceMatrix;
