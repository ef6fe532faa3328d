//! The network facade.
//!
//! [`Textnet`] owns the incidence matrix and the bipartite graph built from a
//! corpus. [`Textnet::project`] derives a [`ProjectedTextnet`], and every
//! further step (backbone, giant component, clustering) returns a new value.
//! Nothing here mutates a view after construction; views share their graphs
//! through `Arc`, so keeping many of them around during a parameter sweep is
//! cheap.
//!
//! Read-only metrics live on the [`GraphView`] trait, which both views
//! implement.
//!
//! ```rust
//! use textnet::{Corpus, GraphView, Params, Scheme, Side, Textnet, WeightingConfig};
//!
//! let corpus = Corpus::new([
//!     ("d1", vec!["a", "a", "b"]),
//!     ("d2", vec!["b", "c"]),
//! ])
//! .unwrap();
//! let counts = WeightingConfig::default().with_scheme(Scheme::Count);
//! let net = Textnet::new(&corpus, &counts, Params::default()).unwrap();
//! assert_eq!(net.node_count(), 5);
//!
//! let terms = net.project(Side::Terms).unwrap();
//! assert_eq!(terms.edge_weight("a", "b"), Some(2.0));
//! assert_eq!(terms.edge_weight("a", "c"), None);
//!
//! let backbone = terms.backbone(0.5).unwrap();
//! let partition = backbone.cluster(1.0, 42).unwrap();
//! assert_eq!(partition.len(), 3);
//! ```

use crate::backbone;
use crate::bipartite::BipartiteGraph;
use crate::centrality;
use crate::community::{self, CommunityDetection, Leiden};
use crate::config::{Params, Projector, Side, WeightingConfig};
use crate::corpus::Corpus;
use crate::error::{Error, Result};
use crate::graph::{giant_component, node_index, NodeKind, TextGraph};
use crate::partition::{self, edge_list, Partition};
use crate::persist::GraphRecord;
use crate::projection;
use crate::weighting::IncidenceMatrix;
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Read-only access shared by every view.
///
/// Implementors supply the graph and the analysis parameters; everything else
/// has a default. Per-node vectors are indexed by node index.
pub trait GraphView {
    /// Underlying graph.
    fn graph(&self) -> &TextGraph;

    /// Parameters for clustering and path-based centralities.
    fn params(&self) -> &Params;

    /// Number of nodes.
    fn node_count(&self) -> usize {
        self.graph().node_count()
    }

    /// Number of edges.
    fn edge_count(&self) -> usize {
        self.graph().edge_count()
    }

    /// Node labels in node order.
    fn labels(&self) -> Vec<&str> {
        let g = self.graph();
        g.node_indices().map(|i| g[i].label.as_str()).collect()
    }

    /// Node kinds in node order.
    fn kinds(&self) -> Vec<NodeKind> {
        let g = self.graph();
        g.node_indices().map(|i| g[i].kind).collect()
    }

    /// `(label, label, weight)` for every edge, in edge order.
    fn edges(&self) -> Vec<(&str, &str, f64)> {
        let g = self.graph();
        g.edge_references()
            .map(|e| {
                (
                    g[e.source()].label.as_str(),
                    g[e.target()].label.as_str(),
                    *e.weight(),
                )
            })
            .collect()
    }

    /// Weight of the edge between two labels, if present.
    ///
    /// Labels resolve to the first node carrying them; in the bipartite view
    /// that is the document when a document and a term share a label.
    fn edge_weight(&self, a: &str, b: &str) -> Option<f64> {
        let g = self.graph();
        let (a, b) = (node_index(g, a)?, node_index(g, b)?);
        g.find_edge(a, b).map(|e| g[e])
    }

    /// Strength (total incident weight) of the node with `label`.
    fn node_strength(&self, label: &str) -> Result<f64> {
        let g = self.graph();
        let node = node_index(g, label).ok_or_else(|| Error::UnknownNode {
            label: label.to_string(),
        })?;
        Ok(g.edges(node).map(|e| *e.weight()).sum())
    }

    /// Traversal cost of an edge of weight `weight` under this view's
    /// tuning parameter.
    fn cost(&self, weight: f64) -> f64 {
        centrality::cost(weight, self.params().tuning_parameter)
    }

    /// Number of incident edges per node.
    fn degree(&self) -> Vec<usize> {
        centrality::degree(self.graph())
    }

    /// Total incident weight per node.
    fn strength(&self) -> Vec<f64> {
        centrality::strength(self.graph())
    }

    /// Weighted betweenness per node.
    fn betweenness(&self) -> Vec<f64> {
        centrality::betweenness(self.graph(), self.params().tuning_parameter)
    }

    /// Weighted closeness per node.
    fn closeness(&self) -> Vec<f64> {
        centrality::closeness(self.graph(), self.params().tuning_parameter)
    }

    /// Eigenvector centrality per node, maximum 1.
    fn eigenvector_centrality(&self) -> Vec<f64> {
        centrality::eigenvector_centrality(self.graph())
    }

    /// The `n` nodes of highest degree.
    fn top_degree(&self, n: usize) -> Vec<(String, f64)> {
        let scores: Vec<f64> = self.degree().into_iter().map(|d| d as f64).collect();
        centrality::top_n(self.graph(), &scores, n)
    }

    /// The `n` nodes of highest strength.
    fn top_strength(&self, n: usize) -> Vec<(String, f64)> {
        centrality::top_n(self.graph(), &self.strength(), n)
    }

    /// The `n` nodes of highest betweenness.
    fn top_betweenness(&self, n: usize) -> Vec<(String, f64)> {
        centrality::top_n(self.graph(), &self.betweenness(), n)
    }

    /// The `n` nodes of highest closeness.
    fn top_closeness(&self, n: usize) -> Vec<(String, f64)> {
        centrality::top_n(self.graph(), &self.closeness(), n)
    }

    /// The `n` nodes of highest eigenvector centrality.
    fn top_ev(&self, n: usize) -> Vec<(String, f64)> {
        centrality::top_n(self.graph(), &self.eigenvector_centrality(), n)
    }

    /// Partition with the bundled Leiden detector.
    fn cluster(&self, resolution: f64, seed: u64) -> Result<Partition> {
        self.cluster_with(&Leiden::new(), resolution, seed)
    }

    /// Partition with any detector.
    fn cluster_with(
        &self,
        detector: &dyn CommunityDetection,
        resolution: f64,
        seed: u64,
    ) -> Result<Partition> {
        partition::detect(self.graph(), detector, resolution, seed)
    }

    /// Partition with Leiden at this view's resolution and seed.
    fn communities(&self) -> Result<Partition> {
        let p = self.params();
        self.cluster(p.resolution, p.seed)
    }

    /// Weighted modularity of `partition` on this view.
    fn modularity(&self, partition: &Partition, resolution: f64) -> Result<f64> {
        check_partition(self.graph(), partition)?;
        community::modularity(&edge_list(self.graph()), partition.membership(), resolution)
    }

    /// For each cluster, its `n` members of highest strength.
    fn top_cluster_nodes(&self, partition: &Partition, n: usize) -> Result<Vec<Vec<(String, f64)>>> {
        check_partition(self.graph(), partition)?;
        let strength = self.strength();
        Ok(partition
            .clusters()
            .into_iter()
            .map(|members| {
                let mut ranked: Vec<(usize, f64)> =
                    members.into_iter().map(|i| (i, strength[i])).collect();
                ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
                ranked
                    .into_iter()
                    .take(n)
                    .map(|(i, s)| (partition.labels()[i].clone(), s))
                    .collect()
            })
            .collect())
    }
}

fn check_partition(graph: &TextGraph, partition: &Partition) -> Result<()> {
    let same = partition.len() == graph.node_count()
        && graph
            .node_indices()
            .zip(partition.labels())
            .all(|(i, l)| graph[i].label == *l);
    if !same {
        return Err(Error::invalid(
            "partition",
            "was computed on a different view",
        ));
    }
    Ok(())
}

/// A corpus turned into a weighted bipartite document-term network.
#[derive(Debug, Clone)]
pub struct Textnet {
    matrix: Arc<IncidenceMatrix>,
    bipartite: Arc<BipartiteGraph>,
    params: Params,
}

impl Textnet {
    /// Weight `corpus` and build the bipartite graph.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyInput`] for an empty corpus or vocabulary;
    /// [`Error::InvalidConfiguration`] for out-of-range settings.
    pub fn new(corpus: &Corpus, weighting: &WeightingConfig, params: Params) -> Result<Self> {
        params.validate()?;
        let matrix = IncidenceMatrix::from_corpus(corpus, weighting)?;
        Self::from_matrix(matrix, params)
    }

    /// Build from an already weighted matrix.
    pub fn from_matrix(matrix: IncidenceMatrix, params: Params) -> Result<Self> {
        params.validate()?;
        let bipartite = BipartiteGraph::from_matrix(&matrix);
        Ok(Self {
            matrix: Arc::new(matrix),
            bipartite: Arc::new(bipartite),
            params,
        })
    }

    /// The incidence matrix.
    pub fn matrix(&self) -> &IncidenceMatrix {
        &self.matrix
    }

    /// The bipartite graph.
    pub fn bipartite(&self) -> &BipartiteGraph {
        &self.bipartite
    }

    /// Same network, different analysis parameters.
    pub fn with_params(&self, params: Params) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            matrix: Arc::clone(&self.matrix),
            bipartite: Arc::clone(&self.bipartite),
            params,
        })
    }

    /// Project onto `side` with the default projector.
    pub fn project(&self, side: Side) -> Result<ProjectedTextnet> {
        self.project_with(&Projector::new(side))
    }

    /// Project with explicit projector settings.
    pub fn project_with(&self, projector: &Projector) -> Result<ProjectedTextnet> {
        let graph = projection::project(&self.bipartite, projector)?;
        Ok(ProjectedTextnet {
            graph: Arc::new(graph),
            side: projector.side,
            scores: None,
            params: self.params,
        })
    }

    /// Write the bipartite graph, and optionally a partition of it, as JSON.
    pub fn save(&self, path: impl AsRef<Path>, partition: Option<&Partition>) -> Result<()> {
        GraphRecord::from_graph(self.bipartite.graph(), None, partition)?.save(path)
    }

    /// Read a bipartite graph written by [`Textnet::save`].
    ///
    /// The incidence matrix is rebuilt from the edges. Documents must precede
    /// terms and every edge must join a document to a term.
    pub fn load(path: impl AsRef<Path>, params: Params) -> Result<(Self, Option<Partition>)> {
        let record = GraphRecord::load(path)?;

        let mut documents = Vec::new();
        let mut terms = Vec::new();
        // node position -> row or column
        let mut position = Vec::with_capacity(record.nodes.len());
        for node in &record.nodes {
            match node.kind {
                NodeKind::Document if terms.is_empty() => {
                    position.push(documents.len());
                    documents.push(node.label.clone());
                }
                NodeKind::Document => {
                    return Err(Error::Serialization(format!(
                        "document '{}' listed after terms",
                        node.label
                    )));
                }
                NodeKind::Term => {
                    position.push(terms.len());
                    terms.push(node.label.clone());
                }
            }
        }

        let n_documents = documents.len();
        let mut cells = Vec::with_capacity(record.edges.len());
        for e in &record.edges {
            let (doc, term) = match (e.source < n_documents, e.target < n_documents) {
                (true, false) => (e.source, e.target),
                (false, true) => (e.target, e.source),
                _ => {
                    return Err(Error::Serialization(format!(
                        "edge ({}, {}) does not join a document to a term",
                        e.source, e.target
                    )))
                }
            };
            let term = position.get(term).copied().ok_or_else(|| {
                Error::Serialization(format!("edge refers to missing node {term}"))
            })?;
            cells.push((doc, term, e.weight));
        }

        let matrix = IncidenceMatrix::from_cells(documents, terms, cells).map_err(|e| match e {
            Error::InvalidConfiguration { message, .. } => Error::Serialization(message),
            other => other,
        })?;
        let net = Self::from_matrix(matrix, params)?;
        let partition = record.partition(net.bipartite.graph())?;
        Ok((net, partition))
    }
}

impl GraphView for Textnet {
    fn graph(&self) -> &TextGraph {
        self.bipartite.graph()
    }

    fn params(&self) -> &Params {
        &self.params
    }
}

/// A one-mode network of documents or of terms.
///
/// Backboned views carry the disparity score of every surviving edge.
#[derive(Debug, Clone)]
pub struct ProjectedTextnet {
    graph: Arc<TextGraph>,
    side: Side,
    scores: Option<Arc<Vec<f64>>>,
    params: Params,
}

impl ProjectedTextnet {
    /// Which side of the bipartite graph the nodes come from.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Whether this view is the result of [`ProjectedTextnet::backbone`].
    pub fn is_backbone(&self) -> bool {
        self.scores.is_some()
    }

    /// Same view, different analysis parameters.
    pub fn with_params(&self, params: Params) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            ..self.clone()
        })
    }

    /// Disparity score of every edge, indexed by edge index.
    ///
    /// A backboned view reports the scores its edges had in the projection
    /// it was cut from.
    pub fn significance(&self) -> Vec<f64> {
        match &self.scores {
            Some(scores) => scores.to_vec(),
            None => backbone::significance(&self.graph),
        }
    }

    /// Keep only the edges significant at level `alpha`.
    ///
    /// The node set is unchanged. Scores are those of [`Self::significance`],
    /// so cutting a backbone again at a smaller α gives the same edges as
    /// cutting the projection at that α directly.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`] if `alpha` is outside `(0, 1]`.
    pub fn backbone(&self, alpha: f64) -> Result<Self> {
        let scores = self.significance();
        let (graph, kept) = backbone::extract(&self.graph, &scores, alpha)?;
        Ok(Self {
            graph: Arc::new(graph),
            side: self.side,
            scores: Some(Arc::new(kept)),
            params: self.params,
        })
    }

    /// Restrict to the largest connected component.
    ///
    /// Ties go to the component holding the lowest node index.
    pub fn giant_component(&self) -> Self {
        let (graph, kept_edges) = giant_component(&self.graph);
        let scores = self
            .scores
            .as_ref()
            .map(|s| Arc::new(kept_edges.iter().map(|&e| s[e]).collect()));
        debug!(
            nodes_before = self.graph.node_count(),
            nodes_after = graph.node_count(),
            "restricted to giant component"
        );
        Self {
            graph: Arc::new(graph),
            side: self.side,
            scores,
            params: self.params,
        }
    }

    /// Write the view, and optionally a partition of it, as JSON.
    pub fn save(&self, path: impl AsRef<Path>, partition: Option<&Partition>) -> Result<()> {
        let scores = self.scores.as_deref().map(Vec::as_slice);
        GraphRecord::from_graph(&self.graph, scores, partition)?.save(path)
    }

    /// Read a view written by [`ProjectedTextnet::save`].
    ///
    /// The side is taken from the node kinds, which must all agree.
    pub fn load(path: impl AsRef<Path>, params: Params) -> Result<(Self, Option<Partition>)> {
        params.validate()?;
        let record = GraphRecord::load(path)?;
        let side = match record.nodes.first().map(|n| n.kind) {
            None => return Err(Error::EmptyInput { what: "graph" }),
            Some(NodeKind::Document) => Side::Documents,
            Some(NodeKind::Term) => Side::Terms,
        };
        let expected = match side {
            Side::Documents => NodeKind::Document,
            Side::Terms => NodeKind::Term,
        };
        if let Some(n) = record.nodes.iter().find(|n| n.kind != expected) {
            return Err(Error::Serialization(format!(
                "one-mode graph mixes kinds at node '{}'",
                n.label
            )));
        }

        let graph = record.to_graph()?;
        let partition = record.partition(&graph)?;
        let view = Self {
            graph: Arc::new(graph),
            side,
            scores: record.scores().map(Arc::new),
            params,
        };
        Ok((view, partition))
    }
}

impl GraphView for ProjectedTextnet {
    fn graph(&self) -> &TextGraph {
        &self.graph
    }

    fn params(&self) -> &Params {
        &self.params
    }
}

/// Textnets over one corpus, built once per [`WeightingConfig`].
///
/// Safe to share across threads. Networks are built outside the lock, so a
/// slow build never blocks lookups of cached configurations; when two threads
/// race on the same new configuration, the first insert wins and both get it.
#[derive(Debug)]
pub struct TextnetCache {
    corpus: Arc<Corpus>,
    params: Params,
    entries: Mutex<HashMap<WeightingConfig, Arc<Textnet>>>,
}

impl TextnetCache {
    /// Cache over `corpus`; every network gets `params`.
    pub fn new(corpus: Corpus, params: Params) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            corpus: Arc::new(corpus),
            params,
            entries: Mutex::new(HashMap::new()),
        })
    }

    /// The corpus.
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// The network for `weighting`, built on first use.
    pub fn get(&self, weighting: &WeightingConfig) -> Result<Arc<Textnet>> {
        if let Some(net) = self.lock().get(weighting) {
            return Ok(Arc::clone(net));
        }
        let built = Arc::new(Textnet::new(&self.corpus, weighting, self.params)?);

        let mut entries = self.lock();
        let net = Arc::clone(entries.entry(*weighting).or_insert(built));
        debug!(
            scheme = weighting.scheme.as_str(),
            min_docs = weighting.min_docs,
            cached = entries.len(),
            "cached textnet"
        );
        Ok(net)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<WeightingConfig, Arc<Textnet>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of cached networks.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True before the first lookup.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Scheme;

    fn corpus() -> Corpus {
        Corpus::new([
            ("d1", vec!["a", "a", "b"]),
            ("d2", vec!["b", "c"]),
        ])
        .unwrap()
    }

    fn net() -> Textnet {
        let counts = WeightingConfig::default().with_scheme(Scheme::Count);
        Textnet::new(&corpus(), &counts, Params::default()).unwrap()
    }

    #[test]
    fn test_textnet_accounting() {
        let net = net();
        assert_eq!(net.node_count(), 5);
        assert_eq!(net.edge_count(), 4);
        assert_eq!(net.labels(), vec!["d1", "d2", "a", "b", "c"]);
        assert_eq!(net.node_strength("d1").unwrap(), 3.0);
        assert!(matches!(
            net.node_strength("zzz"),
            Err(Error::UnknownNode { .. })
        ));
    }

    #[test]
    fn test_projection_views() {
        let net = net();
        let terms = net.project(Side::Terms).unwrap();
        assert_eq!(terms.side(), Side::Terms);
        assert_eq!(terms.node_count(), 3);
        assert_eq!(terms.edge_weight("a", "b"), Some(2.0));
        assert_eq!(terms.edge_weight("b", "c"), Some(1.0));
        assert_eq!(terms.edge_weight("a", "c"), None);

        let docs = net.project(Side::Documents).unwrap();
        assert_eq!(docs.edges(), vec![("d1", "d2", 1.0)]);
    }

    #[test]
    fn test_derivations_leave_source_untouched() {
        let terms = net().project(Side::Terms).unwrap();
        let before = terms.edges().len();
        let bb = terms.backbone(0.01).unwrap();
        let _ = terms.giant_component();
        assert_eq!(terms.edges().len(), before);
        assert!(!terms.is_backbone());
        assert!(bb.is_backbone());
        assert_eq!(bb.node_count(), terms.node_count());
    }

    #[test]
    fn test_backbone_of_backbone_matches_direct_cut() {
        let corpus = Corpus::new([
            ("d1", vec!["a", "b", "c", "d"]),
            ("d2", vec!["a", "b", "b", "e"]),
            ("d3", vec!["a", "c", "e", "e"]),
            ("d4", vec!["b", "d", "f"]),
        ])
        .unwrap();
        let terms = Textnet::new(&corpus, &WeightingConfig::default(), Params::default())
            .unwrap()
            .project(Side::Terms)
            .unwrap();
        let direct = terms.backbone(0.3).unwrap();
        let chained = terms.backbone(0.8).unwrap().backbone(0.3).unwrap();
        assert_eq!(direct.edges(), chained.edges());
        assert_eq!(direct.significance(), chained.significance());
    }

    #[test]
    fn test_bad_alpha() {
        let terms = net().project(Side::Terms).unwrap();
        for alpha in [0.0, -0.5, 1.5, f64::NAN] {
            assert!(matches!(
                terms.backbone(alpha),
                Err(Error::InvalidConfiguration { name: "alpha", .. })
            ));
        }
    }

    #[test]
    fn test_cluster_summaries() {
        let terms = net().project(Side::Terms).unwrap();
        let p = terms.cluster(1.0, 1).unwrap();
        assert_eq!(p.len(), 3);
        let top = terms.top_cluster_nodes(&p, 1).unwrap();
        assert_eq!(top.len(), p.n_clusters());
        assert!(top.iter().all(|c| c.len() == 1));
        let q = terms.modularity(&p, 1.0).unwrap();
        assert!(q > -1.0 && q <= 1.0);

        let other = net().project(Side::Documents).unwrap();
        assert!(other.modularity(&p, 1.0).is_err());
    }

    #[test]
    fn test_bipartite_clustering_covers_both_sides() {
        let p = net().communities().unwrap();
        assert_eq!(p.len(), 5);
        assert!(p.cluster_of_kind(NodeKind::Term, "a").is_some());
    }

    #[test]
    fn test_giant_component() {
        let corpus = Corpus::new([
            ("d1", vec!["a", "b", "c"]),
            ("d2", vec!["x", "y"]),
        ])
        .unwrap();
        let terms = Textnet::new(&corpus, &WeightingConfig::default(), Params::default())
            .unwrap()
            .project(Side::Terms)
            .unwrap();
        let giant = terms.giant_component();
        assert_eq!(giant.labels(), vec!["a", "b", "c"]);
        assert_eq!(giant.edge_count(), 3);
    }

    #[test]
    fn test_save_and_load_projection() {
        let terms = net().project(Side::Terms).unwrap().backbone(0.9).unwrap();
        let p = terms.cluster(1.0, 3).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terms.json");
        terms.save(&path, Some(&p)).unwrap();

        let (back, loaded) = ProjectedTextnet::load(&path, Params::default()).unwrap();
        assert_eq!(back.side(), Side::Terms);
        assert_eq!(back.edges(), terms.edges());
        assert_eq!(back.significance(), terms.significance());
        assert_eq!(loaded, Some(p));
    }

    #[test]
    fn test_save_and_load_bipartite() {
        let net = Textnet::new(
            &corpus(),
            &WeightingConfig::default().with_scheme(Scheme::TfidfL2),
            Params::default(),
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.json");
        net.save(&path, None).unwrap();

        let (back, partition) = Textnet::load(&path, Params::default()).unwrap();
        assert!(partition.is_none());
        assert_eq!(back.edges(), net.edges());
        assert_eq!(back.matrix().get("d1", "a"), net.matrix().get("d1", "a"));
    }

    #[test]
    fn test_empty_backbone_survives_reload() {
        let corpus = Corpus::new([("d1", vec!["a", "b", "c"])]).unwrap();
        let terms = Textnet::new(&corpus, &WeightingConfig::default(), Params::default())
            .unwrap()
            .project(Side::Terms)
            .unwrap();
        let bb = terms.backbone(0.1).unwrap();
        assert_eq!(bb.edge_count(), 0);
        assert!(bb.is_backbone());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        bb.save(&path, None).unwrap();
        let (back, _) = ProjectedTextnet::load(&path, Params::default()).unwrap();
        assert!(back.is_backbone());
        assert_eq!(back.node_count(), 3);
        assert!(back.significance().is_empty());
    }

    #[test]
    fn test_load_rejects_bad_bipartite_weights() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.json");
        let json = r#"{"nodes":[{"label":"d1","kind":"document"},{"label":"a","kind":"term"}],"edges":[{"source":0,"target":1,"weight":-1.0}]}"#;
        std::fs::write(&path, json).unwrap();
        assert!(matches!(
            Textnet::load(&path, Params::default()),
            Err(Error::Serialization(_))
        ));
        assert!(matches!(
            ProjectedTextnet::load(&path, Params::default()),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_load_rejects_mixed_one_mode_graph() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.json");
        net().save(&path, None).unwrap();
        assert!(matches!(
            ProjectedTextnet::load(&path, Params::default()),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_cache_builds_once_per_config() {
        let cache = TextnetCache::new(corpus(), Params::default()).unwrap();
        assert!(cache.is_empty());
        let a = cache.get(&WeightingConfig::default()).unwrap();
        let b = cache.get(&WeightingConfig::default()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        let c = cache
            .get(&WeightingConfig::default().with_scheme(Scheme::Binary))
            .unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&WeightingConfig::default().with_min_docs(0)).is_err());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_cache_shared_across_threads() {
        let cache = TextnetCache::new(corpus(), Params::default()).unwrap();
        let weighting = WeightingConfig::default().with_scheme(Scheme::Count);
        let nets: Vec<Arc<Textnet>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| cache.get(&weighting).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(cache.len(), 1);
        let stored = cache.get(&weighting).unwrap();
        assert!(nets.iter().all(|n| Arc::ptr_eq(n, &stored)));
    }

    #[test]
    fn test_top_rankings() {
        let terms = net().project(Side::Terms).unwrap();
        assert_eq!(terms.top_degree(1), vec![("b".to_string(), 2.0)]);
        assert_eq!(terms.top_strength(1), vec![("b".to_string(), 3.0)]);
        assert_eq!(terms.top_betweenness(1)[0].0, "b");
        assert_eq!(terms.top_closeness(1)[0].0, "b");
        assert_eq!(terms.top_ev(1)[0].0, "b");
    }
}
