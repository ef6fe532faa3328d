#[cfg(test)]
mod tests {
    use crate::community::{CommunityDetection, Leiden, Louvain};
    use crate::config::{Params, Projector, Scheme, Side, WeightingConfig};
    use crate::corpus::{Corpus, SimpleTokenizer};
    use crate::network::{GraphView, Textnet};
    use crate::{metrics, Result};
    use proptest::prelude::*;
    use std::collections::HashSet;

    const SCHEMES: [Scheme; 4] = [Scheme::Count, Scheme::Binary, Scheme::Tfidf, Scheme::TfidfL2];

    fn small_corpus() -> Corpus {
        Corpus::new([("d1", vec!["a", "a", "b"]), ("d2", vec!["b", "c"])]).unwrap()
    }

    fn textnet(corpus: &Corpus, scheme: Scheme) -> Result<Textnet> {
        Textnet::new(
            corpus,
            &WeightingConfig::default().with_scheme(scheme),
            Params::default(),
        )
    }

    #[test]
    fn test_count_scenario() -> Result<()> {
        let net = textnet(&small_corpus(), Scheme::Count)?;
        let m = net.matrix();
        assert_eq!(m.get("d1", "a"), Some(2.0));
        assert_eq!(m.get("d1", "b"), Some(1.0));
        assert_eq!(m.get("d2", "b"), Some(1.0));
        assert_eq!(m.get("d2", "c"), Some(1.0));
        assert_eq!(m.get("d1", "c"), None);
        assert_eq!(m.nnz(), 4);
        assert_eq!(net.node_count(), 5);
        assert_eq!(net.edge_count(), 4);
        Ok(())
    }

    #[test]
    fn test_terms_that_never_share_a_document_stay_apart() -> Result<()> {
        for scheme in SCHEMES {
            let terms = textnet(&small_corpus(), scheme)?.project(Side::Terms)?;
            assert_eq!(terms.edge_weight("a", "c"), None, "{scheme}");
            assert_eq!(terms.edge_count(), 2, "{scheme}");
        }
        Ok(())
    }

    #[test]
    fn test_two_components_cluster_apart() -> Result<()> {
        let corpus = Corpus::new([("d1", vec!["n1", "n2"]), ("d2", vec!["n3", "n4"])])?;
        let terms = textnet(&corpus, Scheme::Count)?.project(Side::Terms)?;
        assert_eq!(terms.edge_count(), 2);

        let detectors: [&dyn CommunityDetection; 2] = [&Leiden::new(), &Louvain::new()];
        for detector in detectors {
            for resolution in [0.01, 0.1, 0.5, 1.0, 2.0, 10.0] {
                for seed in 0..5 {
                    let p = terms.cluster_with(detector, resolution, seed)?;
                    for a in ["n1", "n2"] {
                        for b in ["n3", "n4"] {
                            assert_ne!(p.cluster_of(a), p.cluster_of(b));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    #[test]
    fn test_raw_text_to_partition() -> Result<()> {
        let tokenizer = SimpleTokenizer::new().with_stop_words(["the", "a", "on"]);
        let corpus = Corpus::from_texts(
            [
                ("cats1", "The cat sat on the mat"),
                ("cats2", "A cat chased the mouse on the mat"),
                ("cats3", "Mouse and cat and mat"),
                ("cars1", "The engine of the car roared"),
                ("cars2", "A car engine needs oil"),
                ("cars3", "Oil the engine of the car"),
            ],
            &tokenizer,
        )?;
        let net = textnet(&corpus, Scheme::TfidfL2)?;
        let docs = net.project_with(&Projector::new(Side::Documents))?;
        let p = docs.backbone(1.0)?.cluster(1.0, 7)?;
        assert_eq!(p.cluster_of("cats1"), p.cluster_of("cats2"));
        assert_eq!(p.cluster_of("cars1"), p.cluster_of("cars3"));
        assert_ne!(p.cluster_of("cats1"), p.cluster_of("cars1"));
        Ok(())
    }

    #[test]
    fn test_resolution_sweep_is_reproducible() -> Result<()> {
        let corpus = Corpus::new([
            ("d1", vec!["a", "b", "c"]),
            ("d2", vec!["a", "b", "d"]),
            ("d3", vec!["c", "d", "e"]),
            ("d4", vec!["e", "f", "g"]),
            ("d5", vec!["f", "g", "h"]),
        ])?;
        let terms = textnet(&corpus, Scheme::Count)?.project(Side::Terms)?;
        for resolution in [0.5, 1.0, 2.0] {
            let a = terms.cluster(resolution, 11)?;
            let b = terms.cluster(resolution, 11)?;
            assert_eq!(a, b);
            assert!((metrics::nmi(&a, &b)? - 1.0).abs() < 1e-12);
        }
        Ok(())
    }

    fn corpus_strategy() -> impl Strategy<Value = Corpus> {
        proptest::collection::vec(proptest::collection::vec("[a-h]", 0..7), 1..9)
            .prop_filter("needs a token", |docs| docs.iter().any(|d| !d.is_empty()))
            .prop_map(|docs| {
                Corpus::new(
                    docs.into_iter()
                        .enumerate()
                        .map(|(i, tokens)| (format!("d{i}"), tokens)),
                )
                .unwrap()
            })
    }

    fn scheme_strategy() -> impl Strategy<Value = Scheme> {
        prop::sample::select(SCHEMES.to_vec())
    }

    fn side_strategy() -> impl Strategy<Value = Side> {
        prop::sample::select(vec![Side::Documents, Side::Terms])
    }

    proptest! {
        #[test]
        fn bipartite_accounts_for_every_node_and_cell(
            corpus in corpus_strategy(),
            scheme in scheme_strategy(),
        ) {
            let net = textnet(&corpus, scheme).unwrap();
            let vocabulary: HashSet<&str> = corpus
                .documents()
                .iter()
                .flat_map(|d| d.tokens.iter().map(String::as_str))
                .collect();
            prop_assert_eq!(net.node_count(), corpus.len() + vocabulary.len());
            prop_assert_eq!(net.edge_count(), net.matrix().nnz());
            prop_assert!(net.bipartite().is_bipartite());
        }

        #[test]
        fn projection_is_symmetric_and_simple(
            corpus in corpus_strategy(),
            scheme in scheme_strategy(),
            side in side_strategy(),
        ) {
            let view = textnet(&corpus, scheme).unwrap().project(side).unwrap();
            let mut pairs = HashSet::new();
            for (u, v, w) in view.edges() {
                prop_assert_ne!(u, v);
                prop_assert!(w > 0.0);
                prop_assert_eq!(view.edge_weight(u, v), view.edge_weight(v, u));
                let key = if u < v { (u, v) } else { (v, u) };
                prop_assert!(pairs.insert(key), "parallel edge {:?}", key);
            }
        }

        #[test]
        fn backbone_is_a_monotone_subgraph(
            corpus in corpus_strategy(),
            side in side_strategy(),
            a1 in 0.001f64..=1.0,
            a2 in 0.001f64..=1.0,
        ) {
            let (lo, hi) = if a1 <= a2 { (a1, a2) } else { (a2, a1) };
            let view = textnet(&corpus, Scheme::Count).unwrap().project(side).unwrap();
            let small = view.backbone(lo).unwrap();
            let large = view.backbone(hi).unwrap();

            prop_assert_eq!(small.labels(), view.labels());
            prop_assert_eq!(large.labels(), view.labels());
            let all = view.edges();
            let large_edges = large.edges();
            for e in &large_edges {
                prop_assert!(all.contains(e));
            }
            for e in small.edges() {
                prop_assert!(large_edges.contains(&e));
            }
        }

        #[test]
        fn degree_one_nodes_keep_their_edge(
            corpus in corpus_strategy(),
            side in side_strategy(),
            alpha in 0.0001f64..=1.0,
        ) {
            let view = textnet(&corpus, Scheme::Tfidf).unwrap().project(side).unwrap();
            let backbone = view.backbone(alpha).unwrap();
            let degree = view.degree();
            let kept = backbone.edges();
            let labels = view.labels();
            for e in view.edges() {
                let u = labels.iter().position(|l| *l == e.0).unwrap();
                let v = labels.iter().position(|l| *l == e.1).unwrap();
                if degree[u] == 1 || degree[v] == 1 {
                    prop_assert!(kept.contains(&e), "lost {:?}", e);
                }
            }
        }

        #[test]
        fn tiny_alpha_keeps_only_degree_one_edges(
            corpus in corpus_strategy(),
            side in side_strategy(),
        ) {
            let view = textnet(&corpus, Scheme::Count).unwrap().project(side).unwrap();
            let backbone = view.backbone(1e-12).unwrap();
            let degree = view.degree();
            let labels = view.labels();
            for e in backbone.edges() {
                let u = labels.iter().position(|l| *l == e.0).unwrap();
                let v = labels.iter().position(|l| *l == e.1).unwrap();
                prop_assert!(degree[u] == 1 || degree[v] == 1, "kept {:?}", e);
            }
            let leaf_edges = view
                .edges()
                .into_iter()
                .filter(|e| {
                    let u = labels.iter().position(|l| *l == e.0).unwrap();
                    let v = labels.iter().position(|l| *l == e.1).unwrap();
                    degree[u] == 1 || degree[v] == 1
                })
                .count();
            prop_assert_eq!(backbone.edge_count(), leaf_edges);
        }

        #[test]
        fn alpha_one_is_the_identity(
            corpus in corpus_strategy(),
            scheme in scheme_strategy(),
            side in side_strategy(),
        ) {
            let view = textnet(&corpus, scheme).unwrap().project(side).unwrap();
            let backbone = view.backbone(1.0).unwrap();
            prop_assert_eq!(backbone.edges(), view.edges());
        }

        #[test]
        fn partitions_are_total(
            corpus in corpus_strategy(),
            side in side_strategy(),
            resolution in 0.05f64..5.0,
            seed in any::<u64>(),
        ) {
            let view = textnet(&corpus, Scheme::Count).unwrap().project(side).unwrap();
            let p = view.cluster(resolution, seed).unwrap();
            prop_assert_eq!(p.len(), view.node_count());
            let used: HashSet<usize> = p.membership().iter().copied().collect();
            prop_assert_eq!(used.len(), p.n_clusters());
            prop_assert!(p.membership().iter().all(|&c| c < p.n_clusters()));
            prop_assert_eq!(p.sizes().iter().sum::<usize>(), view.node_count());
        }
    }
}
