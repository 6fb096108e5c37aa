//! Property tests over randomly generated edge lists.

use proptest::prelude::*;
use std::collections::HashSet;

use netcentra_core::correlation::{PearsonEngine, correlation_matrix};
use netcentra_core::graph::build::RawGraph;
use netcentra_core::graph::normalize::SimpleGraph;
use netcentra_core::graph::stats::BasicStats;
use netcentra_core::metrics::betweenness::BetweennessMode;
use netcentra_core::metrics::pagerank::{PageRankConfig, pagerank};
use netcentra_core::metrics::{Measure, NetworkCentrality, compute_centralities};
use netcentra_core::progress::SilentObserver;

/// Up to 40 edges over a pool of 12 node ids, self-loops and repeats allowed.
fn arb_edges() -> impl Strategy<Value = Vec<(u8, u8, f64)>> {
    prop::collection::vec((0u8..12, 0u8..12, 0.5f64..5.0), 0..40)
}

fn build(edges: &[(u8, u8, f64)], directed: bool) -> SimpleGraph {
    let mut raw = RawGraph::new(directed);
    for (a, b, w) in edges {
        raw.add_edge(&a.to_string(), &b.to_string(), *w);
    }
    SimpleGraph::from_raw(raw).0
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn cleaned_graph_is_simple(edges in arb_edges(), directed in any::<bool>()) {
        let g = build(&edges, directed);
        let mut seen = HashSet::new();

        for e in g.graph.edge_indices() {
            let (a, b) = g.graph.edge_endpoints(e).expect("endpoints");
            prop_assert_ne!(a, b, "self-loop survived cleaning");
            let key = if directed || a < b { (a, b) } else { (b, a) };
            prop_assert!(seen.insert(key), "duplicate edge {:?}", key);
        }
    }

    #[test]
    fn cleaning_is_idempotent(edges in arb_edges(), directed in any::<bool>()) {
        let g = build(&edges, directed);
        let (again, report) = SimpleGraph::from_raw(g.clone().into_raw());
        prop_assert!(report.is_noop());
        prop_assert_eq!(again.edge_count(), g.edge_count());
        prop_assert_eq!(again.node_count(), g.node_count());
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn average_degree_and_density(edges in arb_edges(), directed in any::<bool>()) {
        let g = build(&edges, directed);
        let (stats, degrees) = BasicStats::from_graph(&g);

        if stats.num_nodes == 0 {
            prop_assert_eq!(stats.avg_degree, 0.0);
        } else {
            let expected = degrees.iter().sum::<usize>() as f64 / stats.num_nodes as f64;
            prop_assert!((stats.avg_degree - expected).abs() < 1e-12);
        }
        if stats.num_nodes >= 2 {
            prop_assert!((0.0..=1.0).contains(&stats.density), "density {}", stats.density);
        }
    }

    #[test]
    fn pagerank_sums_to_one(edges in arb_edges(), directed in any::<bool>()) {
        let g = build(&edges, directed);
        prop_assume!(g.node_count() > 0);

        let result = pagerank(&g, &PageRankConfig::default());
        let total: f64 = result.scores.iter().sum();
        prop_assert!((total - 1.0).abs() < 1e-6, "sum = {}", total);
        prop_assert!(result.scores.iter().all(|s| *s > 0.0));
    }

    #[test]
    fn correlation_symmetric_unit_diagonal(edges in arb_edges(), directed in any::<bool>()) {
        let g = build(&edges, directed);
        let table = compute_centralities(
            &g,
            &NetworkCentrality::default(),
            BetweennessMode::Exact,
            &mut SilentObserver,
        );
        let m = correlation_matrix(&table, &PearsonEngine);

        for a in Measure::ALL {
            prop_assert_eq!(m.get(a, a), 1.0);
            for b in Measure::ALL {
                let (ab, ba) = (m.get(a, b), m.get(b, a));
                prop_assert!(ab == ba || (ab.is_nan() && ba.is_nan()));
                prop_assert!(ab.is_nan() || (-1.0..=1.0).contains(&ab));
            }
        }
    }

    #[test]
    fn top_n_is_sorted_and_bounded(edges in arb_edges(), n in 0usize..15) {
        let g = build(&edges, false);
        let table = compute_centralities(
            &g,
            &NetworkCentrality::default(),
            BetweennessMode::Exact,
            &mut SilentObserver,
        );

        for measure in Measure::ALL {
            let top = table.top_n(measure, n);
            prop_assert_eq!(top.len(), n.min(table.len()));
            prop_assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
        }
    }
}
