//! Integration test: search results checked against exhaustive enumeration
//! on seeded random graphs.

use std::collections::HashSet;

use lnpath_core::{Metric, NodeId};
use lnpath_integration_tests::{all_simple_paths, fan_map, node, path_weight, random_map, AMOUNT_MSAT};
use lnpath_routing::{
    ChannelGraph, GraphBuilder, NotFoundReason, PathFinder, SimplePaths, StopReason, TopKConfig,
    TopKSearch,
};

const SEEDS: std::ops::Range<u64> = 0..12;

fn random_graph(seed: u64) -> ChannelGraph {
    GraphBuilder::new(AMOUNT_MSAT).build(&random_map(seed, 8, 3))
}

/// Ordered pairs of distinct nodes in the graph.
fn pairs(graph: &ChannelGraph) -> Vec<(NodeId, NodeId)> {
    let nodes: Vec<NodeId> = graph.nodes().cloned().collect();
    nodes
        .iter()
        .flat_map(|s| nodes.iter().map(move |t| (s.clone(), t.clone())))
        .filter(|(s, t)| s != t)
        .collect()
}

// =========================================================================
// Optimality and determinism of best-path search
// =========================================================================

#[test]
fn test_best_path_is_optimal() {
    for seed in SEEDS {
        let graph = random_graph(seed);
        let finder = PathFinder::new(&graph);

        for (s, t) in pairs(&graph) {
            let every = all_simple_paths(&graph, &s, &t);
            for metric in Metric::ALL {
                let outcome = finder.find_best(&s, &t, AMOUNT_MSAT, metric).unwrap();
                let Some(optimum) = every.iter().map(|p| path_weight(&graph, p, metric)).min() else {
                    assert_eq!(
                        outcome.not_found_reason(),
                        Some(&NotFoundReason::NoPath),
                        "seed {seed}: {s} -> {t} should be unreachable"
                    );
                    continue;
                };

                let best = outcome.found().expect("reachable pair has a path");
                assert_eq!(
                    best.metric(metric),
                    optimum,
                    "seed {seed}: {s} -> {t} by {metric}"
                );
                assert_eq!(path_weight(&graph, best.path(), metric), optimum);
                assert_eq!(best.path().first(), Some(&s));
                assert_eq!(best.path().last(), Some(&t));
            }
        }
    }
}

#[test]
fn test_best_path_is_deterministic() {
    for seed in SEEDS {
        let records = random_map(seed, 8, 3);
        let first = GraphBuilder::new(AMOUNT_MSAT).build(&records);
        let second = GraphBuilder::new(AMOUNT_MSAT).build(&records);

        for (s, t) in pairs(&first) {
            for metric in Metric::ALL {
                let a = PathFinder::new(&first).find_best(&s, &t, AMOUNT_MSAT, metric).unwrap();
                let b = PathFinder::new(&second).find_best(&s, &t, AMOUNT_MSAT, metric).unwrap();
                let again = PathFinder::new(&first).find_best(&s, &t, AMOUNT_MSAT, metric).unwrap();
                assert_eq!(a, b, "seed {seed}: {s} -> {t} by {metric}");
                assert_eq!(a, again);
            }
        }
    }
}

// =========================================================================
// Loopless path enumeration
// =========================================================================

#[test]
fn test_enumeration_matches_exhaustive_search() {
    for seed in SEEDS {
        let graph = random_graph(seed);

        for (s, t) in pairs(&graph) {
            let expected: HashSet<Vec<NodeId>> = all_simple_paths(&graph, &s, &t).into_iter().collect();
            let listed: Vec<_> = SimplePaths::new(&graph, &s, &t, Metric::Fee).unwrap().collect();

            let distinct: HashSet<Vec<NodeId>> = listed.iter().map(|p| p.nodes.clone()).collect();
            assert_eq!(distinct.len(), listed.len(), "seed {seed}: duplicate path");
            assert_eq!(distinct, expected, "seed {seed}: {s} -> {t}");

            for path in &listed {
                assert_eq!(path.weight, path_weight(&graph, &path.nodes, Metric::Fee));
            }
            for window in listed.windows(2) {
                assert!(window[0].weight <= window[1].weight, "seed {seed}: order");
            }
        }
    }
}

// =========================================================================
// Top-k rankings
// =========================================================================

#[test]
fn test_exhaustive_topk_is_global_topk() {
    let k = 4;
    for seed in SEEDS {
        let graph = random_graph(seed);
        let config = TopKConfig {
            k,
            max_hop: 20,
            max_no_improve: usize::MAX,
            primary_metric: Metric::Fee,
        };
        let search = TopKSearch::new(&graph, config);

        for (s, t) in pairs(&graph) {
            let every = all_simple_paths(&graph, &s, &t);
            let Some(paths) = search.search(&s, &t, AMOUNT_MSAT).unwrap().found() else {
                assert!(every.is_empty());
                continue;
            };
            assert_eq!(paths.stats.stop_reason, StopReason::Exhausted);
            assert_eq!(paths.stats.paths_checked, every.len());

            for metric in Metric::ALL {
                let ranking = paths.ranking(metric);
                assert!(ranking.len() <= k);

                let mut expected: Vec<u64> =
                    every.iter().map(|p| path_weight(&graph, p, metric)).collect();
                expected.sort_unstable();
                expected.truncate(k);

                let actual: Vec<u64> = ranking.iter().map(|c| c.metric(metric)).collect();
                assert_eq!(actual, expected, "seed {seed}: {s} -> {t} by {metric}");
            }
        }
    }
}

#[test]
fn test_topk_respects_bounds() {
    for seed in SEEDS {
        let graph = random_graph(seed);
        let config = TopKConfig {
            k: 2,
            max_hop: 3,
            max_no_improve: 5,
            primary_metric: Metric::Fee,
        };
        let search = TopKSearch::new(&graph, config);

        for (s, t) in pairs(&graph) {
            let Some(paths) = search.search(&s, &t, AMOUNT_MSAT).unwrap().found() else {
                continue;
            };
            for metric in Metric::ALL {
                let ranking = paths.ranking(metric);
                assert!(ranking.len() <= 2);
                assert!(ranking.iter().all(|c| c.hops() <= 3));
                let values: Vec<u64> = ranking.iter().map(|c| c.metric(metric)).collect();
                assert!(values.windows(2).all(|w| w[0] <= w[1]));
            }
        }
    }
}

// =========================================================================
// Shared graph across threads
// =========================================================================

#[test]
fn test_concurrent_searches_share_one_graph() {
    let graph = GraphBuilder::new(AMOUNT_MSAT).build(&fan_map());
    let expected = TopKSearch::with_defaults(&graph)
        .search(&node("s"), &node("t"), AMOUNT_MSAT)
        .unwrap()
        .found()
        .unwrap();
    let expected_json = serde_json::to_string(&expected).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let graph = &graph;
                scope.spawn(move || {
                    let metric = Metric::ALL[i % Metric::ALL.len()];
                    let best = PathFinder::new(graph)
                        .find_best(&node("s"), &node("t"), AMOUNT_MSAT, metric)
                        .unwrap()
                        .found()
                        .unwrap();
                    let ranked = TopKSearch::with_defaults(graph)
                        .search(&node("s"), &node("t"), AMOUNT_MSAT)
                        .unwrap()
                        .found()
                        .unwrap();
                    (metric, best, serde_json::to_string(&ranked).unwrap())
                })
            })
            .collect();

        for handle in handles {
            let (metric, best, ranked_json) = handle.join().unwrap();
            assert_eq!(ranked_json, expected_json);
            let want = match metric {
                Metric::Fee => 2,
                Metric::Hop => 1,
                Metric::Timelock => 20,
            };
            assert_eq!(best.metric(metric), want);
        }
    });
}
