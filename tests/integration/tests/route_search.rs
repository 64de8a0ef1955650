//! Integration test: channel map JSON through graph building, best-path
//! search, analysis and top-k ranking.

use lnpath_core::{forwarding_fee, parse_channel_map, ChannelMap, ChannelRecord, Metric, Policy};
use lnpath_integration_tests::{diamond_json, fan_map, node, AMOUNT_MSAT};
use lnpath_routing::{
    analyze, ChannelGraph, GraphBuilder, NotFoundReason, Outcome, PathFinder, StopReason,
    TopKConfig, TopKSearch,
};

fn diamond() -> ChannelGraph {
    let records = parse_channel_map(&diamond_json()).expect("diamond parses");
    GraphBuilder::new(AMOUNT_MSAT).build(&records)
}

fn names(path: &[lnpath_core::NodeId]) -> Vec<&str> {
    path.iter().map(|n| n.as_str()).collect()
}

// =========================================================================
// Graph construction from exported JSON
// =========================================================================

#[test]
fn test_diamond_json_builds_expected_edges() {
    let records = parse_channel_map(&diamond_json()).unwrap();
    // The record with a malformed capacity is dropped while parsing.
    assert_eq!(records[&node("C")].len(), 2);

    let (graph, stats) = GraphBuilder::new(AMOUNT_MSAT).build_with_stats(&records);
    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 4);
    assert_eq!(stats.skipped_no_policy, 1);
    assert_eq!(stats.skipped_disabled, 1);

    let ab = graph.edge("A", "B").unwrap();
    assert_eq!(ab.fee_base_msat, 100);
    assert_eq!(ab.time_lock_delta, 10);
    assert_eq!(ab.capacity_sat, 2000);
    // Only the owner's policy creates an edge.
    assert!(graph.edge("B", "A").is_none());
    assert!(graph.edge("C", "A").is_none());
}

#[test]
fn test_capacity_boundary() {
    let mut records = ChannelMap::new();
    records.insert(
        node("x"),
        vec![
            ChannelRecord::new("small", 999, Some(Policy::enabled(0, 0, 10))),
            ChannelRecord::new("exact", 1000, Some(Policy::enabled(0, 0, 10))),
        ],
    );
    let graph = GraphBuilder::new(1_000_000).build(&records);

    assert!(graph.edge("x", "small").is_none());
    assert!(graph.edge("x", "exact").is_some());
    assert!(!graph.contains("small"));
}

#[test]
fn test_fee_formula_through_the_graph() {
    assert_eq!(forwarding_fee(1000, 1, 1_000_000), 1001);

    let mut records = ChannelMap::new();
    records.insert(
        node("x"),
        vec![ChannelRecord::new("y", 5000, Some(Policy::enabled(1000, 1, 40)))],
    );
    let graph = GraphBuilder::new(1_000_000).build(&records);

    assert_eq!(graph.edge("x", "y").unwrap().weight_fee, 1001);
    let candidate = analyze(&graph, &[node("x"), node("y")], 1_000_000).unwrap();
    assert_eq!(candidate.total_fee_msat(), 1001);
}

#[test]
fn test_parallel_channels_keep_the_last_record() {
    let mut records = ChannelMap::new();
    records.insert(
        node("x"),
        vec![
            ChannelRecord::new("y", 5000, Some(Policy::enabled(10, 0, 40))),
            ChannelRecord::new("y", 8000, Some(Policy::enabled(70, 0, 18))),
        ],
    );
    let (graph, stats) = GraphBuilder::new(AMOUNT_MSAT).build_with_stats(&records);

    assert_eq!(stats.overwritten, 1);
    let edge = graph.edge("x", "y").unwrap();
    assert_eq!(edge.fee_base_msat, 70);
    assert_eq!(edge.capacity_sat, 8000);
}

// =========================================================================
// Best-path search
// =========================================================================

#[test]
fn test_diamond_best_paths() {
    let graph = diamond();
    let finder = PathFinder::new(&graph);

    let by_fee = finder
        .find_best(&node("A"), &node("D"), AMOUNT_MSAT, Metric::Fee)
        .unwrap()
        .found()
        .expect("fee path");
    assert_eq!(names(by_fee.path()), vec!["A", "C", "D"]);
    assert_eq!(by_fee.total_fee_msat(), 20);
    assert_eq!(by_fee.total_timelock(), 80);

    let by_timelock = finder
        .find_best(&node("A"), &node("D"), AMOUNT_MSAT, Metric::Timelock)
        .unwrap()
        .found()
        .expect("timelock path");
    assert_eq!(names(by_timelock.path()), vec!["A", "B", "D"]);
    assert_eq!(by_timelock.total_timelock(), 30);
    assert_eq!(by_timelock.total_fee_msat(), 150);
    assert_eq!(by_timelock.min_capacity_sat(), 2000);

    let by_hops = finder
        .find_best(&node("A"), &node("D"), AMOUNT_MSAT, Metric::Hop)
        .unwrap()
        .found()
        .expect("hop path");
    assert_eq!(by_hops.hops(), 2);
}

#[test]
fn test_diamond_best_for_every_metric() {
    let graph = diamond();
    let best = PathFinder::new(&graph)
        .find_best_all(&node("A"), &node("D"), AMOUNT_MSAT)
        .unwrap();

    assert_eq!(best.fee_min.unwrap().total_fee_msat(), 20);
    assert_eq!(best.timelock_min.unwrap().total_timelock(), 30);
    assert_eq!(best.hop_min.unwrap().hops(), 2);
}

#[test]
fn test_not_found_outcomes_are_distinct() {
    let graph = diamond();
    let finder = PathFinder::new(&graph);

    let unknown = finder
        .find_best(&node("A"), &node("Z"), AMOUNT_MSAT, Metric::Fee)
        .unwrap();
    assert_eq!(
        unknown.not_found_reason(),
        Some(&NotFoundReason::UnknownNode(node("Z")))
    );

    // D has no usable outgoing channel.
    let unreachable = finder
        .find_best(&node("D"), &node("A"), AMOUNT_MSAT, Metric::Fee)
        .unwrap();
    assert_eq!(unreachable.not_found_reason(), Some(&NotFoundReason::NoPath));
}

#[test]
fn test_analyze_agrees_with_search() {
    let graph = diamond();
    let found = PathFinder::new(&graph)
        .find_best(&node("A"), &node("D"), AMOUNT_MSAT, Metric::Fee)
        .unwrap()
        .found()
        .unwrap();

    let again = analyze(&graph, found.path(), AMOUNT_MSAT).unwrap();
    assert_eq!(again, found);
}

// =========================================================================
// Top-k search
// =========================================================================

#[test]
fn test_diamond_topk_rankings() {
    let graph = diamond();
    let outcome = TopKSearch::with_defaults(&graph)
        .search(&node("A"), &node("D"), AMOUNT_MSAT)
        .unwrap();
    let Outcome::Found(paths) = outcome else {
        panic!("expected rankings, got {outcome:?}");
    };

    let fees: Vec<u64> = paths.by_fee.iter().map(|c| c.total_fee_msat()).collect();
    assert_eq!(fees, vec![20, 150]);
    let timelocks: Vec<u32> = paths.by_timelock.iter().map(|c| c.total_timelock()).collect();
    assert_eq!(timelocks, vec![30, 80]);
    assert_eq!(paths.by_hops.len(), 2);
    assert_eq!(paths.stats.stop_reason, StopReason::Exhausted);
}

#[test]
fn test_early_stop_after_first_non_improving_path() {
    let graph = GraphBuilder::new(AMOUNT_MSAT).build(&fan_map());
    let config = TopKConfig {
        k: 10,
        max_hop: 10,
        max_no_improve: 1,
        primary_metric: Metric::Fee,
    };

    let paths = TopKSearch::new(&graph, config)
        .search(&node("s"), &node("t"), AMOUNT_MSAT)
        .unwrap()
        .found()
        .unwrap();

    assert_eq!(paths.stats.paths_checked, 2);
    assert_eq!(paths.stats.stop_reason, StopReason::NoImprovement);

    // Only the two cheapest routes (via a, then via b) were seen, so the
    // route via c with timelock 20 never reached the timelock ranking.
    let timelocks: Vec<u32> = paths.by_timelock.iter().map(|c| c.total_timelock()).collect();
    assert_eq!(timelocks, vec![100, 180]);
}

#[test]
fn test_timelock_primary_finds_global_timelock_order() {
    let graph = GraphBuilder::new(AMOUNT_MSAT).build(&fan_map());
    let config = TopKConfig {
        k: 2,
        primary_metric: Metric::Timelock,
        ..TopKConfig::default()
    };

    let paths = TopKSearch::new(&graph, config)
        .search(&node("s"), &node("t"), AMOUNT_MSAT)
        .unwrap()
        .found()
        .unwrap();

    let timelocks: Vec<u32> = paths.by_timelock.iter().map(|c| c.total_timelock()).collect();
    assert_eq!(timelocks, vec![20, 60]);
}

#[test]
fn test_topk_json_shape() {
    let graph = diamond();
    let paths = TopKSearch::with_defaults(&graph)
        .search(&node("A"), &node("D"), AMOUNT_MSAT)
        .unwrap()
        .found()
        .unwrap();

    let json = serde_json::to_value(&paths).unwrap();
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 3);
    assert_eq!(json["by_fee"][0]["path"], serde_json::json!(["A", "C", "D"]));
    assert_eq!(json["by_timelock"][0]["total_timelock"], 30);
    assert!(json["by_hops"].is_array());
}
