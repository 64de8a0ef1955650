use lnpath_core::NodeId;
use serde::Serialize;
use tracing::debug;

use crate::graph::{ChannelGraph, NodeIdx};

/// A node pair picked by [`most_connected_pair`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectedPair {
    pub source: NodeId,
    pub target: NodeId,
    /// Simple paths from `source` to `target` within the hop cutoff.
    pub path_count: usize,
}

/// Find a node pair with many, but not too many, routes between them.
///
/// Looks at the first `max_pairs` pairs `(u, v)` with `u` before `v` in id
/// order and counts simple paths `u -> v` of at most `cutoff` hops. Returns
/// the pair with the most paths among those with fewer than
/// `max_path_limit`; the first such pair wins ties.
pub fn most_connected_pair(
    graph: &ChannelGraph,
    max_pairs: usize,
    max_path_limit: usize,
    cutoff: usize,
) -> Option<ConnectedPair> {
    let n = graph.node_count();
    let pairs = (0..n)
        .flat_map(|u| (u + 1..n).map(move |v| (u, v)))
        .take(max_pairs);

    let mut on_path = vec![false; n];
    let mut best: Option<(NodeIdx, NodeIdx, usize)> = None;

    for (u, v) in pairs {
        let count = count_simple_paths(graph, u, v, cutoff, max_path_limit, &mut on_path);
        let best_count = best.map_or(0, |(_, _, c)| c);
        if count > best_count && count < max_path_limit {
            best = Some((u, v, count));
        }
    }

    let (u, v, path_count) = best?;
    debug!(
        source = %graph.node_id(u),
        target = %graph.node_id(v),
        path_count,
        "picked most connected pair"
    );
    Some(ConnectedPair {
        source: graph.node_id(u).clone(),
        target: graph.node_id(v).clone(),
        path_count,
    })
}

/// Count simple paths of at most `cutoff` hops, stopping once `limit` is hit.
fn count_simple_paths(
    graph: &ChannelGraph,
    source: NodeIdx,
    target: NodeIdx,
    cutoff: usize,
    limit: usize,
    on_path: &mut [bool],
) -> usize {
    let mut count = 0;
    if cutoff == 0 || limit == 0 {
        return count;
    }
    on_path[source] = true;
    walk(graph, source, target, cutoff, limit, on_path, &mut count);
    on_path[source] = false;
    count
}

fn walk(
    graph: &ChannelGraph,
    node: NodeIdx,
    target: NodeIdx,
    hops_left: usize,
    limit: usize,
    on_path: &mut [bool],
    count: &mut usize,
) {
    for edge in graph.out_edges(node) {
        if *count >= limit {
            return;
        }
        let next = edge.target;
        if next == target {
            *count += 1;
            continue;
        }
        if on_path[next] || hops_left <= 1 {
            continue;
        }
        on_path[next] = true;
        walk(graph, next, target, hops_left - 1, limit, on_path, count);
        on_path[next] = false;
    }
}
