use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use lnpath_core::{Metric, NodeId};
use serde::Serialize;
use tracing::debug;

use crate::analyzer::{analyze_indices, PathCandidate};
use crate::error::RoutingError;
use crate::graph::{ChannelGraph, NodeIdx};
use crate::outcome::{NotFoundReason, Outcome};

/// Nodes and edges hidden from a single shortest-path run.
#[derive(Debug)]
pub(crate) struct Exclusions {
    nodes: Vec<bool>,
    marked: Vec<NodeIdx>,
    edges: HashSet<(NodeIdx, NodeIdx)>,
}

impl Exclusions {
    pub(crate) fn new(node_count: usize) -> Self {
        Self {
            nodes: vec![false; node_count],
            marked: Vec::new(),
            edges: HashSet::new(),
        }
    }

    pub(crate) fn exclude_node(&mut self, node: NodeIdx) {
        if !self.nodes[node] {
            self.nodes[node] = true;
            self.marked.push(node);
        }
    }

    pub(crate) fn exclude_edge(&mut self, from: NodeIdx, to: NodeIdx) {
        self.edges.insert((from, to));
    }

    pub(crate) fn clear(&mut self) {
        for node in self.marked.drain(..) {
            self.nodes[node] = false;
        }
        self.edges.clear();
    }

    fn hides(&self, from: NodeIdx, to: NodeIdx) -> bool {
        self.nodes[to] || self.edges.contains(&(from, to))
    }
}

/// Dijkstra from `source` to `target` under `metric`.
///
/// Returns the total weight and the node sequence. The frontier is ordered by
/// `(distance, node handle)` and neighbours are relaxed in handle order; a
/// node's predecessor only changes on a strictly shorter distance. Handles
/// follow node-id order, so among equal-weight paths the result is fixed for
/// a given graph.
pub(crate) fn shortest_path(
    graph: &ChannelGraph,
    source: NodeIdx,
    target: NodeIdx,
    metric: Metric,
    exclusions: Option<&Exclusions>,
) -> Option<(u64, Vec<NodeIdx>)> {
    let n = graph.node_count();
    let mut dist: Vec<Option<u64>> = vec![None; n];
    let mut pred: Vec<Option<NodeIdx>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut frontier = BinaryHeap::new();

    dist[source] = Some(0);
    frontier.push(Reverse((0u64, source)));

    while let Some(Reverse((d, node))) = frontier.pop() {
        if settled[node] {
            continue;
        }
        settled[node] = true;
        if node == target {
            break;
        }

        for edge in graph.out_edges(node) {
            let next = edge.target;
            if settled[next] || exclusions.is_some_and(|ex| ex.hides(node, next)) {
                continue;
            }
            let candidate = d.saturating_add(edge.weight(metric));
            if dist[next].map_or(true, |current| candidate < current) {
                dist[next] = Some(candidate);
                pred[next] = Some(node);
                frontier.push(Reverse((candidate, next)));
            }
        }
    }

    if !settled[target] {
        return None;
    }

    let mut path = vec![target];
    let mut cursor = target;
    while let Some(prev) = pred[cursor] {
        path.push(prev);
        cursor = prev;
    }
    path.reverse();

    dist[target].map(|total| (total, path))
}

/// Reject queries no search can answer meaningfully.
pub(crate) fn validate_query(
    source: &NodeId,
    target: &NodeId,
    payment_amount_msat: u64,
) -> Result<(), RoutingError> {
    if payment_amount_msat == 0 {
        return Err(RoutingError::InvalidQuery(
            "payment amount must be positive".into(),
        ));
    }
    if source == target {
        return Err(RoutingError::InvalidQuery(format!(
            "source and target are the same node ({source})"
        )));
    }
    Ok(())
}

/// Look up both endpoints, source first.
pub(crate) fn resolve_endpoints(
    graph: &ChannelGraph,
    source: &NodeId,
    target: &NodeId,
) -> Result<(NodeIdx, NodeIdx), NotFoundReason> {
    let s = graph
        .index_of(source.as_str())
        .ok_or_else(|| NotFoundReason::UnknownNode(source.clone()))?;
    let t = graph
        .index_of(target.as_str())
        .ok_or_else(|| NotFoundReason::UnknownNode(target.clone()))?;
    Ok((s, t))
}

/// Best path per metric, as produced by [`PathFinder::find_best_all`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BestPaths {
    pub fee_min: Option<PathCandidate>,
    pub hop_min: Option<PathCandidate>,
    pub timelock_min: Option<PathCandidate>,
}

/// Single-criterion route search over a built [`ChannelGraph`].
pub struct PathFinder<'g> {
    graph: &'g ChannelGraph,
}

impl<'g> PathFinder<'g> {
    pub fn new(graph: &'g ChannelGraph) -> Self {
        Self { graph }
    }

    /// Minimum-weight path from `source` to `target` under `metric`.
    ///
    /// Unknown endpoints and unreachable targets are reported as
    /// [`Outcome::NotFound`]. Errors are reserved for invalid queries and
    /// internal invariant violations.
    pub fn find_best(
        &self,
        source: &NodeId,
        target: &NodeId,
        payment_amount_msat: u64,
        metric: Metric,
    ) -> Result<Outcome<PathCandidate>, RoutingError> {
        validate_query(source, target, payment_amount_msat)?;

        let (s, t) = match resolve_endpoints(self.graph, source, target) {
            Ok(endpoints) => endpoints,
            Err(reason) => {
                debug!(%source, %target, %reason, "best-path lookup skipped");
                return Ok(Outcome::NotFound(reason));
            }
        };

        let Some((weight, nodes)) = shortest_path(self.graph, s, t, metric, None) else {
            debug!(%source, %target, %metric, "no path");
            return Ok(Outcome::NotFound(NotFoundReason::NoPath));
        };

        let candidate = analyze_indices(self.graph, &nodes, payment_amount_msat)?;
        debug!(
            %source,
            %target,
            %metric,
            weight,
            hops = candidate.hops(),
            "found best path"
        );
        Ok(Outcome::Found(candidate))
    }

    /// Best path for each of fee, hop count and timelock.
    pub fn find_best_all(
        &self,
        source: &NodeId,
        target: &NodeId,
        payment_amount_msat: u64,
    ) -> Result<BestPaths, RoutingError> {
        Ok(BestPaths {
            fee_min: self
                .find_best(source, target, payment_amount_msat, Metric::Fee)?
                .found(),
            hop_min: self
                .find_best(source, target, payment_amount_msat, Metric::Hop)?
                .found(),
            timelock_min: self
                .find_best(source, target, payment_amount_msat, Metric::Timelock)?
                .found(),
        })
    }
}
