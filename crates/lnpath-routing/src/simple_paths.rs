//! Lazy enumeration of loopless paths in non-decreasing weight order.
//!
//! This is Yen's k-shortest-paths algorithm driven one path at a time. After
//! a path has been handed out, the next call to [`Iterator::next`] derives
//! its deviations: for every spur node along it, the edges that earlier
//! paths with the same root take out of the spur are hidden, the root's
//! other nodes are hidden, and a shortest path is searched from the spur to
//! the target. Each `root + spur path` goes into one candidate heap shared
//! by the whole enumeration; the cheapest candidate is the next path.
//!
//! Nothing is computed ahead of demand, so a caller can stop pulling paths
//! at any point.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use lnpath_core::{Metric, NodeId};

use crate::graph::{ChannelGraph, NodeIdx};
use crate::outcome::NotFoundReason;
use crate::pathfinder::{resolve_endpoints, shortest_path, Exclusions};

/// A path and its total weight under the enumeration metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedPath {
    pub weight: u64,
    pub nodes: Vec<NodeId>,
}

/// Iterator over the simple paths between two nodes, cheapest first.
///
/// Queued candidates of equal weight are taken in node-id sequence order, so
/// the enumeration order is fixed for a given graph.
pub struct SimplePaths<'g> {
    graph: &'g ChannelGraph,
    source: NodeIdx,
    target: NodeIdx,
    metric: Metric,
    /// Paths already handed out, in order.
    yielded: Vec<Vec<NodeIdx>>,
    /// Deviation candidates keyed by `(weight, nodes)`, smallest first.
    candidates: BinaryHeap<Reverse<(u64, Vec<NodeIdx>)>>,
    /// Every path ever queued or yielded.
    known: HashSet<Vec<NodeIdx>>,
    exclusions: Exclusions,
    exhausted: bool,
}

impl<'g> SimplePaths<'g> {
    /// Enumerate paths from `source` to `target` ordered by `metric`.
    ///
    /// A node has no route to itself: with `source == target` the iterator
    /// is empty.
    pub fn new(
        graph: &'g ChannelGraph,
        source: &NodeId,
        target: &NodeId,
        metric: Metric,
    ) -> Result<Self, NotFoundReason> {
        let (s, t) = resolve_endpoints(graph, source, target)?;
        Ok(Self::from_indices(graph, s, t, metric))
    }

    pub(crate) fn from_indices(
        graph: &'g ChannelGraph,
        source: NodeIdx,
        target: NodeIdx,
        metric: Metric,
    ) -> Self {
        Self {
            graph,
            source,
            target,
            metric,
            yielded: Vec::new(),
            candidates: BinaryHeap::new(),
            known: HashSet::new(),
            exclusions: Exclusions::new(graph.node_count()),
            exhausted: source == target,
        }
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Number of paths handed out so far.
    pub fn yielded_count(&self) -> usize {
        self.yielded.len()
    }

    pub(crate) fn next_indexed(&mut self) -> Option<(u64, Vec<NodeIdx>)> {
        if self.exhausted {
            return None;
        }

        if self.yielded.is_empty() {
            let Some((weight, path)) =
                shortest_path(self.graph, self.source, self.target, self.metric, None)
            else {
                self.exhausted = true;
                return None;
            };
            self.known.insert(path.clone());
            self.yielded.push(path.clone());
            return Some((weight, path));
        }

        self.queue_deviations();

        match self.candidates.pop() {
            Some(Reverse((weight, path))) => {
                self.yielded.push(path.clone());
                Some((weight, path))
            }
            None => {
                self.exhausted = true;
                None
            }
        }
    }

    /// Queue the deviations of the most recently yielded path.
    fn queue_deviations(&mut self) {
        let Some(last) = self.yielded.last().cloned() else {
            return;
        };

        let mut root_weight = 0u64;
        for spur_pos in 0..last.len() - 1 {
            let spur = last[spur_pos];
            let root = &last[..=spur_pos];

            self.exclusions.clear();
            for path in &self.yielded {
                if path.len() > spur_pos + 1 && path[..=spur_pos] == *root {
                    self.exclusions.exclude_edge(path[spur_pos], path[spur_pos + 1]);
                }
            }
            for &node in &root[..spur_pos] {
                self.exclusions.exclude_node(node);
            }

            if let Some((spur_weight, spur_path)) = shortest_path(
                self.graph,
                spur,
                self.target,
                self.metric,
                Some(&self.exclusions),
            ) {
                let mut candidate = root[..spur_pos].to_vec();
                candidate.extend(spur_path);
                if self.known.insert(candidate.clone()) {
                    let weight = root_weight.saturating_add(spur_weight);
                    self.candidates.push(Reverse((weight, candidate)));
                }
            }

            let step = self
                .graph
                .edge_between(spur, last[spur_pos + 1])
                .map_or(0, |edge| edge.weight(self.metric));
            root_weight = root_weight.saturating_add(step);
        }
    }
}

impl Iterator for SimplePaths<'_> {
    type Item = WeightedPath;

    fn next(&mut self) -> Option<Self::Item> {
        let (weight, path) = self.next_indexed()?;
        Some(WeightedPath {
            weight,
            nodes: path
                .into_iter()
                .map(|idx| self.graph.node_id(idx).clone())
                .collect(),
        })
    }
}
