use std::collections::{BTreeMap, BTreeSet, HashMap};

use lnpath_core::{forwarding_fee, ChannelMap, Metric, NodeId};
use serde::Serialize;
use tracing::{debug, warn};

/// Internal dense node handle. Handles follow node-id order.
pub(crate) type NodeIdx = usize;

const SAT_PER_BTC: f64 = 100_000_000.0;

/// A directed channel direction that can carry the payment the graph was
/// built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub(crate) target: NodeIdx,
    pub fee_base_msat: u64,
    pub fee_rate_millionths: u64,
    pub time_lock_delta: u32,
    pub capacity_sat: u64,
    /// Fee for the build-time payment amount.
    pub weight_fee: u64,
    pub weight_timelock: u64,
}

impl Edge {
    /// Every hop weighs the same.
    pub const WEIGHT_HOP: u64 = 1;

    /// Search weight of this edge under `metric`.
    pub fn weight(&self, metric: Metric) -> u64 {
        match metric {
            Metric::Fee => self.weight_fee,
            Metric::Hop => Self::WEIGHT_HOP,
            Metric::Timelock => self.weight_timelock,
        }
    }

    /// Fee for forwarding `amount_msat`, recomputed from the policy fields.
    pub fn fee_for(&self, amount_msat: u64) -> u64 {
        forwarding_fee(self.fee_base_msat, self.fee_rate_millionths, amount_msat)
    }
}

/// Counters describing what the builder kept and dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub records_seen: usize,
    pub skipped_no_policy: usize,
    pub skipped_disabled: usize,
    pub skipped_capacity: usize,
    pub skipped_self_loop: usize,
    /// Records that replaced an earlier record for the same ordered pair.
    pub overwritten: usize,
    pub edges: usize,
}

/// Aggregate figures about a built graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkStats {
    pub total_nodes: usize,
    pub total_channels: usize,
    pub total_capacity_sat: u64,
    pub total_capacity_btc: f64,
}

/// Immutable weighted directed graph of usable channel directions.
///
/// Nodes are the endpoints of the retained edges. Once built the graph is
/// never mutated, so a shared reference can serve any number of concurrent
/// searches.
#[derive(Debug, Clone)]
pub struct ChannelGraph {
    nodes: Vec<NodeId>,
    index: HashMap<NodeId, NodeIdx>,
    /// Outgoing edges per node, sorted by target handle.
    adjacency: Vec<Vec<Edge>>,
    payment_amount_msat: u64,
}

impl ChannelGraph {
    /// The payment amount the edge weights were computed for.
    pub fn payment_amount_msat(&self) -> u64 {
        self.payment_amount_msat
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node: &str) -> bool {
        self.index.contains_key(node)
    }

    /// Nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.iter()
    }

    /// The edge `from -> to`, if the graph has one.
    pub fn edge(&self, from: &str, to: &str) -> Option<&Edge> {
        let from = self.index_of(from)?;
        let to = self.index_of(to)?;
        self.edge_between(from, to)
    }

    /// All edges as `(from, to, edge)` in `(from, to)` id order.
    pub fn edges(&self) -> impl Iterator<Item = (&NodeId, &NodeId, &Edge)> {
        self.adjacency.iter().enumerate().flat_map(move |(from, edges)| {
            edges
                .iter()
                .map(move |edge| (&self.nodes[from], &self.nodes[edge.target], edge))
        })
    }

    pub fn stats(&self) -> NetworkStats {
        let total_capacity_sat = self
            .adjacency
            .iter()
            .flatten()
            .fold(0u64, |acc, edge| acc.saturating_add(edge.capacity_sat));
        NetworkStats {
            total_nodes: self.node_count(),
            total_channels: self.edge_count(),
            total_capacity_sat,
            total_capacity_btc: total_capacity_sat as f64 / SAT_PER_BTC,
        }
    }

    pub(crate) fn index_of(&self, node: &str) -> Option<NodeIdx> {
        self.index.get(node).copied()
    }

    pub(crate) fn node_id(&self, idx: NodeIdx) -> &NodeId {
        &self.nodes[idx]
    }

    pub(crate) fn out_edges(&self, idx: NodeIdx) -> &[Edge] {
        &self.adjacency[idx]
    }

    pub(crate) fn edge_between(&self, from: NodeIdx, to: NodeIdx) -> Option<&Edge> {
        let edges = self.adjacency.get(from)?;
        edges
            .binary_search_by_key(&to, |edge| edge.target)
            .ok()
            .map(|pos| &edges[pos])
    }
}

/// Policy fields of an accepted record, before node handles are assigned.
struct PendingEdge {
    fee_base_msat: u64,
    fee_rate_millionths: u64,
    time_lock_delta: u32,
    capacity_sat: u64,
}

/// Builds a [`ChannelGraph`] for one payment amount.
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder {
    payment_amount_msat: u64,
}

impl GraphBuilder {
    pub fn new(payment_amount_msat: u64) -> Self {
        Self {
            payment_amount_msat,
        }
    }

    pub fn build(&self, records: &ChannelMap) -> ChannelGraph {
        self.build_with_stats(records).0
    }

    /// Build the graph and report what was filtered out.
    ///
    /// A record becomes the edge `(node, peer)` when its own policy is present
    /// and enabled and `capacity_sat * 1000 >= payment_amount_msat`. A later
    /// record for the same ordered pair replaces an earlier one.
    pub fn build_with_stats(&self, records: &ChannelMap) -> (ChannelGraph, BuildStats) {
        let amount = self.payment_amount_msat;
        let mut stats = BuildStats::default();
        let mut pending: BTreeMap<(&NodeId, &NodeId), PendingEdge> = BTreeMap::new();

        for (node, channels) in records {
            for record in channels {
                stats.records_seen += 1;

                let Some(policy) = record.own_policy.as_ref() else {
                    stats.skipped_no_policy += 1;
                    continue;
                };
                if policy.disabled {
                    stats.skipped_disabled += 1;
                    continue;
                }
                if record.capacity_sat.saturating_mul(1000) < amount {
                    stats.skipped_capacity += 1;
                    continue;
                }
                if record.peer == *node {
                    stats.skipped_self_loop += 1;
                    continue;
                }

                let edge = PendingEdge {
                    fee_base_msat: policy.fee_base_msat,
                    fee_rate_millionths: policy.fee_rate_millionths,
                    time_lock_delta: policy.time_lock_delta,
                    capacity_sat: record.capacity_sat,
                };
                if pending.insert((node, &record.peer), edge).is_some() {
                    stats.overwritten += 1;
                }
            }
        }

        let nodes: Vec<NodeId> = pending
            .keys()
            .flat_map(|(from, to)| [*from, *to])
            .collect::<BTreeSet<_>>()
            .into_iter()
            .cloned()
            .collect();
        let index: HashMap<NodeId, NodeIdx> = nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.clone(), idx))
            .collect();

        // `pending` iterates in (from, to) order, so each adjacency list
        // comes out sorted by target handle.
        let mut adjacency: Vec<Vec<Edge>> = vec![Vec::new(); nodes.len()];
        for ((from, to), edge) in pending {
            adjacency[index[from]].push(Edge {
                target: index[to],
                fee_base_msat: edge.fee_base_msat,
                fee_rate_millionths: edge.fee_rate_millionths,
                time_lock_delta: edge.time_lock_delta,
                capacity_sat: edge.capacity_sat,
                weight_fee: forwarding_fee(edge.fee_base_msat, edge.fee_rate_millionths, amount),
                weight_timelock: u64::from(edge.time_lock_delta),
            });
        }

        let graph = ChannelGraph {
            nodes,
            index,
            adjacency,
            payment_amount_msat: amount,
        };
        stats.edges = graph.edge_count();

        if stats.overwritten > 0 {
            warn!(
                overwritten = stats.overwritten,
                "parallel channels for the same ordered pair; kept the last record of each"
            );
        }
        debug!(
            payment_amount_msat = amount,
            nodes = graph.node_count(),
            edges = stats.edges,
            records = stats.records_seen,
            skipped_no_policy = stats.skipped_no_policy,
            skipped_disabled = stats.skipped_disabled,
            skipped_capacity = stats.skipped_capacity,
            "built channel graph"
        );

        (graph, stats)
    }
}
