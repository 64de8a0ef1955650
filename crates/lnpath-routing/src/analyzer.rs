use lnpath_core::{Metric, NodeId};
use serde::Serialize;
use tracing::error;

use crate::error::RoutingError;
use crate::graph::{ChannelGraph, NodeIdx};

/// A path together with its aggregate metrics.
///
/// Only produced by [`analyze`]; serializes with the keys `path`, `hops`,
/// `total_fee_msat`, `min_capacity_sat` and `total_timelock`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PathCandidate {
    path: Vec<NodeId>,
    hops: u32,
    total_fee_msat: u64,
    min_capacity_sat: u64,
    total_timelock: u32,
}

impl PathCandidate {
    /// Nodes from source to target.
    pub fn path(&self) -> &[NodeId] {
        &self.path
    }

    pub fn hops(&self) -> u32 {
        self.hops
    }

    pub fn total_fee_msat(&self) -> u64 {
        self.total_fee_msat
    }

    /// Smallest channel capacity on the path; the most it can carry.
    pub fn min_capacity_sat(&self) -> u64 {
        self.min_capacity_sat
    }

    pub fn total_timelock(&self) -> u32 {
        self.total_timelock
    }

    /// The value this path is ranked by under `metric`.
    pub fn metric(&self, metric: Metric) -> u64 {
        match metric {
            Metric::Fee => self.total_fee_msat,
            Metric::Hop => u64::from(self.hops),
            Metric::Timelock => u64::from(self.total_timelock),
        }
    }
}

/// Compute fee, timelock and bottleneck capacity of `path` in `graph`.
///
/// Fees are recomputed per edge from its policy for `payment_amount_msat`,
/// independent of the weight the path was searched under. Every consecutive
/// pair must be an edge of `graph`.
pub fn analyze(
    graph: &ChannelGraph,
    path: &[NodeId],
    payment_amount_msat: u64,
) -> Result<PathCandidate, RoutingError> {
    if path.len() < 2 {
        return Err(RoutingError::EmptyPath { len: path.len() });
    }

    let mut indices = Vec::with_capacity(path.len());
    for (pos, node) in path.iter().enumerate() {
        match graph.index_of(node.as_str()) {
            Some(idx) => indices.push(idx),
            None => {
                // Report the pair that cannot be an edge.
                let (from, to) = if pos == 0 {
                    (node.clone(), path[1].clone())
                } else {
                    (path[pos - 1].clone(), node.clone())
                };
                error!(%from, %to, "path references a node outside the graph");
                return Err(RoutingError::BrokenPath { from, to });
            }
        }
    }

    analyze_indices(graph, &indices, payment_amount_msat)
}

pub(crate) fn analyze_indices(
    graph: &ChannelGraph,
    path: &[NodeIdx],
    payment_amount_msat: u64,
) -> Result<PathCandidate, RoutingError> {
    if path.len() < 2 {
        return Err(RoutingError::EmptyPath { len: path.len() });
    }

    let mut total_fee_msat = 0u64;
    let mut total_timelock = 0u32;
    let mut min_capacity_sat = u64::MAX;

    for pair in path.windows(2) {
        let Some(edge) = graph.edge_between(pair[0], pair[1]) else {
            let from = graph.node_id(pair[0]).clone();
            let to = graph.node_id(pair[1]).clone();
            error!(%from, %to, "path contains a non-adjacent pair");
            return Err(RoutingError::BrokenPath { from, to });
        };
        total_fee_msat = total_fee_msat.saturating_add(edge.fee_for(payment_amount_msat));
        total_timelock = total_timelock.saturating_add(edge.time_lock_delta);
        min_capacity_sat = min_capacity_sat.min(edge.capacity_sat);
    }

    Ok(PathCandidate {
        path: path.iter().map(|&idx| graph.node_id(idx).clone()).collect(),
        hops: u32::try_from(path.len() - 1).unwrap_or(u32::MAX),
        total_fee_msat,
        min_capacity_sat,
        total_timelock,
    })
}
