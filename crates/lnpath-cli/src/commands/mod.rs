pub mod best;
pub mod demo_pair;
pub mod init;
pub mod stats;
pub mod topk;

use anyhow::Context;
use lnpath_core::parse_channel_map;
use lnpath_routing::{ChannelGraph, GraphBuilder, NotFoundReason};
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;
use tracing::{info, warn};

/// Read a channel graph snapshot and build the graph for `payment_amount_msat`.
pub fn load_graph(path: &Path, payment_amount_msat: u64) -> anyhow::Result<ChannelGraph> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read channel graph {}", path.display()))?;
    let records = parse_channel_map(&raw)
        .with_context(|| format!("failed to parse channel graph {}", path.display()))?;

    let (graph, stats) = GraphBuilder::new(payment_amount_msat).build_with_stats(&records);
    if graph.is_empty() {
        warn!(path = %path.display(), "no usable channels in snapshot");
    }
    info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        records = stats.records_seen,
        skipped_capacity = stats.skipped_capacity,
        skipped_disabled = stats.skipped_disabled,
        skipped_no_policy = stats.skipped_no_policy,
        "loaded channel graph"
    );
    Ok(graph)
}

/// Print `value` to stdout as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print an `{"error": ...}` object and fail the process.
pub fn report_not_found(message: impl std::fmt::Display) -> anyhow::Result<ExitCode> {
    print_json(&serde_json::json!({ "error": message.to_string() }))?;
    Ok(ExitCode::FAILURE)
}

/// `NotFound` for whichever endpoint is missing from `graph`, if any.
pub fn missing_endpoint(
    graph: &ChannelGraph,
    endpoints: [&lnpath_core::NodeId; 2],
) -> Option<NotFoundReason> {
    endpoints
        .into_iter()
        .find(|node| !graph.contains(node.as_str()))
        .map(|node| NotFoundReason::UnknownNode(node.clone()))
}
