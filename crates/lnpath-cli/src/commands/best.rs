//! `lnpath best`: find the best path between two nodes.

use clap::Args;
use lnpath_core::{Metric, NodeId};
use lnpath_routing::{NotFoundReason, Outcome, PathFinder};
use std::path::PathBuf;
use std::process::ExitCode;

use super::{load_graph, missing_endpoint, print_json, report_not_found};
use crate::config::LnpathConfig;

#[derive(Args, Debug)]
pub struct BestArgs {
    /// Channel graph JSON file (defaults to [graph] path).
    #[arg(short, long)]
    pub graph: Option<PathBuf>,

    /// Source node id.
    #[arg(long)]
    pub from: String,

    /// Target node id.
    #[arg(long)]
    pub to: String,

    /// Metric to minimize (fee, hop, timelock). Without it, the best path
    /// under each metric is printed.
    #[arg(long)]
    pub optimize: Option<Metric>,

    /// Payment amount, in msat.
    #[arg(long)]
    pub amount: Option<u64>,
}

pub fn run(args: &BestArgs, config: &LnpathConfig) -> anyhow::Result<ExitCode> {
    let path = args.graph.as_ref().unwrap_or(&config.graph.path);
    let amount = args.amount.unwrap_or(config.search.payment_amount_msat);
    let source = NodeId::from(args.from.as_str());
    let target = NodeId::from(args.to.as_str());

    let graph = load_graph(path, amount)?;
    let finder = PathFinder::new(&graph);

    let Some(metric) = args.optimize else {
        if let Some(reason) = missing_endpoint(&graph, [&source, &target]) {
            return report_not_found(reason);
        }
        let best = finder.find_best_all(&source, &target, amount)?;
        // Reachability does not depend on the metric.
        if best.fee_min.is_none() {
            return report_not_found(NotFoundReason::NoPath);
        }
        print_json(&best)?;
        return Ok(ExitCode::SUCCESS);
    };

    match finder.find_best(&source, &target, amount, metric)? {
        Outcome::Found(candidate) => {
            print_json(&[candidate])?;
            Ok(ExitCode::SUCCESS)
        }
        Outcome::NotFound(reason) => report_not_found(reason),
    }
}
