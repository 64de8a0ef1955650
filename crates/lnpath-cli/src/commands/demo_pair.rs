//! `lnpath demo-pair`: pick a well-connected node pair to query.

use clap::Args;
use lnpath_routing::most_connected_pair;
use std::path::PathBuf;
use std::process::ExitCode;

use super::{load_graph, print_json, report_not_found};
use crate::config::LnpathConfig;

#[derive(Args, Debug)]
pub struct DemoPairArgs {
    /// Channel graph JSON file (defaults to [graph] path).
    #[arg(short, long)]
    pub graph: Option<PathBuf>,

    /// Number of node pairs to examine.
    #[arg(long)]
    pub max_pairs: Option<usize>,

    /// Pairs with this many paths or more are passed over.
    #[arg(long)]
    pub max_path_limit: Option<usize>,

    /// Longest path counted, in hops.
    #[arg(long)]
    pub cutoff: Option<usize>,
}

pub fn run(args: &DemoPairArgs, config: &LnpathConfig) -> anyhow::Result<ExitCode> {
    let path = args.graph.as_ref().unwrap_or(&config.graph.path);
    let demo = &config.demo;

    let graph = load_graph(path, config.search.payment_amount_msat)?;
    let pair = most_connected_pair(
        &graph,
        args.max_pairs.unwrap_or(demo.max_pairs),
        args.max_path_limit.unwrap_or(demo.max_path_limit),
        args.cutoff.unwrap_or(demo.cutoff),
    );

    match pair {
        Some(pair) => {
            print_json(&pair)?;
            Ok(ExitCode::SUCCESS)
        }
        None => report_not_found("no connected pair within the path limit"),
    }
}
