//! `lnpath stats`: print statistics about the channel graph.

use clap::Args;
use std::path::PathBuf;
use std::process::ExitCode;

use super::{load_graph, print_json};
use crate::config::LnpathConfig;

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Channel graph JSON file (defaults to [graph] path).
    #[arg(short, long)]
    pub graph: Option<PathBuf>,

    /// Payment amount used to filter channels, in msat.
    #[arg(long)]
    pub amount: Option<u64>,
}

pub fn run(args: &StatsArgs, config: &LnpathConfig) -> anyhow::Result<ExitCode> {
    let path = args.graph.as_ref().unwrap_or(&config.graph.path);
    let amount = args.amount.unwrap_or(config.search.payment_amount_msat);

    let graph = load_graph(path, amount)?;
    print_json(&graph.stats())?;
    Ok(ExitCode::SUCCESS)
}
