//! `lnpath topk`: rank paths by fee, timelock and hop count.

use anyhow::Context;
use clap::Args;
use lnpath_core::{Metric, NodeId};
use lnpath_routing::{Outcome, TopKConfig, TopKSearch};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use super::{load_graph, print_json, report_not_found};
use crate::config::LnpathConfig;

#[derive(Args, Debug)]
pub struct TopkArgs {
    /// Channel graph JSON file (defaults to [graph] path).
    #[arg(short, long)]
    pub graph: Option<PathBuf>,

    /// Source node id.
    #[arg(long)]
    pub from: String,

    /// Target node id.
    #[arg(long)]
    pub to: String,

    /// Size of each ranking.
    #[arg(short, long)]
    pub k: Option<usize>,

    /// Longest path considered, in hops.
    #[arg(long)]
    pub max_hop: Option<u32>,

    /// Consecutive non-improving paths tolerated before stopping.
    #[arg(long)]
    pub max_no_improve: Option<usize>,

    /// Metric ordering the enumeration (fee, hop, timelock).
    #[arg(long)]
    pub primary: Option<Metric>,

    /// Payment amount, in msat.
    #[arg(long)]
    pub amount: Option<u64>,

    /// Write paths_by_fee.json, paths_by_timelock.json and
    /// paths_by_hops.json here instead of printing.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

pub fn run(args: &TopkArgs, config: &LnpathConfig) -> anyhow::Result<ExitCode> {
    let path = args.graph.as_ref().unwrap_or(&config.graph.path);
    let amount = args.amount.unwrap_or(config.search.payment_amount_msat);

    let mut topk_config = TopKConfig::from(&config.search);
    if let Some(k) = args.k {
        topk_config.k = k;
    }
    if let Some(max_hop) = args.max_hop {
        topk_config.max_hop = max_hop;
    }
    if let Some(max_no_improve) = args.max_no_improve {
        topk_config.max_no_improve = max_no_improve;
    }
    if let Some(primary) = args.primary {
        topk_config.primary_metric = primary;
    }

    let graph = load_graph(path, amount)?;
    let source = NodeId::from(args.from.as_str());
    let target = NodeId::from(args.to.as_str());

    let paths = match TopKSearch::new(&graph, topk_config).search(&source, &target, amount)? {
        Outcome::Found(paths) => paths,
        Outcome::NotFound(reason) => return report_not_found(reason),
    };

    let Some(out_dir) = &args.out_dir else {
        print_json(&paths)?;
        return Ok(ExitCode::SUCCESS);
    };

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    for (file, metric) in [
        ("paths_by_fee.json", Metric::Fee),
        ("paths_by_timelock.json", Metric::Timelock),
        ("paths_by_hops.json", Metric::Hop),
    ] {
        let file_path = out_dir.join(file);
        let ranking = paths.ranking(metric);
        std::fs::write(&file_path, serde_json::to_string_pretty(ranking)?)
            .with_context(|| format!("failed to write {}", file_path.display()))?;
        info!(path = %file_path.display(), paths = ranking.len(), "saved ranking");
    }

    Ok(ExitCode::SUCCESS)
}
