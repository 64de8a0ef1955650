//! lnpath CLI: route queries over a Lightning channel graph snapshot.
//!
//! Subcommands: init, stats, best, topk, demo-pair.
//!
//! Results are printed to stdout as JSON; logs go to stderr.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use config::{LnpathConfig, LoggingConfig};

/// lnpath: multi-criteria payment route search.
#[derive(Parser, Debug)]
#[command(name = "lnpath", version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, global = true, default_value = "lnpath.toml")]
    config: PathBuf,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default configuration file.
    Init(commands::init::InitArgs),
    /// Print statistics about the channel graph.
    Stats(commands::stats::StatsArgs),
    /// Find the best path between two nodes.
    Best(commands::best::BestArgs),
    /// Rank paths between two nodes by fee, timelock and hop count.
    Topk(commands::topk::TopkArgs),
    /// Pick a well-connected node pair to query.
    DemoPair(commands::demo_pair::DemoPairArgs),
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    if logging.format.eq_ignore_ascii_case("json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // `init` must work even when an existing file does not parse.
    let mut config = match &cli.command {
        Commands::Init(_) => LnpathConfig::default(),
        _ => LnpathConfig::load(&cli.config)?,
    };
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }

    init_tracing(&config.logging);

    match &cli.command {
        Commands::Init(args) => commands::init::run(args, &cli.config),
        Commands::Stats(args) => commands::stats::run(args, &config),
        Commands::Best(args) => commands::best::run(args, &config),
        Commands::Topk(args) => commands::topk::run(args, &config),
        Commands::DemoPair(args) => commands::demo_pair::run(args, &config),
    }
}
