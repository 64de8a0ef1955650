//! `lnpath init`: write a default configuration file.

use clap::Args;
use std::path::Path;
use std::process::ExitCode;

use crate::config::LnpathConfig;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file.
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &InitArgs, config_path: &Path) -> anyhow::Result<ExitCode> {
    if config_path.exists() && !args.force {
        anyhow::bail!(
            "configuration file already exists at {} (use --force to overwrite)",
            config_path.display()
        );
    }

    LnpathConfig::default().save(config_path)?;
    tracing::info!(path = %config_path.display(), "wrote default config");
    println!("Initialized lnpath config at {}", config_path.display());
    println!("Point [graph] path at a channel graph snapshot, then run 'lnpath stats'.");

    Ok(ExitCode::SUCCESS)
}
