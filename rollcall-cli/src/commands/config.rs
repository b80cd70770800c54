//! Inspect the rollcall config file

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rollcall_server::RollcallConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show config file path
    Path,
    /// Print the parsed config file as TOML (database URL redacted)
    Show,
}

pub fn run_config(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Path => {
            println!("{}", RollcallConfig::config_path().display());
            Ok(())
        }
        ConfigCommands::Show => run_show(),
    }
}

fn run_show() -> Result<()> {
    let mut config = super::load_config()?;
    if config.database_url.is_some() {
        config.database_url = Some("<redacted>".to_string());
    }

    let rendered = toml::to_string_pretty(&config).context("Failed to render config")?;
    if rendered.trim().is_empty() {
        println!("# no settings (using defaults)");
    } else {
        print!("{}", rendered);
    }
    Ok(())
}
