//! Registry initialization command.
//!
//! Writes a default `preconf.toml` and an empty state snapshot so later commands
//! have something to load.

use clap::Parser;
use preconf_config::Config;
use preconf_registry::Snapshot;
use serde::Serialize;

use super::Context;
use crate::utils::{print_info, print_json, print_success, CliError, CliResult, OutputFormat};

/// Arguments for the init command
#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration and state
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct InitSummary {
    config_file: String,
    state_file: String,
    minimum_collateral: String,
    activation_delay: u64,
    exit_delay: u64,
}

/// Execute the init command
pub fn execute(args: InitArgs, ctx: &Context) -> CliResult<()> {
    if ctx.config_path.exists() && !args.force {
        return Err(CliError::ConfigError(format!(
            "Configuration already exists at {}. Use --force to overwrite.",
            ctx.config_path.display()
        )));
    }
    if ctx.store.exists() && !args.force {
        return Err(CliError::ConfigError(format!(
            "State file already exists at {}. Use --force to overwrite.",
            ctx.store.path().display()
        )));
    }

    print_info(&format!(
        "Initializing registry configuration at {}",
        ctx.config_path.display()
    ));

    let mut config = Config::default();
    config.storage.state_file = ctx.store.path().to_string_lossy().into_owned();

    if let Some(parent) = ctx.config_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    config.save(&ctx.config_path)?;
    ctx.store.save(&Snapshot::default())?;

    let summary = InitSummary {
        config_file: ctx.config_path.display().to_string(),
        state_file: ctx.store.path().display().to_string(),
        minimum_collateral: config.registry.minimum_collateral.clone(),
        activation_delay: config.registry.activation_delay,
        exit_delay: config.registry.exit_delay,
    };

    match ctx.output {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Text => {
            print_success("Registry initialized");
            println!("  Config:              {}", summary.config_file);
            println!("  State:               {}", summary.state_file);
            println!("  Minimum collateral:  {}", summary.minimum_collateral);
            println!("  Activation delay:    {} blocks", summary.activation_delay);
            println!("  Exit delay:          {} blocks", summary.exit_delay);
        }
    }

    Ok(())
}
