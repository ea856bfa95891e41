//! Block clock and eligibility recompute commands.

use clap::Parser;
use serde_json::json;

use super::Context;
use crate::utils::{
    format_amount, parse_addresses, print_json, print_success, print_warning, CliResult,
    OutputFormat,
};

/// Arguments for the advance command
#[derive(Parser, Debug)]
pub struct AdvanceArgs {
    /// New block height (must not be lower than the current one)
    pub height: u64,
}

/// Arguments for the update-status command
#[derive(Parser, Debug)]
pub struct UpdateStatusArgs {
    /// Proposer addresses to recompute
    #[arg(required = true)]
    pub proposers: Vec<String>,
}

/// Execute the advance command
pub fn execute_advance(args: AdvanceArgs, ctx: &Context) -> CliResult<()> {
    let mut session = ctx.open()?;
    let previous = session.registry.current_height();
    session.registry.advance_to(args.height)?;
    ctx.commit(session)?;

    match ctx.output {
        OutputFormat::Json => print_json(&json!({
            "previous_height": previous,
            "height": args.height,
        }))?,
        OutputFormat::Text => {
            print_success(&format!("Block height {} -> {}", previous, args.height));
        }
    }

    Ok(())
}

/// Execute the update-status command
pub fn execute_update_status(args: UpdateStatusArgs, ctx: &Context) -> CliResult<()> {
    let proposers = parse_addresses(&args.proposers)?;

    let mut session = ctx.open()?;
    let height = session.registry.current_height();
    let updates = session.registry.update_status(&proposers);
    ctx.commit(session)?;

    match ctx.output {
        OutputFormat::Json => {
            let updates: Vec<_> = updates
                .iter()
                .map(|u| {
                    json!({
                        "proposer": u.proposer,
                        "effective_collateral": u.effective_collateral.to_string(),
                        "status": u.status,
                    })
                })
                .collect();
            print_json(&json!({ "height": height, "updates": updates }))?
        }
        OutputFormat::Text => {
            println!("Status at block {}", height);
            println!("==================");
            for update in &updates {
                println!(
                    "  {}  {:<14} {}",
                    update.proposer,
                    update.status.to_string(),
                    format_amount(update.effective_collateral)
                );
            }
            let skipped = proposers.len().saturating_sub(updates.len());
            if skipped > 0 {
                print_warning(&format!(
                    "{} proposer(s) have no delegations and were skipped",
                    skipped
                ));
            }
        }
    }

    Ok(())
}
