//! Registry query commands.
//!
//! Read-only views over the persisted state. Proposer status and effective
//! collateral are the cached values from the last `update-status` covering the
//! proposer.

use clap::Subcommand;
use preconf_registry::ExitState;
use serde::Serialize;
use serde_json::json;

use super::Context;
use crate::utils::{
    format_amount, parse_address, print_json, print_warning, CliResult, OutputFormat,
};

/// Query subcommands
#[derive(Subcommand, Debug)]
pub enum QueryCommands {
    /// Show a registrant record
    Registrant {
        /// Registrant address
        address: String,
    },

    /// Show a proposer record
    Proposer {
        /// Proposer address
        address: String,
    },

    /// Show a proposer's cached eligibility status
    Status {
        /// Proposer address
        address: String,
    },

    /// Show a proposer's cached effective collateral
    Collateral {
        /// Proposer address
        address: String,
    },

    /// Show registry-wide totals
    Summary,
}

/// Registry-wide totals
#[derive(Debug, Clone, Serialize)]
pub struct RegistrySummary {
    /// Current block height
    pub height: u64,
    /// Number of registrant records
    pub registrants: usize,
    /// Number of proposer records
    pub proposers: usize,
    /// Proposers whose cached status is PRECONFER
    pub preconfers: usize,
    /// Sum of all registrant balances
    pub total_collateral: u128,
    /// Value held by custody
    pub custody_held: u128,
    /// Value burned by penalties
    pub burned: u128,
    /// Evidence items applied so far
    pub processed_evidence: usize,
}

/// Execute query commands
pub fn execute(cmd: QueryCommands, ctx: &Context) -> CliResult<()> {
    match cmd {
        QueryCommands::Registrant { address } => execute_registrant(&address, ctx),
        QueryCommands::Proposer { address } => execute_proposer(&address, ctx),
        QueryCommands::Status { address } => execute_status(&address, ctx),
        QueryCommands::Collateral { address } => execute_collateral(&address, ctx),
        QueryCommands::Summary => execute_summary(ctx),
    }
}

fn execute_registrant(address: &str, ctx: &Context) -> CliResult<()> {
    let address = parse_address(address)?;
    let session = ctx.open()?;
    let registry = &session.registry;

    let Some(info) = registry.get_registrant_info(&address) else {
        match ctx.output {
            OutputFormat::Json => print_json(&serde_json::Value::Null)?,
            OutputFormat::Text => print_warning(&format!("{} has never deposited", address)),
        }
        return Ok(());
    };

    match ctx.output {
        OutputFormat::Json => print_json(&info)?,
        OutputFormat::Text => {
            println!("Registrant Information");
            println!("======================");
            println!("  Address:         {}", address);
            println!("  Balance:         {}", format_amount(info.balance));
            println!("  Frozen:          {}", format_amount(info.frozen_balance));
            println!("  Active from:     block {}", info.entered_at);
            match registry.exit_state(&address) {
                Some(ExitState::ExitPending {
                    initiated_at,
                    amount,
                    ready_at,
                }) => {
                    println!("  Exiting:         {}", format_amount(amount));
                    println!("  Exit initiated:  block {}", initiated_at);
                    println!("  Withdrawable:    block {}", ready_at);
                }
                _ => println!("  Exit:            none"),
            }
            println!("  Delegations:     {}", info.delegated_proposers.len());
            for proposer in &info.delegated_proposers {
                println!("    {}", proposer);
            }
        }
    }

    Ok(())
}

fn execute_proposer(address: &str, ctx: &Context) -> CliResult<()> {
    let address = parse_address(address)?;
    let session = ctx.open()?;

    let Some(info) = session.registry.get_proposer_info(&address) else {
        match ctx.output {
            OutputFormat::Json => print_json(&serde_json::Value::Null)?,
            OutputFormat::Text => print_warning(&format!("{} has no delegations", address)),
        }
        return Ok(());
    };

    match ctx.output {
        OutputFormat::Json => print_json(&info)?,
        OutputFormat::Text => {
            println!("Proposer Information");
            println!("====================");
            println!("  Address:         {}", address);
            println!("  Status:          {}", info.status);
            println!(
                "  Collateral:      {}",
                format_amount(info.effective_collateral)
            );
            match info.last_updated_at {
                Some(height) => println!("  Computed at:     block {}", height),
                None => println!("  Computed at:     never"),
            }
            println!("  Slashed:         {}", format_amount(info.total_slashed));
            println!("  Delegated by:    {}", info.delegated_by.len());
            for registrant in &info.delegated_by {
                println!("    {}", registrant);
            }
            if !info.penalties.is_empty() {
                println!();
                println!("Penalties:");
                for penalty in &info.penalties {
                    println!(
                        "  [block {}] {} from {} ({})",
                        penalty.height,
                        format_amount(penalty.amount),
                        penalty.registrant,
                        penalty.evidence_id
                    );
                }
            }
        }
    }

    Ok(())
}

fn execute_status(address: &str, ctx: &Context) -> CliResult<()> {
    let address = parse_address(address)?;
    let session = ctx.open()?;
    let status = session.registry.get_proposer_status(&address);

    match ctx.output {
        OutputFormat::Json => print_json(&json!({ "proposer": address, "status": status }))?,
        OutputFormat::Text => println!("{}", status),
    }

    Ok(())
}

fn execute_collateral(address: &str, ctx: &Context) -> CliResult<()> {
    let address = parse_address(address)?;
    let session = ctx.open()?;
    let collateral = session.registry.get_effective_collateral(&address);

    match ctx.output {
        OutputFormat::Json => print_json(&json!({
            "proposer": address,
            "effective_collateral": collateral.to_string(),
        }))?,
        OutputFormat::Text => println!("{}", collateral),
    }

    Ok(())
}

fn execute_summary(ctx: &Context) -> CliResult<()> {
    let session = ctx.open()?;
    let state = session.registry.state();

    let summary = RegistrySummary {
        height: state.height,
        registrants: state.ledger.len(),
        proposers: state.graph.len(),
        preconfers: state
            .graph
            .iter()
            .filter(|(_, proposer)| proposer.status.is_preconfer())
            .count(),
        total_collateral: session.registry.total_collateral(),
        custody_held: session.custody.held(),
        burned: session.custody.burned(),
        processed_evidence: state.processed_evidence.len(),
    };

    match ctx.output {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Text => {
            println!("Registry Summary");
            println!("================");
            println!("  Height:            {}", summary.height);
            println!("  Registrants:       {}", summary.registrants);
            println!("  Proposers:         {}", summary.proposers);
            println!("  Preconfers:        {}", summary.preconfers);
            println!("  Total collateral:  {}", format_amount(summary.total_collateral));
            println!("  Custody held:      {}", format_amount(summary.custody_held));
            println!("  Burned:            {}", format_amount(summary.burned));
            println!("  Evidence applied:  {}", summary.processed_evidence);
        }
    }

    Ok(())
}
