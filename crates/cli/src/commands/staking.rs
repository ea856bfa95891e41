//! Registrant operations.
//!
//! This module provides the commands a registrant uses on their own stake:
//! - Deposit collateral
//! - Delegate to proposers
//! - Initiate an exit
//! - Withdraw once the exit delay has passed

use clap::Parser;
use preconf_registry::{ExitState, RegistryError};
use serde_json::json;

use super::Context;
use crate::utils::{
    confirm, format_amount, parse_address, parse_addresses, parse_amount, print_info,
    print_json, print_success, print_warning, CliResult, OutputFormat,
};

/// Arguments for the deposit command
#[derive(Parser, Debug)]
pub struct DepositArgs {
    /// Amount to deposit (base units or with suffix like "100k", "1.5eth")
    pub amount: String,

    /// Registrant address
    #[arg(long)]
    pub from: String,
}

/// Arguments for the delegate command
#[derive(Parser, Debug)]
pub struct DelegateArgs {
    /// Registrant address
    #[arg(long)]
    pub from: String,

    /// Proposer addresses, in delegation order
    #[arg(required = true)]
    pub proposers: Vec<String>,
}

/// Arguments for the exit command
#[derive(Parser, Debug)]
pub struct ExitArgs {
    /// Amount to earmark for withdrawal
    pub amount: String,

    /// Registrant address
    #[arg(long)]
    pub from: String,
}

/// Arguments for the withdraw command
#[derive(Parser, Debug)]
pub struct WithdrawArgs {
    /// Registrant address
    #[arg(long)]
    pub from: String,

    /// Recipient of the withdrawn collateral
    #[arg(long)]
    pub to: String,

    /// Skip confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

/// Execute the deposit command
pub fn execute_deposit(args: DepositArgs, ctx: &Context) -> CliResult<()> {
    let amount = parse_amount(&args.amount)?;
    let registrant = parse_address(&args.from)?;

    let mut session = ctx.open()?;
    session.custody.fund(amount).map_err(RegistryError::from)?;
    let receipt = session.registry.deposit(registrant, amount)?;
    let height = session.registry.current_height();
    ctx.commit(session)?;

    match ctx.output {
        OutputFormat::Json => print_json(&json!({
            "registrant": registrant,
            "amount": amount.to_string(),
            "balance": receipt.balance.to_string(),
            "entered_at": receipt.entered_at,
            "first_deposit": receipt.first_deposit,
        }))?,
        OutputFormat::Text => {
            print_success(&format!("Deposited {} for {}", format_amount(amount), registrant));
            println!("  Balance:      {}", format_amount(receipt.balance));
            println!("  Active from:  block {}", receipt.entered_at);
            if height < receipt.entered_at {
                print_info(&format!(
                    "Collateral counts toward eligibility in {} blocks",
                    receipt.entered_at - height
                ));
            }
        }
    }

    Ok(())
}

/// Execute the delegate command
pub fn execute_delegate(args: DelegateArgs, ctx: &Context) -> CliResult<()> {
    let registrant = parse_address(&args.from)?;
    let proposers = parse_addresses(&args.proposers)?;

    let mut session = ctx.open()?;
    let added = session.registry.delegate(registrant, &proposers)?;
    ctx.commit(session)?;

    match ctx.output {
        OutputFormat::Json => print_json(&json!({
            "registrant": registrant,
            "delegated": added,
        }))?,
        OutputFormat::Text => {
            print_success(&format!(
                "{} delegated to {} proposer(s)",
                registrant,
                added.len()
            ));
            for proposer in &added {
                println!("  {}", proposer);
            }
            if added.len() < proposers.len() {
                print_warning("Proposers already delegated to were skipped");
            }
            print_info("Run `update-status` to refresh proposer eligibility");
        }
    }

    Ok(())
}

/// Execute the exit command
pub fn execute_exit(args: ExitArgs, ctx: &Context) -> CliResult<()> {
    let amount = parse_amount(&args.amount)?;
    let registrant = parse_address(&args.from)?;

    let mut session = ctx.open()?;
    session.registry.initiate_exit(registrant, amount)?;
    let state = session.registry.exit_state(&registrant);
    ctx.commit(session)?;

    let Some(ExitState::ExitPending {
        initiated_at,
        amount,
        ready_at,
    }) = state
    else {
        return Ok(());
    };

    match ctx.output {
        OutputFormat::Json => print_json(&json!({
            "registrant": registrant,
            "amount_exiting": amount.to_string(),
            "initiated_at": initiated_at,
            "ready_at": ready_at,
        }))?,
        OutputFormat::Text => {
            print_success(&format!("Exit initiated for {}", registrant));
            println!("  Exiting:      {}", format_amount(amount));
            println!("  Initiated at: block {}", initiated_at);
            println!("  Withdrawable: block {}", ready_at);
        }
    }

    Ok(())
}

/// Execute the withdraw command
pub fn execute_withdraw(args: WithdrawArgs, ctx: &Context) -> CliResult<()> {
    let registrant = parse_address(&args.from)?;
    let recipient = parse_address(&args.to)?;

    let mut session = ctx.open()?;
    if let Some(ExitState::ExitPending { amount, .. }) = session.registry.exit_state(&registrant) {
        confirm(
            &format!(
                "Withdraw {} from {} to {}?",
                format_amount(amount),
                registrant,
                recipient
            ),
            args.yes,
        )?;
    }

    let amount = session
        .registry
        .withdraw(registrant, recipient, &mut session.custody)?;
    ctx.commit(session)?;

    match ctx.output {
        OutputFormat::Json => print_json(&json!({
            "registrant": registrant,
            "recipient": recipient,
            "amount": amount.to_string(),
        }))?,
        OutputFormat::Text => {
            print_success(&format!(
                "Withdrew {} from {} to {}",
                format_amount(amount),
                registrant,
                recipient
            ));
        }
    }

    Ok(())
}
