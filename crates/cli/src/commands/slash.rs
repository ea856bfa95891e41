//! Penalty submission command.
//!
//! Evidence is read from a JSON file:
//!
//! ```json
//! {
//!   "proposer": "0x00000000000000000000000000000000000000aa",
//!   "submitter": "0x00000000000000000000000000000000000000ff",
//!   "height": 120,
//!   "instructions": [
//!     { "registrant": "0x...01", "proposer": "0x...aa", "amount": 1000 }
//!   ]
//! }
//! ```
//!
//! The instructions become the evidence payload. Every field, `height` included, is
//! read from the file and nothing depends on the registry clock, so the same file
//! always maps to the same evidence id and cannot be applied twice.

use alloy_primitives::{Address, Bytes};
use clap::Parser;
use preconf_registry::{
    AuthorityVerifier, EvidenceVerifier, PenaltyEvidence, RejectAllVerifier, SlashInstruction,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::{Path, PathBuf};

use super::Context;
use crate::utils::{
    confirm, format_amount, print_json, print_success, print_warning, CliError, CliResult,
    OutputFormat,
};

/// Arguments for the slash command
#[derive(Parser, Debug)]
pub struct SlashArgs {
    /// Path to the evidence JSON file
    #[arg(long)]
    pub evidence: PathBuf,

    /// Skip confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

/// On-disk evidence format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceFile {
    /// Proposer accused of misconduct
    pub proposer: Address,
    /// Account submitting the evidence
    pub submitter: Address,
    /// Height of the violation
    pub height: u64,
    /// Slashing the submitter asks for
    pub instructions: Vec<SlashInstruction>,
}

impl EvidenceFile {
    /// Read and parse an evidence file
    pub fn read(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read(path)?;
        Ok(serde_json::from_slice(&content)?)
    }

    /// Build registry evidence, encoding the instructions as the payload
    pub fn into_evidence(self) -> CliResult<PenaltyEvidence> {
        Ok(PenaltyEvidence {
            proposer: self.proposer,
            submitter: self.submitter,
            height: self.height,
            payload: Bytes::from(serde_json::to_vec(&self.instructions)?),
        })
    }
}

/// Execute the slash command
pub fn execute(args: SlashArgs, ctx: &Context) -> CliResult<()> {
    let file = EvidenceFile::read(&args.evidence)?;

    let verifier: Box<dyn EvidenceVerifier> = match ctx.config.penalty.authority_address()? {
        Some(authority) => Box::new(AuthorityVerifier::new(authority)),
        None => {
            print_warning("No penalty authority configured; evidence will be rejected");
            Box::new(RejectAllVerifier)
        }
    };

    let mut session = ctx.open()?;
    let requested: u128 = file
        .instructions
        .iter()
        .fold(0u128, |acc, i| acc.saturating_add(i.amount));
    confirm(
        &format!(
            "Apply {} slash instruction(s) totalling up to {} against proposer {}?",
            file.instructions.len(),
            format_amount(requested),
            file.proposer
        ),
        args.yes,
    )?;

    let evidence = file.into_evidence()?;
    let evidence_id = evidence.id();
    let outcomes = session
        .registry
        .apply_penalty(&evidence, &*verifier, &mut session.custody)?;
    let status = session.registry.get_proposer_status(&evidence.proposer);
    ctx.commit(session)?;

    match ctx.output {
        OutputFormat::Json => {
            let slashed: Vec<_> = outcomes
                .iter()
                .map(|o| {
                    json!({
                        "registrant": o.registrant,
                        "amount": o.amount.to_string(),
                    })
                })
                .collect();
            print_json(&json!({
                "evidence_id": evidence_id,
                "proposer": evidence.proposer,
                "status": status,
                "slashed": slashed,
            }))?
        }
        OutputFormat::Text => {
            print_success(&format!("Penalty applied to proposer {}", evidence.proposer));
            println!("  Evidence:  {}", evidence_id);
            println!("  Status:    {}", status);
            for outcome in &outcomes {
                println!(
                    "  Slashed:   {} from {}",
                    format_amount(outcome.amount),
                    outcome.registrant
                );
            }
        }
    }

    Ok(())
}
