//! Penalty hook
//!
//! Accounting entry point for slashing. Deciding whether a proposer actually broke a
//! preconfirmation is the job of an external [`EvidenceVerifier`]; this module only
//! turns the instructions a verifier approves into ledger mutations.
//!
//! ## Flow
//!
//! 1. The host submits [`PenaltyEvidence`] naming the offending proposer
//! 2. The configured verifier checks it and returns [`SlashInstruction`]s
//! 3. Every instruction is validated against the current ledger and graph
//! 4. Balances are reduced, the slashed value is burned through the custody
//! 5. The proposer's penalty history is updated and, optionally, its status demoted
//!
//! Steps 3–5 are atomic: if any instruction is invalid or the burn fails, nothing
//! changes.

use alloy_primitives::{keccak256, Address, Bytes, B256};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::custody::ValueCustody;
use crate::delegation::DelegationGraph;
use crate::error::{RegistryError, RegistryResult};
use crate::ledger::StakeLedger;
use crate::types::{PenaltyRecord, ProposerStatus, Registrant};

/// Domain separator for evidence identifiers
pub const EVIDENCE_DOMAIN: &[u8] = b"PRECONF_REGISTRY_EVIDENCE_V1";

/// Errors a verifier reports when it refuses evidence.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifierError {
    /// The verifier cannot establish misconduct from this evidence
    #[error("evidence could not be verified: {0}")]
    Unverifiable(String),

    /// The submitter is not allowed to supply penalties
    #[error("submitter {0} is not a penalty authority")]
    UnauthorizedSubmitter(Address),

    /// The payload could not be decoded
    #[error("malformed evidence payload: {0}")]
    MalformedPayload(String),

    /// An instruction targets a different proposer than the evidence
    #[error("instruction targets proposer {instruction}, evidence names {evidence}")]
    ProposerMismatch {
        /// Proposer named by the evidence
        evidence: Address,
        /// Proposer named by the instruction
        instruction: Address,
    },

    /// The verifier approved the evidence but produced nothing to apply
    #[error("no slash instructions in evidence")]
    NoInstructions,
}

/// Evidence that a proposer violated a preconfirmation.
///
/// The registry treats `payload` as opaque; only the verifier interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyEvidence {
    /// Proposer accused of misconduct
    pub proposer: Address,
    /// Account submitting the evidence
    pub submitter: Address,
    /// Height at which the violation happened
    pub height: u64,
    /// Verifier-specific proof
    pub payload: Bytes,
}

impl PenaltyEvidence {
    /// Unique identifier used to reject replays.
    pub fn id(&self) -> B256 {
        let mut data = Vec::with_capacity(EVIDENCE_DOMAIN.len() + 48 + self.payload.len());
        data.extend_from_slice(EVIDENCE_DOMAIN);
        data.extend_from_slice(self.proposer.as_slice());
        data.extend_from_slice(self.submitter.as_slice());
        data.extend_from_slice(&self.height.to_be_bytes());
        data.extend_from_slice(&self.payload);
        keccak256(&data)
    }
}

/// Pre-verified instruction to reduce one registrant's balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashInstruction {
    /// Registrant to slash
    pub registrant: Address,
    /// Proposer the registrant backs
    pub proposer: Address,
    /// Amount to remove (capped at the balance)
    pub amount: u128,
}

/// External component deciding whether evidence proves misconduct.
pub trait EvidenceVerifier {
    /// Verify `evidence` and return the slashing it justifies.
    fn verify(&self, evidence: &PenaltyEvidence) -> Result<Vec<SlashInstruction>, VerifierError>;
}

/// Verifier used until a real misconduct verifier is wired in: refuses everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectAllVerifier;

impl EvidenceVerifier for RejectAllVerifier {
    fn verify(&self, evidence: &PenaltyEvidence) -> Result<Vec<SlashInstruction>, VerifierError> {
        Err(VerifierError::Unverifiable(format!(
            "no misconduct verifier configured for proposer {}",
            evidence.proposer
        )))
    }
}

/// Accepts instructions only from a single trusted authority.
///
/// The authority is assumed to have verified the misconduct off-line; the payload is a
/// JSON array of [`SlashInstruction`]s, all for the evidence's proposer.
#[derive(Debug, Clone, Copy)]
pub struct AuthorityVerifier {
    authority: Address,
}

impl AuthorityVerifier {
    /// Trust `authority` as the only penalty submitter.
    pub fn new(authority: Address) -> Self {
        Self { authority }
    }

    /// The trusted submitter.
    pub fn authority(&self) -> Address {
        self.authority
    }
}

impl EvidenceVerifier for AuthorityVerifier {
    fn verify(&self, evidence: &PenaltyEvidence) -> Result<Vec<SlashInstruction>, VerifierError> {
        if evidence.submitter != self.authority {
            return Err(VerifierError::UnauthorizedSubmitter(evidence.submitter));
        }

        let instructions: Vec<SlashInstruction> = serde_json::from_slice(&evidence.payload)
            .map_err(|e| VerifierError::MalformedPayload(e.to_string()))?;

        if instructions.is_empty() {
            return Err(VerifierError::NoInstructions);
        }

        for instruction in &instructions {
            if instruction.proposer != evidence.proposer {
                return Err(VerifierError::ProposerMismatch {
                    evidence: evidence.proposer,
                    instruction: instruction.proposer,
                });
            }
        }

        Ok(instructions)
    }
}

/// One applied slash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashOutcome {
    /// Slashed registrant
    pub registrant: Address,
    /// Proposer the penalty was applied for
    pub proposer: Address,
    /// Amount actually removed
    pub amount: u128,
}

/// Ledger mutation for verified penalties.
pub struct PenaltyHook;

impl PenaltyHook {
    /// Apply `instructions` atomically.
    pub fn apply<C: ValueCustody + ?Sized>(
        ledger: &mut StakeLedger,
        graph: &mut DelegationGraph,
        custody: &mut C,
        evidence_id: B256,
        instructions: &[SlashInstruction],
        height: u64,
        demote: bool,
    ) -> RegistryResult<Vec<SlashOutcome>> {
        Self::validate(ledger, graph, instructions)?;

        let mut originals: Vec<(Address, Registrant)> = Vec::new();
        for instruction in instructions {
            if !originals.iter().any(|(a, _)| *a == instruction.registrant) {
                let record = ledger.require(&instruction.registrant)?.clone();
                originals.push((instruction.registrant, record));
            }
        }

        let mut outcomes = Vec::with_capacity(instructions.len());
        let mut total: u128 = 0;
        for instruction in instructions {
            let amount = match ledger.slash(instruction.registrant, instruction.amount) {
                Ok(amount) => amount,
                Err(e) => {
                    Self::rollback(ledger, originals);
                    return Err(e);
                }
            };
            total = total.saturating_add(amount);
            outcomes.push(SlashOutcome {
                registrant: instruction.registrant,
                proposer: instruction.proposer,
                amount,
            });
        }

        if total > 0 {
            if let Err(e) = custody.burn(total) {
                warn!(error = %e, amount = total, "Burning slashed collateral failed, reverting");
                Self::rollback(ledger, originals);
                return Err(e.into());
            }
        }

        for outcome in &outcomes {
            if let Some(proposer) = graph.get_mut(&outcome.proposer) {
                proposer.total_slashed = proposer.total_slashed.saturating_add(outcome.amount);
                proposer.penalties.push(PenaltyRecord {
                    height,
                    registrant: outcome.registrant,
                    amount: outcome.amount,
                    evidence_id,
                });
                if demote {
                    proposer.status = ProposerStatus::NotPreconfer;
                }
            }

            info!(
                registrant = %outcome.registrant,
                proposer = %outcome.proposer,
                amount = outcome.amount,
                evidence = %evidence_id,
                "Registrant slashed"
            );
        }

        Ok(outcomes)
    }

    fn validate(
        ledger: &StakeLedger,
        graph: &DelegationGraph,
        instructions: &[SlashInstruction],
    ) -> RegistryResult<()> {
        for instruction in instructions {
            if instruction.amount == 0 {
                return Err(RegistryError::InvalidAmount);
            }

            let registrant = ledger.require(&instruction.registrant)?;
            let backs = registrant.delegates_to(&instruction.proposer)
                && graph
                    .get(&instruction.proposer)
                    .is_some_and(|p| p.delegated_by.contains(&instruction.registrant));
            if !backs {
                return Err(RegistryError::NotDelegated {
                    registrant: instruction.registrant,
                    proposer: instruction.proposer,
                });
            }
        }
        Ok(())
    }

    fn rollback(ledger: &mut StakeLedger, originals: Vec<(Address, Registrant)>) {
        for (address, record) in originals {
            ledger.restore(address, record);
        }
    }
}
