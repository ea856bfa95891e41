//! Registry records
//!
//! [`Registrant`] and [`Proposer`] are the two persisted record kinds. Records are
//! created on first deposit / first delegation and are never deleted, so history such
//! as `entered_at` and the delegation lists survive a full withdrawal.

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-account collateral record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registrant {
    /// Collateral held by the registry for this account
    pub balance: u128,
    /// Reserved for future use; always zero
    pub frozen_balance: u128,
    /// Height from which this stake counts toward eligibility
    pub entered_at: u64,
    /// Height of the pending exit request, 0 if none
    pub exit_initiated_at: u64,
    /// Collateral earmarked for withdrawal, 0 if none
    pub amount_exiting: u128,
    /// Proposers named by this registrant, in delegation order
    pub delegated_proposers: Vec<Address>,
}

impl Registrant {
    /// Balance not earmarked by a pending exit.
    pub fn free_balance(&self) -> u128 {
        self.balance.saturating_sub(self.amount_exiting)
    }

    /// Whether the stake counts at `height`.
    pub fn is_active_at(&self, height: u64) -> bool {
        height >= self.entered_at
    }

    /// Whether an exit request is pending.
    pub fn has_pending_exit(&self) -> bool {
        self.amount_exiting > 0
    }

    /// Whether this registrant already names `proposer`.
    pub fn delegates_to(&self, proposer: &Address) -> bool {
        self.delegated_proposers.contains(proposer)
    }
}

/// Cached eligibility classification of a proposer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProposerStatus {
    /// Never delegated to
    #[default]
    Unregistered,
    /// Known, but below the collateral threshold as of the last recompute
    NotPreconfer,
    /// At or above the collateral threshold as of the last recompute
    Preconfer,
}

impl ProposerStatus {
    /// Whether the proposer may issue preconfirmations.
    pub fn is_preconfer(&self) -> bool {
        matches!(self, ProposerStatus::Preconfer)
    }
}

impl fmt::Display for ProposerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProposerStatus::Unregistered => write!(f, "UNREGISTERED"),
            ProposerStatus::NotPreconfer => write!(f, "NOT_PRECONFER"),
            ProposerStatus::Preconfer => write!(f, "PRECONFER"),
        }
    }
}

/// Single applied penalty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyRecord {
    /// Height at which the penalty was applied
    pub height: u64,
    /// Registrant whose balance was reduced
    pub registrant: Address,
    /// Amount actually removed
    pub amount: u128,
    /// Identifier of the evidence that caused it
    pub evidence_id: B256,
}

/// Per-proposer delegation and eligibility record.
///
/// `status` and `effective_collateral` are cached: they are only as fresh as the last
/// `update_status` call that named this proposer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposer {
    /// Registrants that named this proposer, in delegation order
    pub delegated_by: Vec<Address>,
    /// Status as of the last recompute
    pub status: ProposerStatus,
    /// Collateral as of the last recompute
    pub effective_collateral: u128,
    /// Height of the last recompute, `None` if never recomputed
    pub last_updated_at: Option<u64>,
    /// Total collateral slashed from this proposer's backers
    pub total_slashed: u128,
    /// Applied penalties, oldest first
    pub penalties: Vec<PenaltyRecord>,
}

impl Proposer {
    /// Record created by a first delegation.
    pub fn new() -> Self {
        Self {
            delegated_by: Vec::new(),
            status: ProposerStatus::NotPreconfer,
            effective_collateral: 0,
            last_updated_at: None,
            total_slashed: 0,
            penalties: Vec::new(),
        }
    }
}

impl Default for Proposer {
    fn default() -> Self {
        Self::new()
    }
}
