//! Registry events
//!
//! Every successful state change is journaled as a [`RegistryEvent`]. The journal is
//! in-memory only; hosts drain it with
//! [`PreconfRegistry::take_events`](crate::PreconfRegistry::take_events).

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};

use crate::types::ProposerStatus;

/// A state change applied by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RegistryEvent {
    /// Collateral credited
    Deposited {
        /// Registrant account
        registrant: Address,
        /// Amount moved
        amount: u128,
        /// Balance after the deposit
        balance: u128,
        /// Activation height
        entered_at: u64,
    },
    /// Delegation edges added
    Delegated {
        /// Registrant account
        registrant: Address,
        /// Proposers an edge was added for
        proposers: Vec<Address>,
    },
    /// Proposer status recomputed
    StatusUpdated {
        /// Proposer account
        proposer: Address,
        /// Recomputed collateral
        effective_collateral: u128,
        /// Recomputed status
        status: ProposerStatus,
    },
    /// Exit requested
    ExitInitiated {
        /// Registrant account
        registrant: Address,
        /// Amount now earmarked
        amount_exiting: u128,
        /// Height of the request
        initiated_at: u64,
    },
    /// Matured exit paid out
    Withdrawn {
        /// Registrant account
        registrant: Address,
        /// Account paid
        recipient: Address,
        /// Amount moved
        amount: u128,
    },
    /// Penalty applied
    Slashed {
        /// Registrant account
        registrant: Address,
        /// Proposer account
        proposer: Address,
        /// Amount moved
        amount: u128,
        /// Evidence that caused the penalty
        evidence_id: B256,
    },
}
