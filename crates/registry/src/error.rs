//! Registry error types

use alloy_primitives::{Address, B256};
use thiserror::Error;

use crate::custody::CustodyError;
use crate::penalty::VerifierError;

/// Errors returned by registry operations.
///
/// Every error aborts the operation that produced it; the registry state is left
/// exactly as it was before the call.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Deposit, exit or slash amount was zero
    #[error("invalid amount: must be greater than zero")]
    InvalidAmount,

    /// Exit requested for more than the free (non-exiting) balance
    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        /// Amount requested
        requested: u128,
        /// Balance not already earmarked for exit
        available: u128,
    },

    /// Withdrawal attempted before the exit timelock elapsed
    #[error("exit not ready: withdrawable at block {ready_at}, current block {current}")]
    ExitNotReady {
        /// First height at which the withdrawal succeeds
        ready_at: u64,
        /// Height of the attempt
        current: u64,
    },

    /// Withdrawal attempted with nothing earmarked
    #[error("no exit in progress")]
    NoExitInProgress,

    /// A new exit was requested while one is pending and the policy rejects it
    #[error("exit already pending since block {initiated_at}")]
    ExitAlreadyPending {
        /// Height of the pending request
        initiated_at: u64,
    },

    /// The account has never deposited
    #[error("account is not a registrant: {0}")]
    NotRegistered(Address),

    /// Delegation to an already backed proposer while the policy rejects it
    #[error("registrant already delegates to proposer {0}")]
    DuplicateDelegation(Address),

    /// Exits cannot be requested before the first block; height 0 marks "no exit"
    #[error("exit cannot be initiated at height 0")]
    ExitAtGenesis,

    /// The host supplied a block height lower than the current one
    #[error("block height regression: current {current}, requested {requested}")]
    HeightRegression {
        /// Current registry height
        current: u64,
        /// Requested height
        requested: u64,
    },

    /// An arithmetic result does not fit in the amount type
    #[error("balance overflow")]
    BalanceOverflow,

    /// The custody failed to pay out a withdrawal
    #[error("value transfer failed: {0}")]
    Transfer(#[from] CustodyError),

    /// The evidence verifier refused the evidence
    #[error("evidence rejected: {0}")]
    Evidence(#[from] VerifierError),

    /// The same evidence was already applied
    #[error("evidence already processed: {0}")]
    EvidenceAlreadyProcessed(B256),

    /// A slash instruction names a registrant that does not back the proposer
    #[error("registrant {registrant} does not delegate to proposer {proposer}")]
    NotDelegated {
        /// Registrant named by the instruction
        registrant: Address,
        /// Proposer named by the instruction
        proposer: Address,
    },

    /// Penalties are switched off for this registry
    #[error("penalties are disabled")]
    PenaltiesDisabled,
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;
