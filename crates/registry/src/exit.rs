//! Exit lifecycle
//!
//! Each registrant's stake moves between two states:
//!
//! ```text
//!            initiate_exit                      withdraw (height >= initiated + EXIT_DELAY)
//!  ACTIVE  ----------------->  EXIT_PENDING  ------------------------------------------->  ACTIVE
//! ```
//!
//! There is no terminal state; a registrant may go through the cycle any number of times.
//! The pending marker is `amount_exiting > 0`, and `exit_initiated_at` is nonzero exactly
//! when it is set, so exits are refused at height 0. The functions here only decide; the
//! ledger applies the result so a rejected request never touches the record.

use preconf_config::ExitRequestPolicy;
use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, RegistryResult};
use crate::types::Registrant;

/// Observable exit state of a registrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ExitState {
    /// No exit pending
    Active,
    /// Exit requested, funds earmarked
    ExitPending {
        /// Height of the request
        initiated_at: u64,
        /// Earmarked amount
        amount: u128,
        /// First height at which `withdraw` succeeds
        ready_at: u64,
    },
}

impl ExitState {
    /// Derive the state of `registrant` under `exit_delay`.
    pub fn of(registrant: &Registrant, exit_delay: u64) -> Self {
        if registrant.has_pending_exit() {
            ExitState::ExitPending {
                initiated_at: registrant.exit_initiated_at,
                amount: registrant.amount_exiting,
                ready_at: ready_at(registrant.exit_initiated_at, exit_delay),
            }
        } else {
            ExitState::Active
        }
    }

    /// Whether a withdrawal would succeed at `height`.
    pub fn is_withdrawable_at(&self, height: u64) -> bool {
        match self {
            ExitState::Active => false,
            ExitState::ExitPending { ready_at, .. } => height >= *ready_at,
        }
    }
}

/// Accepted exit request, ready to be written to the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ExitRequest {
    pub initiated_at: u64,
    pub amount_exiting: u128,
}

/// First height at which an exit requested at `initiated_at` may be withdrawn.
pub fn ready_at(initiated_at: u64, exit_delay: u64) -> u64 {
    initiated_at.saturating_add(exit_delay)
}

/// Decide a new exit request of `amount` at `height`.
pub(crate) fn plan_exit(
    registrant: &Registrant,
    amount: u128,
    height: u64,
    policy: ExitRequestPolicy,
) -> RegistryResult<ExitRequest> {
    if amount == 0 {
        return Err(RegistryError::InvalidAmount);
    }

    if registrant.has_pending_exit() && policy == ExitRequestPolicy::Reject {
        return Err(RegistryError::ExitAlreadyPending {
            initiated_at: registrant.exit_initiated_at,
        });
    }

    let available = registrant.free_balance();
    if amount > available {
        return Err(RegistryError::InsufficientBalance {
            requested: amount,
            available,
        });
    }

    if height == 0 {
        return Err(RegistryError::ExitAtGenesis);
    }

    let amount_exiting = match policy {
        ExitRequestPolicy::Accumulate => registrant
            .amount_exiting
            .checked_add(amount)
            .ok_or(RegistryError::BalanceOverflow)?,
        ExitRequestPolicy::Overwrite | ExitRequestPolicy::Reject => amount,
    };

    Ok(ExitRequest {
        initiated_at: height,
        amount_exiting,
    })
}

/// Amount releasable at `height`, or why the withdrawal must fail.
pub(crate) fn check_withdrawal(
    registrant: &Registrant,
    height: u64,
    exit_delay: u64,
) -> RegistryResult<u128> {
    if !registrant.has_pending_exit() {
        return Err(RegistryError::NoExitInProgress);
    }

    let ready = ready_at(registrant.exit_initiated_at, exit_delay);
    if height < ready {
        return Err(RegistryError::ExitNotReady {
            ready_at: ready,
            current: height,
        });
    }

    Ok(registrant.amount_exiting)
}
