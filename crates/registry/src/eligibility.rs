//! Eligibility engine
//!
//! Computes each proposer's effective collateral from the delegation graph and the
//! stake ledger and classifies it against the registry threshold.
//!
//! The computation is pull-based: deposits, delegations, exits and withdrawals never
//! touch the cached `status` / `effective_collateral` of a proposer. Callers that need
//! a fresh answer call [`EligibilityEngine::update_status`] for the proposers they care
//! about before reading.

use alloy_primitives::Address;
use preconf_config::ExitingCollateralPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use crate::delegation::DelegationGraph;
use crate::ledger::StakeLedger;
use crate::types::{Proposer, ProposerStatus, Registrant};

/// Result of one proposer recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// Recomputed proposer
    pub proposer: Address,
    /// New effective collateral
    pub effective_collateral: u128,
    /// New status
    pub status: ProposerStatus,
}

/// Stateless eligibility computation.
pub struct EligibilityEngine;

impl EligibilityEngine {
    /// Collateral `registrant` contributes at `height`.
    ///
    /// Zero before activation; otherwise the balance reduced according to `policy`.
    pub fn counted_collateral(
        registrant: &Registrant,
        height: u64,
        policy: ExitingCollateralPolicy,
    ) -> u128 {
        if !registrant.is_active_at(height) {
            return 0;
        }

        match policy {
            ExitingCollateralPolicy::CountFull => registrant.balance,
            ExitingCollateralPolicy::ExcludeExiting => registrant.free_balance(),
            ExitingCollateralPolicy::ExcludeRegistrant => {
                if registrant.has_pending_exit() {
                    0
                } else {
                    registrant.balance
                }
            }
        }
    }

    /// Sum of the counted collateral of every distinct delegator of `proposer`.
    ///
    /// A registrant that appears several times in `delegated_by` is counted once.
    pub fn effective_collateral(
        proposer: &Proposer,
        ledger: &StakeLedger,
        height: u64,
        policy: ExitingCollateralPolicy,
    ) -> u128 {
        let mut seen = BTreeSet::new();
        proposer
            .delegated_by
            .iter()
            .filter(|registrant| seen.insert(**registrant))
            .filter_map(|registrant| ledger.get(registrant))
            .map(|registrant| Self::counted_collateral(registrant, height, policy))
            .fold(0u128, u128::saturating_add)
    }

    /// Status for a given collateral level.
    pub fn classify(effective_collateral: u128, minimum_collateral: u128) -> ProposerStatus {
        if effective_collateral >= minimum_collateral {
            ProposerStatus::Preconfer
        } else {
            ProposerStatus::NotPreconfer
        }
    }

    /// Recompute and cache status for each named proposer.
    ///
    /// Names without a proposer record are skipped and stay `UNREGISTERED`.
    pub fn update_status(
        graph: &mut DelegationGraph,
        ledger: &StakeLedger,
        proposers: &[Address],
        height: u64,
        minimum_collateral: u128,
        policy: ExitingCollateralPolicy,
    ) -> Vec<StatusUpdate> {
        let mut updates = Vec::with_capacity(proposers.len());

        for address in proposers {
            let Some(proposer) = graph.get_mut(address) else {
                debug!(proposer = %address, "Skipping status update for unknown proposer");
                continue;
            };

            let effective_collateral = Self::effective_collateral(proposer, ledger, height, policy);
            let status = Self::classify(effective_collateral, minimum_collateral);

            proposer.effective_collateral = effective_collateral;
            proposer.status = status;
            proposer.last_updated_at = Some(height);

            debug!(
                proposer = %address,
                effective_collateral,
                status = %status,
                height,
                "Proposer status recomputed"
            );

            updates.push(StatusUpdate {
                proposer: *address,
                effective_collateral,
                status,
            });
        }

        updates
    }
}
