//! Registry state store
//!
//! [`PreconfRegistry`] owns the whole registry state and applies operations one at
//! a time. Each operation either completes or returns an error with the state left
//! untouched. Block height only moves when the host calls
//! [`PreconfRegistry::advance_to`].

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use crate::custody::ValueCustody;
use crate::delegation::DelegationGraph;
use crate::eligibility::{EligibilityEngine, StatusUpdate};
use crate::error::{RegistryError, RegistryResult};
use crate::events::RegistryEvent;
use crate::exit::ExitState;
use crate::ledger::{DepositReceipt, StakeLedger};
use crate::params::RegistryParams;
use crate::penalty::{EvidenceVerifier, PenaltyEvidence, PenaltyHook, SlashOutcome};
use crate::types::{Proposer, ProposerStatus, Registrant};

/// Everything the registry persists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryState {
    /// Last block height supplied by the host
    pub height: u64,
    /// Registrant records
    pub ledger: StakeLedger,
    /// Proposer records
    pub graph: DelegationGraph,
    /// Identifiers of evidence already applied
    pub processed_evidence: BTreeSet<B256>,
}

/// The delegation-and-eligibility registry.
#[derive(Debug)]
pub struct PreconfRegistry {
    params: RegistryParams,
    state: RegistryState,
    events: Vec<RegistryEvent>,
}

impl PreconfRegistry {
    /// Create an empty registry at height 0.
    pub fn new(params: RegistryParams) -> Self {
        Self::from_state(params, RegistryState::default())
    }

    /// Resume a registry from persisted state.
    pub fn from_state(params: RegistryParams, state: RegistryState) -> Self {
        Self {
            params,
            state,
            events: Vec::new(),
        }
    }

    /// Construction parameters.
    pub fn params(&self) -> &RegistryParams {
        &self.params
    }

    /// Current state, for persistence.
    pub fn state(&self) -> &RegistryState {
        &self.state
    }

    /// Consume the registry and return its state.
    pub fn into_state(self) -> RegistryState {
        self.state
    }

    /// Height all operations are evaluated at.
    pub fn current_height(&self) -> u64 {
        self.state.height
    }

    /// Move the block clock forward to `height`.
    pub fn advance_to(&mut self, height: u64) -> RegistryResult<()> {
        if height < self.state.height {
            return Err(RegistryError::HeightRegression {
                current: self.state.height,
                requested: height,
            });
        }
        self.state.height = height;
        Ok(())
    }

    /// Credit `amount` of collateral to `registrant`.
    ///
    /// The host must already hold the deposited value.
    pub fn deposit(&mut self, registrant: Address, amount: u128) -> RegistryResult<DepositReceipt> {
        let receipt = self.state.ledger.deposit(
            registrant,
            amount,
            self.state.height,
            self.params.activation_delay,
        )?;

        info!(
            registrant = %registrant,
            amount,
            balance = receipt.balance,
            entered_at = receipt.entered_at,
            "Collateral deposited"
        );

        self.events.push(RegistryEvent::Deposited {
            registrant,
            amount,
            balance: receipt.balance,
            entered_at: receipt.entered_at,
        });
        Ok(receipt)
    }

    /// Declare that `registrant`'s collateral backs each of `proposers`.
    ///
    /// Does not recompute any status.
    pub fn delegate(
        &mut self,
        registrant: Address,
        proposers: &[Address],
    ) -> RegistryResult<Vec<Address>> {
        let added = self.state.graph.delegate(
            &mut self.state.ledger,
            registrant,
            proposers,
            self.params.duplicate_delegations,
        )?;

        info!(
            registrant = %registrant,
            requested = proposers.len(),
            added = added.len(),
            "Delegation recorded"
        );

        if !added.is_empty() {
            self.events.push(RegistryEvent::Delegated {
                registrant,
                proposers: added.clone(),
            });
        }
        Ok(added)
    }

    /// Recompute status and effective collateral of each named proposer.
    ///
    /// Permissionless. Unknown proposers are skipped.
    pub fn update_status(&mut self, proposers: &[Address]) -> Vec<StatusUpdate> {
        let updates = EligibilityEngine::update_status(
            &mut self.state.graph,
            &self.state.ledger,
            proposers,
            self.state.height,
            self.params.minimum_collateral,
            self.params.exiting_collateral,
        );

        for update in &updates {
            self.events.push(RegistryEvent::StatusUpdated {
                proposer: update.proposer,
                effective_collateral: update.effective_collateral,
                status: update.status,
            });
        }
        updates
    }

    /// Earmark `amount` of `registrant`'s balance for withdrawal.
    pub fn initiate_exit(&mut self, registrant: Address, amount: u128) -> RegistryResult<()> {
        let height = self.state.height;
        let amount_exiting = self.state.ledger.initiate_exit(
            registrant,
            amount,
            height,
            self.params.exit_requests,
        )?;

        info!(
            registrant = %registrant,
            amount,
            amount_exiting,
            initiated_at = height,
            withdrawable_at = crate::exit::ready_at(height, self.params.exit_delay),
            "Exit initiated"
        );

        self.events.push(RegistryEvent::ExitInitiated {
            registrant,
            amount_exiting,
            initiated_at: height,
        });
        Ok(())
    }

    /// Release `registrant`'s matured exit to `recipient`.
    ///
    /// The ledger reaches its post-withdrawal values before `custody` is asked to
    /// transfer. If the transfer fails the record is restored and the error returned.
    pub fn withdraw<C: ValueCustody + ?Sized>(
        &mut self,
        registrant: Address,
        recipient: Address,
        custody: &mut C,
    ) -> RegistryResult<u128> {
        let original = self.state.ledger.require(&registrant)?.clone();
        let amount = self.state.ledger.complete_withdrawal(
            registrant,
            self.state.height,
            self.params.exit_delay,
        )?;

        if let Err(e) = custody.release(recipient, amount) {
            warn!(
                registrant = %registrant,
                recipient = %recipient,
                amount,
                error = %e,
                "Withdrawal transfer failed, reverting"
            );
            self.state.ledger.restore(registrant, original);
            return Err(e.into());
        }

        info!(
            registrant = %registrant,
            recipient = %recipient,
            amount,
            "Collateral withdrawn"
        );

        self.events.push(RegistryEvent::Withdrawn {
            registrant,
            recipient,
            amount,
        });
        Ok(amount)
    }

    /// Apply a penalty once `verifier` accepts `evidence`.
    pub fn apply_penalty<V, C>(
        &mut self,
        evidence: &PenaltyEvidence,
        verifier: &V,
        custody: &mut C,
    ) -> RegistryResult<Vec<SlashOutcome>>
    where
        V: EvidenceVerifier + ?Sized,
        C: ValueCustody + ?Sized,
    {
        if !self.params.penalties_enabled {
            return Err(RegistryError::PenaltiesDisabled);
        }

        let evidence_id = evidence.id();
        if self.state.processed_evidence.contains(&evidence_id) {
            return Err(RegistryError::EvidenceAlreadyProcessed(evidence_id));
        }

        let instructions = verifier.verify(evidence).map_err(|e| {
            warn!(
                proposer = %evidence.proposer,
                submitter = %evidence.submitter,
                error = %e,
                "Penalty evidence rejected"
            );
            e
        })?;

        let outcomes = PenaltyHook::apply(
            &mut self.state.ledger,
            &mut self.state.graph,
            custody,
            evidence_id,
            &instructions,
            self.state.height,
            self.params.demote_on_penalty,
        )?;

        self.state.processed_evidence.insert(evidence_id);
        for outcome in &outcomes {
            self.events.push(RegistryEvent::Slashed {
                registrant: outcome.registrant,
                proposer: outcome.proposer,
                amount: outcome.amount,
                evidence_id,
            });
        }
        Ok(outcomes)
    }

    /// Registrant record, if the account ever deposited.
    pub fn get_registrant_info(&self, registrant: &Address) -> Option<Registrant> {
        self.state.ledger.get(registrant).cloned()
    }

    /// Proposer record, if the account was ever delegated to.
    pub fn get_proposer_info(&self, proposer: &Address) -> Option<Proposer> {
        self.state.graph.get(proposer).cloned()
    }

    /// Cached status from the last recompute; `UNREGISTERED` for unknown accounts.
    pub fn get_proposer_status(&self, proposer: &Address) -> ProposerStatus {
        self.state
            .graph
            .get(proposer)
            .map(|p| p.status)
            .unwrap_or_default()
    }

    /// Cached effective collateral from the last recompute; 0 for unknown accounts.
    pub fn get_effective_collateral(&self, proposer: &Address) -> u128 {
        self.state
            .graph
            .get(proposer)
            .map(|p| p.effective_collateral)
            .unwrap_or(0)
    }

    /// Exit state of a registrant.
    pub fn exit_state(&self, registrant: &Address) -> Option<ExitState> {
        self.state
            .ledger
            .get(registrant)
            .map(|r| ExitState::of(r, self.params.exit_delay))
    }

    /// Sum of all registrant balances.
    pub fn total_collateral(&self) -> u128 {
        self.state.ledger.total_collateral()
    }

    /// Drain the event journal.
    ///
    /// Events accumulate without limit until drained, so hosts should call this
    /// after each batch of operations.
    pub fn take_events(&mut self) -> Vec<RegistryEvent> {
        let events = std::mem::take(&mut self.events);
        debug!(count = events.len(), "Registry events drained");
        events
    }
}
