//! Stake ledger
//!
//! Per-registrant collateral accounting. The ledger only adjusts its internal
//! records: value entering custody is validated by the host before `deposit` is
//! called, and value leaving custody is paid out by the registry after the ledger
//! has been finalised.

use alloy_primitives::Address;
use preconf_config::ExitRequestPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{RegistryError, RegistryResult};
use crate::exit::{check_withdrawal, plan_exit};
use crate::types::Registrant;

/// Registrant records keyed by account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeLedger {
    registrants: BTreeMap<Address, Registrant>,
}

/// Outcome of a successful deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositReceipt {
    /// Balance after the deposit
    pub balance: u128,
    /// Activation height of the registrant
    pub entered_at: u64,
    /// Whether this deposit created the record
    pub first_deposit: bool,
}

impl StakeLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a registrant.
    pub fn get(&self, registrant: &Address) -> Option<&Registrant> {
        self.registrants.get(registrant)
    }

    pub(crate) fn get_mut(&mut self, registrant: &Address) -> Option<&mut Registrant> {
        self.registrants.get_mut(registrant)
    }

    /// Look up a registrant that must exist.
    pub fn require(&self, registrant: &Address) -> RegistryResult<&Registrant> {
        self.registrants
            .get(registrant)
            .ok_or(RegistryError::NotRegistered(*registrant))
    }

    fn require_mut(&mut self, registrant: &Address) -> RegistryResult<&mut Registrant> {
        self.registrants
            .get_mut(registrant)
            .ok_or(RegistryError::NotRegistered(*registrant))
    }

    /// Iterate over all registrants in address order.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &Registrant)> {
        self.registrants.iter()
    }

    /// Number of accounts that have ever deposited.
    pub fn len(&self) -> usize {
        self.registrants.len()
    }

    /// Whether nobody has deposited yet.
    pub fn is_empty(&self) -> bool {
        self.registrants.is_empty()
    }

    /// Sum of all balances; equals the value the registry custodies.
    pub fn total_collateral(&self) -> u128 {
        self.registrants
            .values()
            .fold(0u128, |acc, r| acc.saturating_add(r.balance))
    }

    /// Credit `amount` to `registrant`.
    ///
    /// The first deposit creates the record and fixes `entered_at` to
    /// `height + activation_delay`; later deposits never move it.
    pub fn deposit(
        &mut self,
        registrant: Address,
        amount: u128,
        height: u64,
        activation_delay: u64,
    ) -> RegistryResult<DepositReceipt> {
        if amount == 0 {
            return Err(RegistryError::InvalidAmount);
        }

        let first_deposit = !self.registrants.contains_key(&registrant);
        let current = self
            .registrants
            .get(&registrant)
            .map(|r| r.balance)
            .unwrap_or(0);
        let balance = current
            .checked_add(amount)
            .ok_or(RegistryError::BalanceOverflow)?;

        let record = self
            .registrants
            .entry(registrant)
            .or_insert_with(|| Registrant {
                entered_at: height.saturating_add(activation_delay),
                ..Default::default()
            });
        record.balance = balance;

        Ok(DepositReceipt {
            balance,
            entered_at: record.entered_at,
            first_deposit,
        })
    }

    /// Earmark `amount` for withdrawal starting at `height`.
    pub fn initiate_exit(
        &mut self,
        registrant: Address,
        amount: u128,
        height: u64,
        policy: ExitRequestPolicy,
    ) -> RegistryResult<u128> {
        let record = self.require_mut(&registrant)?;
        let request = plan_exit(record, amount, height, policy)?;

        record.exit_initiated_at = request.initiated_at;
        record.amount_exiting = request.amount_exiting;
        Ok(request.amount_exiting)
    }

    /// Finalise a matured exit and return the released amount.
    ///
    /// On return the record already holds its post-withdrawal values; the caller
    /// pays the amount out afterwards.
    pub fn complete_withdrawal(
        &mut self,
        registrant: Address,
        height: u64,
        exit_delay: u64,
    ) -> RegistryResult<u128> {
        let record = self.require_mut(&registrant)?;
        let amount = check_withdrawal(record, height, exit_delay)?;

        record.balance -= amount;
        record.exit_initiated_at = 0;
        record.amount_exiting = 0;
        Ok(amount)
    }

    /// Remove up to `amount` from `registrant` outside the exit path.
    ///
    /// Returns the amount actually removed, which is capped at the balance. A
    /// pending exit is clamped so the earmarked amount never exceeds the balance.
    pub fn slash(&mut self, registrant: Address, amount: u128) -> RegistryResult<u128> {
        if amount == 0 {
            return Err(RegistryError::InvalidAmount);
        }

        let record = self.require_mut(&registrant)?;
        let slashed = amount.min(record.balance);
        record.balance -= slashed;

        if record.amount_exiting > record.balance {
            record.amount_exiting = record.balance;
        }
        if record.amount_exiting == 0 {
            record.exit_initiated_at = 0;
        }

        Ok(slashed)
    }

    /// Put back a record captured before a failed multi-step operation.
    pub(crate) fn restore(&mut self, registrant: Address, record: Registrant) {
        self.registrants.insert(registrant, record);
    }
}
