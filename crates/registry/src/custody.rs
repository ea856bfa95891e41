//! Value custody seam
//!
//! The registry never moves value itself. Withdrawals and penalties are paid out
//! through a [`ValueCustody`] supplied by the host, and only after the ledger holds
//! its final post-operation values.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors reported by a custody implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CustodyError {
    /// Custody holds less than the requested amount
    #[error("custody underfunded: requested {requested}, held {held}")]
    Underfunded {
        /// Amount requested
        requested: u128,
        /// Amount held
        held: u128,
    },

    /// The recipient refused or could not receive the transfer
    #[error("transfer to {0} rejected")]
    Rejected(Address),

    /// Arithmetic overflow in the custody accounts
    #[error("custody balance overflow")]
    Overflow,
}

/// Moves value out of the registry's control.
pub trait ValueCustody {
    /// Pay `amount` to `recipient`.
    fn release(&mut self, recipient: Address, amount: u128) -> Result<(), CustodyError>;

    /// Destroy `amount` of held value (slashing).
    fn burn(&mut self, amount: u128) -> Result<(), CustodyError>;
}

/// In-memory custody: a held pool plus the external balances paid out of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryCustody {
    held: u128,
    burned: u128,
    paid_out: BTreeMap<Address, u128>,
}

impl InMemoryCustody {
    /// Create an empty custody.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `amount` entering custody with a deposit.
    pub fn fund(&mut self, amount: u128) -> Result<(), CustodyError> {
        self.held = self.held.checked_add(amount).ok_or(CustodyError::Overflow)?;
        Ok(())
    }

    /// Value currently held.
    pub fn held(&self) -> u128 {
        self.held
    }

    /// Value destroyed by penalties.
    pub fn burned(&self) -> u128 {
        self.burned
    }

    /// External balance received by `account`.
    pub fn balance_of(&self, account: &Address) -> u128 {
        self.paid_out.get(account).copied().unwrap_or(0)
    }

    fn take(&mut self, amount: u128) -> Result<(), CustodyError> {
        if amount > self.held {
            return Err(CustodyError::Underfunded {
                requested: amount,
                held: self.held,
            });
        }
        self.held -= amount;
        Ok(())
    }
}

impl ValueCustody for InMemoryCustody {
    fn release(&mut self, recipient: Address, amount: u128) -> Result<(), CustodyError> {
        let credited = self
            .balance_of(&recipient)
            .checked_add(amount)
            .ok_or(CustodyError::Overflow)?;
        self.take(amount)?;
        self.paid_out.insert(recipient, credited);
        Ok(())
    }

    fn burn(&mut self, amount: u128) -> Result<(), CustodyError> {
        let burned = self.burned.checked_add(amount).ok_or(CustodyError::Overflow)?;
        self.take(amount)?;
        self.burned = burned;
        Ok(())
    }
}
