//! # Preconf Registry
//!
//! Stake-based delegation and eligibility registry for preconfirmation proposers.
//!
//! Registrants lock collateral and delegate it to block proposers. Anyone can ask the
//! registry to recompute whether a proposer currently carries enough activated,
//! delegated collateral to be trusted with preconfirmations.
//!
//! This crate provides:
//! - [`StakeLedger`] - Per-registrant collateral accounting
//! - [`exit`] - The timelocked exit/withdraw protocol
//! - [`DelegationGraph`] - Registrant ↔ proposer edges
//! - [`EligibilityEngine`] - Pull-based effective collateral and status
//! - [`PenaltyHook`] - Slashing driven by an external [`EvidenceVerifier`]
//! - [`PreconfRegistry`] - The state store tying them together
//!
//! ## Staleness
//!
//! A proposer's status and effective collateral are cached. They change only when
//! [`PreconfRegistry::update_status`] names the proposer (or a penalty demotes it);
//! deposits, delegations and exits never refresh them.
//!
//! ## Example
//!
//! ```rust
//! use alloy_primitives::Address;
//! use preconf_registry::{InMemoryCustody, PreconfRegistry, ProposerStatus, RegistryParams};
//!
//! let registrant = Address::with_last_byte(1);
//! let proposer = Address::with_last_byte(2);
//!
//! let mut registry = PreconfRegistry::new(RegistryParams::new(1));
//! registry.advance_to(100).unwrap();
//! registry.deposit(registrant, 2).unwrap();
//! registry.delegate(registrant, &[proposer]).unwrap();
//!
//! registry.advance_to(132).unwrap();
//! registry.update_status(&[proposer]);
//! assert_eq!(registry.get_proposer_status(&proposer), ProposerStatus::Preconfer);
//!
//! let mut custody = InMemoryCustody::new();
//! custody.fund(2).unwrap();
//! registry.initiate_exit(registrant, 1).unwrap();
//! registry.advance_to(164).unwrap();
//! registry.withdraw(registrant, registrant, &mut custody).unwrap();
//! assert_eq!(custody.balance_of(&registrant), 1);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod custody;
pub mod delegation;
pub mod eligibility;
pub mod error;
pub mod events;
pub mod exit;
pub mod ledger;
pub mod params;
pub mod penalty;
pub mod registry;
pub mod shared;
pub mod store;
pub mod types;

// Re-export main types at crate root
pub use custody::{CustodyError, InMemoryCustody, ValueCustody};
pub use delegation::DelegationGraph;
pub use eligibility::{EligibilityEngine, StatusUpdate};
pub use error::{RegistryError, RegistryResult};
pub use events::RegistryEvent;
pub use exit::ExitState;
pub use ledger::{DepositReceipt, StakeLedger};
pub use params::RegistryParams;
pub use penalty::{
    AuthorityVerifier, EvidenceVerifier, PenaltyEvidence, PenaltyHook, RejectAllVerifier,
    SlashInstruction, SlashOutcome, VerifierError,
};
pub use preconf_config::{
    DuplicateDelegationPolicy, ExitRequestPolicy, ExitingCollateralPolicy,
    DEFAULT_ACTIVATION_DELAY as ACTIVATION_DELAY, DEFAULT_EXIT_DELAY as EXIT_DELAY,
};
pub use registry::{PreconfRegistry, RegistryState};
pub use shared::SharedRegistry;
pub use store::{Snapshot, StateStore, StoreError, StoreResult, SNAPSHOT_VERSION};
pub use types::{PenaltyRecord, Proposer, ProposerStatus, Registrant};
