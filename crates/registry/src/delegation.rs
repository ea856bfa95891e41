//! Delegation graph
//!
//! Bidirectional registrant ↔ proposer edges. The registrant side lives on the
//! ledger's [`Registrant`](crate::types::Registrant) records, the proposer side
//! here. Both lists keep insertion order. There is no undelegation: a registrant
//! stops backing proposers by exiting its stake.

use alloy_primitives::Address;
use preconf_config::DuplicateDelegationPolicy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{RegistryError, RegistryResult};
use crate::ledger::StakeLedger;
use crate::types::Proposer;

/// Proposer records keyed by account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationGraph {
    proposers: BTreeMap<Address, Proposer>,
}

impl DelegationGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a proposer.
    pub fn get(&self, proposer: &Address) -> Option<&Proposer> {
        self.proposers.get(proposer)
    }

    pub(crate) fn get_mut(&mut self, proposer: &Address) -> Option<&mut Proposer> {
        self.proposers.get_mut(proposer)
    }

    /// Iterate over all proposers in address order.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &Proposer)> {
        self.proposers.iter()
    }

    /// Number of proposers that have ever been delegated to.
    pub fn len(&self) -> usize {
        self.proposers.len()
    }

    /// Whether nobody has been delegated to yet.
    pub fn is_empty(&self) -> bool {
        self.proposers.is_empty()
    }

    /// Add edges from `registrant` to each of `proposers`, in order.
    ///
    /// Proposer records are created on first delegation. Returns the proposers
    /// for which an edge was actually added, which differs from the input only
    /// under [`DuplicateDelegationPolicy::Ignore`]. Under
    /// [`DuplicateDelegationPolicy::Reject`] the call either adds every edge or
    /// none.
    pub fn delegate(
        &mut self,
        ledger: &mut StakeLedger,
        registrant: Address,
        proposers: &[Address],
        policy: DuplicateDelegationPolicy,
    ) -> RegistryResult<Vec<Address>> {
        let record = ledger
            .get_mut(&registrant)
            .ok_or(RegistryError::NotRegistered(registrant))?;

        if policy == DuplicateDelegationPolicy::Reject {
            for (i, proposer) in proposers.iter().enumerate() {
                if record.delegates_to(proposer) || proposers[..i].contains(proposer) {
                    return Err(RegistryError::DuplicateDelegation(*proposer));
                }
            }
        }

        let mut added = Vec::with_capacity(proposers.len());
        for proposer in proposers {
            if policy == DuplicateDelegationPolicy::Ignore && record.delegates_to(proposer) {
                continue;
            }

            record.delegated_proposers.push(*proposer);
            self.proposers
                .entry(*proposer)
                .or_insert_with(Proposer::new)
                .delegated_by
                .push(registrant);
            added.push(*proposer);
        }

        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::with_last_byte(n)
    }

    fn funded_ledger() -> StakeLedger {
        let mut ledger = StakeLedger::new();
        ledger.deposit(addr(1), 10, 1, 32).unwrap();
        ledger
    }

    #[test]
    fn test_delegate_requires_registrant() {
        let mut ledger = StakeLedger::new();
        let mut graph = DelegationGraph::new();
        assert!(matches!(
            graph.delegate(&mut ledger, addr(1), &[addr(2)], DuplicateDelegationPolicy::Append),
            Err(RegistryError::NotRegistered(_))
        ));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_append_keeps_duplicates() {
        let mut ledger = funded_ledger();
        let mut graph = DelegationGraph::new();
        graph
            .delegate(&mut ledger, addr(1), &[addr(2), addr(2)], DuplicateDelegationPolicy::Append)
            .unwrap();

        assert_eq!(graph.get(&addr(2)).unwrap().delegated_by, vec![addr(1), addr(1)]);
        assert_eq!(
            ledger.get(&addr(1)).unwrap().delegated_proposers,
            vec![addr(2), addr(2)]
        );
    }

    #[test]
    fn test_ignore_skips_duplicates() {
        let mut ledger = funded_ledger();
        let mut graph = DelegationGraph::new();
        let added = graph
            .delegate(
                &mut ledger,
                addr(1),
                &[addr(2), addr(3), addr(2)],
                DuplicateDelegationPolicy::Ignore,
            )
            .unwrap();

        assert_eq!(added, vec![addr(2), addr(3)]);
        assert_eq!(graph.get(&addr(2)).unwrap().delegated_by, vec![addr(1)]);
    }

    #[test]
    fn test_reject_is_all_or_nothing() {
        let mut ledger = funded_ledger();
        let mut graph = DelegationGraph::new();
        let result = graph.delegate(
            &mut ledger,
            addr(1),
            &[addr(2), addr(3), addr(2)],
            DuplicateDelegationPolicy::Reject,
        );

        assert!(matches!(result, Err(RegistryError::DuplicateDelegation(p)) if p == addr(2)));
        assert!(graph.is_empty());
        assert!(ledger.get(&addr(1)).unwrap().delegated_proposers.is_empty());
    }
}
