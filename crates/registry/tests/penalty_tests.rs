//! Integration tests for the penalty hook

use alloy_primitives::{Address, Bytes};
use preconf_registry::{
    AuthorityVerifier, CustodyError, EvidenceVerifier, InMemoryCustody, PenaltyEvidence,
    PreconfRegistry, ProposerStatus, RegistryError, RegistryEvent, RegistryParams,
    RejectAllVerifier, SlashInstruction, ValueCustody, VerifierError,
};

const AUTHORITY: u8 = 0xaa;

fn addr(n: u8) -> Address {
    Address::with_last_byte(n)
}

/// Verifier that approves a fixed set of instructions
struct FixedVerifier(Vec<SlashInstruction>);

impl EvidenceVerifier for FixedVerifier {
    fn verify(&self, _evidence: &PenaltyEvidence) -> Result<Vec<SlashInstruction>, VerifierError> {
        Ok(self.0.clone())
    }
}

/// Custody that cannot burn
struct StuckCustody;

impl ValueCustody for StuckCustody {
    fn release(&mut self, _recipient: Address, _amount: u128) -> Result<(), CustodyError> {
        Ok(())
    }

    fn burn(&mut self, amount: u128) -> Result<(), CustodyError> {
        Err(CustodyError::Underfunded {
            requested: amount,
            held: 0,
        })
    }
}

fn slash(registrant: u8, proposer: u8, amount: u128) -> SlashInstruction {
    SlashInstruction {
        registrant: addr(registrant),
        proposer: addr(proposer),
        amount,
    }
}

fn evidence(instructions: &[SlashInstruction], nonce: u64) -> PenaltyEvidence {
    PenaltyEvidence {
        proposer: addr(10),
        submitter: addr(AUTHORITY),
        height: nonce,
        payload: Bytes::from(serde_json::to_vec(instructions).unwrap()),
    }
}

/// Two registrants (10 and 4 units) backing proposer 10, both active, status PRECONFER.
fn setup(params: RegistryParams) -> (PreconfRegistry, InMemoryCustody) {
    let mut registry = PreconfRegistry::new(params);
    let mut custody = InMemoryCustody::new();
    registry.advance_to(100).unwrap();

    custody.fund(14).unwrap();
    registry.deposit(addr(1), 10).unwrap();
    registry.deposit(addr(2), 4).unwrap();
    registry.delegate(addr(1), &[addr(10)]).unwrap();
    registry.delegate(addr(2), &[addr(10), addr(11)]).unwrap();

    registry.advance_to(140).unwrap();
    registry.update_status(&[addr(10), addr(11)]);
    registry.take_events();
    (registry, custody)
}

#[test]
fn test_authority_slash() {
    let (mut registry, mut custody) = setup(RegistryParams::new(12));
    assert_eq!(registry.get_proposer_status(&addr(10)), ProposerStatus::Preconfer);

    let instructions = [slash(1, 10, 3)];
    let verifier = AuthorityVerifier::new(addr(AUTHORITY));
    let outcomes = registry
        .apply_penalty(&evidence(&instructions, 1), &verifier, &mut custody)
        .unwrap();

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].amount, 3);
    assert_eq!(registry.get_registrant_info(&addr(1)).unwrap().balance, 7);
    assert_eq!(custody.burned(), 3);
    assert_eq!(custody.held(), registry.total_collateral());

    let proposer = registry.get_proposer_info(&addr(10)).unwrap();
    assert_eq!(proposer.total_slashed, 3);
    assert_eq!(proposer.penalties.len(), 1);
    assert_eq!(proposer.status, ProposerStatus::NotPreconfer);

    let events = registry.take_events();
    assert!(matches!(
        events.as_slice(),
        [RegistryEvent::Slashed { amount: 3, .. }]
    ));
}

#[test]
fn test_demotion_is_optional() {
    let mut params = RegistryParams::new(12);
    params.demote_on_penalty = false;
    let (mut registry, mut custody) = setup(params);

    let verifier = FixedVerifier(vec![slash(2, 10, 1)]);
    registry
        .apply_penalty(&evidence(&[], 1), &verifier, &mut custody)
        .unwrap();
    assert_eq!(registry.get_proposer_status(&addr(10)), ProposerStatus::Preconfer);

    // The next recompute reflects the reduced collateral
    registry.update_status(&[addr(10)]);
    assert_eq!(registry.get_effective_collateral(&addr(10)), 13);
}

#[test]
fn test_slash_capped_at_balance() {
    let (mut registry, mut custody) = setup(RegistryParams::new(1));
    let verifier = FixedVerifier(vec![slash(2, 10, 100)]);
    let outcomes = registry
        .apply_penalty(&evidence(&[], 1), &verifier, &mut custody)
        .unwrap();

    assert_eq!(outcomes[0].amount, 4);
    assert_eq!(registry.get_registrant_info(&addr(2)).unwrap().balance, 0);
    assert_eq!(custody.held(), 10);
}

#[test]
fn test_slash_keeps_exit_invariant() {
    let (mut registry, mut custody) = setup(RegistryParams::new(1));
    registry.initiate_exit(addr(1), 8).unwrap();

    let verifier = FixedVerifier(vec![slash(1, 10, 5)]);
    registry
        .apply_penalty(&evidence(&[], 1), &verifier, &mut custody)
        .unwrap();

    let info = registry.get_registrant_info(&addr(1)).unwrap();
    assert_eq!(info.balance, 5);
    assert_eq!(info.amount_exiting, 5);
    assert!(info.balance >= info.amount_exiting);
}

#[test]
fn test_unauthorized_submitter() {
    let (mut registry, mut custody) = setup(RegistryParams::new(1));
    let mut bad = evidence(&[slash(1, 10, 3)], 1);
    bad.submitter = addr(0x77);

    let verifier = AuthorityVerifier::new(addr(AUTHORITY));
    assert!(matches!(
        registry.apply_penalty(&bad, &verifier, &mut custody),
        Err(RegistryError::Evidence(VerifierError::UnauthorizedSubmitter(_)))
    ));
    assert_eq!(registry.get_registrant_info(&addr(1)).unwrap().balance, 10);
}

#[test]
fn test_reject_all_verifier() {
    let (mut registry, mut custody) = setup(RegistryParams::new(1));
    assert!(matches!(
        registry.apply_penalty(&evidence(&[], 1), &RejectAllVerifier, &mut custody),
        Err(RegistryError::Evidence(VerifierError::Unverifiable(_)))
    ));
    assert_eq!(registry.total_collateral(), 14);
}

#[test]
fn test_replayed_evidence_rejected() {
    let (mut registry, mut custody) = setup(RegistryParams::new(1));
    let verifier = AuthorityVerifier::new(addr(AUTHORITY));
    let ev = evidence(&[slash(1, 10, 1)], 1);

    registry.apply_penalty(&ev, &verifier, &mut custody).unwrap();
    assert!(matches!(
        registry.apply_penalty(&ev, &verifier, &mut custody),
        Err(RegistryError::EvidenceAlreadyProcessed(id)) if id == ev.id()
    ));
    assert_eq!(registry.get_registrant_info(&addr(1)).unwrap().balance, 9);
}

#[test]
fn test_instruction_for_non_backer_is_atomic() {
    let (mut registry, mut custody) = setup(RegistryParams::new(1));
    // addr(1) does not back proposer 11
    let verifier = FixedVerifier(vec![slash(2, 11, 1), slash(1, 11, 1)]);

    assert!(matches!(
        registry.apply_penalty(&evidence(&[], 1), &verifier, &mut custody),
        Err(RegistryError::NotDelegated { registrant, proposer })
            if registrant == addr(1) && proposer == addr(11)
    ));
    assert_eq!(registry.get_registrant_info(&addr(2)).unwrap().balance, 4);
    assert_eq!(custody.burned(), 0);

    // Nothing was recorded, so the same evidence can be retried
    let verifier = FixedVerifier(vec![slash(2, 11, 1)]);
    assert!(registry
        .apply_penalty(&evidence(&[], 1), &verifier, &mut custody)
        .is_ok());
}

#[test]
fn test_failed_burn_reverts() {
    let (mut registry, _custody) = setup(RegistryParams::new(1));
    let verifier = FixedVerifier(vec![slash(1, 10, 2), slash(2, 10, 2)]);

    assert!(matches!(
        registry.apply_penalty(&evidence(&[], 1), &verifier, &mut StuckCustody),
        Err(RegistryError::Transfer(_))
    ));
    assert_eq!(registry.get_registrant_info(&addr(1)).unwrap().balance, 10);
    assert_eq!(registry.get_registrant_info(&addr(2)).unwrap().balance, 4);
    assert_eq!(registry.get_proposer_info(&addr(10)).unwrap().total_slashed, 0);
    assert!(registry.take_events().is_empty());
}

#[test]
fn test_zero_amount_instruction() {
    let (mut registry, mut custody) = setup(RegistryParams::new(1));
    let verifier = FixedVerifier(vec![slash(1, 10, 0)]);
    assert!(matches!(
        registry.apply_penalty(&evidence(&[], 1), &verifier, &mut custody),
        Err(RegistryError::InvalidAmount)
    ));
}

#[test]
fn test_penalties_disabled() {
    let mut params = RegistryParams::new(1);
    params.penalties_enabled = false;
    let (mut registry, mut custody) = setup(params);
    let verifier = FixedVerifier(vec![slash(1, 10, 1)]);
    assert!(matches!(
        registry.apply_penalty(&evidence(&[], 1), &verifier, &mut custody),
        Err(RegistryError::PenaltiesDisabled)
    ));
}
