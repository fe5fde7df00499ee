//! Relayed attestation flows against the quorum ledger

use std::sync::Arc;

use assert_matches::assert_matches;
use proptest::prelude::*;
use qbridge_core::{
    asset_id, submission_id, Address, AttestationKind, BridgeError, BridgeEvent, ChainId, Role,
    SubmissionId,
};
use qbridge_oracle::{Attestation, AttestorKey, QuorumLedger};
use qbridge_testkit::{attest_all, attestor_keys, init_test_tracing, InMemoryRoles, TEST_PREFIX};

const ADMIN: Address = Address([0xad; 20]);

fn setup(keys: &[AttestorKey], threshold: u16) -> QuorumLedger<Arc<InMemoryRoles>> {
    init_test_tracing();
    let roles = Arc::new(InMemoryRoles::new().with(ADMIN, Role::Admin));
    for key in keys {
        roles.grant(key.address(), Role::Attestor);
    }
    QuorumLedger::new(roles, threshold).unwrap()
}

fn sample_submission(nonce: u64) -> SubmissionId {
    let asset = asset_id(ChainId(1), &Address([7u8; 20]));
    submission_id(&asset, 100, &Address([0x42; 20]), nonce)
}

#[test]
fn test_mint_attestation_does_not_count_for_burn() {
    let keys = attestor_keys(2);
    let mut quorum = setup(&keys, 1);
    let id = sample_submission(0);
    let mint_batch = attest_all(&keys[..1], AttestationKind::Mint, &id);

    assert_matches!(
        quorum.submit_burn_attestations(&id, &mint_batch),
        Err(BridgeError::Unauthorized { .. })
    );
    assert!(quorum.tally(AttestationKind::Burn, &id).is_none());

    quorum.submit_mint_attestations(&id, &mint_batch).unwrap();
    assert!(quorum.is_mint_confirmed(&id));
    assert!(!quorum.is_burnt_confirmed(&id));
}

#[test]
fn test_burn_attestation_does_not_count_for_mint() {
    let keys = attestor_keys(1);
    let mut quorum = setup(&keys, 1);
    let id = sample_submission(1);
    let burn_batch = attest_all(&keys, AttestationKind::Burn, &id);

    assert!(quorum.submit_mint_attestations(&id, &burn_batch).is_err());
    quorum.submit_burn_attestations(&id, &burn_batch).unwrap();
    assert!(quorum.is_burnt_confirmed(&id));
}

#[test]
fn test_attestation_for_other_submission_is_rejected() {
    let keys = attestor_keys(1);
    let mut quorum = setup(&keys, 1);
    let signed_for = sample_submission(2);
    let replayed_on = sample_submission(3);
    let batch = attest_all(&keys, AttestationKind::Mint, &signed_for);

    assert_matches!(
        quorum.submit_mint_attestations(&replayed_on, &batch),
        Err(BridgeError::Unauthorized { .. })
    );
}

#[test]
fn test_batch_with_bad_entry_changes_nothing() {
    let keys = attestor_keys(3);
    let mut quorum = setup(&keys, 3);
    let id = sample_submission(4);
    let mut batch = attest_all(&keys[..2], AttestationKind::Mint, &id);
    batch.push(Attestation::new(TEST_PREFIX.to_vec(), vec![0u8; 65]));

    assert!(quorum.submit_mint_attestations(&id, &batch).is_err());
    assert!(quorum.tally(AttestationKind::Mint, &id).is_none());
    assert!(quorum.events().is_empty());
}

#[test]
fn test_batch_with_outsider_changes_nothing() {
    let keys = attestor_keys(2);
    let outsider = AttestorKey::from_seed("outsider").unwrap();
    let mut quorum = setup(&keys, 2);
    let id = sample_submission(5);
    let first = attest_all(&keys[..1], AttestationKind::Mint, &id);
    quorum.submit_mint_attestations(&id, &first).unwrap();

    let mixed = attest_all(&[keys[1].clone(), outsider], AttestationKind::Mint, &id);
    assert_matches!(
        quorum.submit_mint_attestations(&id, &mixed),
        Err(BridgeError::Unauthorized { .. })
    );
    let tally = quorum.tally(AttestationKind::Mint, &id).unwrap();
    assert_eq!(tally.confirmations(), 1);
    assert!(!quorum.is_mint_confirmed(&id));
}

#[test]
fn test_duplicate_signer_within_batch_is_rejected() {
    let keys = attestor_keys(1);
    let mut quorum = setup(&keys, 2);
    let id = sample_submission(6);
    let once = attest_all(&keys, AttestationKind::Mint, &id);
    let twice = vec![once[0].clone(), once[0].clone()];

    assert_matches!(
        quorum.submit_mint_attestations(&id, &twice),
        Err(BridgeError::AlreadyVoted { .. })
    );
    assert!(quorum.tally(AttestationKind::Mint, &id).is_none());
}

#[test]
fn test_direct_and_relayed_votes_share_replay_protection() {
    let keys = attestor_keys(2);
    let mut quorum = setup(&keys, 2);
    let id = sample_submission(7);

    quorum.submit_mint(&keys[0].address(), &id).unwrap();
    assert_matches!(
        quorum.submit_mint_attestations(&id, &attest_all(&keys[..1], AttestationKind::Mint, &id)),
        Err(BridgeError::AlreadyVoted { .. })
    );

    let outcome = quorum
        .submit_mint_attestations(&id, &attest_all(&keys[1..], AttestationKind::Mint, &id))
        .unwrap();
    assert!(outcome.quorum_reached);
    assert_eq!(
        quorum.events().last(),
        Some(&BridgeEvent::QuorumReached {
            kind: AttestationKind::Mint,
            submission: id
        })
    );
}

#[test]
fn test_revoked_attestor_cannot_vote() {
    let keys = attestor_keys(1);
    let mut quorum = setup(&keys, 1);
    quorum.roles().revoke(&keys[0].address(), Role::Attestor);
    let id = sample_submission(8);
    assert_matches!(
        quorum.submit_mint_attestations(&id, &attest_all(&keys, AttestationKind::Mint, &id)),
        Err(BridgeError::Unauthorized { .. })
    );
}

#[test]
fn test_legacy_and_raw_recovery_ids_both_verify() {
    let keys = attestor_keys(1);
    let mut quorum = setup(&keys, 1);
    let id = sample_submission(9);
    let mut attestation = keys[0].attest(TEST_PREFIX, AttestationKind::Mint, &id).unwrap();
    attestation.signature[64] -= 27;

    quorum.submit_mint_attestations(&id, &[attestation]).unwrap();
    assert!(quorum.is_mint_confirmed(&id));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Monotonicity: once confirmed, further votes and duplicates never un-confirm or
    /// double count
    #[test]
    fn confirmation_is_monotone(
        order in Just((0usize..4).collect::<Vec<_>>()).prop_shuffle(),
        threshold in 1u16..=4,
    ) {
        let keys = attestor_keys(4);
        let mut quorum = setup(&keys, threshold);
        let id = sample_submission(100);
        let mut was_confirmed = false;
        let mut reached = 0;

        for (step, index) in order.iter().enumerate() {
            let voter = keys[*index].address();
            let outcome = quorum.submit_mint(&voter, &id).unwrap();
            reached += usize::from(outcome.quorum_reached);
            prop_assert!(quorum.submit_mint(&voter, &id).is_err());

            let tally = quorum.tally(AttestationKind::Mint, &id).unwrap();
            prop_assert_eq!(tally.confirmations() as usize, step + 1);
            prop_assert!(!was_confirmed || tally.is_confirmed());
            was_confirmed = tally.is_confirmed();
        }
        prop_assert!(was_confirmed);
        prop_assert_eq!(reached, 1);
    }
}
