//! Deterministic attestor keys

use qbridge_core::{AttestationKind, SubmissionId};
use qbridge_oracle::{Attestation, AttestorKey};

/// Prefix used by fixture attestations. Any byte string works; this one is shaped like the
/// start of an unsigned transaction envelope.
pub const TEST_PREFIX: &[u8] = &[0xf8, 0x6b, 0x80, 0x84, 0x3b, 0x9a, 0xca, 0x00];

/// `count` attestor keys derived from the seeds `attestor-0`, `attestor-1`, ...
pub fn attestor_keys(count: usize) -> Vec<AttestorKey> {
    (0..count)
        .map(|i| {
            AttestorKey::from_seed(&format!("attestor-{i}"))
                .expect("keccak of a seed string is a valid secret key")
        })
        .collect()
}

/// One attestation per key for `submission`, using [`TEST_PREFIX`]
pub fn attest_all(
    keys: &[AttestorKey],
    kind: AttestationKind,
    submission: &SubmissionId,
) -> Vec<Attestation> {
    keys.iter()
        .map(|key| {
            key.attest(TEST_PREFIX, kind, submission)
                .expect("signing with a valid key succeeds")
        })
        .collect()
}
