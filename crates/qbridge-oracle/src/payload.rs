//! Attestation payload reconstruction
//!
//! An attestor signs a transaction-shaped byte string that calls `submitMint(id)` or
//! `submitBurn(id)` on the destination ledger. The relayer later supplies the opaque prefix the
//! attestor chose, and the ledger rebuilds the rest from fields it already trusts: the operation
//! tag for the table being populated, the submission identifier and a fixed suffix. A signature
//! therefore only ever verifies for one `(kind, submission)` pair.
//!
//! Layout, with no delimiters:
//!
//! ```text
//! prefix (variable) || tag (4) || submission id (32) || suffix (2)
//! ```

use serde::{Deserialize, Serialize};

use qbridge_core::{hash, AttestationKind, SubmissionId};

/// Fixed bytes closing every attestation payload: the empty `r` and `s` placeholders of an
/// unsigned transaction envelope.
pub const ATTESTATION_SUFFIX: [u8; 2] = [0x80, 0x80];

/// Build the exact byte string an attestor must have signed to vote for `submission`.
pub fn build_attestation_payload(
    prefix: &[u8],
    kind: AttestationKind,
    submission: &SubmissionId,
) -> Vec<u8> {
    let mut payload = Vec::with_capacity(prefix.len() + 4 + 32 + ATTESTATION_SUFFIX.len());
    payload.extend_from_slice(prefix);
    payload.extend_from_slice(&kind.tag());
    payload.extend_from_slice(submission.as_bytes());
    payload.extend_from_slice(&ATTESTATION_SUFFIX);
    payload
}

/// Digest signed by the attestor.
pub fn attestation_digest(payload: &[u8]) -> [u8; 32] {
    hash::keccak256(payload)
}

/// One relayed attestation: the attestor's chosen prefix and its 65-byte signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    /// Opaque transaction-shaped bytes preceding the tag
    #[serde(with = "hex::serde")]
    pub prefix: Vec<u8>,
    /// `r || s || v` signature over the payload digest
    #[serde(with = "hex::serde")]
    pub signature: Vec<u8>,
}

impl Attestation {
    /// Pair a prefix with its signature
    pub fn new(prefix: impl Into<Vec<u8>>, signature: impl Into<Vec<u8>>) -> Self {
        Self {
            prefix: prefix.into(),
            signature: signature.into(),
        }
    }

    /// Rebuild the payload this attestation claims to sign
    pub fn payload(&self, kind: AttestationKind, submission: &SubmissionId) -> Vec<u8> {
        build_attestation_payload(&self.prefix, kind, submission)
    }
}
