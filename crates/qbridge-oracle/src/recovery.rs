//! Attestor identity recovery
//!
//! Signatures are 65 bytes, `r (32) || s (32) || v (1)`, over the Keccak-256 digest of the
//! attestation payload. `v` may be given raw (0, 1) or with the legacy 27 offset (27, 28). The
//! recovered secp256k1 public key maps to an [`Address`] the same way accounts are derived on
//! the host chain.
//!
//! Recovery never errors: anything malformed yields `None`, which the quorum ledger treats as an
//! unauthorized signer.

use secp256k1::ecdsa::{RecoverableSignature, RecoveryId};
use secp256k1::{Message, Secp256k1};

use qbridge_core::Address;

use crate::payload::attestation_digest;

/// Encoded signature length
pub const SIGNATURE_LENGTH: usize = 65;

/// Half the secp256k1 group order; canonical signatures keep `s` at or below it.
const SECP256K1_N_HALF: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

/// Parsed `r || s || v` signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttestationSignature {
    compact: [u8; 64],
    recovery_id: u8,
}

impl AttestationSignature {
    /// Parse a 65-byte signature. Returns `None` on wrong length, a recovery id outside
    /// {0, 1, 27, 28}, a zero `r` or `s`, or a high-`s` (malleable) encoding.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != SIGNATURE_LENGTH {
            return None;
        }
        let recovery_id = match bytes[64] {
            v @ (0 | 1) => v,
            v @ (27 | 28) => v - 27,
            _ => return None,
        };
        let mut compact = [0u8; 64];
        compact.copy_from_slice(&bytes[..64]);

        let (r, s) = compact.split_at(32);
        if r.iter().all(|b| *b == 0) || s.iter().all(|b| *b == 0) {
            return None;
        }
        if s > &SECP256K1_N_HALF[..] {
            return None;
        }

        Some(Self {
            compact,
            recovery_id,
        })
    }

    /// Build from compact bytes and a raw recovery id (0 or 1)
    pub fn from_parts(compact: [u8; 64], recovery_id: u8) -> Option<Self> {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[..64].copy_from_slice(&compact);
        bytes[64] = recovery_id;
        Self::from_slice(&bytes)
    }

    /// Encode as `r || s || v` with `v` in {27, 28}
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[..64].copy_from_slice(&self.compact);
        bytes[64] = self.recovery_id + 27;
        bytes
    }

    /// Recover the signer of a 32-byte digest
    pub fn recover(&self, digest: &[u8; 32]) -> Option<Address> {
        let recid = RecoveryId::from_i32(i32::from(self.recovery_id)).ok()?;
        let signature = RecoverableSignature::from_compact(&self.compact, recid).ok()?;
        let message = Message::from_digest_slice(digest).ok()?;
        let public_key = Secp256k1::verification_only()
            .recover_ecdsa(&message, &signature)
            .ok()?;

        let uncompressed = public_key.serialize_uncompressed();
        let mut body = [0u8; 64];
        body.copy_from_slice(&uncompressed[1..]);
        Some(Address::from_public_key(&body))
    }
}

/// Recover the identity that signed `payload`, or `None` if the signature is malformed or
/// unrecoverable.
pub fn recover_attestor(payload: &[u8], signature: &[u8]) -> Option<Address> {
    let parsed = AttestationSignature::from_slice(signature)?;
    let recovered = parsed.recover(&attestation_digest(payload));
    if recovered.is_none() {
        tracing::debug!("signature did not recover to a public key");
    }
    recovered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_length_is_rejected() {
        assert!(recover_attestor(b"payload", &[1u8; 64]).is_none());
        assert!(recover_attestor(b"payload", &[1u8; 66]).is_none());
    }

    #[test]
    fn test_invalid_recovery_id_is_rejected() {
        let mut sig = [1u8; 65];
        sig[64] = 29;
        assert!(AttestationSignature::from_slice(&sig).is_none());
        sig[64] = 2;
        assert!(AttestationSignature::from_slice(&sig).is_none());
    }

    #[test]
    fn test_high_s_is_rejected() {
        let mut sig = [1u8; 65];
        sig[32..64].copy_from_slice(&[0xFF; 32]);
        sig[64] = 27;
        assert!(AttestationSignature::from_slice(&sig).is_none());
    }

    #[test]
    fn test_zero_r_is_rejected() {
        let mut sig = [0u8; 65];
        sig[32..64].copy_from_slice(&[1u8; 32]);
        assert!(AttestationSignature::from_slice(&sig).is_none());
    }

    #[test]
    fn test_legacy_and_raw_v_are_equivalent() {
        let mut raw = [1u8; 65];
        raw[64] = 1;
        let mut legacy = raw;
        legacy[64] = 28;
        assert_eq!(
            AttestationSignature::from_slice(&raw),
            AttestationSignature::from_slice(&legacy)
        );
        let parsed = AttestationSignature::from_slice(&raw).unwrap();
        assert_eq!(parsed.to_bytes()[64], 28);
    }
}
