//! Attestor signing keys
//!
//! The ledger only ever verifies. Signing happens off-ledger in attestor tooling, and in tests
//! that need real relayed attestations.

use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use std::fmt;

use qbridge_core::{hash, Address, AttestationKind, BridgeError, Result, SubmissionId};

use crate::payload::{attestation_digest, build_attestation_payload, Attestation};
use crate::recovery::AttestationSignature;

/// secp256k1 key an attestor signs attestations with
#[derive(Clone)]
pub struct AttestorKey {
    secret: SecretKey,
    address: Address,
}

impl AttestorKey {
    /// Load from raw secret key bytes
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self> {
        let secret = SecretKey::from_slice(bytes)
            .map_err(|e| BridgeError::precondition(format!("invalid attestor secret key: {e}")))?;
        let public = PublicKey::from_secret_key(&Secp256k1::signing_only(), &secret);
        let uncompressed = public.serialize_uncompressed();
        let mut body = [0u8; 64];
        body.copy_from_slice(&uncompressed[1..]);
        Ok(Self {
            secret,
            address: Address::from_public_key(&body),
        })
    }

    /// Load from a hex-encoded secret key, with or without `0x`
    pub fn from_hex(secret: &str) -> Result<Self> {
        let trimmed = secret.trim();
        let hex_str = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(hex_str)
            .map_err(|e| BridgeError::precondition(format!("invalid attestor secret hex: {e}")))?;
        let array: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| BridgeError::precondition("attestor secret key must be 32 bytes"))?;
        Self::from_bytes(&array)
    }

    /// Deterministic key derived from a seed string. For tests and local simulations only.
    pub fn from_seed(seed: &str) -> Result<Self> {
        Self::from_bytes(&hash::keccak256(seed.as_bytes()))
    }

    /// Identity this key recovers to
    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign an arbitrary payload
    pub fn sign_payload(&self, payload: &[u8]) -> Result<AttestationSignature> {
        let message = Message::from_digest_slice(&attestation_digest(payload))
            .map_err(|e| BridgeError::precondition(format!("invalid digest: {e}")))?;
        let (recid, compact) = Secp256k1::signing_only()
            .sign_ecdsa_recoverable(&message, &self.secret)
            .serialize_compact();
        let recovery_id = u8::try_from(recid.to_i32())
            .map_err(|_| BridgeError::precondition("recovery id out of range"))?;
        AttestationSignature::from_parts(compact, recovery_id)
            .ok_or_else(|| BridgeError::precondition("signer produced a non-canonical signature"))
    }

    /// Produce a relayable attestation for `submission`
    pub fn attest(
        &self,
        prefix: &[u8],
        kind: AttestationKind,
        submission: &SubmissionId,
    ) -> Result<Attestation> {
        let payload = build_attestation_payload(prefix, kind, submission);
        let signature = self.sign_payload(&payload)?;
        Ok(Attestation::new(prefix.to_vec(), signature.to_bytes().to_vec()))
    }
}

impl fmt::Debug for AttestorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttestorKey")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recovery::recover_attestor;
    use qbridge_core::Hash32;

    #[test]
    fn test_secret_key_one_has_known_address() {
        let mut secret = [0u8; 32];
        secret[31] = 1;
        let key = AttestorKey::from_bytes(&secret).unwrap();
        assert_eq!(
            key.address().to_string(),
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }

    #[test]
    fn test_signature_recovers_signer() {
        let key = AttestorKey::from_seed("attestor-1").unwrap();
        let payload = b"some transaction bytes";
        let signature = key.sign_payload(payload).unwrap();
        assert_eq!(
            recover_attestor(payload, &signature.to_bytes()),
            Some(key.address())
        );
    }

    #[test]
    fn test_attestation_binds_kind() {
        let key = AttestorKey::from_seed("attestor-2").unwrap();
        let submission = SubmissionId(Hash32([9u8; 32]));
        let attestation = key.attest(b"prefix", AttestationKind::Mint, &submission).unwrap();

        let as_mint = attestation.payload(AttestationKind::Mint, &submission);
        let as_burn = attestation.payload(AttestationKind::Burn, &submission);
        assert_eq!(recover_attestor(&as_mint, &attestation.signature), Some(key.address()));
        assert_ne!(recover_attestor(&as_burn, &attestation.signature), Some(key.address()));
    }

    #[test]
    fn test_zero_secret_is_rejected() {
        assert!(AttestorKey::from_bytes(&[0u8; 32]).is_err());
        assert!(AttestorKey::from_hex("0x1234").is_err());
    }

    #[test]
    fn test_debug_hides_secret() {
        let key = AttestorKey::from_seed("attestor-3").unwrap();
        let rendered = format!("{key:?}");
        assert!(rendered.contains("address"));
        assert!(!rendered.contains("secret"));
    }
}
