//! Keccak-256 hashing for identifiers and attestations
//!
//! Every digest in qbridge goes through this module: asset and submission identifiers,
//! attestation payload digests, and the derivation of an attestor identity from its public key.
//! Keeping a single entry point means the identifier scheme and the signature scheme can never
//! drift onto different hash functions.
//!
//! # Usage
//!
//! ```
//! use qbridge_core::hash;
//!
//! let digest = hash::keccak256(b"hello world");
//! assert_eq!(digest.len(), 32);
//! ```
//!
//! For packed multi-field encodings:
//!
//! ```
//! use qbridge_core::hash;
//!
//! let mut h = hash::hasher();
//! h.update(b"hello");
//! h.update(b" world");
//! assert_eq!(h.finalize(), hash::keccak256(b"hello world"));
//! ```

use sha3::{Digest, Keccak256};

/// Hash arbitrary bytes to a 32-byte Keccak-256 digest.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut output = [0u8; 32];
    output.copy_from_slice(&Keccak256::digest(data));
    output
}

/// Create an incremental Keccak-256 hasher.
pub fn hasher() -> PackedHasher {
    PackedHasher(Keccak256::new())
}

/// Incremental hasher over a packed (delimiter-free) concatenation of fields.
#[derive(Debug, Clone, Default)]
pub struct PackedHasher(Keccak256);

impl PackedHasher {
    /// Append raw bytes.
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.0.update(data);
        self
    }

    /// Append an unsigned integer as a 32-byte big-endian word.
    pub fn update_word(&mut self, value: u128) -> &mut Self {
        self.0.update(word(value));
        self
    }

    /// Consume the hasher and return the digest.
    pub fn finalize(self) -> [u8; 32] {
        let mut output = [0u8; 32];
        output.copy_from_slice(&self.0.finalize());
        output
    }
}

/// Left-pad an integer into a 32-byte big-endian word.
pub fn word(value: u128) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[16..].copy_from_slice(&value.to_be_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_known_digest() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_incremental_matches_one_shot() {
        let mut h = hasher();
        h.update(b"qbridge").update_word(7);
        let mut packed = b"qbridge".to_vec();
        packed.extend_from_slice(&word(7));
        assert_eq!(h.finalize(), keccak256(&packed));
    }

    #[test]
    fn test_word_is_left_padded() {
        let w = word(0x0102);
        assert!(w[..30].iter().all(|b| *b == 0));
        assert_eq!(&w[30..], &[0x01, 0x02]);
    }
}
