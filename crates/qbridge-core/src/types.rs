//! Fixed-width primitives and typed identifiers
//!
//! Hashes and addresses render as `0x`-prefixed lowercase hex and parse from hex with or
//! without the prefix. Their serde form is the same hex string, so they read naturally in TOML
//! configuration and JSON event dumps.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::hash;

/// Token amount in the smallest unit of the asset.
pub type Amount = u128;

fn parse_fixed<const N: usize>(s: &str) -> Result<[u8; N], hex::FromHexError> {
    let hex_str = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(hex_str)?;
    if bytes.len() != N {
        return Err(hex::FromHexError::InvalidStringLength);
    }
    let mut array = [0u8; N];
    array.copy_from_slice(&bytes);
    Ok(array)
}

macro_rules! hex_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(de::Error::custom)
            }
        }
    };
}

/// 32-byte digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash32(pub [u8; 32]);

impl Hash32 {
    /// Wrap raw digest bytes
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Borrow the raw bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Hash32 {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_fixed::<32>(s).map(Self)
    }
}

hex_serde!(Hash32);

/// 20-byte account identity on a ledger.
///
/// Attestor identities are derived from secp256k1 public keys the Ethereum way: the last
/// 20 bytes of the Keccak-256 digest of the uncompressed key without its `0x04` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The all-zero address. As a token reference it denotes the ledger's native currency.
    pub const NATIVE: Address = Address([0u8; 20]);

    /// Wrap raw address bytes
    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Derive an address from a 64-byte uncompressed public key body (x || y).
    pub fn from_public_key(key: &[u8; 64]) -> Self {
        let digest = hash::keccak256(key);
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest[12..]);
        Self(bytes)
    }

    /// Borrow the raw bytes
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Whether this is the all-zero address
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_fixed::<20>(s).map(Self)
    }
}

hex_serde!(Address);

/// Chain identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl ChainId {
    /// Raw numeric value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for ChainId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a bridged asset: a digest of its native chain and native token reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(pub Hash32);

impl AssetId {
    /// Borrow the raw bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for AssetId {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Identifier of one transfer event, the unit of replay protection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(pub Hash32);

impl SubmissionId {
    /// Borrow the raw bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SubmissionId {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Which settlement an attestation vouches for.
///
/// Mint attestations confirm a `send` observed on the native chain; burn attestations confirm a
/// `burn` observed on a wrapped chain and gate `claim`. The two live in separate vote tables and
/// carry different payload tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttestationKind {
    /// Confirms a lock on the native chain
    Mint,
    /// Confirms a burn on a wrapped chain
    Burn,
}

impl AttestationKind {
    /// Signature of the relay call this attestation authorizes
    pub fn call_signature(self) -> &'static str {
        match self {
            AttestationKind::Mint => "submitMint(bytes32)",
            AttestationKind::Burn => "submitBurn(bytes32)",
        }
    }

    /// Four-byte operation tag embedded in the attestation payload
    pub fn tag(self) -> [u8; 4] {
        let digest = hash::keccak256(self.call_signature().as_bytes());
        [digest[0], digest[1], digest[2], digest[3]]
    }
}

impl fmt::Display for AttestationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttestationKind::Mint => write!(f, "mint"),
            AttestationKind::Burn => write!(f, "burn"),
        }
    }
}

impl FromStr for AttestationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mint" => Ok(AttestationKind::Mint),
            "burn" | "claim" => Ok(AttestationKind::Burn),
            other => Err(format!("unknown attestation kind: {other}")),
        }
    }
}

/// Who is calling and what native value travels with the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    /// Transacting identity
    pub caller: Address,
    /// Native currency attached to the call
    pub value: Amount,
}

impl CallContext {
    /// A call carrying no native value
    pub fn new(caller: Address) -> Self {
        Self { caller, value: 0 }
    }

    /// Attach native value to the call
    pub fn with_value(mut self, value: Amount) -> Self {
        self.value = value;
        self
    }
}

impl From<Address> for CallContext {
    fn from(caller: Address) -> Self {
        Self::new(caller)
    }
}
