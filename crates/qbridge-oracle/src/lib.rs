//! # qbridge oracle
//!
//! Gates every mint and claim on a quorum of independent attestors.
//!
//! ## Architecture
//!
//! - **payload**: the canonical byte string an attestor signs for one submission
//! - **recovery**: secp256k1 public key recovery from a relayed signature
//! - **signer**: attestor-side signing keys (off-ledger tooling and tests)
//! - **quorum**: per-submission vote accumulation with the one-time confirmation flip
//!
//! ## Attestation flow
//!
//! 1. A `send` or `burn` emits a submission identifier on the source ledger
//! 2. Each attestor signs `build_attestation_payload(prefix, kind, id)` off-ledger
//! 3. A relayer carries the `(prefix, signature)` pairs to `submit_*_attestations`
//! 4. The quorum ledger recovers each signer, checks the attestor role and counts the vote
//!
//! Attestors holding credentials on this ledger can skip the relay and vote directly with
//! `submit_mint` / `submit_burn`. Both paths share one vote routine and reject replays the same
//! way.

pub mod payload;
pub mod quorum;
pub mod recovery;
pub mod signer;

pub use payload::{attestation_digest, build_attestation_payload, Attestation, ATTESTATION_SUFFIX};
pub use quorum::{QuorumLedger, QuorumThreshold, SharedQuorum, VoteOutcome, VoteTally};
pub use recovery::{recover_attestor, AttestationSignature};
pub use signer::AttestorKey;
