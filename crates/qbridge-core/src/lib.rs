//! # qbridge core
//!
//! Shared vocabulary for the bridge ledger and the oracle quorum.
//!
//! ## Architecture
//!
//! - **types**: fixed-width primitives (`Hash32`, `Address`, `ChainId`) and the typed identifiers
//!   built on them (`AssetId`, `SubmissionId`)
//! - **hash**: the single Keccak-256 entry point used for identifiers, payload digests and
//!   attestor identities
//! - **identifiers**: the deterministic asset / submission identifier scheme
//! - **effects**: traits for the external collaborators (roles, fungible tokens, confirmation
//!   source) injected into the ledgers
//! - **events**: the append-only event log every state transition writes to
//! - **config**: `BridgeConfig` loading, environment overrides and validation
//! - **errors**: `BridgeError` and its classification

pub mod config;
pub mod effects;
pub mod errors;
pub mod events;
pub mod hash;
pub mod identifiers;
pub mod types;

pub use config::{BridgeConfig, ConfigValidation};
pub use effects::{ConfirmationSource, Role, RoleEffects, TokenEffects};
pub use errors::{BridgeError, ErrorClass, Result};
pub use events::{BridgeEvent, EventLog};
pub use identifiers::{asset_id, submission_id};
pub use types::{
    Address, Amount, AssetId, AttestationKind, CallContext, ChainId, Hash32, SubmissionId,
};

/// Fixed-point denominator for fee rates: `FEE_DENOMINATOR` represents a 100% fee.
pub const FEE_DENOMINATOR: Amount = 1_000_000_000_000_000_000;
