//! # qbridge ledger
//!
//! The transfer side of the bridge: which assets exist, what they cost to move, and the four
//! operations that move them.
//!
//! ## Architecture
//!
//! - **registry**: per-asset configuration and collected fees
//! - **fees**: overflow-free fixed-point fee split
//! - **transfer**: `BridgeLedger`, the send / mint / burn / claim state machine and its admin
//!   surface
//!
//! ## Flow
//!
//! ```text
//! native chain                          wrapped chain
//! ------------                          -------------
//! send  ── AssetSent(id) ──▶ attestors ──▶ quorum(mint) ──▶ mint
//! claim ◀── quorum(burn) ◀── attestors ◀── AssetBurnt(id) ── burn
//! ```
//!
//! The ledger never counts votes itself. It asks a [`qbridge_core::ConfirmationSource`], usually
//! a shared `qbridge_oracle::QuorumLedger`, whether a submission is confirmed.

pub mod fees;
pub mod registry;
pub mod transfer;

pub use fees::{compute_fee, validate_fee_rate, FeeSplit};
pub use registry::{Asset, AssetRegistry};
pub use transfer::{BridgeLedger, QuorumSource, TransferReceipt};
