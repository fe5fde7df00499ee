//! External collaborator traits
//!
//! The ledgers never reach for global state: role checks, token movements and confirmation
//! lookups all go through these traits, injected at construction. Production wires them to the
//! host chain; `qbridge-testkit` provides in-memory stubs.
//!
//! The traits are synchronous. Every bridge operation is a single atomic transition and must
//! not suspend halfway through.

use crate::errors::Result;
use crate::types::{Address, Amount, SubmissionId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Capability tags checked through [`RoleEffects`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// May register assets and change bridge configuration
    Admin,
    /// May vote that a source-chain event occurred
    Attestor,
}

/// Role/capability provider.
pub trait RoleEffects {
    /// Whether `identity` currently holds `role`
    fn has_role(&self, identity: &Address, role: Role) -> bool;
}

impl<T: RoleEffects + ?Sized> RoleEffects for Arc<T> {
    fn has_role(&self, identity: &Address, role: Role) -> bool {
        (**self).has_role(identity, role)
    }
}

/// Fungible token module.
///
/// `Address::NATIVE` as a token reference denotes the ledger's native currency. Failures abort
/// the calling operation; implementations report balance and allowance shortfalls as
/// `BridgeError::InsufficientFunds`.
pub trait TokenEffects {
    /// Pull `amount` from `from` into `custody` (allowance-based for tokens)
    fn transfer_into(
        &mut self,
        token: &Address,
        custody: &Address,
        from: &Address,
        amount: Amount,
    ) -> Result<()>;

    /// Release `amount` from `custody` to `to`
    fn transfer_out(
        &mut self,
        token: &Address,
        custody: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<()>;

    /// Create `amount` new units of a wrapped token for `to`
    fn mint_to(&mut self, token: &Address, to: &Address, amount: Amount) -> Result<()>;

    /// Destroy `amount` units of a wrapped token held by `holder`
    fn burn_from(&mut self, token: &Address, holder: &Address, amount: Amount) -> Result<()>;

    /// Instantiate a new wrapped token and return its reference
    fn create_wrapped(&mut self, display_name: &str) -> Result<Address>;
}

/// Read-only view of attestor quorum state that gates settlement.
pub trait ConfirmationSource {
    /// Whether the quorum confirmed the send behind a mint
    fn is_mint_confirmed(&self, submission: &SubmissionId) -> bool;

    /// Whether the quorum confirmed the burn behind a claim
    fn is_burn_confirmed(&self, submission: &SubmissionId) -> bool;
}

impl<T: ConfirmationSource + ?Sized> ConfirmationSource for Arc<T> {
    fn is_mint_confirmed(&self, submission: &SubmissionId) -> bool {
        (**self).is_mint_confirmed(submission)
    }

    fn is_burn_confirmed(&self, submission: &SubmissionId) -> bool {
        (**self).is_burn_confirmed(submission)
    }
}
