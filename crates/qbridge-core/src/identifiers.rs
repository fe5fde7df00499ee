//! Deterministic identifier scheme
//!
//! Both identifiers are Keccak-256 digests over a packed encoding: integers as 32-byte
//! big-endian words, addresses as their 20 raw bytes, digests as their 32 raw bytes. The same
//! inputs produce the same identifier on every chain, which is what lets a destination ledger
//! recompute the identifier a source ledger emitted.

use crate::hash;
use crate::types::{Address, Amount, AssetId, ChainId, Hash32, SubmissionId};

/// Identifier of the asset whose native form is `token` on `chain`.
pub fn asset_id(chain: ChainId, token: &Address) -> AssetId {
    let mut h = hash::hasher();
    h.update_word(u128::from(chain.get()))
        .update(token.as_bytes());
    AssetId(Hash32(h.finalize()))
}

/// Identifier of one transfer of `amount` of `asset` to `receiver` at sequence `nonce`.
pub fn submission_id(
    asset: &AssetId,
    amount: Amount,
    receiver: &Address,
    nonce: u64,
) -> SubmissionId {
    let mut h = hash::hasher();
    h.update(asset.as_bytes())
        .update_word(amount)
        .update(receiver.as_bytes())
        .update_word(u128::from(nonce));
    SubmissionId(Hash32(h.finalize()))
}
