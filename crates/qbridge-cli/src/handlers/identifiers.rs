//! Identifier derivation

use qbridge_core::{asset_id, submission_id, Address, Amount, AssetId, ChainId};

/// Asset identifier of `token` native to `chain`
pub fn handle_asset_id(chain: u64, token: &Address) -> String {
    asset_id(ChainId(chain), token).to_string()
}

/// Submission identifier of one transfer
pub fn handle_submission_id(
    asset: &AssetId,
    amount: Amount,
    receiver: &Address,
    nonce: u64,
) -> String {
    submission_id(asset, amount, receiver, nonce).to_string()
}
