//! Asset registry
//!
//! Assets are created once and never removed. Lookups of an unknown identifier fail with
//! `AssetNotFound` rather than returning an empty default.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use qbridge_core::{Address, Amount, AssetId, BridgeError, ChainId, Result};

/// Per-asset configuration and fee balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Token on this ledger; `Address::NATIVE` for the native currency
    pub token: Address,
    /// Chain where the asset is original rather than wrapped
    pub native_chain: ChainId,
    /// Smallest amount accepted by send and burn
    pub min_amount: Amount,
    /// Fixed-point fee rate over `FEE_DENOMINATOR`
    pub fee_rate: Amount,
    /// Fees taken and not yet withdrawn
    pub collected_fees: Amount,
    /// Chains this asset may be sent to
    pub destinations: BTreeSet<ChainId>,
}

impl Asset {
    /// Whether the asset is original on `chain`
    pub fn is_native_on(&self, chain: ChainId) -> bool {
        self.native_chain == chain
    }

    /// Whether `chain` is an allowed destination
    pub fn supports(&self, chain: ChainId) -> bool {
        self.destinations.contains(&chain)
    }
}

/// Registered assets by identifier
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    assets: BTreeMap<AssetId, Asset>,
}

impl AssetRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an asset
    pub fn get(&self, id: &AssetId) -> Result<&Asset> {
        self.assets
            .get(id)
            .ok_or(BridgeError::AssetNotFound { asset: *id })
    }

    /// Look up an asset for modification
    pub fn get_mut(&mut self, id: &AssetId) -> Result<&mut Asset> {
        self.assets
            .get_mut(id)
            .ok_or(BridgeError::AssetNotFound { asset: *id })
    }

    /// Whether `id` is registered
    pub fn contains(&self, id: &AssetId) -> bool {
        self.assets.contains_key(id)
    }

    /// Fail if `id` is already taken
    pub fn ensure_vacant(&self, id: &AssetId) -> Result<()> {
        if self.contains(id) {
            return Err(BridgeError::precondition(format!(
                "asset {id} is already registered"
            )));
        }
        Ok(())
    }

    /// Add a new asset
    pub fn insert(&mut self, id: AssetId, asset: Asset) -> Result<()> {
        self.ensure_vacant(&id)?;
        self.assets.insert(id, asset);
        Ok(())
    }

    /// All assets in identifier order
    pub fn iter(&self) -> impl Iterator<Item = (&AssetId, &Asset)> {
        self.assets.iter()
    }

    /// Number of registered assets
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
