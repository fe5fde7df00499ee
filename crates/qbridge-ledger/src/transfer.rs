//! Transfer State Machine
//!
//! `BridgeLedger` owns the asset registry, the transfer nonce and the set of consumed
//! submissions. It reads quorum state only through [`ConfirmationSource`].
//!
//! Per submission: `NotSubmitted → AwaitingQuorum → Confirmed → Settled`. `Settled` is tracked in
//! `used`, independently of the quorum ledger, so rebinding the confirmation source can never
//! reopen a settled submission.
//!
//! ## Atomicity
//!
//! Every operation validates first, then makes its collaborator call, then mutates local state.
//! An error at any step therefore leaves the nonce, fee balances, `used` and the event log as
//! they were, and a failed token call has already aborted before anything here changed.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use qbridge_core::{
    asset_id, submission_id, Address, Amount, AssetId, BridgeConfig, BridgeError, BridgeEvent,
    CallContext, ChainId, ConfigValidation, ConfirmationSource, EventLog, Result, Role,
    RoleEffects, SubmissionId, TokenEffects,
};

use crate::fees::{compute_fee, validate_fee_rate};
use crate::registry::{Asset, AssetRegistry};

/// Shared handle to whatever gates mint and claim
pub type QuorumSource = Arc<dyn ConfirmationSource + Send + Sync>;

/// What a `send` or `burn` committed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    /// Identifier attestors vote on
    pub submission: SubmissionId,
    /// Nonce consumed by this transfer
    pub nonce: u64,
    /// Amount that will arrive on the destination chain
    pub amount: Amount,
    /// Fee kept on this chain
    pub fee: Amount,
    /// Destination chain
    pub destination: ChainId,
}

/// Transfer ledger for one chain
pub struct BridgeLedger<R, T> {
    config: BridgeConfig,
    roles: R,
    tokens: T,
    quorum: QuorumSource,
    registry: AssetRegistry,
    nonce: u64,
    used: BTreeSet<SubmissionId>,
    events: EventLog,
}

impl<R, T> std::fmt::Debug for BridgeLedger<R, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeLedger")
            .field("chain_id", &self.config.chain_id)
            .field("assets", &self.registry.len())
            .field("nonce", &self.nonce)
            .field("used", &self.used.len())
            .finish_non_exhaustive()
    }
}

impl<R: RoleEffects, T: TokenEffects> BridgeLedger<R, T> {
    /// Create a ledger from a validated configuration.
    pub fn from_config(
        config: BridgeConfig,
        roles: R,
        tokens: T,
        quorum: QuorumSource,
    ) -> Result<Self> {
        config.validate()?;
        info!(chain_id = %config.chain_id, custody = %config.custody, "bridge ledger initialized");
        Ok(Self {
            config,
            roles,
            tokens,
            quorum,
            registry: AssetRegistry::new(),
            nonce: 0,
            used: BTreeSet::new(),
            events: EventLog::new(),
        })
    }

    // ------------------------------------------------------------------
    // Registry and admin
    // ------------------------------------------------------------------

    /// Register an asset that is native to this chain.
    pub fn register_native_asset(
        &mut self,
        caller: &Address,
        token: Address,
        min_amount: Amount,
        fee_rate: Amount,
        destinations: impl IntoIterator<Item = ChainId>,
    ) -> Result<AssetId> {
        self.require_admin(caller, "register assets")?;
        validate_fee_rate(fee_rate)?;
        let chain = self.config.chain_id;
        let id = asset_id(chain, &token);
        self.registry.ensure_vacant(&id)?;

        let asset = Asset {
            token,
            native_chain: chain,
            min_amount,
            fee_rate,
            collected_fees: 0,
            destinations: destinations.into_iter().collect(),
        };
        self.registry.insert(id, asset)?;
        info!(asset = %id, token = %token, "native asset registered");
        self.events.emit(BridgeEvent::AssetRegistered {
            asset: id,
            token,
            native_chain: chain,
        });
        Ok(id)
    }

    /// Register the wrapped form of an asset native to `origin_chain`.
    ///
    /// A new wrapped token is instantiated through the token module. The identifier is derived
    /// from the origin chain and the origin token, so it matches the id used on that chain.
    pub fn register_external_asset(
        &mut self,
        caller: &Address,
        token: Address,
        origin_chain: ChainId,
        min_amount: Amount,
        fee_rate: Amount,
        destinations: impl IntoIterator<Item = ChainId>,
        display_name: &str,
    ) -> Result<AssetId> {
        self.require_admin(caller, "register assets")?;
        validate_fee_rate(fee_rate)?;
        if origin_chain == self.config.chain_id {
            return Err(BridgeError::precondition(
                "external asset cannot originate on this chain",
            ));
        }
        let id = asset_id(origin_chain, &token);
        self.registry.ensure_vacant(&id)?;

        let wrapped = self.tokens.create_wrapped(display_name)?;
        let asset = Asset {
            token: wrapped,
            native_chain: origin_chain,
            min_amount,
            fee_rate,
            collected_fees: 0,
            destinations: destinations.into_iter().collect(),
        };
        self.registry.insert(id, asset)?;
        info!(
            asset = %id,
            wrapped = %wrapped,
            origin = %origin_chain,
            display_name,
            "external asset registered"
        );
        self.events.emit(BridgeEvent::AssetRegistered {
            asset: id,
            token: wrapped,
            native_chain: origin_chain,
        });
        Ok(id)
    }

    /// Add or remove `chain` from the destinations of `asset`.
    pub fn set_destination_support(
        &mut self,
        caller: &Address,
        asset: &AssetId,
        chain: ChainId,
        supported: bool,
    ) -> Result<()> {
        self.require_admin(caller, "change destination support")?;
        let entry = self.registry.get_mut(asset)?;
        if supported {
            entry.destinations.insert(chain);
        } else {
            entry.destinations.remove(&chain);
        }
        info!(asset = %asset, chain = %chain, supported, "destination support changed");
        self.events.emit(BridgeEvent::DestinationSupportChanged {
            asset: *asset,
            chain,
            supported,
        });
        Ok(())
    }

    /// Change the fee rate of `asset`
    pub fn set_fee_rate(
        &mut self,
        caller: &Address,
        asset: &AssetId,
        fee_rate: Amount,
    ) -> Result<()> {
        self.require_admin(caller, "change fee rates")?;
        validate_fee_rate(fee_rate)?;
        self.registry.get_mut(asset)?.fee_rate = fee_rate;
        info!(asset = %asset, fee_rate, "fee rate changed");
        self.events.emit(BridgeEvent::FeeRateChanged {
            asset: *asset,
            fee_rate,
        });
        Ok(())
    }

    /// Change the minimum transferable amount of `asset`
    pub fn set_min_amount(
        &mut self,
        caller: &Address,
        asset: &AssetId,
        min_amount: Amount,
    ) -> Result<()> {
        self.require_admin(caller, "change minimum amounts")?;
        self.registry.get_mut(asset)?.min_amount = min_amount;
        info!(asset = %asset, min_amount, "minimum amount changed");
        self.events.emit(BridgeEvent::MinAmountChanged {
            asset: *asset,
            min_amount,
        });
        Ok(())
    }

    /// Rebind the confirmation source that gates mint and claim.
    pub fn set_quorum_source(&mut self, caller: &Address, source: QuorumSource) -> Result<()> {
        self.require_admin(caller, "rebind the quorum source")?;
        self.quorum = source;
        warn!(changed_by = %caller, "quorum source rebound");
        self.events.emit(BridgeEvent::QuorumSourceChanged { changed_by: *caller });
        Ok(())
    }

    /// Pay out collected fees of a native asset from custody.
    pub fn withdraw_fees(
        &mut self,
        caller: &Address,
        asset: &AssetId,
        receiver: &Address,
        amount: Amount,
    ) -> Result<()> {
        self.require_admin(caller, "withdraw fees")?;
        let entry = self.registry.get(asset)?;
        if !entry.is_native_on(self.config.chain_id) {
            return Err(BridgeError::precondition(format!(
                "fees of {asset} are not held on this chain"
            )));
        }
        if amount > entry.collected_fees {
            return Err(BridgeError::insufficient_funds(format!(
                "requested {amount}, collected {}",
                entry.collected_fees
            )));
        }
        let token = entry.token;

        self.tokens
            .transfer_out(&token, &self.config.custody, receiver, amount)?;
        self.registry.get_mut(asset)?.collected_fees -= amount;
        info!(asset = %asset, receiver = %receiver, amount, "fees withdrawn");
        self.events.emit(BridgeEvent::FeesWithdrawn {
            asset: *asset,
            receiver: *receiver,
            amount,
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Transfers
    // ------------------------------------------------------------------

    /// Lock a native asset for transfer to `destination`.
    ///
    /// The native currency must arrive as exactly `amount` of attached value; tokens are pulled
    /// from the caller and must carry no value.
    pub fn send(
        &mut self,
        call: CallContext,
        asset: &AssetId,
        receiver: &Address,
        amount: Amount,
        destination: ChainId,
    ) -> Result<TransferReceipt> {
        let entry = self.registry.get(asset)?;
        if !entry.is_native_on(self.config.chain_id) {
            return Err(BridgeError::precondition(format!(
                "{asset} is not native to chain {}",
                self.config.chain_id
            )));
        }
        if !entry.supports(destination) {
            return Err(BridgeError::precondition(format!(
                "{asset} cannot be sent to chain {destination}"
            )));
        }
        check_min_amount(entry, amount)?;
        let expected_value = if entry.token == Address::NATIVE { amount } else { 0 };
        if call.value != expected_value {
            return Err(BridgeError::precondition(format!(
                "attached value {} does not match expected {expected_value}",
                call.value
            )));
        }
        let nonce = self.nonce;
        let next_nonce = next_nonce(nonce)?;
        let split = compute_fee(amount, entry.fee_rate);
        let token = entry.token;
        let submission = submission_id(asset, split.net, receiver, nonce);
        debug!(asset = %asset, amount, fee = split.fee, nonce, "send validated");

        self.tokens
            .transfer_into(&token, &self.config.custody, &call.caller, amount)?;

        if split.fee > 0 {
            self.registry.get_mut(asset)?.collected_fees += split.fee;
        }
        info!(
            submission = %submission,
            asset = %asset,
            amount = split.net,
            nonce,
            destination = %destination,
            "asset sent"
        );
        self.events.emit(BridgeEvent::AssetSent {
            submission,
            asset: *asset,
            amount: split.net,
            receiver: *receiver,
            nonce,
            destination,
        });
        self.nonce = next_nonce;

        Ok(TransferReceipt {
            submission,
            nonce,
            amount: split.net,
            fee: split.fee,
            destination,
        })
    }

    /// Mint the wrapped form of a confirmed send. Succeeds once per submission.
    pub fn mint(
        &mut self,
        asset: &AssetId,
        receiver: &Address,
        amount: Amount,
        nonce: u64,
    ) -> Result<()> {
        let entry = self.registry.get(asset)?;
        if entry.is_native_on(self.config.chain_id) {
            return Err(BridgeError::precondition(format!(
                "{asset} is native here and cannot be minted"
            )));
        }
        let submission = submission_id(asset, amount, receiver, nonce);
        if !self.quorum.is_mint_confirmed(&submission) {
            debug!(submission = %submission, "mint attempted before quorum");
            return Err(BridgeError::QuorumNotReached { submission });
        }
        self.ensure_unused(&submission)?;
        let token = entry.token;

        self.tokens.mint_to(&token, receiver, amount)?;

        self.used.insert(submission);
        info!(
            submission = %submission,
            asset = %asset,
            amount,
            receiver = %receiver,
            "asset minted"
        );
        self.events.emit(BridgeEvent::AssetMinted {
            amount,
            receiver: *receiver,
            asset: *asset,
        });
        Ok(())
    }

    /// Destroy wrapped units for release on the asset's native chain. No fee is taken here;
    /// the native side takes it at claim.
    pub fn burn(
        &mut self,
        call: CallContext,
        asset: &AssetId,
        receiver: &Address,
        amount: Amount,
    ) -> Result<TransferReceipt> {
        let entry = self.registry.get(asset)?;
        if entry.is_native_on(self.config.chain_id) {
            return Err(BridgeError::precondition(format!("{asset} is native here; use send")));
        }
        check_min_amount(entry, amount)?;
        if call.value != 0 {
            return Err(BridgeError::precondition("burn does not accept attached value"));
        }
        let nonce = self.nonce;
        let next_nonce = next_nonce(nonce)?;
        let destination = entry.native_chain;
        let token = entry.token;
        let submission = submission_id(asset, amount, receiver, nonce);

        self.tokens.burn_from(&token, &call.caller, amount)?;

        info!(
            submission = %submission,
            asset = %asset,
            amount,
            nonce,
            destination = %destination,
            "asset burnt"
        );
        self.events.emit(BridgeEvent::AssetBurnt {
            submission,
            asset: *asset,
            amount,
            receiver: *receiver,
            nonce,
            destination,
        });
        self.nonce = next_nonce;

        Ok(TransferReceipt {
            submission,
            nonce,
            amount,
            fee: 0,
            destination,
        })
    }

    /// Release a native asset after a confirmed burn, less the fee. Succeeds once per
    /// submission.
    pub fn claim(
        &mut self,
        asset: &AssetId,
        receiver: &Address,
        amount: Amount,
        nonce: u64,
    ) -> Result<()> {
        let entry = self.registry.get(asset)?;
        if !entry.is_native_on(self.config.chain_id) {
            return Err(BridgeError::precondition(format!(
                "{asset} is not native to chain {}",
                self.config.chain_id
            )));
        }
        let submission = submission_id(asset, amount, receiver, nonce);
        if !self.quorum.is_burn_confirmed(&submission) {
            debug!(submission = %submission, "claim attempted before quorum");
            return Err(BridgeError::QuorumNotReached { submission });
        }
        self.ensure_unused(&submission)?;
        let split = compute_fee(amount, entry.fee_rate);
        let token = entry.token;

        self.tokens
            .transfer_out(&token, &self.config.custody, receiver, split.net)?;

        self.used.insert(submission);
        if split.fee > 0 {
            self.registry.get_mut(asset)?.collected_fees += split.fee;
        }
        info!(
            submission = %submission,
            asset = %asset,
            amount = split.net,
            fee = split.fee,
            receiver = %receiver,
            "asset claimed"
        );
        self.events.emit(BridgeEvent::AssetClaimed {
            amount: split.net,
            receiver: *receiver,
            asset: *asset,
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Registered asset
    pub fn asset(&self, id: &AssetId) -> Result<&Asset> {
        self.registry.get(id)
    }

    /// All registered assets
    pub fn assets(&self) -> impl Iterator<Item = (&AssetId, &Asset)> {
        self.registry.iter()
    }

    /// Nonce the next send or burn will use
    pub fn current_nonce(&self) -> u64 {
        self.nonce
    }

    /// Whether `submission` was settled by mint or claim
    pub fn is_used(&self, submission: &SubmissionId) -> bool {
        self.used.contains(submission)
    }

    /// Token module
    pub fn tokens(&self) -> &T {
        &self.tokens
    }

    /// Token module, for funding accounts in simulations
    pub fn tokens_mut(&mut self) -> &mut T {
        &mut self.tokens
    }

    /// Events emitted so far
    pub fn events(&self) -> &[BridgeEvent] {
        self.events.events()
    }

    /// Take buffered events
    pub fn drain_events(&mut self) -> Vec<BridgeEvent> {
        self.events.drain()
    }

    fn require_admin(&self, caller: &Address, action: &str) -> Result<()> {
        if self.roles.has_role(caller, Role::Admin) {
            return Ok(());
        }
        warn!(caller = %caller, action, "admin operation rejected");
        Err(BridgeError::unauthorized(format!("{caller} may not {action}")))
    }

    fn ensure_unused(&self, submission: &SubmissionId) -> Result<()> {
        if self.used.contains(submission) {
            warn!(submission = %submission, "settlement replay rejected");
            return Err(BridgeError::AlreadyUsed {
                submission: *submission,
            });
        }
        Ok(())
    }
}

fn check_min_amount(asset: &Asset, amount: Amount) -> Result<()> {
    if amount < asset.min_amount {
        return Err(BridgeError::precondition(format!(
            "amount {amount} is below minimum {}",
            asset.min_amount
        )));
    }
    Ok(())
}

fn next_nonce(nonce: u64) -> Result<u64> {
    nonce
        .checked_add(1)
        .ok_or_else(|| BridgeError::precondition("transfer nonce exhausted"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::BTreeMap;

    const ADMIN: Address = Address([0xad; 20]);
    const USER: Address = Address([0x11; 20]);
    const TOKEN: Address = Address([0x70; 20]);

    struct AdminOnly;

    impl RoleEffects for AdminOnly {
        fn has_role(&self, identity: &Address, role: Role) -> bool {
            role == Role::Admin && *identity == ADMIN
        }
    }

    struct NeverConfirmed;

    impl ConfirmationSource for NeverConfirmed {
        fn is_mint_confirmed(&self, _: &SubmissionId) -> bool {
            false
        }
        fn is_burn_confirmed(&self, _: &SubmissionId) -> bool {
            false
        }
    }

    /// Accepts every movement, records transfers into custody
    #[derive(Default)]
    struct Ledgerless {
        pulled: BTreeMap<Address, Amount>,
        reject: bool,
    }

    impl TokenEffects for Ledgerless {
        fn transfer_into(
            &mut self,
            token: &Address,
            _: &Address,
            _: &Address,
            amount: Amount,
        ) -> Result<()> {
            if self.reject {
                return Err(BridgeError::insufficient_funds("allowance too low"));
            }
            *self.pulled.entry(*token).or_default() += amount;
            Ok(())
        }
        fn transfer_out(&mut self, _: &Address, _: &Address, _: &Address, _: Amount) -> Result<()> {
            Ok(())
        }
        fn mint_to(&mut self, _: &Address, _: &Address, _: Amount) -> Result<()> {
            Ok(())
        }
        fn burn_from(&mut self, _: &Address, _: &Address, _: Amount) -> Result<()> {
            Ok(())
        }
        fn create_wrapped(&mut self, _: &str) -> Result<Address> {
            Ok(Address([0xee; 20]))
        }
    }

    fn ledger() -> BridgeLedger<AdminOnly, Ledgerless> {
        BridgeLedger::from_config(
            BridgeConfig::defaults(),
            AdminOnly,
            Ledgerless::default(),
            Arc::new(NeverConfirmed),
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = BridgeConfig::defaults();
        config.min_confirmations = 0;
        let result = BridgeLedger::from_config(
            config,
            AdminOnly,
            Ledgerless::default(),
            Arc::new(NeverConfirmed),
        );
        assert_matches!(result, Err(BridgeError::Config { .. }));
    }

    #[test]
    fn test_registration_requires_admin() {
        let mut bridge = ledger();
        assert_matches!(
            bridge.register_native_asset(&USER, TOKEN, 1, 0, [ChainId(2)]),
            Err(BridgeError::Unauthorized { .. })
        );
        assert_eq!(bridge.assets().count(), 0);
    }

    #[test]
    fn test_native_asset_id_uses_local_chain() {
        let mut bridge = ledger();
        let id = bridge
            .register_native_asset(&ADMIN, TOKEN, 1, 0, [ChainId(2)])
            .unwrap();
        assert_eq!(id, asset_id(ChainId(1), &TOKEN));
        assert_eq!(bridge.asset(&id).unwrap().token, TOKEN);
    }

    #[test]
    fn test_external_asset_gets_wrapped_token() {
        let mut bridge = ledger();
        let id = bridge
            .register_external_asset(&ADMIN, TOKEN, ChainId(5), 1, 0, [], "Wrapped T")
            .unwrap();
        assert_eq!(id, asset_id(ChainId(5), &TOKEN));
        let asset = bridge.asset(&id).unwrap();
        assert_eq!(asset.token, Address([0xee; 20]));
        assert_eq!(asset.native_chain, ChainId(5));

        assert_matches!(
            bridge.register_external_asset(&ADMIN, TOKEN, ChainId(1), 1, 0, [], "Local"),
            Err(BridgeError::Precondition { .. })
        );
    }

    #[test]
    fn test_send_value_must_match_asset_kind() {
        let mut bridge = ledger();
        let native = bridge
            .register_native_asset(&ADMIN, Address::NATIVE, 1, 0, [ChainId(2)])
            .unwrap();
        let token = bridge
            .register_native_asset(&ADMIN, TOKEN, 1, 0, [ChainId(2)])
            .unwrap();

        let short = CallContext::new(USER).with_value(99);
        assert_matches!(
            bridge.send(short, &native, &USER, 100, ChainId(2)),
            Err(BridgeError::Precondition { .. })
        );
        let paid = CallContext::new(USER).with_value(100);
        assert_matches!(
            bridge.send(paid, &token, &USER, 100, ChainId(2)),
            Err(BridgeError::Precondition { .. })
        );
        assert!(bridge.send(paid, &native, &USER, 100, ChainId(2)).is_ok());
        assert_eq!(bridge.tokens().pulled.get(&Address::NATIVE), Some(&100));
    }

    #[test]
    fn test_failed_pull_leaves_state_untouched() {
        let mut bridge = ledger();
        let token = bridge
            .register_native_asset(
                &ADMIN,
                TOKEN,
                1,
                qbridge_core::FEE_DENOMINATOR / 10,
                [ChainId(2)],
            )
            .unwrap();
        bridge.tokens_mut().reject = true;
        let events_before = bridge.events().len();

        assert_matches!(
            bridge.send(CallContext::new(USER), &token, &USER, 1_000, ChainId(2)),
            Err(BridgeError::InsufficientFunds { .. })
        );
        assert_eq!(bridge.current_nonce(), 0);
        assert_eq!(bridge.asset(&token).unwrap().collected_fees, 0);
        assert_eq!(bridge.events().len(), events_before);
    }

    #[test]
    fn test_settlement_requires_quorum() {
        let mut bridge = ledger();
        let wrapped = bridge
            .register_external_asset(&ADMIN, TOKEN, ChainId(5), 1, 0, [], "Wrapped T")
            .unwrap();
        let native = bridge
            .register_native_asset(&ADMIN, Address::NATIVE, 1, 0, [])
            .unwrap();
        assert_matches!(
            bridge.mint(&wrapped, &USER, 10, 0),
            Err(BridgeError::QuorumNotReached { .. })
        );
        assert_matches!(
            bridge.claim(&native, &USER, 10, 0),
            Err(BridgeError::QuorumNotReached { .. })
        );
    }

    #[test]
    fn test_unknown_asset_is_reported() {
        let mut bridge = ledger();
        let missing = asset_id(ChainId(9), &TOKEN);
        assert_matches!(
            bridge.send(CallContext::new(USER), &missing, &USER, 1, ChainId(2)),
            Err(BridgeError::AssetNotFound { .. })
        );
        assert_matches!(
            bridge.set_fee_rate(&ADMIN, &missing, 0),
            Err(BridgeError::AssetNotFound { .. })
        );
    }

    #[test]
    fn test_settlement_on_unknown_asset_is_not_retryable() {
        let mut bridge = ledger();
        let missing = asset_id(ChainId(9), &TOKEN);
        let minted = bridge.mint(&missing, &USER, 10, 0);
        assert_matches!(minted, Err(BridgeError::AssetNotFound { .. }));
        let claimed = bridge.claim(&missing, &USER, 10, 0);
        assert_matches!(claimed, Err(BridgeError::AssetNotFound { .. }));
        assert!(!claimed.unwrap_err().is_retryable());
    }

    #[test]
    fn test_fee_and_minimum_changes_are_logged_as_events() {
        let mut bridge = ledger();
        let native = bridge
            .register_native_asset(&ADMIN, TOKEN, 1, 0, [ChainId(2)])
            .unwrap();
        bridge.set_fee_rate(&ADMIN, &native, 7).unwrap();
        assert_eq!(
            bridge.events().last(),
            Some(&BridgeEvent::FeeRateChanged {
                asset: native,
                fee_rate: 7,
            })
        );
        bridge.set_min_amount(&ADMIN, &native, 40).unwrap();
        assert_eq!(
            bridge.events().last(),
            Some(&BridgeEvent::MinAmountChanged {
                asset: native,
                min_amount: 40,
            })
        );

        let events = bridge.events().len();
        assert_matches!(
            bridge.set_fee_rate(&ADMIN, &native, qbridge_core::FEE_DENOMINATOR + 1),
            Err(BridgeError::Precondition { .. })
        );
        assert_eq!(bridge.asset(&native).unwrap().fee_rate, 7);
        assert_eq!(bridge.events().len(), events);
    }

    #[test]
    fn test_withdraw_more_than_collected_is_rejected() {
        let mut bridge = ledger();
        let native = bridge
            .register_native_asset(&ADMIN, TOKEN, 1, 0, [ChainId(2)])
            .unwrap();
        assert_matches!(
            bridge.withdraw_fees(&ADMIN, &native, &USER, 1),
            Err(BridgeError::InsufficientFunds { .. })
        );
    }
}
