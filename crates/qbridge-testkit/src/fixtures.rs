//! Two-chain bridge fixtures
//!
//! A `BridgeFixture` wires two ledgers, a native side and a wrapped side, each with its own role
//! provider, token module and shared quorum ledger. Both sides trust the same attestor keys and
//! the same admin.

use std::sync::Arc;

use qbridge_core::{
    Address, Amount, AssetId, AttestationKind, BridgeConfig, ChainId, Result, Role, SubmissionId,
};
use qbridge_ledger::BridgeLedger;
use qbridge_oracle::{AttestorKey, QuorumLedger, SharedQuorum, VoteOutcome};

use crate::keys::{attest_all, attestor_keys};
use crate::roles::InMemoryRoles;
use crate::tokens::InMemoryTokens;

/// Admin identity used by every fixture
pub const FIXTURE_ADMIN: Address = Address([0xad; 20]);

/// Quorum ledger type used by fixtures
pub type FixtureQuorum = SharedQuorum<Arc<InMemoryRoles>>;

/// Transfer ledger type used by fixtures
pub type FixtureLedger = BridgeLedger<Arc<InMemoryRoles>, InMemoryTokens>;

/// One chain's worth of bridge state
#[derive(Debug)]
pub struct ChainFixture {
    /// Effective configuration
    pub config: BridgeConfig,
    /// Role grants, shared with both ledgers
    pub roles: Arc<InMemoryRoles>,
    /// Quorum ledger gating this chain's mint and claim
    pub quorum: FixtureQuorum,
    /// Transfer ledger
    pub ledger: FixtureLedger,
}

impl ChainFixture {
    /// Chain identifier
    pub fn chain_id(&self) -> ChainId {
        self.config.chain_id
    }

    /// Relay one attestation from each of `keys`
    pub fn relay(
        &self,
        kind: AttestationKind,
        submission: &SubmissionId,
        keys: &[AttestorKey],
    ) -> Result<VoteOutcome> {
        let batch = attest_all(keys, kind, submission);
        self.quorum
            .write()
            .submit_attestations(kind, submission, &batch)
    }

    /// Give `holder` `amount` of `token` and let custody pull all of it
    pub fn fund(&mut self, token: Address, holder: Address, amount: Amount) {
        let custody = self.config.custody;
        let tokens = self.ledger.tokens_mut();
        tokens.credit(token, holder, amount);
        if token != Address::NATIVE {
            tokens.approve(token, holder, custody, amount);
        }
    }

    /// Balance of `holder` in this chain's token module
    pub fn balance(&self, token: &Address, holder: &Address) -> Amount {
        self.ledger.tokens().balance_of(token, holder)
    }
}

/// Native chain, wrapped chain and the attestors trusted by both
#[derive(Debug)]
pub struct BridgeFixture {
    /// Admin on both chains
    pub admin: Address,
    /// Attestor keys, granted the attestor role on both chains
    pub attestors: Vec<AttestorKey>,
    /// Chain where assets are native
    pub native: ChainFixture,
    /// Chain holding wrapped representations
    pub wrapped: ChainFixture,
}

impl BridgeFixture {
    /// Builder with defaults: chains 1 and 2, three attestors, threshold two
    pub fn builder() -> BridgeFixtureBuilder {
        BridgeFixtureBuilder::default()
    }

    /// Register `token` as native on one side and wrapped on the other, with each chain
    /// accepting the other as destination. Returns the shared asset identifier.
    pub fn register_pair(
        &mut self,
        token: Address,
        min_amount: Amount,
        fee_rate: Amount,
    ) -> AssetId {
        let native_chain = self.native.chain_id();
        let wrapped_chain = self.wrapped.chain_id();
        let id = self
            .native
            .ledger
            .register_native_asset(&self.admin, token, min_amount, fee_rate, [wrapped_chain])
            .expect("native registration");
        let mirrored = self
            .wrapped
            .ledger
            .register_external_asset(
                &self.admin,
                token,
                native_chain,
                min_amount,
                fee_rate,
                [native_chain],
                "Wrapped Test Asset",
            )
            .expect("external registration");
        assert_eq!(id, mirrored, "both chains derive the same asset id");
        id
    }

    /// Wrapped token address of `asset` on the wrapped chain
    pub fn wrapped_token(&self, asset: &AssetId) -> Address {
        self.wrapped
            .ledger
            .asset(asset)
            .expect("asset registered on wrapped chain")
            .token
    }

    /// The first `min_confirmations` attestors
    pub fn quorum_keys(&self) -> &[AttestorKey] {
        let needed = usize::from(self.wrapped.config.min_confirmations)
            .min(self.attestors.len());
        &self.attestors[..needed]
    }
}

/// Builder for [`BridgeFixture`]
#[derive(Debug, Clone)]
pub struct BridgeFixtureBuilder {
    native_chain: ChainId,
    wrapped_chain: ChainId,
    attestors: usize,
    min_confirmations: u16,
}

impl Default for BridgeFixtureBuilder {
    fn default() -> Self {
        Self {
            native_chain: ChainId(1),
            wrapped_chain: ChainId(2),
            attestors: 3,
            min_confirmations: 2,
        }
    }
}

impl BridgeFixtureBuilder {
    /// Chain identifiers of the native and wrapped sides
    pub fn chains(mut self, native: u64, wrapped: u64) -> Self {
        self.native_chain = ChainId(native);
        self.wrapped_chain = ChainId(wrapped);
        self
    }

    /// Number of attestor keys
    pub fn attestors(mut self, count: usize) -> Self {
        self.attestors = count;
        self
    }

    /// Confirmation threshold on both chains
    pub fn min_confirmations(mut self, threshold: u16) -> Self {
        self.min_confirmations = threshold;
        self
    }

    /// Build both chains
    pub fn build(self) -> BridgeFixture {
        let attestors = attestor_keys(self.attestors);
        let native = self.chain(self.native_chain, &attestors);
        let wrapped = self.chain(self.wrapped_chain, &attestors);
        BridgeFixture {
            admin: FIXTURE_ADMIN,
            attestors,
            native,
            wrapped,
        }
    }

    fn chain(&self, chain_id: ChainId, attestors: &[AttestorKey]) -> ChainFixture {
        let config = BridgeConfig {
            chain_id,
            min_confirmations: self.min_confirmations,
            ..BridgeConfig::defaults()
        };
        let roles = Arc::new(InMemoryRoles::new().with(FIXTURE_ADMIN, Role::Admin));
        for key in attestors {
            roles.grant(key.address(), Role::Attestor);
        }
        let quorum = SharedQuorum::new(
            QuorumLedger::from_config(Arc::clone(&roles), &config)
                .expect("valid fixture config"),
        );
        let ledger = BridgeLedger::from_config(
            config.clone(),
            Arc::clone(&roles),
            InMemoryTokens::new(),
            Arc::new(quorum.clone()),
        )
        .expect("valid fixture config");
        ChainFixture {
            config,
            roles,
            quorum,
            ledger,
        }
    }
}
