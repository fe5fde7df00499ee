//! Append-only bridge events
//!
//! One event per committed state transition. Relayers and attestors consume `AssetSent` and
//! `AssetBurnt` to learn which submission identifiers to attest; the rest are an audit trail.

use serde::{Deserialize, Serialize};

use crate::types::{Address, Amount, AssetId, AttestationKind, ChainId, SubmissionId};

/// Observable bridge event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BridgeEvent {
    /// Native asset locked for transfer to another chain
    AssetSent {
        /// Identifier attestors must vote on
        submission: SubmissionId,
        /// Asset being moved
        asset: AssetId,
        /// Amount after fee extraction
        amount: Amount,
        /// Receiver on the destination chain
        receiver: Address,
        /// Sequence number consumed by this send
        nonce: u64,
        /// Destination chain
        destination: ChainId,
    },

    /// Wrapped asset minted after a confirmed send
    AssetMinted {
        /// Amount minted
        amount: Amount,
        /// Receiver
        receiver: Address,
        /// Asset minted
        asset: AssetId,
    },

    /// Wrapped asset destroyed for release on its native chain
    AssetBurnt {
        /// Identifier attestors must vote on
        submission: SubmissionId,
        /// Asset being moved
        asset: AssetId,
        /// Amount burnt
        amount: Amount,
        /// Receiver on the native chain
        receiver: Address,
        /// Sequence number consumed by this burn
        nonce: u64,
        /// Native chain of the asset
        destination: ChainId,
    },

    /// Native asset released after a confirmed burn
    AssetClaimed {
        /// Amount released after fee extraction
        amount: Amount,
        /// Receiver
        receiver: Address,
        /// Asset released
        asset: AssetId,
    },

    /// One attestor vote counted
    AttestationRecorded {
        /// Vote table
        kind: AttestationKind,
        /// Submission voted on
        submission: SubmissionId,
        /// Voter identity
        attestor: Address,
    },

    /// Submission crossed the confirmation threshold
    QuorumReached {
        /// Vote table
        kind: AttestationKind,
        /// Confirmed submission
        submission: SubmissionId,
    },

    /// Asset added to the registry
    AssetRegistered {
        /// New identifier
        asset: AssetId,
        /// Token reference on this ledger
        token: Address,
        /// Native chain of the asset
        native_chain: ChainId,
    },

    /// Destination chain toggled for an asset
    DestinationSupportChanged {
        /// Asset reconfigured
        asset: AssetId,
        /// Destination chain
        chain: ChainId,
        /// New membership
        supported: bool,
    },

    /// Fee rate of an asset changed
    FeeRateChanged {
        /// Asset reconfigured
        asset: AssetId,
        /// New rate, a fraction of the fee denominator
        fee_rate: Amount,
    },

    /// Minimum transferable amount of an asset changed
    MinAmountChanged {
        /// Asset reconfigured
        asset: AssetId,
        /// New minimum
        min_amount: Amount,
    },

    /// Collected fees paid out by an admin
    FeesWithdrawn {
        /// Asset whose fees were withdrawn
        asset: AssetId,
        /// Receiver
        receiver: Address,
        /// Amount withdrawn
        amount: Amount,
    },

    /// Confirmation threshold changed
    ThresholdChanged {
        /// Previous threshold
        previous: u16,
        /// New threshold
        current: u16,
    },

    /// Transfer ledger rebound to a different confirmation source
    QuorumSourceChanged {
        /// Admin who rebound it
        changed_by: Address,
    },
}

/// Append-only log of [`BridgeEvent`]s
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<BridgeEvent>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event
    pub fn emit(&mut self, event: BridgeEvent) {
        tracing::trace!(?event, "event emitted");
        self.events.push(event);
    }

    /// All events in emission order
    pub fn events(&self) -> &[BridgeEvent] {
        &self.events
    }

    /// Most recent event
    pub fn last(&self) -> Option<&BridgeEvent> {
        self.events.last()
    }

    /// Number of events emitted so far
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing has been emitted
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Hand all buffered events to a consumer, leaving the log empty
    pub fn drain(&mut self) -> Vec<BridgeEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Hash32;

    #[test]
    fn test_log_preserves_order_and_drains() {
        let mut log = EventLog::new();
        let submission = SubmissionId(Hash32([1u8; 32]));
        log.emit(BridgeEvent::QuorumReached {
            kind: AttestationKind::Mint,
            submission,
        });
        log.emit(BridgeEvent::ThresholdChanged {
            previous: 2,
            current: 1,
        });
        assert_eq!(log.len(), 2);
        assert!(matches!(log.events()[0], BridgeEvent::QuorumReached { .. }));
        let drained = log.drain();
        assert_eq!(drained.len(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn test_events_serialize_with_tag() {
        let event = BridgeEvent::AssetMinted {
            amount: 5,
            receiver: Address([7u8; 20]),
            asset: crate::types::AssetId(Hash32([2u8; 32])),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "asset_minted");
        assert_eq!(json["amount"], 5);
    }
}
