//! Attestor Quorum Ledger
//!
//! Per-submission vote accumulation, kept in two independent tables: one for sends awaiting a
//! mint and one for burns awaiting a claim. Each tally moves `Unvoted → Pending → Confirmed` and
//! never back.
//!
//! ## Invariants
//!
//! - An attestor is counted at most once per `(table, submission)`
//! - `confirmed` flips exactly once, the first time `confirmations >= min_confirmations`, and
//!   `QuorumReached` is emitted exactly at that flip
//! - Lowering the threshold confirms every pending tally that already meets it, in the same call
//! - A rejected call leaves every tally untouched, including relayed batches where only one entry
//!   is bad
//!
//! Direct votes and relayed attestations both go through `check_vote` then `apply_vote`, so a
//! replay is rejected the same way regardless of how the attestor proved its identity.

use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZeroU16;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use qbridge_core::{
    Address, AttestationKind, BridgeConfig, BridgeError, BridgeEvent, ConfigValidation,
    ConfirmationSource, EventLog, Result, Role, RoleEffects, SubmissionId,
};

use crate::payload::Attestation;
use crate::recovery::recover_attestor;

/// Non-zero confirmation threshold.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct QuorumThreshold(NonZeroU16);

impl QuorumThreshold {
    /// Create a threshold; zero is not a valid quorum.
    pub fn new(value: u16) -> Option<Self> {
        NonZeroU16::new(value).map(Self)
    }

    /// Raw threshold value
    pub fn get(self) -> u16 {
        self.0.get()
    }

    /// Whether `confirmations` distinct votes satisfy this threshold
    pub fn is_met_by(self, confirmations: u32) -> bool {
        confirmations >= u32::from(self.get())
    }
}

/// Vote state for one submission in one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    confirmations: u32,
    confirmed: bool,
    voted_by: BTreeSet<Address>,
}

impl VoteTally {
    /// Distinct attestor votes counted so far
    pub fn confirmations(&self) -> u32 {
        self.confirmations
    }

    /// Whether the threshold has been crossed
    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    /// Whether `attestor` already voted
    pub fn has_voted(&self, attestor: &Address) -> bool {
        self.voted_by.contains(attestor)
    }
}

/// Result of a counted vote (or of the last vote in a batch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteOutcome {
    /// Confirmations after the vote
    pub confirmations: u32,
    /// True only for the call that flipped the tally to confirmed
    pub quorum_reached: bool,
}

/// Vote accumulator gating mint and claim.
#[derive(Debug)]
pub struct QuorumLedger<R> {
    roles: R,
    threshold: QuorumThreshold,
    mint_votes: BTreeMap<SubmissionId, VoteTally>,
    burn_votes: BTreeMap<SubmissionId, VoteTally>,
    events: EventLog,
}

impl<R: RoleEffects> QuorumLedger<R> {
    /// Create an empty ledger requiring `min_confirmations` distinct votes.
    pub fn new(roles: R, min_confirmations: u16) -> Result<Self> {
        let threshold = QuorumThreshold::new(min_confirmations)
            .ok_or_else(|| BridgeError::precondition("min_confirmations must be at least 1"))?;
        Ok(Self {
            roles,
            threshold,
            mint_votes: BTreeMap::new(),
            burn_votes: BTreeMap::new(),
            events: EventLog::new(),
        })
    }

    /// Create from a validated configuration.
    pub fn from_config(roles: R, config: &BridgeConfig) -> Result<Self> {
        config.validate()?;
        Self::new(roles, config.min_confirmations)
    }

    /// Current threshold
    pub fn min_confirmations(&self) -> u16 {
        self.threshold.get()
    }

    /// Role provider this ledger checks against
    pub fn roles(&self) -> &R {
        &self.roles
    }

    /// Change the confirmation threshold (admin only).
    ///
    /// Pending tallies that already meet a lowered threshold are confirmed immediately, mint
    /// table first, each in submission order. Raising never un-confirms.
    pub fn set_min_confirmations(&mut self, caller: &Address, value: u16) -> Result<()> {
        if !self.roles.has_role(caller, Role::Admin) {
            warn!(caller = %caller, "non-admin attempted to change quorum threshold");
            return Err(BridgeError::unauthorized(format!(
                "{caller} may not change the quorum threshold"
            )));
        }
        let threshold = QuorumThreshold::new(value)
            .ok_or_else(|| BridgeError::precondition("min_confirmations must be at least 1"))?;

        let previous = self.threshold;
        self.threshold = threshold;
        info!(previous = previous.get(), current = value, "quorum threshold changed");
        self.events.emit(BridgeEvent::ThresholdChanged {
            previous: previous.get(),
            current: value,
        });

        if threshold < previous {
            for kind in [AttestationKind::Mint, AttestationKind::Burn] {
                self.confirm_pending(kind);
            }
        }
        Ok(())
    }

    /// Count one vote from `attestor` for `submission` in the `kind` table.
    pub fn vote(
        &mut self,
        kind: AttestationKind,
        submission: &SubmissionId,
        attestor: &Address,
    ) -> Result<VoteOutcome> {
        self.check_vote(kind, submission, attestor)?;
        Ok(self.apply_vote(kind, submission, attestor))
    }

    /// Direct-call vote for a send awaiting mint
    pub fn submit_mint(
        &mut self,
        caller: &Address,
        submission: &SubmissionId,
    ) -> Result<VoteOutcome> {
        self.vote(AttestationKind::Mint, submission, caller)
    }

    /// Direct-call vote for a burn awaiting claim
    pub fn submit_burn(
        &mut self,
        caller: &Address,
        submission: &SubmissionId,
    ) -> Result<VoteOutcome> {
        self.vote(AttestationKind::Burn, submission, caller)
    }

    /// Relayed votes for a send awaiting mint
    pub fn submit_mint_attestations(
        &mut self,
        submission: &SubmissionId,
        attestations: &[Attestation],
    ) -> Result<VoteOutcome> {
        self.submit_attestations(AttestationKind::Mint, submission, attestations)
    }

    /// Relayed votes for a burn awaiting claim
    pub fn submit_burn_attestations(
        &mut self,
        submission: &SubmissionId,
        attestations: &[Attestation],
    ) -> Result<VoteOutcome> {
        self.submit_attestations(AttestationKind::Burn, submission, attestations)
    }

    /// Recover every signer in `attestations` and count their votes, all or nothing.
    ///
    /// The payload for each entry is rebuilt with the tag of `kind`, so an attestation signed
    /// for the other table recovers to an unrelated identity and is rejected.
    pub fn submit_attestations(
        &mut self,
        kind: AttestationKind,
        submission: &SubmissionId,
        attestations: &[Attestation],
    ) -> Result<VoteOutcome> {
        if attestations.is_empty() {
            return Err(BridgeError::precondition("attestation batch is empty"));
        }

        let mut staged: Vec<Address> = Vec::with_capacity(attestations.len());
        for (index, attestation) in attestations.iter().enumerate() {
            let payload = attestation.payload(kind, submission);
            let Some(attestor) = recover_attestor(&payload, &attestation.signature) else {
                warn!(submission = %submission, index, "unrecoverable attestation in batch");
                return Err(BridgeError::unauthorized(format!(
                    "attestation {index} does not recover to a signer"
                )));
            };
            self.check_vote(kind, submission, &attestor)?;
            if staged.contains(&attestor) {
                warn!(submission = %submission, attestor = %attestor, "duplicate signer in batch");
                return Err(BridgeError::AlreadyVoted {
                    submission: *submission,
                    attestor,
                });
            }
            staged.push(attestor);
        }
        debug!(
            submission = %submission,
            %kind,
            count = staged.len(),
            "attestation batch validated"
        );

        let mut outcome = VoteOutcome {
            confirmations: 0,
            quorum_reached: false,
        };
        for attestor in &staged {
            let applied = self.apply_vote(kind, submission, attestor);
            outcome = VoteOutcome {
                confirmations: applied.confirmations,
                quorum_reached: outcome.quorum_reached || applied.quorum_reached,
            };
        }
        Ok(outcome)
    }

    /// Whether the send behind a mint is confirmed
    pub fn is_mint_confirmed(&self, submission: &SubmissionId) -> bool {
        self.is_confirmed(AttestationKind::Mint, submission)
    }

    /// Whether the burn behind a claim is confirmed
    pub fn is_burnt_confirmed(&self, submission: &SubmissionId) -> bool {
        self.is_confirmed(AttestationKind::Burn, submission)
    }

    /// Whether `submission` is confirmed in the `kind` table
    pub fn is_confirmed(&self, kind: AttestationKind, submission: &SubmissionId) -> bool {
        self.tally(kind, submission)
            .is_some_and(VoteTally::is_confirmed)
    }

    /// Vote state, if anyone voted yet
    pub fn tally(&self, kind: AttestationKind, submission: &SubmissionId) -> Option<&VoteTally> {
        self.table(kind).get(submission)
    }

    /// Events emitted so far
    pub fn events(&self) -> &[BridgeEvent] {
        self.events.events()
    }

    /// Take buffered events
    pub fn drain_events(&mut self) -> Vec<BridgeEvent> {
        self.events.drain()
    }

    fn check_vote(
        &self,
        kind: AttestationKind,
        submission: &SubmissionId,
        attestor: &Address,
    ) -> Result<()> {
        if attestor.is_zero() || !self.roles.has_role(attestor, Role::Attestor) {
            warn!(submission = %submission, attestor = %attestor, %kind, "vote from non-attestor");
            return Err(BridgeError::unauthorized(format!(
                "{attestor} is not an attestor"
            )));
        }
        if self
            .tally(kind, submission)
            .is_some_and(|tally| tally.has_voted(attestor))
        {
            warn!(submission = %submission, attestor = %attestor, %kind, "duplicate vote");
            return Err(BridgeError::AlreadyVoted {
                submission: *submission,
                attestor: *attestor,
            });
        }
        debug!(submission = %submission, attestor = %attestor, %kind, "vote accepted");
        Ok(())
    }

    fn apply_vote(
        &mut self,
        kind: AttestationKind,
        submission: &SubmissionId,
        attestor: &Address,
    ) -> VoteOutcome {
        let threshold = self.threshold;
        let tally = self.table_mut(kind).entry(*submission).or_default();
        tally.voted_by.insert(*attestor);
        tally.confirmations += 1;
        let confirmations = tally.confirmations;
        let quorum_reached = !tally.confirmed && threshold.is_met_by(confirmations);
        if quorum_reached {
            tally.confirmed = true;
        }

        info!(
            submission = %submission,
            attestor = %attestor,
            %kind,
            confirmations,
            "attestation recorded"
        );
        self.events.emit(BridgeEvent::AttestationRecorded {
            kind,
            submission: *submission,
            attestor: *attestor,
        });
        if quorum_reached {
            info!(submission = %submission, %kind, "quorum reached");
            self.events.emit(BridgeEvent::QuorumReached {
                kind,
                submission: *submission,
            });
        }

        VoteOutcome {
            confirmations,
            quorum_reached,
        }
    }

    fn confirm_pending(&mut self, kind: AttestationKind) {
        let threshold = self.threshold;
        let mut newly_confirmed = Vec::new();
        for (submission, tally) in self.table_mut(kind).iter_mut() {
            if !tally.confirmed && threshold.is_met_by(tally.confirmations) {
                tally.confirmed = true;
                newly_confirmed.push(*submission);
            }
        }
        for submission in newly_confirmed {
            info!(submission = %submission, %kind, "quorum reached after threshold change");
            self.events
                .emit(BridgeEvent::QuorumReached { kind, submission });
        }
    }

    fn table(&self, kind: AttestationKind) -> &BTreeMap<SubmissionId, VoteTally> {
        match kind {
            AttestationKind::Mint => &self.mint_votes,
            AttestationKind::Burn => &self.burn_votes,
        }
    }

    fn table_mut(&mut self, kind: AttestationKind) -> &mut BTreeMap<SubmissionId, VoteTally> {
        match kind {
            AttestationKind::Mint => &mut self.mint_votes,
            AttestationKind::Burn => &mut self.burn_votes,
        }
    }
}

impl<R: RoleEffects> ConfirmationSource for QuorumLedger<R> {
    fn is_mint_confirmed(&self, submission: &SubmissionId) -> bool {
        QuorumLedger::is_mint_confirmed(self, submission)
    }

    fn is_burn_confirmed(&self, submission: &SubmissionId) -> bool {
        self.is_burnt_confirmed(submission)
    }
}

/// Quorum ledger shared between the relayer-facing surface and a transfer ledger.
#[derive(Debug)]
pub struct SharedQuorum<R>(Arc<RwLock<QuorumLedger<R>>>);

impl<R> Clone for SharedQuorum<R> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<R> SharedQuorum<R> {
    /// Wrap a ledger for shared access
    pub fn new(ledger: QuorumLedger<R>) -> Self {
        Self(Arc::new(RwLock::new(ledger)))
    }

    /// Shared read access
    pub fn read(&self) -> RwLockReadGuard<'_, QuorumLedger<R>> {
        self.0.read()
    }

    /// Exclusive access for voting and admin changes
    pub fn write(&self) -> RwLockWriteGuard<'_, QuorumLedger<R>> {
        self.0.write()
    }
}

impl<R: RoleEffects> ConfirmationSource for SharedQuorum<R> {
    fn is_mint_confirmed(&self, submission: &SubmissionId) -> bool {
        self.read().is_mint_confirmed(submission)
    }

    fn is_burn_confirmed(&self, submission: &SubmissionId) -> bool {
        self.read().is_burnt_confirmed(submission)
    }
}
