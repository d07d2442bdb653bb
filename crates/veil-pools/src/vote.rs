//! Anonymous ballot.
//!
//! Voter enrollment is permissioned: the ballot owner registers validators,
//! validators register voter commitments. Casting is anonymous: a vote
//! proves membership of *some* registered voter commitment and spends a
//! one-person-one-vote nullifier, so tallies never link back to voters. The
//! chosen option is a public input, binding each proof to one option.

use std::collections::HashSet;

use borsh::{BorshDeserialize, BorshSerialize};
use light_hasher::Hasher;
use veil_ledger::{Ledger, LedgerError, Payload, PayloadEffect, ProofVerifier};

use crate::AccountId;

/// Reveal payload of a vote: the chosen option index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct VotePayload {
    /// Index into the ballot's option list.
    pub option: u32,
}

impl Payload for VotePayload {
    fn public_inputs(&self) -> Vec<[u8; 32]> {
        let mut bytes = [0u8; 32];
        bytes[28..].copy_from_slice(&self.option.to_be_bytes());
        vec![bytes]
    }
}

/// Administrative event emitted by the ballot's enrollment layer,
/// alongside the ledger's own `Registered`/`Consumed` stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum BallotEvent {
    /// A validator was enrolled by the owner.
    ValidatorRegistered {
        /// The enrolled validator.
        validator: AccountId,
    },
}

/// Per-option vote counters the vote effect increments.
#[derive(Clone, Debug, Default)]
pub struct TallyEffect {
    votes: Vec<u64>,
}

impl TallyEffect {
    fn new(options: usize) -> Self {
        Self {
            votes: vec![0; options],
        }
    }
}

impl PayloadEffect<VotePayload> for TallyEffect {
    fn apply(&mut self, payload: &VotePayload) -> Result<(), LedgerError> {
        let slot = self
            .votes
            .get_mut(payload.option as usize)
            .ok_or(LedgerError::EffectFailed)?;
        *slot = slot.checked_add(1).ok_or(LedgerError::EffectFailed)?;
        Ok(())
    }
}

/// A permissioned-enrollment, anonymous-cast ballot.
pub struct AnonymousBallot<V, H>
where
    V: ProofVerifier,
    H: Hasher,
{
    ledger: Ledger<VotePayload, TallyEffect, V, H>,
    owner: AccountId,
    validators: HashSet<AccountId>,
    admin_events: Vec<BallotEvent>,
}

impl<V, H> AnonymousBallot<V, H>
where
    V: ProofVerifier,
    H: Hasher,
{
    /// Create a ballot with `options` choices, owned by `owner`.
    pub fn new(
        levels: usize,
        history_capacity: usize,
        options: usize,
        owner: AccountId,
        verifier: V,
    ) -> Result<Self, LedgerError> {
        if options == 0 {
            return Err(LedgerError::InvalidConfiguration);
        }
        let ledger = Ledger::new(levels, history_capacity, verifier, TallyEffect::new(options))?;
        Ok(Self {
            ledger,
            owner,
            validators: HashSet::new(),
            admin_events: Vec::new(),
        })
    }

    /// Enroll a validator. Only the owner may call this.
    pub fn register_validator(
        &mut self,
        caller: AccountId,
        validator: AccountId,
    ) -> Result<(), LedgerError> {
        if caller != self.owner {
            return Err(LedgerError::Unauthorized);
        }
        self.validators.insert(validator);
        tracing::info!(validator = %hex::encode(validator), "validator enrolled");
        self.admin_events
            .push(BallotEvent::ValidatorRegistered { validator });
        Ok(())
    }

    /// Register a voter commitment. Only an enrolled validator may call
    /// this; the voter's identity stays inside the commitment.
    pub fn register_voter(
        &mut self,
        caller: AccountId,
        commitment: [u8; 32],
    ) -> Result<u64, LedgerError> {
        if !self.validators.contains(&caller) {
            return Err(LedgerError::Unauthorized);
        }
        self.ledger.register(commitment)
    }

    /// Cast a vote for `payload.option`, spending `nullifier_hash` against
    /// a membership proof for `root`.
    pub fn vote(
        &mut self,
        root: [u8; 32],
        nullifier_hash: [u8; 32],
        proof: &[u8],
        payload: VotePayload,
    ) -> Result<(), LedgerError> {
        self.ledger.consume(root, nullifier_hash, proof, payload)?;
        tracing::info!(option = payload.option, "vote counted");
        Ok(())
    }

    /// Whether a vote nullifier has already been spent.
    pub fn has_voted(&self, nullifier_hash: &[u8; 32]) -> bool {
        self.ledger.is_spent(nullifier_hash)
    }

    /// Votes counted for `option` so far.
    pub fn votes_for(&self, option: u32) -> Option<u64> {
        self.ledger.effect().votes.get(option as usize).copied()
    }

    /// Number of options on the ballot.
    pub fn options(&self) -> usize {
        self.ledger.effect().votes.len()
    }

    /// Whether `account` is an enrolled validator.
    pub fn is_validator(&self, account: &AccountId) -> bool {
        self.validators.contains(account)
    }

    /// The accumulator's current root.
    pub fn current_root(&self) -> [u8; 32] {
        self.ledger.current_root()
    }

    /// Administrative events recorded since creation or the last
    /// [`Self::take_admin_events`].
    pub fn admin_events(&self) -> &[BallotEvent] {
        &self.admin_events
    }

    /// Drain and return the recorded administrative events.
    pub fn take_admin_events(&mut self) -> Vec<BallotEvent> {
        std::mem::take(&mut self.admin_events)
    }

    /// The underlying ledger, for event draining.
    pub fn ledger_mut(&mut self) -> &mut Ledger<VotePayload, TallyEffect, V, H> {
        &mut self.ledger
    }
}
