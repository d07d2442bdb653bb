//! The commit/reveal ledger.
//!
//! [`Ledger`] wires the accumulator, root history, stores, and verifier into
//! the two operations deployments build on: `register` appends a commitment,
//! `consume` spends a nullifier against a proof of membership and applies
//! the deployment's payload effect.

use light_hasher::Hasher;

use crate::errors::LedgerError;
use crate::events::LedgerEvent;
use crate::merkle_tree::{IncrementalMerkleTree, MerkleWitness};
use crate::payload::{Payload, PayloadEffect};
use crate::registry::{CommitmentStore, NullifierRegistry};
use crate::root_history::RootHistory;
use crate::verifier::ProofVerifier;

/// A commit/reveal ledger parameterized over its deployment.
///
/// Type parameters: `P` is the deployment's reveal payload, `E` its effect,
/// `V` the proof verifier, `H` the accumulator hash.
pub struct Ledger<P, E, V, H>
where
    P: Payload,
    E: PayloadEffect<P>,
    V: ProofVerifier,
    H: Hasher,
{
    tree: IncrementalMerkleTree<H>,
    root_history: RootHistory,
    commitments: CommitmentStore,
    nullifiers: NullifierRegistry,
    verifier: V,
    effect: E,
    events: Vec<LedgerEvent<P>>,
}

impl<P, E, V, H> Ledger<P, E, V, H>
where
    P: Payload,
    E: PayloadEffect<P>,
    V: ProofVerifier,
    H: Hasher,
{
    /// Create an empty ledger with a tree of `levels` levels and a root
    /// history holding `history_capacity` roots. The empty tree's root is
    /// seeded into the history so proofs against it are accepted.
    pub fn new(
        levels: usize,
        history_capacity: usize,
        verifier: V,
        effect: E,
    ) -> Result<Self, LedgerError> {
        let tree = IncrementalMerkleTree::new(levels)?;
        let root_history = RootHistory::new(history_capacity, tree.current_root())?;
        Ok(Self {
            tree,
            root_history,
            commitments: CommitmentStore::new(),
            nullifiers: NullifierRegistry::new(),
            verifier,
            effect,
            events: Vec::new(),
        })
    }

    /// Append a commitment to the accumulator.
    ///
    /// Rejects commitments that were already registered; the anonymity set
    /// only grows through distinct leaves. Returns the assigned leaf index.
    pub fn register(&mut self, commitment: [u8; 32]) -> Result<u64, LedgerError> {
        if self.commitments.contains(&commitment) {
            return Err(LedgerError::DuplicateCommitment);
        }
        let index = self.tree.append(commitment)?;
        self.commitments.insert(commitment);
        self.root_history.record(self.tree.current_root());
        tracing::debug!(index, commitment = %hex::encode(commitment), "commitment registered");
        self.events.push(LedgerEvent::Registered { commitment, index });
        Ok(index)
    }

    /// Consume a nullifier against a membership proof.
    ///
    /// `root` must be in the root history, `nullifier_hash` unspent, and
    /// `proof` valid for the public input vector
    /// `[root, nullifier_hash, payload inputs...]`. On acceptance the
    /// nullifier is marked spent, the payload effect runs, and a `Consumed`
    /// event is recorded.
    ///
    /// The nullifier is marked spent *before* the effect is applied: a
    /// failing effect surfaces its error but does not reopen the note,
    /// otherwise a reverting effect would let the same proof be replayed.
    /// No `Consumed` event is recorded in that case; the event stream only
    /// carries effects that actually happened.
    pub fn consume(
        &mut self,
        root: [u8; 32],
        nullifier_hash: [u8; 32],
        proof: &[u8],
        payload: P,
    ) -> Result<(), LedgerError> {
        if !self.root_history.contains(&root) {
            return Err(LedgerError::UnknownRoot);
        }
        if self.nullifiers.contains(&nullifier_hash) {
            return Err(LedgerError::AlreadySpent);
        }

        let mut public_inputs = vec![root, nullifier_hash];
        public_inputs.extend(payload.public_inputs());
        if !self.verifier.verify(&public_inputs, proof) {
            return Err(LedgerError::InvalidProof);
        }

        self.nullifiers.insert(nullifier_hash);
        tracing::debug!(nullifier = %hex::encode(nullifier_hash), "nullifier consumed");
        self.effect.apply(&payload)?;
        self.events.push(LedgerEvent::Consumed {
            nullifier_hash,
            payload,
        });
        Ok(())
    }

    /// Whether a nullifier hash has been consumed.
    pub fn is_spent(&self, nullifier_hash: &[u8; 32]) -> bool {
        self.nullifiers.contains(nullifier_hash)
    }

    /// Whether a commitment has been registered.
    pub fn is_registered(&self, commitment: &[u8; 32]) -> bool {
        self.commitments.contains(commitment)
    }

    /// The accumulator's current root.
    pub fn current_root(&self) -> [u8; 32] {
        self.tree.current_root()
    }

    /// Whether a root is in the recent-root window.
    pub fn is_known_root(&self, root: &[u8; 32]) -> bool {
        self.root_history.contains(root)
    }

    /// Membership witness for the leaf at `index` against the current root.
    pub fn path_for(&self, index: u64) -> Result<MerkleWitness, LedgerError> {
        self.tree.path_for(index)
    }

    /// Number of registered commitments.
    pub fn leaf_count(&self) -> u64 {
        self.tree.leaf_count()
    }

    /// The deployment's effect state.
    pub fn effect(&self) -> &E {
        &self.effect
    }

    /// Mutable access to the deployment's effect state.
    pub fn effect_mut(&mut self) -> &mut E {
        &mut self.effect
    }

    /// Events recorded since creation or the last [`Self::take_events`].
    pub fn events(&self) -> &[LedgerEvent<P>] {
        &self.events
    }

    /// Drain and return the recorded events.
    pub fn take_events(&mut self) -> Vec<LedgerEvent<P>> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{prove_binding, BindingVerifier};
    use light_hasher::Poseidon;

    const LEVELS: usize = 6;
    const HISTORY: usize = 4;

    type TestLedger = Ledger<(), (), BindingVerifier<Poseidon>, Poseidon>;

    fn ledger() -> TestLedger {
        Ledger::new(LEVELS, HISTORY, BindingVerifier::new(), ()).unwrap()
    }

    fn commitment(tag: u8) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[31] = tag;
        bytes
    }

    fn proof_for(root: [u8; 32], nullifier_hash: [u8; 32]) -> Vec<u8> {
        prove_binding::<Poseidon>(&[root, nullifier_hash])
    }

    #[test]
    fn register_assigns_sequential_indices() {
        let mut ledger = ledger();
        assert_eq!(ledger.register(commitment(1)).unwrap(), 0);
        assert_eq!(ledger.register(commitment(2)).unwrap(), 1);
        assert_eq!(ledger.register(commitment(3)).unwrap(), 2);
        assert_eq!(ledger.leaf_count(), 3);
    }

    #[test]
    fn duplicate_commitment_is_rejected() {
        let mut ledger = ledger();
        ledger.register(commitment(1)).unwrap();
        assert_eq!(
            ledger.register(commitment(1)),
            Err(LedgerError::DuplicateCommitment)
        );
        assert_eq!(ledger.leaf_count(), 1);
    }

    #[test]
    fn empty_tree_root_is_known() {
        let ledger = ledger();
        assert!(ledger.is_known_root(&ledger.current_root()));
    }

    #[test]
    fn consume_spends_exactly_once() {
        let mut ledger = ledger();
        ledger.register(commitment(1)).unwrap();
        let root = ledger.current_root();
        let nullifier = commitment(0x41);
        let proof = proof_for(root, nullifier);

        assert!(!ledger.is_spent(&nullifier));
        ledger.consume(root, nullifier, &proof, ()).unwrap();
        assert!(ledger.is_spent(&nullifier));
        assert_eq!(
            ledger.consume(root, nullifier, &proof, ()),
            Err(LedgerError::AlreadySpent)
        );
    }

    #[test]
    fn unknown_root_is_rejected_before_proof_check() {
        let mut ledger = ledger();
        let nullifier = commitment(0x41);
        // A proof that would bind fine, but against a root never produced
        // by this ledger.
        let fake_root = commitment(0x99);
        let proof = proof_for(fake_root, nullifier);
        assert_eq!(
            ledger.consume(fake_root, nullifier, &proof, ()),
            Err(LedgerError::UnknownRoot)
        );
        assert!(!ledger.is_spent(&nullifier));
    }

    #[test]
    fn evicted_root_is_rejected() {
        let mut ledger = ledger();
        ledger.register(commitment(1)).unwrap();
        let stale = ledger.current_root();
        // HISTORY further registrations push `stale` out of the window.
        for tag in 2..=(HISTORY as u8 + 1) {
            ledger.register(commitment(tag)).unwrap();
        }
        assert!(!ledger.is_known_root(&stale));

        let nullifier = commitment(0x41);
        let proof = proof_for(stale, nullifier);
        assert_eq!(
            ledger.consume(stale, nullifier, &proof, ()),
            Err(LedgerError::UnknownRoot)
        );
    }

    #[test]
    fn recent_but_not_latest_root_is_accepted() {
        let mut ledger = ledger();
        ledger.register(commitment(1)).unwrap();
        let older = ledger.current_root();
        ledger.register(commitment(2)).unwrap();
        assert_ne!(older, ledger.current_root());

        let nullifier = commitment(0x41);
        let proof = proof_for(older, nullifier);
        ledger.consume(older, nullifier, &proof, ()).unwrap();
    }

    #[test]
    fn tampered_public_inputs_invalidate_the_proof() {
        let mut ledger = ledger();
        ledger.register(commitment(1)).unwrap();
        let root = ledger.current_root();
        let proof = proof_for(root, commitment(0x41));

        // Same proof, different nullifier.
        assert_eq!(
            ledger.consume(root, commitment(0x42), &proof, ()),
            Err(LedgerError::InvalidProof)
        );
        assert!(!ledger.is_spent(&commitment(0x42)));
        assert!(!ledger.is_spent(&commitment(0x41)));
    }

    struct FailingEffect;

    impl PayloadEffect<()> for FailingEffect {
        fn apply(&mut self, _payload: &()) -> Result<(), LedgerError> {
            Err(LedgerError::EffectFailed)
        }
    }

    #[test]
    fn failing_effect_still_marks_nullifier_spent() {
        let mut ledger: Ledger<(), FailingEffect, BindingVerifier<Poseidon>, Poseidon> =
            Ledger::new(LEVELS, HISTORY, BindingVerifier::new(), FailingEffect).unwrap();
        ledger.register(commitment(1)).unwrap();
        let root = ledger.current_root();
        let nullifier = commitment(0x41);
        let proof = proof_for(root, nullifier);

        assert_eq!(
            ledger.consume(root, nullifier, &proof, ()),
            Err(LedgerError::EffectFailed)
        );
        assert!(ledger.is_spent(&nullifier));
        assert_eq!(
            ledger.consume(root, nullifier, &proof, ()),
            Err(LedgerError::AlreadySpent)
        );
        // The burned nullifier produced no effect, so the event stream must
        // not claim one; only the registration is visible.
        assert_eq!(
            ledger.take_events(),
            vec![LedgerEvent::Registered {
                commitment: commitment(1),
                index: 0,
            }]
        );
    }

    #[test]
    fn events_record_the_full_history() {
        let mut ledger = ledger();
        let index = ledger.register(commitment(1)).unwrap();
        let root = ledger.current_root();
        let nullifier = commitment(0x41);
        let proof = proof_for(root, nullifier);
        ledger.consume(root, nullifier, &proof, ()).unwrap();

        let events = ledger.take_events();
        assert_eq!(
            events,
            vec![
                LedgerEvent::Registered {
                    commitment: commitment(1),
                    index,
                },
                LedgerEvent::Consumed {
                    nullifier_hash: nullifier,
                    payload: (),
                },
            ]
        );
        assert!(ledger.events().is_empty());
    }

    #[test]
    fn witness_from_ledger_recomputes_current_root() {
        let mut ledger = ledger();
        for tag in 1..=5 {
            ledger.register(commitment(tag)).unwrap();
        }
        let witness = ledger.path_for(2).unwrap();
        assert_eq!(
            witness.compute_root::<Poseidon>(commitment(3)).unwrap(),
            ledger.current_root()
        );
    }
}
