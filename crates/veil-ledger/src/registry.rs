//! Membership sets backing the ledger's exactly-once guarantees.
//!
//! Both sets are plain deterministic membership tests with insert. The
//! check-then-insert sequences live inside the ledger's mutable-borrow
//! critical section, so they cannot be separated by a concurrent operation.

use std::collections::HashSet;

/// Set of commitments that are already leaves of the accumulator.
///
/// A commitment, once present, is never removed; re-registration is rejected
/// by the ledger with `DuplicateCommitment`.
#[derive(Clone, Debug, Default)]
pub struct CommitmentStore {
    entries: HashSet<[u8; 32]>,
}

impl CommitmentStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the commitment has already been registered.
    pub fn contains(&self, commitment: &[u8; 32]) -> bool {
        self.entries.contains(commitment)
    }

    /// Insert a commitment; returns `false` if it was already present.
    pub fn insert(&mut self, commitment: [u8; 32]) -> bool {
        self.entries.insert(commitment)
    }

    /// Number of registered commitments.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no commitment has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Set of consumed nullifier hashes.
///
/// Membership here is the sole evidence of prior consumption; entries are
/// created by the first successful `consume` naming them and never destroyed.
#[derive(Clone, Debug, Default)]
pub struct NullifierRegistry {
    spent: HashSet<[u8; 32]>,
}

impl NullifierRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the nullifier hash has been consumed.
    pub fn contains(&self, nullifier_hash: &[u8; 32]) -> bool {
        self.spent.contains(nullifier_hash)
    }

    /// Mark a nullifier hash consumed; returns `false` if it already was.
    pub fn insert(&mut self, nullifier_hash: [u8; 32]) -> bool {
        self.spent.insert(nullifier_hash)
    }

    /// Number of consumed nullifiers.
    pub fn len(&self) -> usize {
        self.spent.len()
    }

    /// Whether nothing has been consumed yet.
    pub fn is_empty(&self) -> bool {
        self.spent.is_empty()
    }
}
