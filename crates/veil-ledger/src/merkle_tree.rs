//! Append-only incremental Merkle accumulator over 32-byte field elements.
//!
//! The tree has a fixed depth chosen at construction and appends leaves in
//! strict insertion order. A per-level frontier (the most recently filled
//! node on the insertion path) keeps each append at `levels` hash
//! invocations instead of rehashing the whole tree.
//!
//! Empty positions take a precomputed zero value for their level. The chain
//! is derived once at construction from a fixed public seed:
//! `zero[0] = H(seed, seed)`, `zero[i] = H(zero[i-1], zero[i-1])`. Any
//! subtree with no inserted leaves therefore behaves as though filled with
//! the corresponding zero value, and every node is well-defined before the
//! tree is full.
//!
//! The tree itself is agnostic to duplicate leaf values; commitment
//! uniqueness is enforced one layer up, by the commitment store.

use core::marker::PhantomData;

use borsh::{BorshDeserialize, BorshSerialize};
use light_hasher::Hasher;

use crate::errors::LedgerError;

/// Public seed for the zero-value chain. Hashing a known constant (rather
/// than using a secret) makes empty-subtree values reproducible by any
/// off-system prover.
pub const ZERO_VALUE_SEED: [u8; 32] = [0u8; 32];

/// Maximum supported tree depth. Bounded so leaf indices fit `u64` and
/// witnesses stay small.
pub const MAX_TREE_DEPTH: usize = 32;

/// Membership path from a leaf to the root.
///
/// `siblings[i]` is the sibling value at level `i`; `directions[i]` is
/// `false` when the path node is the left child at that level and `true`
/// when it is the right child, matching the `H(left, right)` combination
/// order. Off-system provers feed this into witness generation.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct MerkleWitness {
    /// Sibling node values, one per level, leaf level first.
    pub siblings: Vec<[u8; 32]>,
    /// Direction bits, one per level; `true` means "node is the right child".
    pub directions: Vec<bool>,
}

impl MerkleWitness {
    /// Recombine the witness with its leaf, reproducing the root the tree
    /// had when the witness was extracted.
    pub fn compute_root<H: Hasher>(&self, leaf: [u8; 32]) -> Result<[u8; 32], LedgerError> {
        let mut node = leaf;
        for (sibling, is_right) in self.siblings.iter().zip(self.directions.iter()) {
            node = if *is_right {
                H::hashv(&[sibling, &node])?
            } else {
                H::hashv(&[&node, sibling])?
            };
        }
        Ok(node)
    }
}

/// Fixed-depth append-only Merkle accumulator.
///
/// Generic over the two-input hash function used to combine nodes; the
/// shipped configuration is Poseidon over BN254 via `light_hasher::Poseidon`.
#[derive(Clone, Debug)]
pub struct IncrementalMerkleTree<H: Hasher> {
    levels: usize,
    next_index: u64,
    /// Most recently filled node per level on the current insertion path.
    frontier: Vec<[u8; 32]>,
    /// Zero-value chain, one filler value per level.
    zeros: Vec<[u8; 32]>,
    root: [u8; 32],
    /// All inserted leaves, retained so any past index can be witnessed.
    leaves: Vec<[u8; 32]>,
    _hasher: PhantomData<H>,
}

impl<H: Hasher> IncrementalMerkleTree<H> {
    /// Create an empty tree of the given depth (capacity `2^levels`).
    pub fn new(levels: usize) -> Result<Self, LedgerError> {
        if levels == 0 || levels > MAX_TREE_DEPTH {
            return Err(LedgerError::InvalidConfiguration);
        }

        let mut zeros = Vec::with_capacity(levels);
        let mut current = H::hashv(&[&ZERO_VALUE_SEED, &ZERO_VALUE_SEED])?;
        for _ in 0..levels {
            zeros.push(current);
            current = H::hashv(&[&current, &current])?;
        }

        Ok(Self {
            levels,
            next_index: 0,
            frontier: zeros.clone(),
            zeros,
            // An empty tree is a tree of zero values all the way up.
            root: current,
            leaves: Vec::new(),
            _hasher: PhantomData,
        })
    }

    /// Append a leaf, returning its assigned index.
    ///
    /// Fails with [`LedgerError::TreeFull`] once `2^levels` leaves have been
    /// inserted. The whole insertion path is hashed before any state is
    /// mutated, so a hashing failure (a leaf that is not a canonical field
    /// element) leaves the tree untouched.
    pub fn append(&mut self, leaf: [u8; 32]) -> Result<u64, LedgerError> {
        if self.next_index >= self.capacity() {
            return Err(LedgerError::TreeFull);
        }

        let index = self.next_index;
        let mut current_index = index;
        let mut node = leaf;
        let mut frontier_updates: Vec<(usize, [u8; 32])> = Vec::new();

        for level in 0..self.levels {
            let (left, right) = if current_index % 2 == 0 {
                frontier_updates.push((level, node));
                (node, self.zeros[level])
            } else {
                (self.frontier[level], node)
            };
            node = H::hashv(&[&left, &right])?;
            current_index /= 2;
        }

        for (level, value) in frontier_updates {
            self.frontier[level] = value;
        }
        self.root = node;
        self.leaves.push(leaf);
        self.next_index += 1;

        Ok(index)
    }

    /// Extract the membership path for a previously inserted leaf.
    ///
    /// Rebuilds the tree layer by layer from the retained leaves; this is
    /// `O(n)` hashing but only runs for off-system witness extraction, never
    /// on the append path.
    pub fn path_for(&self, index: u64) -> Result<MerkleWitness, LedgerError> {
        if index >= self.next_index {
            return Err(LedgerError::LeafOutOfRange);
        }
        let mut idx = usize::try_from(index).map_err(|_| LedgerError::LeafOutOfRange)?;

        let mut layer = self.leaves.clone();
        let mut siblings = Vec::with_capacity(self.levels);
        let mut directions = Vec::with_capacity(self.levels);

        for level in 0..self.levels {
            let zero = self.zeros[level];
            let sibling_index = idx ^ 1;
            siblings.push(layer.get(sibling_index).copied().unwrap_or(zero));
            directions.push(idx % 2 == 1);

            let mut next = Vec::with_capacity(layer.len().div_ceil(2));
            for pair in layer.chunks(2) {
                let left = pair[0];
                let right = pair.get(1).copied().unwrap_or(zero);
                next.push(H::hashv(&[&left, &right])?);
            }
            layer = next;
            idx /= 2;
        }

        Ok(MerkleWitness { siblings, directions })
    }

    /// Current root. Changes exactly once per successful [`append`].
    ///
    /// [`append`]: IncrementalMerkleTree::append
    pub fn current_root(&self) -> [u8; 32] {
        self.root
    }

    /// Number of leaves inserted so far.
    pub fn leaf_count(&self) -> u64 {
        self.next_index
    }

    /// Maximum number of leaves (`2^levels`).
    pub fn capacity(&self) -> u64 {
        1u64 << self.levels
    }

    /// Tree depth fixed at construction.
    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Zero value used to fill empty positions at the given level.
    pub fn zero_value(&self, level: usize) -> Option<[u8; 32]> {
        self.zeros.get(level).copied()
    }
}
