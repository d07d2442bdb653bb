//! Anonymity-preserving commit/reveal ledger.
//!
//! The ledger accepts opaque commitments into a fixed-depth incremental
//! Merkle accumulator, keeps a sliding window of recent roots, and lets
//! holders later consume a one-time nullifier by proving -- in zero
//! knowledge -- that some registered commitment is theirs, without saying
//! which. Deployments attach a [`Payload`] to each reveal and a
//! [`PayloadEffect`] that runs when the reveal is accepted; the proof binds
//! the payload, so it cannot be altered in flight.
//!
//! Proofs are Groth16 over BN254 (see [`groth16`]); accumulator hashing is
//! pluggable through `light_hasher::Hasher` and is Poseidon in the intended
//! deployments. The `test-mode` feature exposes [`testing`], a deterministic
//! prover/verifier pair for downstream test suites.

pub mod errors;
pub mod events;
pub mod groth16;
pub mod ledger;
pub mod merkle_tree;
pub mod payload;
pub mod registry;
pub mod root_history;
#[cfg(any(test, feature = "test-mode"))]
pub mod testing;
pub mod verifier;

pub use errors::{Groth16Error, LedgerError};
pub use events::{EventType, LedgerEvent};
pub use ledger::Ledger;
pub use merkle_tree::{IncrementalMerkleTree, MerkleWitness, MAX_TREE_DEPTH};
pub use payload::{Payload, PayloadEffect};
pub use registry::{CommitmentStore, NullifierRegistry};
pub use root_history::{RootHistory, DEFAULT_ROOT_HISTORY_SIZE};
pub use verifier::{Groth16MembershipVerifier, ProofVerifier};
